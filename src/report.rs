use crate::core::house::HouseId;
use crate::graph::credit_graph::CreditGraph;
use crate::graph::node::AlternatePath;
use serde::{Deserialize, Serialize};

/// Routing outcome for one house.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseRoute {
    pub house: HouseId,
    /// `None` when the house cannot be reached from the source.
    pub credit_value: Option<i64>,
    /// Houses traversed from the source, source first.
    pub path: Vec<HouseId>,
    pub alternates: Vec<AlternatePath>,
}

impl HouseRoute {
    pub fn is_reachable(&self) -> bool {
        self.credit_value.is_some()
    }
}

/// Snapshot of a routing run, detached from the graph that produced it.
///
/// This is what confirmation and reporting layers consume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingReport {
    pub source: HouseId,
    /// One entry per house, sorted by house.
    pub routes: Vec<HouseRoute>,
}

impl RoutingReport {
    pub fn from_graph(graph: &CreditGraph) -> Self {
        let mut routes: Vec<HouseRoute> = graph
            .nodes()
            .map(|node| HouseRoute {
                house: node.house().clone(),
                credit_value: node.credit_value(),
                path: node.shortest_path().to_vec(),
                alternates: node.alternate_paths().as_slice().to_vec(),
            })
            .collect();
        routes.sort_by(|a, b| a.house.cmp(&b.house));

        RoutingReport {
            source: graph.source().clone(),
            routes,
        }
    }

    pub fn route(&self, house: &HouseId) -> Option<&HouseRoute> {
        self.routes.iter().find(|r| &r.house == house)
    }

    /// Houses other than the source that routing reached.
    pub fn reachable_count(&self) -> usize {
        self.routes
            .iter()
            .filter(|r| r.house != self.source && r.is_reachable())
            .count()
    }

    /// Fraction of non-source houses reached, in `[0, 1]`.
    pub fn coverage(&self) -> f64 {
        let others = self.routes.iter().filter(|r| r.house != self.source).count();
        if others == 0 {
            return 0.0;
        }
        self.reachable_count() as f64 / others as f64
    }
}

impl std::fmt::Display for RoutingReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Credit Routes from {} ===", self.source)?;
        writeln!(
            f,
            "Reachable: {} ({:.1}%)",
            self.reachable_count(),
            self.coverage() * 100.0
        )?;

        for route in &self.routes {
            if route.house == self.source {
                continue;
            }
            match route.credit_value {
                Some(value) => {
                    let hops: Vec<&str> = route
                        .path
                        .iter()
                        .chain(std::iter::once(&route.house))
                        .map(|h| h.as_str())
                        .collect();
                    writeln!(f, "\n  {:<12} {:>10}  {}", route.house.as_str(), value, hops.join(" → "))?;
                    for alt in route.alternates.iter().filter(|a| a.path != route.path) {
                        let alt_hops: Vec<&str> = alt.path.iter().map(|h| h.as_str()).collect();
                        writeln!(f, "    alt {:>10}  {} → …", alt.credit_value, alt_hops.join(" → "))?;
                    }
                }
                None => writeln!(f, "\n  {:<12} {:>10}", route.house.as_str(), "unreachable")?,
            }
        }
        Ok(())
    }
}
