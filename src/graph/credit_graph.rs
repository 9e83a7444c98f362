use crate::core::capacity::MAX_CREDIT;
use crate::core::house::HouseId;
use crate::core::line::CreditLine;
use crate::core::table::CreditLineTable;
use crate::graph::node::{Node, DEFAULT_MAX_ALTERNATES};
use crate::graph::routing::{relax_from, RoutingError};
use log::{debug, info, warn};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// How an edge came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// A credit line; weighted by its remaining capacity.
    Direct,
    /// Re-routing through a switch; weighted by the inverted mutual capacity.
    Switch,
}

/// A directed edge of the credit network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditEdge {
    pub kind: EdgeKind,
    pub weight: i64,
}

/// Amounts copied from a credit line when the graph is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineTerms {
    pub capacity: i64,
    pub remaining: i64,
}

/// Tuning for a routing graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Alternate routes kept per house, at most [`DEFAULT_MAX_ALTERNATES`].
    pub max_alternates: usize,
    /// Abort routing after this many improving relaxations.
    pub max_relaxations: Option<usize>,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            max_alternates: DEFAULT_MAX_ALTERNATES,
            max_relaxations: None,
        }
    }
}

/// Weight of a switch edge between two houses with lines both ways.
///
/// The smaller of the two capacities is inverted against [`MAX_CREDIT`], so
/// deeper mutual credit makes a cheaper edge. Capacities above `MAX_CREDIT`
/// count as `MAX_CREDIT`, keeping every switch weight at least 1.
pub fn switch_weight(capacity_there: i64, capacity_back: i64) -> i64 {
    MAX_CREDIT + 1 - capacity_there.min(capacity_back).clamp(0, MAX_CREDIT)
}

/// The credit network seen from one source house.
///
/// One node per house; one edge per ordered pair at most. Credit lines
/// install direct edges, and pairs with lines in both directions where
/// either side is a switcher get a switch edge that replaces the direct one.
/// Routing runs once at build time and can be re-run with
/// [`calculate_routes`](Self::calculate_routes).
///
/// Each routing request should build its own graph.
///
/// # Examples
///
/// ```
/// use creditline_engine::prelude::*;
///
/// let lines = vec![
///     CreditLine::new(HouseId::new("A"), HouseId::new("B"), "swap", "spot", 10),
///     CreditLine::new(HouseId::new("B"), HouseId::new("C"), "swap", "spot", 5),
/// ];
/// let houses = ["A", "B", "C"].map(HouseId::new);
///
/// let graph = CreditGraph::build(
///     HouseId::new("A"),
///     houses,
///     &lines,
///     Vec::new(),
///     GraphConfig::default(),
/// ).unwrap();
///
/// let c = graph.node(&HouseId::new("C")).unwrap();
/// assert_eq!(c.credit_value(), Some(15));
/// assert_eq!(c.shortest_path(), &[HouseId::new("A"), HouseId::new("B")]);
/// ```
#[derive(Debug, Clone)]
pub struct CreditGraph {
    source: HouseId,
    graph: DiGraph<Node, CreditEdge>,
    index: HashMap<HouseId, NodeIndex>,
    lines: HashMap<(HouseId, HouseId), LineTerms>,
    config: GraphConfig,
}

impl CreditGraph {
    fn new(source: HouseId, mut config: GraphConfig) -> Self {
        if config.max_alternates > DEFAULT_MAX_ALTERNATES {
            warn!(
                "max_alternates {} exceeds {}; capping",
                config.max_alternates, DEFAULT_MAX_ALTERNATES
            );
            config.max_alternates = DEFAULT_MAX_ALTERNATES;
        }
        Self {
            source,
            graph: DiGraph::new(),
            index: HashMap::new(),
            lines: HashMap::new(),
            config,
        }
    }

    /// Build the network and route from `source`.
    ///
    /// Lines naming a house outside `houses` are skipped. When several lines
    /// share a `(source, destination)` pair the last one wins.
    pub fn build<'a>(
        source: HouseId,
        houses: impl IntoIterator<Item = HouseId>,
        lines: impl IntoIterator<Item = &'a CreditLine>,
        switchers: impl IntoIterator<Item = HouseId>,
        config: GraphConfig,
    ) -> Result<Self, RoutingError> {
        let mut graph = Self::new(source, config);
        graph.create_nodes(houses);
        graph.add_lines(lines);
        let switchers: BTreeSet<HouseId> = switchers.into_iter().collect();
        graph.link_switchers(&switchers);
        graph.calculate_routes()?;

        info!(
            "Built credit graph from {}: {} houses, {} edges, {} reachable",
            graph.source,
            graph.node_count(),
            graph.edge_count(),
            graph.nodes().filter(|n| n.is_reachable()).count()
        );
        Ok(graph)
    }

    /// Build the network for one product and tenor of a line table, using
    /// every house and switcher the table knows.
    pub fn from_table(
        table: &CreditLineTable,
        source: HouseId,
        product: &str,
        tenor: &str,
        config: GraphConfig,
    ) -> Result<Self, RoutingError> {
        Self::build(
            source,
            table.houses(),
            table.lines_for(product, tenor),
            table.switchers(),
            config,
        )
    }

    /// Re-run routing from the source, discarding previous results.
    pub fn calculate_routes(&mut self) -> Result<usize, RoutingError> {
        let source = *self
            .index
            .get(&self.source)
            .ok_or_else(|| RoutingError::SourceNotFound(self.source.clone()))?;
        relax_from(&mut self.graph, source, self.config.max_relaxations)
    }

    fn create_nodes(&mut self, houses: impl IntoIterator<Item = HouseId>) {
        for house in houses {
            if self.index.contains_key(&house) {
                continue;
            }
            let idx = self
                .graph
                .add_node(Node::new(house.clone(), self.config.max_alternates));
            self.index.insert(house, idx);
        }
    }

    fn add_lines<'a>(&mut self, lines: impl IntoIterator<Item = &'a CreditLine>) {
        for line in lines {
            let (Some(&from), Some(&to)) = (
                self.index.get(line.source()),
                self.index.get(line.destination()),
            ) else {
                debug!(
                    "Skipping line {} -> {}: house not in network",
                    line.source(),
                    line.destination()
                );
                continue;
            };

            self.lines.insert(
                (line.source().clone(), line.destination().clone()),
                LineTerms {
                    capacity: line.capacity(),
                    remaining: line.remaining(),
                },
            );
            self.graph.update_edge(
                from,
                to,
                CreditEdge {
                    kind: EdgeKind::Direct,
                    weight: line.remaining().max(0),
                },
            );
        }
    }

    fn link_switchers(&mut self, switchers: &BTreeSet<HouseId>) {
        let mut houses: Vec<HouseId> = self.index.keys().cloned().collect();
        houses.sort();

        for house in &houses {
            for other in &houses {
                if house == other || !(switchers.contains(house) || switchers.contains(other)) {
                    continue;
                }
                let (Some(there), Some(back)) = (
                    self.lines.get(&(house.clone(), other.clone())),
                    self.lines.get(&(other.clone(), house.clone())),
                ) else {
                    continue;
                };

                let weight = switch_weight(there.capacity, back.capacity);
                self.graph.update_edge(
                    self.index[house],
                    self.index[other],
                    CreditEdge {
                        kind: EdgeKind::Switch,
                        weight,
                    },
                );
            }
        }
    }

    // --- Queries ---

    pub fn source(&self) -> &HouseId {
        &self.source
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn node(&self, house: &HouseId) -> Option<&Node> {
        self.index.get(house).map(|&idx| &self.graph[idx])
    }

    /// All nodes, in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_weights()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// The edge from one house to another, if any.
    pub fn edge(&self, from: &HouseId, to: &HouseId) -> Option<CreditEdge> {
        let (&a, &b) = (self.index.get(from)?, self.index.get(to)?);
        self.graph.find_edge(a, b).map(|e| self.graph[e])
    }

    pub fn has_switch_edge(&self, from: &HouseId, to: &HouseId) -> bool {
        self.edge(from, to)
            .is_some_and(|e| e.kind == EdgeKind::Switch)
    }

    /// Outgoing edges of a house.
    pub fn neighbors(&self, house: &HouseId) -> Vec<(&HouseId, CreditEdge)> {
        let Some(&idx) = self.index.get(house) else {
            return Vec::new();
        };
        self.graph
            .edges(idx)
            .map(|e| (self.graph[e.target()].house(), *e.weight()))
            .collect()
    }

    /// Terms of the indexed line from one house to another.
    pub fn line_terms(&self, from: &HouseId, to: &HouseId) -> Option<LineTerms> {
        self.lines.get(&(from.clone(), to.clone())).copied()
    }
}
