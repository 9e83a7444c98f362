use crate::core::capacity::MAX_CREDIT;
use crate::core::house::HouseId;
use serde::{Deserialize, Serialize};

/// Default number of alternate routes retained per house.
pub const DEFAULT_MAX_ALTERNATES: usize = 5;

/// A route that reached a house at some point during routing, together with
/// the credit value it produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternatePath {
    pub path: Vec<HouseId>,
    pub credit_value: i64,
}

/// Bounded list of the most recent distinct routes into a house, ordered by
/// credit value descending.
///
/// New routes go in at the front, the list is cut back to its limit, and the
/// survivors are re-sorted. A route already present is not recorded again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternatePaths {
    limit: usize,
    paths: Vec<AlternatePath>,
}

impl AlternatePaths {
    /// Create an empty list holding at most `limit` routes, capped at
    /// [`DEFAULT_MAX_ALTERNATES`].
    pub fn new(limit: usize) -> Self {
        let limit = limit.min(DEFAULT_MAX_ALTERNATES);
        Self {
            limit,
            paths: Vec::with_capacity(limit),
        }
    }

    /// Record a route. Returns `false` if the same route was already held.
    pub fn record(&mut self, path: &[HouseId], credit_value: i64) -> bool {
        if self.paths.iter().any(|p| p.path == path) {
            return false;
        }
        self.paths.insert(
            0,
            AlternatePath {
                path: path.to_vec(),
                credit_value,
            },
        );
        self.paths.truncate(self.limit);
        self.paths.sort_by(|a, b| b.credit_value.cmp(&a.credit_value));
        true
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn as_slice(&self) -> &[AlternatePath] {
        &self.paths
    }

    pub fn iter(&self) -> impl Iterator<Item = &AlternatePath> {
        self.paths.iter()
    }

    fn clear(&mut self) {
        self.paths.clear();
    }
}

/// Routing state for one house.
///
/// Credit values are scores: lower is better. A house that routing never
/// reaches has no credit value.
#[derive(Debug, Clone)]
pub struct Node {
    house: HouseId,
    credit_value: Option<i64>,
    visited: bool,
    /// Houses traversed from the source, source first, excluding this house.
    shortest_path: Vec<HouseId>,
    alternates: AlternatePaths,
}

impl Node {
    pub fn new(house: HouseId, max_alternates: usize) -> Self {
        Self {
            house,
            credit_value: None,
            visited: false,
            shortest_path: Vec::new(),
            alternates: AlternatePaths::new(max_alternates),
        }
    }

    pub fn house(&self) -> &HouseId {
        &self.house
    }

    /// Best known credit value from the source, `None` if unreachable.
    pub fn credit_value(&self) -> Option<i64> {
        self.credit_value
    }

    /// Credit value with unreachable houses reported as [`MAX_CREDIT`].
    pub fn credit_value_or_sentinel(&self) -> i64 {
        self.credit_value.unwrap_or(MAX_CREDIT)
    }

    pub fn is_reachable(&self) -> bool {
        self.credit_value.is_some()
    }

    pub fn is_visited(&self) -> bool {
        self.visited
    }

    pub fn shortest_path(&self) -> &[HouseId] {
        &self.shortest_path
    }

    pub fn alternate_paths(&self) -> &AlternatePaths {
        &self.alternates
    }

    pub(crate) fn initialize_as_source(&mut self) {
        self.credit_value = Some(0);
        self.visited = true;
        self.shortest_path.clear();
    }

    pub(crate) fn mark_visited(&mut self) {
        self.visited = true;
    }

    /// Accept `candidate` arriving via `path` if it strictly improves on the
    /// current value.
    pub(crate) fn offer(&mut self, candidate: i64, path: &[HouseId]) -> bool {
        if self.credit_value.is_some_and(|current| candidate >= current) {
            return false;
        }
        self.credit_value = Some(candidate);
        self.shortest_path = path.to_vec();
        self.alternates.record(path, candidate);
        true
    }

    pub(crate) fn reset(&mut self) {
        self.credit_value = None;
        self.visited = false;
        self.shortest_path.clear();
        self.alternates.clear();
    }
}
