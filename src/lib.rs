//! # creditline-engine
//!
//! Credit-line switch routing for FX brokerage back offices.
//!
//! Given a network of bilateral, capacity-limited credit lines between
//! trading houses and the houses allowed to act as switches, this engine
//! computes for a nominated source house the best credit route to every
//! other house, along with a bounded set of alternative routes.
//!
//! ## Architecture
//!
//! - **core**: Houses, capacity symbols, credit lines, the line table
//! - **graph**: Credit network construction and FIFO relaxation routing
//! - **report**: Serialisable per-house routing results
//! - **simulation**: Random credit networks for benchmarks and demos

pub mod core;
pub mod graph;
pub mod report;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::capacity::{Availability, CapacityQuote, GradeSchedule, MAX_CREDIT};
    pub use crate::core::house::HouseId;
    pub use crate::core::line::{CreditLine, CreditLineError};
    pub use crate::core::table::{CreditLineTable, LineTableRow};
    pub use crate::graph::credit_graph::{CreditEdge, CreditGraph, EdgeKind, GraphConfig};
    pub use crate::graph::node::{AlternatePath, Node};
    pub use crate::graph::routing::RoutingError;
    pub use crate::report::{HouseRoute, RoutingReport};
}
