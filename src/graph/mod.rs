//! The credit network and switch routing.

pub mod credit_graph;
pub mod node;
pub mod routing;
