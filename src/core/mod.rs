//! Foundational types: houses, capacity symbols, credit lines and the line table.

pub mod capacity;
pub mod house;
pub mod line;
pub mod table;
