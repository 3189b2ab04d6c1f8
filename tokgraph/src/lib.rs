pub mod error;
pub use crate::error::GraphError;

pub mod graph;

pub mod table;

pub mod value;

#[cfg(test)]
mod tests;
