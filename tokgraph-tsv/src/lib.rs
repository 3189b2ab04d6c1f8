mod error;
pub use crate::error::{IOError, ParseError};

pub mod io;

#[cfg(test)]
mod tests;
