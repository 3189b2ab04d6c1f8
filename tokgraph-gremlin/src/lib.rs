//! Gremlin-style traversals over graphs of feature-annotated tokens.

mod error;
pub use crate::error::{MalformedInputError, TraversalError};

pub mod convert;
pub use crate::convert::{token_features_to_traversal, TokenGraphBuilder};

pub mod predicate;
pub use crate::predicate::P;

pub mod traversal;
pub use crate::traversal::{Element, Traversal, TraversalSource};

#[cfg(test)]
mod tests;
