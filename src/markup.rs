//! Markup intake: recovery parsing and the element tree it produces.

pub mod recover;
pub mod tree;
