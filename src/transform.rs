//! Translation-only transform evaluation for nested groups.

pub mod stack;

pub use stack::{TransformStack, parse_translate};
