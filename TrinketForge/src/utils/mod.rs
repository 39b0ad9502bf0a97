//! Utility functions

pub mod literal;
pub mod slug;

pub use literal::{Literal, LiteralError, parse_literal};
pub use slug::{display_name, slugify};
