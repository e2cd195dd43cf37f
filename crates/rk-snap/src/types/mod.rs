//! Core type definitions

mod candidate;
mod constraint;

pub use candidate::*;
pub use constraint::*;
