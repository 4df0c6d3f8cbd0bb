//! Core types for Secret Agent.

mod criteria;
mod identifiers;
mod record;

pub use criteria::*;
pub use identifiers::*;
pub use record::*;
