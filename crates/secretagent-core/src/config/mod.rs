//! Configuration file (`~/.secretagent/secretagent.json5`): schema, loading, and validation.

mod loader;
mod schema;

pub use loader::ConfigBuilder;
pub use schema::*;
