//! Configuration for the `lopix` command
//!
//! Provides types and loading for the optional `lopix.toml` file.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
