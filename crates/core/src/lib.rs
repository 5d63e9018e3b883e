//! Domain primitives shared by the database and API crates.
//!
//! Nothing in here performs I/O: the relationship normalizer, role
//! capabilities and input helpers are plain functions over plain data.

pub mod error;
pub mod input;
pub mod relationship;
pub mod roles;
pub mod types;
