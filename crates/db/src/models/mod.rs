//! Row models and DTOs.
//!
//! Each submodule contains:
//! - `FromRow` structs matching database rows
//! - input DTOs consumed by the repositories
//! - composed read views serialized by the API

pub mod character;
pub mod image;
pub mod relationship;
pub mod role;
pub mod session;
pub mod source;
pub mod tag;
pub mod user;
