//! Request extractors for authentication, authorization and JSON input.
//!
//! - [`session::SessionAuth`] -- validates the `user_id` + `token` carried in a JSON body.
//! - [`rbac::RequireCreator`] -- additionally requires the `can_create` capability.
//! - [`json::ValidJson`] -- JSON body with 400 on malformed input and `validator` rules applied.
//! - [`path::AppPath`] -- path parameters with 400 on unparseable segments.

pub mod json;
pub mod path;
pub mod rbac;
pub mod session;
