//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that take
//! `&PgPool` as the first argument. The pool is injected by the caller; no
//! repository holds a connection of its own.

pub mod character_repo;
pub mod image_repo;
pub mod relationship_repo;
pub mod role_repo;
pub mod session_repo;
pub mod source_repo;
pub mod tag_repo;
pub mod user_repo;

pub use character_repo::CharacterRepo;
pub use image_repo::ImageRepo;
pub use relationship_repo::RelationshipRepo;
pub use role_repo::RoleRepo;
pub use session_repo::SessionRepo;
pub use source_repo::SourceRepo;
pub use tag_repo::TagRepo;
pub use user_repo::UserRepo;
