pub mod auth;
pub mod character;
pub mod images;
pub mod sources;
pub mod tags;
