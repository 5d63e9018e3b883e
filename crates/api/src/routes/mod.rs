pub mod auth;
pub mod characters;
pub mod health;
pub mod images;
pub mod sources;
pub mod tags;

use axum::Router;

use crate::state::AppState;

/// Build the API route tree, mounted at the root.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                              register (public)
/// /auth/login                                 login (public)
/// /auth/logout                                logout (session)
/// /auth/profile                               profile (session)
///
/// /characters/create                          create (creator)
/// /characters/edit                            full replace (creator)
/// /characters/get/{id}                        full view (public)
/// /characters/tags/add                        link tag (creator)
/// /characters/tags/remove                     unlink tag (creator)
/// /characters/relationships/update            reconcile relationships (creator)
///
/// /images/new                                 register external URL (creator)
/// /images/upload                              multipart upload (creator)
/// /images/delete                              delete (creator)
/// /images/characters/add                      link characters (creator)
/// /images/characters/remove                   unlink characters (creator)
/// /images/character/{id}                      images of a character (public)
/// /images/source/{id}                         images of a source (public)
///
/// /sources/get/all                            sources with characters (public)
/// /sources/get/{id}                           source with character views (public)
///
/// /tags/categories                            list categories (public)
/// /tags/categories/{id}                       category with tags (public)
/// /tags/categories/create                     create category (creator)
/// /tags/get/{id}                              tag with category (public)
/// /tags/create                                create tag (creator)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/characters", characters::router())
        .nest("/images", images::router())
        .nest("/sources", sources::router())
        .nest("/tags", tags::router())
}
