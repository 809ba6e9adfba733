//! gigbook-web library - booking directory HTTP service
//!
//! Routes mirror the directory's pages: venue and artist listing, search,
//! detail, create, edit and delete, plus the show listing and show creation.
//! Responses are JSON.

use axum::Router;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Entity store handle, opened once at startup and closed at shutdown
    pub db: SqlitePool,
}

impl AppState {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let venues = Router::new()
        .route("/venues", get(api::list_venues))
        .route("/venues/search", post(api::search_venues))
        .route("/venues/create", post(api::create_venue))
        .route(
            "/venues/:venue_id",
            get(api::show_venue).delete(api::delete_venue),
        )
        .route(
            "/venues/:venue_id/edit",
            get(api::edit_venue).post(api::edit_venue_submission),
        );

    let artists = Router::new()
        .route("/artists", get(api::list_artists))
        .route("/artists/search", post(api::search_artists))
        .route("/artists/create", post(api::create_artist))
        .route(
            "/artists/:artist_id",
            get(api::show_artist).delete(api::delete_artist),
        )
        .route(
            "/artists/:artist_id/edit",
            get(api::edit_artist).post(api::edit_artist_submission),
        );

    let shows = Router::new()
        .route("/shows", get(api::list_shows))
        .route("/shows/create", post(api::create_show));

    Router::new()
        .route("/", get(api::index))
        .merge(api::health_routes())
        .merge(venues)
        .merge(artists)
        .merge(shows)
        .fallback(api::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
