//! HTTP API handlers for gigbook-web

pub mod artists;
pub mod error;
pub mod health;
pub mod shows;
pub mod venues;

pub use artists::{
    create_artist, delete_artist, edit_artist, edit_artist_submission, list_artists,
    search_artists, show_artist,
};
pub use error::{not_found, ApiError};
pub use health::{health_routes, index};
pub use shows::{create_show, list_shows};
pub use venues::{
    create_venue, delete_venue, edit_venue, edit_venue_submission, list_venues, search_venues,
    show_venue,
};

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use gigbook_common::search::SearchResults;
use gigbook_common::shows::RejectedShow;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Outcome of a write, carrying the message shown to the user
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl ActionResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            id: None,
        }
    }

    pub fn created(id: i64, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            id: Some(id),
        }
    }
}

/// POST body for venue and artist search
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub search_term: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub search_term: String,
    #[serde(flatten)]
    pub results: SearchResults,
}

/// Current form values for an edit page
#[derive(Debug, Serialize)]
pub struct EditForm<T> {
    pub id: i64,
    #[serde(flatten)]
    pub form: T,
}

/// 302 to `location` with the action message as body
pub(crate) fn found(location: String, body: ActionResponse) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)], Json(body)).into_response()
}

/// Log shows that were left out of a view or a count
pub(crate) fn log_rejected(view: &str, rejected: &[RejectedShow]) {
    for show in rejected {
        warn!("Skipping show {} in {}: {}", show.show_id, view, show.error);
    }
}
