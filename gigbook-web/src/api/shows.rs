//! Show endpoints

use axum::{extract::State, Json};
use gigbook_common::db::{self, ShowForm};
use gigbook_common::listing::{show_listing, ShowListing};
use gigbook_common::time;

use super::{log_rejected, ActionResponse, ApiError};
use crate::AppState;

/// GET /shows
///
/// Every show with its venue and artist, ordered by start time.
pub async fn list_shows(State(state): State<AppState>) -> Result<Json<Vec<ShowListing>>, ApiError> {
    let rows = db::shows::list_shows(&state.db).await?;
    let (listing, rejected) = show_listing(&time::now(), rows);

    log_rejected("show listing", &rejected);

    Ok(Json(listing))
}

/// POST /shows/create
pub async fn create_show(
    State(state): State<AppState>,
    Json(form): Json<ShowForm>,
) -> Result<Json<ActionResponse>, ApiError> {
    let show_id = db::shows::insert_show(&state.db, &form)
        .await
        .map_err(|e| ApiError::new(e, "An error occurred. Show could not be listed."))?;

    Ok(Json(ActionResponse::created(
        show_id,
        "Show was successfully listed!",
    )))
}
