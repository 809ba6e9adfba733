//! Venue endpoints

use axum::{
    extract::{Path, State},
    response::Response,
    Json,
};
use gigbook_common::db::{self, Venue, VenueForm};
use gigbook_common::listing::{group_areas, Area};
use gigbook_common::search::{filter_by_name, search_hits};
use gigbook_common::shows::{partition_shows, ShowPartition};
use gigbook_common::time;
use serde::Serialize;
use tracing::info;

use super::{found, log_rejected, ActionResponse, ApiError, EditForm, SearchRequest, SearchResponse};
use crate::AppState;

/// Venue with its past and upcoming shows
#[derive(Debug, Serialize)]
pub struct VenueDetail {
    #[serde(flatten)]
    pub venue: Venue,
    #[serde(flatten)]
    pub shows: ShowPartition,
}

/// GET /venues
///
/// Venues grouped by city and state, each with its number of upcoming shows.
pub async fn list_venues(State(state): State<AppState>) -> Result<Json<Vec<Area>>, ApiError> {
    let now = time::now();
    let venues = db::venues::area_venues(&state.db).await?;
    let links = db::shows::links_by_venue(&state.db).await?;

    let (areas, rejected) = group_areas(&now, venues, &links);
    log_rejected("venue listing", &rejected);

    Ok(Json(areas))
}

/// POST /venues/search
pub async fn search_venues(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let now = time::now();
    let names = db::venues::venue_names(&state.db).await?;
    let matched = filter_by_name(&request.search_term, names);
    let ids: Vec<i64> = matched.iter().map(|venue| venue.id).collect();
    let links = db::shows::links_for_venues(&state.db, &ids).await?;

    let results = search_hits(&now, matched, &links);
    log_rejected("venue search", &results.rejected);
    info!("Venue search {:?}: {} match(es)", request.search_term, results.count);

    Ok(Json(SearchResponse {
        search_term: request.search_term,
        results,
    }))
}

/// GET /venues/:venue_id
pub async fn show_venue(
    State(state): State<AppState>,
    Path(venue_id): Path<i64>,
) -> Result<Json<VenueDetail>, ApiError> {
    let venue = db::venues::get_venue(&state.db, venue_id).await?;
    let links = db::shows::links_for_venue(&state.db, venue_id).await?;

    let shows = partition_shows(&time::now(), &links);
    log_rejected(&format!("venue {}", venue_id), &shows.rejected);

    Ok(Json(VenueDetail { venue, shows }))
}

/// POST /venues/create
pub async fn create_venue(
    State(state): State<AppState>,
    Json(form): Json<VenueForm>,
) -> Result<Json<ActionResponse>, ApiError> {
    let venue_id = db::venues::insert_venue(&state.db, &form)
        .await
        .map_err(|e| {
            ApiError::new(
                e,
                format!("An error occurred. Venue {} could not be listed.", form.name),
            )
        })?;

    Ok(Json(ActionResponse::created(
        venue_id,
        format!("Venue {} was successfully listed!", form.name),
    )))
}

/// GET /venues/:venue_id/edit
///
/// Current values to prefill the edit form.
pub async fn edit_venue(
    State(state): State<AppState>,
    Path(venue_id): Path<i64>,
) -> Result<Json<EditForm<VenueForm>>, ApiError> {
    let venue = db::venues::get_venue(&state.db, venue_id).await?;

    Ok(Json(EditForm {
        id: venue.id,
        form: VenueForm::from(venue),
    }))
}

/// POST /venues/:venue_id/edit
///
/// Overwrites every field, then redirects to the venue page.
pub async fn edit_venue_submission(
    State(state): State<AppState>,
    Path(venue_id): Path<i64>,
    Json(form): Json<VenueForm>,
) -> Result<Response, ApiError> {
    db::venues::update_venue(&state.db, venue_id, &form)
        .await
        .map_err(|e| {
            ApiError::new(
                e,
                format!("An error occurred. Venue {} could not be updated.", form.name),
            )
        })?;

    Ok(found(
        format!("/venues/{}", venue_id),
        ActionResponse::ok(format!("Venue {} was successfully updated!", form.name)),
    ))
}

/// DELETE /venues/:venue_id
///
/// Removes the venue and its shows, then redirects home.
pub async fn delete_venue(
    State(state): State<AppState>,
    Path(venue_id): Path<i64>,
) -> Result<Response, ApiError> {
    let deleted = db::venues::delete_venue(&state.db, venue_id)
        .await
        .map_err(|e| {
            ApiError::new(
                e,
                format!("Please try again. Venue {} could not be deleted.", venue_id),
            )
        })?;

    Ok(found(
        "/".to_string(),
        ActionResponse::ok(format!("Venue {} was successfully deleted!", deleted.name)),
    ))
}
