//! Artist endpoints

use axum::{
    extract::{Path, State},
    response::Response,
    Json,
};
use gigbook_common::db::{self, Artist, ArtistForm, NamedEntity};
use gigbook_common::search::{filter_by_name, search_hits};
use gigbook_common::shows::{partition_shows, ShowPartition};
use gigbook_common::time;
use serde::Serialize;
use tracing::info;

use super::{found, log_rejected, ActionResponse, ApiError, EditForm, SearchRequest, SearchResponse};
use crate::AppState;

/// Artist with the venues of its past and upcoming shows
#[derive(Debug, Serialize)]
pub struct ArtistDetail {
    #[serde(flatten)]
    pub artist: Artist,
    #[serde(flatten)]
    pub shows: ShowPartition,
}

/// GET /artists
///
/// Every artist's id and name, ordered by id.
pub async fn list_artists(
    State(state): State<AppState>,
) -> Result<Json<Vec<NamedEntity>>, ApiError> {
    let artists = db::artists::artist_names(&state.db).await?;
    Ok(Json(artists))
}

/// POST /artists/search
pub async fn search_artists(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let now = time::now();
    let names = db::artists::artist_names(&state.db).await?;
    let matched = filter_by_name(&request.search_term, names);
    let ids: Vec<i64> = matched.iter().map(|artist| artist.id).collect();
    let links = db::shows::links_for_artists(&state.db, &ids).await?;

    let results = search_hits(&now, matched, &links);
    log_rejected("artist search", &results.rejected);
    info!("Artist search {:?}: {} match(es)", request.search_term, results.count);

    Ok(Json(SearchResponse {
        search_term: request.search_term,
        results,
    }))
}

/// GET /artists/:artist_id
pub async fn show_artist(
    State(state): State<AppState>,
    Path(artist_id): Path<i64>,
) -> Result<Json<ArtistDetail>, ApiError> {
    let artist = db::artists::get_artist(&state.db, artist_id).await?;
    let links = db::shows::links_for_artist(&state.db, artist_id).await?;

    let shows = partition_shows(&time::now(), &links);
    log_rejected(&format!("artist {}", artist_id), &shows.rejected);

    Ok(Json(ArtistDetail { artist, shows }))
}

/// POST /artists/create
pub async fn create_artist(
    State(state): State<AppState>,
    Json(form): Json<ArtistForm>,
) -> Result<Json<ActionResponse>, ApiError> {
    let artist_id = db::artists::insert_artist(&state.db, &form)
        .await
        .map_err(|e| {
            ApiError::new(
                e,
                format!("An error occurred. Artist {} could not be listed.", form.name),
            )
        })?;

    Ok(Json(ActionResponse::created(
        artist_id,
        format!("Artist {} was successfully listed!", form.name),
    )))
}

/// GET /artists/:artist_id/edit
///
/// Current values to prefill the edit form.
pub async fn edit_artist(
    State(state): State<AppState>,
    Path(artist_id): Path<i64>,
) -> Result<Json<EditForm<ArtistForm>>, ApiError> {
    let artist = db::artists::get_artist(&state.db, artist_id).await?;

    Ok(Json(EditForm {
        id: artist.id,
        form: ArtistForm::from(artist),
    }))
}

/// POST /artists/:artist_id/edit
///
/// Overwrites every field, then redirects to the artist page.
pub async fn edit_artist_submission(
    State(state): State<AppState>,
    Path(artist_id): Path<i64>,
    Json(form): Json<ArtistForm>,
) -> Result<Response, ApiError> {
    db::artists::update_artist(&state.db, artist_id, &form)
        .await
        .map_err(|e| {
            ApiError::new(
                e,
                format!("An error occurred. Artist {} could not be updated.", form.name),
            )
        })?;

    Ok(found(
        format!("/artists/{}", artist_id),
        ActionResponse::ok(format!("Artist {} was successfully updated!", form.name)),
    ))
}

/// DELETE /artists/:artist_id
///
/// Removes the artist and its shows, then redirects home.
pub async fn delete_artist(
    State(state): State<AppState>,
    Path(artist_id): Path<i64>,
) -> Result<Response, ApiError> {
    let deleted = db::artists::delete_artist(&state.db, artist_id)
        .await
        .map_err(|e| {
            ApiError::new(
                e,
                format!("Please try again. Artist {} could not be deleted.", artist_id),
            )
        })?;

    Ok(found(
        "/".to_string(),
        ActionResponse::ok(format!("Artist {} was successfully deleted!", deleted.name)),
    ))
}
