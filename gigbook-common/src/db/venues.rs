//! Venue queries

use super::finish;
use super::models::{AreaVenueRow, Deleted, NamedEntity, Venue, VenueForm};
use crate::{Error, GenreSet, Result};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::info;

const VENUE_COLUMNS: &str = "id, name, city, state, address, phone, website, facebook_link, \
                             image_link, seeking_talent, seeking_description";

/// Fetch one venue with its genres
pub async fn get_venue(pool: &SqlitePool, venue_id: i64) -> Result<Venue> {
    let sql = format!("SELECT {} FROM venues WHERE id = ?", VENUE_COLUMNS);
    let mut venue = sqlx::query_as::<_, Venue>(&sql)
        .bind(venue_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Venue {}", venue_id)))?;

    venue.genres = venue_genres(pool, venue_id).await?;
    Ok(venue)
}

async fn venue_genres(pool: &SqlitePool, venue_id: i64) -> Result<GenreSet> {
    let tags: Vec<String> =
        sqlx::query_scalar("SELECT genre FROM venue_genres WHERE venue_id = ? ORDER BY genre")
            .bind(venue_id)
            .fetch_all(pool)
            .await?;
    Ok(tags.into_iter().collect())
}

/// Id and name of every venue, ordered by id
pub async fn venue_names(pool: &SqlitePool) -> Result<Vec<NamedEntity>> {
    let names = sqlx::query_as::<_, NamedEntity>("SELECT id, name FROM venues ORDER BY id")
        .fetch_all(pool)
        .await?;
    Ok(names)
}

/// Venues with their location, ordered by state, city, then id
pub async fn area_venues(pool: &SqlitePool) -> Result<Vec<AreaVenueRow>> {
    let rows = sqlx::query_as::<_, AreaVenueRow>(
        "SELECT id, name, city, state FROM venues ORDER BY state, city, id",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Insert a venue and its genres; returns the new id
pub async fn insert_venue(pool: &SqlitePool, form: &VenueForm) -> Result<i64> {
    form.validate()?;

    let mut tx = pool.begin().await?;
    let outcome = insert_venue_in(&mut tx, form).await;
    let venue_id = finish(tx, outcome, "insert venue").await?;

    info!("Inserted venue {} ({})", venue_id, form.name);
    Ok(venue_id)
}

async fn insert_venue_in(conn: &mut SqliteConnection, form: &VenueForm) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO venues (name, city, state, address, phone, website, facebook_link,
                            image_link, seeking_talent, seeking_description)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(form.name.trim())
    .bind(form.city.trim())
    .bind(form.state.trim())
    .bind(&form.address)
    .bind(&form.phone)
    .bind(&form.website)
    .bind(&form.facebook_link)
    .bind(&form.image_link)
    .bind(form.seeking_talent)
    .bind(&form.seeking_description)
    .execute(&mut *conn)
    .await?;

    let venue_id = result.last_insert_rowid();
    replace_genres(conn, venue_id, &form.genres).await?;
    Ok(venue_id)
}

/// Overwrite every field of a venue, genres included
pub async fn update_venue(pool: &SqlitePool, venue_id: i64, form: &VenueForm) -> Result<()> {
    form.validate()?;

    let mut tx = pool.begin().await?;
    let outcome = update_venue_in(&mut tx, venue_id, form).await;
    finish(tx, outcome, "update venue").await?;

    info!("Updated venue {} ({})", venue_id, form.name);
    Ok(())
}

async fn update_venue_in(
    conn: &mut SqliteConnection,
    venue_id: i64,
    form: &VenueForm,
) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE venues
        SET name = ?, city = ?, state = ?, address = ?, phone = ?, website = ?,
            facebook_link = ?, image_link = ?, seeking_talent = ?, seeking_description = ?,
            updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(form.name.trim())
    .bind(form.city.trim())
    .bind(form.state.trim())
    .bind(&form.address)
    .bind(&form.phone)
    .bind(&form.website)
    .bind(&form.facebook_link)
    .bind(&form.image_link)
    .bind(form.seeking_talent)
    .bind(&form.seeking_description)
    .bind(venue_id)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Venue {}", venue_id)));
    }

    replace_genres(conn, venue_id, &form.genres).await
}

async fn replace_genres(
    conn: &mut SqliteConnection,
    venue_id: i64,
    genres: &GenreSet,
) -> Result<()> {
    sqlx::query("DELETE FROM venue_genres WHERE venue_id = ?")
        .bind(venue_id)
        .execute(&mut *conn)
        .await?;

    for genre in genres.iter() {
        sqlx::query("INSERT INTO venue_genres (venue_id, genre) VALUES (?, ?)")
            .bind(venue_id)
            .bind(genre)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}

/// Delete a venue; its shows and genre tags go with it
pub async fn delete_venue(pool: &SqlitePool, venue_id: i64) -> Result<Deleted> {
    let mut tx = pool.begin().await?;
    let outcome = delete_venue_in(&mut tx, venue_id).await;
    let deleted = finish(tx, outcome, "delete venue").await?;

    info!(
        "Deleted venue {} ({}) and {} show(s)",
        venue_id, deleted.name, deleted.shows_removed
    );
    Ok(deleted)
}

async fn delete_venue_in(conn: &mut SqliteConnection, venue_id: i64) -> Result<Deleted> {
    let name = sqlx::query_scalar::<_, String>("SELECT name FROM venues WHERE id = ?")
        .bind(venue_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Venue {}", venue_id)))?;

    let shows_removed: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shows WHERE venue_id = ?")
        .bind(venue_id)
        .fetch_one(&mut *conn)
        .await?;

    sqlx::query("DELETE FROM venues WHERE id = ?")
        .bind(venue_id)
        .execute(&mut *conn)
        .await?;

    Ok(Deleted {
        name,
        shows_removed,
    })
}
