//! Artist queries

use super::finish;
use super::models::{Artist, ArtistForm, Deleted, NamedEntity};
use crate::{Error, GenreSet, Result};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::info;

const ARTIST_COLUMNS: &str = "id, name, city, state, phone, website, facebook_link, image_link, \
                              seeking_venue, seeking_description";

/// Fetch one artist with its genres
pub async fn get_artist(pool: &SqlitePool, artist_id: i64) -> Result<Artist> {
    let sql = format!("SELECT {} FROM artists WHERE id = ?", ARTIST_COLUMNS);
    let mut artist = sqlx::query_as::<_, Artist>(&sql)
        .bind(artist_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Artist {}", artist_id)))?;

    artist.genres = artist_genres(pool, artist_id).await?;
    Ok(artist)
}

async fn artist_genres(pool: &SqlitePool, artist_id: i64) -> Result<GenreSet> {
    let tags: Vec<String> =
        sqlx::query_scalar("SELECT genre FROM artist_genres WHERE artist_id = ? ORDER BY genre")
            .bind(artist_id)
            .fetch_all(pool)
            .await?;
    Ok(tags.into_iter().collect())
}

/// Id and name of every artist, ordered by id
///
/// Backs both the artist listing and artist search.
pub async fn artist_names(pool: &SqlitePool) -> Result<Vec<NamedEntity>> {
    let names = sqlx::query_as::<_, NamedEntity>("SELECT id, name FROM artists ORDER BY id")
        .fetch_all(pool)
        .await?;
    Ok(names)
}

/// Insert an artist and its genres; returns the new id
pub async fn insert_artist(pool: &SqlitePool, form: &ArtistForm) -> Result<i64> {
    form.validate()?;

    let mut tx = pool.begin().await?;
    let outcome = insert_artist_in(&mut tx, form).await;
    let artist_id = finish(tx, outcome, "insert artist").await?;

    info!("Inserted artist {} ({})", artist_id, form.name);
    Ok(artist_id)
}

async fn insert_artist_in(conn: &mut SqliteConnection, form: &ArtistForm) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO artists (name, city, state, phone, website, facebook_link,
                             image_link, seeking_venue, seeking_description)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(form.name.trim())
    .bind(form.city.trim())
    .bind(form.state.trim())
    .bind(&form.phone)
    .bind(&form.website)
    .bind(&form.facebook_link)
    .bind(&form.image_link)
    .bind(form.seeking_venue)
    .bind(&form.seeking_description)
    .execute(&mut *conn)
    .await?;

    let artist_id = result.last_insert_rowid();
    replace_genres(conn, artist_id, &form.genres).await?;
    Ok(artist_id)
}

/// Overwrite every field of an artist, genres included
pub async fn update_artist(pool: &SqlitePool, artist_id: i64, form: &ArtistForm) -> Result<()> {
    form.validate()?;

    let mut tx = pool.begin().await?;
    let outcome = update_artist_in(&mut tx, artist_id, form).await;
    finish(tx, outcome, "update artist").await?;

    info!("Updated artist {} ({})", artist_id, form.name);
    Ok(())
}

async fn update_artist_in(
    conn: &mut SqliteConnection,
    artist_id: i64,
    form: &ArtistForm,
) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE artists
        SET name = ?, city = ?, state = ?, phone = ?, website = ?,
            facebook_link = ?, image_link = ?, seeking_venue = ?, seeking_description = ?,
            updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(form.name.trim())
    .bind(form.city.trim())
    .bind(form.state.trim())
    .bind(&form.phone)
    .bind(&form.website)
    .bind(&form.facebook_link)
    .bind(&form.image_link)
    .bind(form.seeking_venue)
    .bind(&form.seeking_description)
    .bind(artist_id)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Artist {}", artist_id)));
    }

    replace_genres(conn, artist_id, &form.genres).await
}

async fn replace_genres(
    conn: &mut SqliteConnection,
    artist_id: i64,
    genres: &GenreSet,
) -> Result<()> {
    sqlx::query("DELETE FROM artist_genres WHERE artist_id = ?")
        .bind(artist_id)
        .execute(&mut *conn)
        .await?;

    for genre in genres.iter() {
        sqlx::query("INSERT INTO artist_genres (artist_id, genre) VALUES (?, ?)")
            .bind(artist_id)
            .bind(genre)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}

/// Delete an artist; its shows and genre tags go with it
pub async fn delete_artist(pool: &SqlitePool, artist_id: i64) -> Result<Deleted> {
    let mut tx = pool.begin().await?;
    let outcome = delete_artist_in(&mut tx, artist_id).await;
    let deleted = finish(tx, outcome, "delete artist").await?;

    info!(
        "Deleted artist {} ({}) and {} show(s)",
        artist_id, deleted.name, deleted.shows_removed
    );
    Ok(deleted)
}

async fn delete_artist_in(conn: &mut SqliteConnection, artist_id: i64) -> Result<Deleted> {
    let name = sqlx::query_scalar::<_, String>("SELECT name FROM artists WHERE id = ?")
        .bind(artist_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Artist {}", artist_id)))?;

    let shows_removed: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shows WHERE artist_id = ?")
        .bind(artist_id)
        .fetch_one(&mut *conn)
        .await?;

    sqlx::query("DELETE FROM artists WHERE id = ?")
        .bind(artist_id)
        .execute(&mut *conn)
        .await?;

    Ok(Deleted {
        name,
        shows_removed,
    })
}
