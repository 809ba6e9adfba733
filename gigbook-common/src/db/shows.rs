//! Show queries
//!
//! Show links are read with a LEFT JOIN on the counterpart table so that a
//! show pointing at a missing row comes back with no counterpart instead of
//! silently disappearing.

use super::finish;
use super::models::{ShowForm, ShowRow};
use crate::shows::{Counterpart, ShowLink};
use crate::{time, Error, Result};
use chrono::NaiveDateTime;
use sqlx::{SqliteConnection, SqlitePool};
use std::collections::HashMap;
use tracing::info;

/// Which side of the show the owner is on
#[derive(Debug, Clone, Copy)]
enum Owner {
    /// Owner is a venue, counterpart is the artist
    Venue,
    /// Owner is an artist, counterpart is the venue
    Artist,
}

impl Owner {
    fn columns(self) -> (&'static str, &'static str, &'static str) {
        // (owner column, counterpart column, counterpart table)
        match self {
            Owner::Venue => ("venue_id", "artist_id", "artists"),
            Owner::Artist => ("artist_id", "venue_id", "venues"),
        }
    }

    /// `owner_ids` is the number of owner id parameters; `None` reads every owner
    fn links_sql(self, owner_ids: Option<usize>) -> String {
        let (owner_col, counterpart_col, counterpart_table) = self.columns();
        let filter = match owner_ids {
            Some(count) => format!(
                "WHERE s.{} IN ({})",
                owner_col,
                vec!["?"; count].join(", ")
            ),
            None => String::new(),
        };
        format!(
            "SELECT s.{owner} AS owner_id, s.id AS show_id, s.{cp} AS counterpart_id, \
                    c.name AS counterpart_name, c.image_link AS counterpart_image_link, \
                    CAST(s.start_time AS TEXT) AS start_time \
             FROM shows s LEFT JOIN {table} c ON c.id = s.{cp} \
             {filter} \
             ORDER BY s.start_time, s.id",
            owner = owner_col,
            cp = counterpart_col,
            table = counterpart_table,
            filter = filter,
        )
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ShowLinkRow {
    owner_id: i64,
    show_id: i64,
    counterpart_id: i64,
    counterpart_name: Option<String>,
    counterpart_image_link: Option<String>,
    start_time: Option<String>,
}

impl From<ShowLinkRow> for ShowLink {
    fn from(row: ShowLinkRow) -> Self {
        let image_link = row.counterpart_image_link;
        ShowLink {
            show_id: row.show_id,
            counterpart_id: row.counterpart_id,
            counterpart: row
                .counterpart_name
                .map(|name| Counterpart { name, image_link }),
            start_time: row.start_time,
        }
    }
}

async fn links_for(pool: &SqlitePool, owner: Owner, owner_id: i64) -> Result<Vec<ShowLink>> {
    let sql = owner.links_sql(Some(1));
    let rows: Vec<ShowLinkRow> = sqlx::query_as(&sql)
        .bind(owner_id)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(ShowLink::from).collect())
}

fn group_by_owner(rows: Vec<ShowLinkRow>) -> HashMap<i64, Vec<ShowLink>> {
    let mut grouped: HashMap<i64, Vec<ShowLink>> = HashMap::new();
    for row in rows {
        grouped.entry(row.owner_id).or_default().push(row.into());
    }
    grouped
}

async fn links_grouped(pool: &SqlitePool, owner: Owner) -> Result<HashMap<i64, Vec<ShowLink>>> {
    let sql = owner.links_sql(None);
    let rows: Vec<ShowLinkRow> = sqlx::query_as(&sql).fetch_all(pool).await?;
    Ok(group_by_owner(rows))
}

async fn links_grouped_for(
    pool: &SqlitePool,
    owner: Owner,
    owner_ids: &[i64],
) -> Result<HashMap<i64, Vec<ShowLink>>> {
    if owner_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let sql = owner.links_sql(Some(owner_ids.len()));
    let mut query = sqlx::query_as::<_, ShowLinkRow>(&sql);
    for id in owner_ids {
        query = query.bind(*id);
    }
    let rows = query.fetch_all(pool).await?;
    Ok(group_by_owner(rows))
}

/// Shows of one venue, each joined to its artist, ordered by start time
pub async fn links_for_venue(pool: &SqlitePool, venue_id: i64) -> Result<Vec<ShowLink>> {
    links_for(pool, Owner::Venue, venue_id).await
}

/// Shows of one artist, each joined to its venue, ordered by start time
pub async fn links_for_artist(pool: &SqlitePool, artist_id: i64) -> Result<Vec<ShowLink>> {
    links_for(pool, Owner::Artist, artist_id).await
}

/// Show links of every venue, keyed by venue id
pub async fn links_by_venue(pool: &SqlitePool) -> Result<HashMap<i64, Vec<ShowLink>>> {
    links_grouped(pool, Owner::Venue).await
}

/// Show links of the given venues only, keyed by venue id
pub async fn links_for_venues(
    pool: &SqlitePool,
    venue_ids: &[i64],
) -> Result<HashMap<i64, Vec<ShowLink>>> {
    links_grouped_for(pool, Owner::Venue, venue_ids).await
}

/// Show links of the given artists only, keyed by artist id
pub async fn links_for_artists(
    pool: &SqlitePool,
    artist_ids: &[i64],
) -> Result<HashMap<i64, Vec<ShowLink>>> {
    links_grouped_for(pool, Owner::Artist, artist_ids).await
}

/// All shows with venue and artist details, ordered by start time
pub async fn list_shows(pool: &SqlitePool) -> Result<Vec<ShowRow>> {
    let rows = sqlx::query_as::<_, ShowRow>(
        r#"
        SELECT s.id, s.venue_id, v.name AS venue_name, s.artist_id, a.name AS artist_name,
               a.image_link AS artist_image_link, CAST(s.start_time AS TEXT) AS start_time
        FROM shows s
        JOIN venues v ON v.id = s.venue_id
        JOIN artists a ON a.id = s.artist_id
        ORDER BY s.start_time, s.id
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Insert a show linking an existing artist and venue; returns the new id
pub async fn insert_show(pool: &SqlitePool, form: &ShowForm) -> Result<i64> {
    let start_time = time::parse_start_time(&form.start_time)?;

    let mut tx = pool.begin().await?;
    let outcome = insert_show_in(&mut tx, form, &start_time).await;
    let show_id = finish(tx, outcome, "insert show").await?;

    info!(
        "Inserted show {} (artist {} at venue {}, {})",
        show_id,
        form.artist_id,
        form.venue_id,
        time::to_storage(&start_time)
    );
    Ok(show_id)
}

async fn insert_show_in(
    conn: &mut SqliteConnection,
    form: &ShowForm,
    start_time: &NaiveDateTime,
) -> Result<i64> {
    require_row(conn, "artists", form.artist_id, "Artist").await?;
    require_row(conn, "venues", form.venue_id, "Venue").await?;

    let result = sqlx::query("INSERT INTO shows (artist_id, venue_id, start_time) VALUES (?, ?, ?)")
        .bind(form.artist_id)
        .bind(form.venue_id)
        .bind(time::to_storage(start_time))
        .execute(&mut *conn)
        .await?;

    Ok(result.last_insert_rowid())
}

async fn require_row(
    conn: &mut SqliteConnection,
    table: &str,
    id: i64,
    label: &str,
) -> Result<()> {
    let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?)", table);
    let exists: i64 = sqlx::query_scalar(&sql)
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;

    if exists == 0 {
        return Err(Error::DataIntegrity(format!("{} {} does not exist", label, id)));
    }
    Ok(())
}
