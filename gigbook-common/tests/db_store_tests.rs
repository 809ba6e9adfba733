//! Integration tests for the SQLite entity store
//!
//! Covers schema creation, transactional writes, cascade deletes and the
//! show links that feed partitioning and counting.

use gigbook_common::db::{self, init_database, init_in_memory, ArtistForm, ShowForm, VenueForm};
use gigbook_common::shows::{count_upcoming, partition_shows};
use gigbook_common::{time, Error, GenreSet};
use sqlx::SqlitePool;

fn venue_form(name: &str, city: &str, state: &str) -> VenueForm {
    VenueForm {
        name: name.to_string(),
        city: city.to_string(),
        state: state.to_string(),
        address: Some("1015 Folsom Street".to_string()),
        phone: Some("123-123-1234".to_string()),
        image_link: Some("https://img.example/venue.jpg".to_string()),
        genres: ["Jazz", "Reggae", "Swing"].into_iter().collect(),
        seeking_talent: true,
        ..Default::default()
    }
}

fn artist_form(name: &str) -> ArtistForm {
    ArtistForm {
        name: name.to_string(),
        city: "San Francisco".to_string(),
        state: "CA".to_string(),
        image_link: Some("https://img.example/artist.jpg".to_string()),
        genres: ["Rock n Roll"].into_iter().collect(),
        ..Default::default()
    }
}

async fn add_show(pool: &SqlitePool, artist_id: i64, venue_id: i64, start: &str) -> i64 {
    db::shows::insert_show(
        pool,
        &ShowForm {
            artist_id,
            venue_id,
            start_time: start.to_string(),
        },
    )
    .await
    .unwrap()
}

async fn count(pool: &SqlitePool, sql: &str) -> i64 {
    sqlx::query_scalar(sql).fetch_one(pool).await.unwrap()
}

#[tokio::test]
async fn test_database_file_created_with_parent_directory() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("nested").join("gigbook.db");

    let pool = init_database(&db_path).await.unwrap();
    assert!(db_path.exists(), "Database file was not created");
    pool.close().await;

    // Reopening an existing database is idempotent
    let pool = init_database(&db_path).await.unwrap();
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM venues").await, 0);
}

#[tokio::test]
async fn test_venue_round_trip_with_genres() {
    let pool = init_in_memory().await.unwrap();

    let id = db::venues::insert_venue(&pool, &venue_form("The Musical Hop", "San Francisco", "CA"))
        .await
        .unwrap();
    let venue = db::venues::get_venue(&pool, id).await.unwrap();

    assert_eq!(venue.name, "The Musical Hop");
    assert!(venue.seeking_talent);
    assert_eq!(venue.genres.iter().collect::<Vec<_>>(), vec!["Jazz", "Reggae", "Swing"]);
}

#[tokio::test]
async fn test_update_overwrites_all_fields() {
    let pool = init_in_memory().await.unwrap();
    let id = db::venues::insert_venue(&pool, &venue_form("The Musical Hop", "San Francisco", "CA"))
        .await
        .unwrap();

    let edit = VenueForm {
        name: "The Musical Hop II".to_string(),
        city: "Oakland".to_string(),
        state: "CA".to_string(),
        genres: ["Folk"].into_iter().collect(),
        ..Default::default()
    };
    db::venues::update_venue(&pool, id, &edit).await.unwrap();

    let venue = db::venues::get_venue(&pool, id).await.unwrap();
    assert_eq!(venue.name, "The Musical Hop II");
    assert_eq!(venue.city, "Oakland");
    assert_eq!(venue.address, None);
    assert_eq!(venue.phone, None);
    assert!(!venue.seeking_talent);
    assert_eq!(venue.genres, ["Folk"].into_iter().collect::<GenreSet>());
}

#[tokio::test]
async fn test_missing_rows_are_not_found() {
    let pool = init_in_memory().await.unwrap();

    assert!(matches!(db::venues::get_venue(&pool, 42).await, Err(Error::NotFound(_))));
    assert!(matches!(db::artists::get_artist(&pool, 42).await, Err(Error::NotFound(_))));
    assert!(matches!(
        db::artists::update_artist(&pool, 42, &artist_form("Nobody")).await,
        Err(Error::NotFound(_))
    ));
    assert!(matches!(db::venues::delete_venue(&pool, 42).await, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn test_invalid_form_is_rejected_before_writing() {
    let pool = init_in_memory().await.unwrap();

    let result = db::venues::insert_venue(&pool, &venue_form("", "San Francisco", "CA")).await;
    assert!(matches!(result, Err(Error::InvalidInput(_))));
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM venues").await, 0);
}

#[tokio::test]
async fn test_delete_venue_cascades_to_shows() {
    let pool = init_in_memory().await.unwrap();
    let venue_id = db::venues::insert_venue(&pool, &venue_form("The Musical Hop", "San Francisco", "CA"))
        .await
        .unwrap();
    let artist_id = db::artists::insert_artist(&pool, &artist_form("Guns N Petals"))
        .await
        .unwrap();
    add_show(&pool, artist_id, venue_id, "2019-05-21 21:30:00").await;
    add_show(&pool, artist_id, venue_id, "2035-04-01 20:00:00").await;
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM shows").await, 2);

    let deleted = db::venues::delete_venue(&pool, venue_id).await.unwrap();

    assert_eq!(deleted.name, "The Musical Hop");
    assert_eq!(deleted.shows_removed, 2);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM shows").await, 0);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM venues").await, 0);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM venue_genres").await, 0);
    // The artist survives
    assert!(db::artists::get_artist(&pool, artist_id).await.is_ok());
}

#[tokio::test]
async fn test_delete_artist_cascades_to_shows() {
    let pool = init_in_memory().await.unwrap();
    let venue_id = db::venues::insert_venue(&pool, &venue_form("The Musical Hop", "San Francisco", "CA"))
        .await
        .unwrap();
    let artist_id = db::artists::insert_artist(&pool, &artist_form("Matt Quevedo"))
        .await
        .unwrap();
    add_show(&pool, artist_id, venue_id, "2019-06-15 23:00:00").await;

    let deleted = db::artists::delete_artist(&pool, artist_id).await.unwrap();

    assert_eq!(deleted.shows_removed, 1);
    assert!(db::shows::links_for_venue(&pool, venue_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_show_with_unknown_artist_is_not_inserted() {
    let pool = init_in_memory().await.unwrap();
    let venue_id = db::venues::insert_venue(&pool, &venue_form("The Musical Hop", "San Francisco", "CA"))
        .await
        .unwrap();

    let result = db::shows::insert_show(
        &pool,
        &ShowForm {
            artist_id: 999,
            venue_id,
            start_time: "2035-04-01 20:00:00".to_string(),
        },
    )
    .await;

    assert!(matches!(result, Err(Error::DataIntegrity(_))));
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM shows").await, 0);
}

#[tokio::test]
async fn test_show_with_bad_start_time_is_invalid_input() {
    let pool = init_in_memory().await.unwrap();
    let result = db::shows::insert_show(
        &pool,
        &ShowForm {
            artist_id: 1,
            venue_id: 1,
            start_time: "next friday".to_string(),
        },
    )
    .await;
    assert!(matches!(result, Err(Error::InvalidInput(_))));
}

#[tokio::test]
async fn test_links_feed_partition_and_counter() {
    let pool = init_in_memory().await.unwrap();
    let venue_id = db::venues::insert_venue(&pool, &venue_form("The Musical Hop", "San Francisco", "CA"))
        .await
        .unwrap();
    let artist_id = db::artists::insert_artist(&pool, &artist_form("Guns N Petals"))
        .await
        .unwrap();
    add_show(&pool, artist_id, venue_id, "2035-04-01 20:00:00").await;
    add_show(&pool, artist_id, venue_id, "2019-05-21 21:30:00").await;
    add_show(&pool, artist_id, venue_id, "2023-01-01 00:00:00").await;

    let now = time::parse_start_time("2023-01-01 00:00:00").unwrap();

    let venue_links = db::shows::links_for_venue(&pool, venue_id).await.unwrap();
    let partition = partition_shows(&now, &venue_links);
    assert_eq!(partition.past_shows_count, 1);
    assert_eq!(partition.upcoming_shows_count, 1);
    assert_eq!(partition.past_shows[0].counterpart_name, "Guns N Petals");
    assert_eq!(partition.past_shows[0].start_time, "05/21/2019, 21:30");
    assert_eq!(count_upcoming(&now, &venue_links).count, 1);

    let artist_links = db::shows::links_for_artist(&pool, artist_id).await.unwrap();
    let partition = partition_shows(&now, &artist_links);
    assert_eq!(partition.upcoming_shows[0].counterpart_id, venue_id);
    assert_eq!(partition.upcoming_shows[0].counterpart_name, "The Musical Hop");

    let grouped = db::shows::links_by_venue(&pool).await.unwrap();
    assert_eq!(grouped.get(&venue_id).map(Vec::len), Some(3));
}

#[tokio::test]
async fn test_links_for_selected_owners_only() {
    let pool = init_in_memory().await.unwrap();
    let hop = db::venues::insert_venue(&pool, &venue_form("The Musical Hop", "San Francisco", "CA"))
        .await
        .unwrap();
    let park = db::venues::insert_venue(&pool, &venue_form("Park Square Live Music & Coffee", "San Francisco", "CA"))
        .await
        .unwrap();
    let artist_id = db::artists::insert_artist(&pool, &artist_form("Guns N Petals"))
        .await
        .unwrap();
    add_show(&pool, artist_id, hop, "2035-04-01 20:00:00").await;
    add_show(&pool, artist_id, park, "2035-04-08 20:00:00").await;
    add_show(&pool, artist_id, park, "2035-04-15 20:00:00").await;

    let selected = db::shows::links_for_venues(&pool, &[park]).await.unwrap();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected.get(&park).map(Vec::len), Some(2));
    assert!(!selected.contains_key(&hop));

    let both = db::shows::links_for_venues(&pool, &[hop, park]).await.unwrap();
    assert_eq!(both.len(), 2);

    assert!(db::shows::links_for_venues(&pool, &[]).await.unwrap().is_empty());

    let by_artist = db::shows::links_for_artists(&pool, &[artist_id]).await.unwrap();
    assert_eq!(by_artist.get(&artist_id).map(Vec::len), Some(3));
}

#[tokio::test]
async fn test_fractional_start_time_is_not_truncated() {
    let pool = init_in_memory().await.unwrap();
    let venue_id = db::venues::insert_venue(&pool, &venue_form("The Musical Hop", "San Francisco", "CA"))
        .await
        .unwrap();
    let artist_id = db::artists::insert_artist(&pool, &artist_form("Guns N Petals"))
        .await
        .unwrap();
    add_show(&pool, artist_id, venue_id, "2035-04-01T20:00:00.5").await;

    let links = db::shows::links_for_venue(&pool, venue_id).await.unwrap();
    assert_eq!(links[0].start_time.as_deref(), Some("2035-04-01 20:00:00.500"));

    // A reference instant on the whole second still sees the show as upcoming
    let now = time::parse_start_time("2035-04-01 20:00:00").unwrap();
    let partition = partition_shows(&now, &links);
    assert_eq!(partition.upcoming_shows_count, 1);
    assert!(partition.rejected.is_empty());
}

#[tokio::test]
async fn test_listing_queries() {
    let pool = init_in_memory().await.unwrap();
    let hop = db::venues::insert_venue(&pool, &venue_form("The Musical Hop", "San Francisco", "CA"))
        .await
        .unwrap();
    db::venues::insert_venue(&pool, &venue_form("The Dueling Pianos Bar", "New York", "NY"))
        .await
        .unwrap();
    let artist_id = db::artists::insert_artist(&pool, &artist_form("Guns N Petals"))
        .await
        .unwrap();
    add_show(&pool, artist_id, hop, "2019-05-21 21:30:00").await;

    let areas = db::venues::area_venues(&pool).await.unwrap();
    assert_eq!(areas[0].state, "CA");
    assert_eq!(areas[1].state, "NY");

    let names = db::artists::artist_names(&pool).await.unwrap();
    assert_eq!(names.len(), 1);
    assert_eq!(names[0].name, "Guns N Petals");

    let shows = db::shows::list_shows(&pool).await.unwrap();
    assert_eq!(shows.len(), 1);
    assert_eq!(shows[0].venue_name, "The Musical Hop");
    assert_eq!(shows[0].start_time.as_deref(), Some("2019-05-21 21:30:00"));
}
