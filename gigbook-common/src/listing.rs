//! Listing views: venues grouped by area, and the show listing

use crate::db::models::{AreaVenueRow, ShowRow};
use crate::shows::{count_upcoming, stored_start_time, RejectedShow, ShowLink, Timing};
use crate::time;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AreaVenue {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: usize,
}

/// Venues sharing one (city, state) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Area {
    pub city: String,
    pub state: String,
    pub venues: Vec<AreaVenue>,
}

/// Group venues by (city, state), keeping the row order
///
/// Rows arrive sorted by state then city, so each area is one contiguous run.
/// Shows that could not be counted are returned alongside the areas.
pub fn group_areas(
    now: &NaiveDateTime,
    venues: Vec<AreaVenueRow>,
    links: &HashMap<i64, Vec<ShowLink>>,
) -> (Vec<Area>, Vec<RejectedShow>) {
    let mut areas: Vec<Area> = Vec::new();
    let mut rejected = Vec::new();

    for row in venues {
        let upcoming = links
            .get(&row.id)
            .map(|shows| count_upcoming(now, shows))
            .unwrap_or_default();
        rejected.extend(upcoming.rejected);

        let venue = AreaVenue {
            id: row.id,
            num_upcoming_shows: upcoming.count,
            name: row.name,
        };

        match areas.last_mut() {
            Some(area) if area.city == row.city && area.state == row.state => {
                area.venues.push(venue);
            }
            _ => areas.push(Area {
                city: row.city,
                state: row.state,
                venues: vec![venue],
            }),
        }
    }

    (areas, rejected)
}

/// One show as displayed on the show listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowListing {
    pub id: i64,
    pub venue_id: i64,
    pub venue_name: String,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    /// `YYYY-MM-DD HH:MM:SS`
    pub start_time: String,
    /// Derived from the start time at read time
    pub upcoming: bool,
}

/// Build the show listing; rows with an unreadable start time are rejected
pub fn show_listing(now: &NaiveDateTime, rows: Vec<ShowRow>) -> (Vec<ShowListing>, Vec<RejectedShow>) {
    let mut listing = Vec::with_capacity(rows.len());
    let mut rejected = Vec::new();

    for row in rows {
        match stored_start_time(row.id, row.start_time.as_deref()) {
            Ok(start_time) => listing.push(ShowListing {
                id: row.id,
                venue_id: row.venue_id,
                venue_name: row.venue_name,
                artist_id: row.artist_id,
                artist_name: row.artist_name,
                artist_image_link: row.artist_image_link,
                start_time: time::to_storage(&start_time),
                upcoming: Timing::of(&start_time, now) == Timing::Upcoming,
            }),
            Err(error) => rejected.push(RejectedShow {
                show_id: row.id,
                error,
            }),
        }
    }

    (listing, rejected)
}
