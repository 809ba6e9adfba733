//! Show partitioning and upcoming-show counting
//!
//! A show's upcoming/past status is never stored. It is derived from the
//! show's start time and a reference instant supplied by the caller:
//!
//! - `start_time < now`: past
//! - `start_time > now`: upcoming
//! - `start_time == now`: neither
//!
//! Both [`partition_shows`] and [`count_upcoming`] classify entries through
//! the same function, so the count always equals the length of the upcoming
//! projection for the same input and instant.

use crate::time;
use crate::{Error, Result};
use chrono::NaiveDateTime;
use serde::Serialize;

/// Display fields of the entity on the other side of a show
///
/// For a venue's shows this is the artist, for an artist's shows the venue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counterpart {
    pub name: String,
    pub image_link: Option<String>,
}

/// One show of a venue or artist, joined to its counterpart
///
/// `counterpart` is `None` when the referenced row does not exist, and
/// `start_time` carries the raw stored value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowLink {
    pub show_id: i64,
    pub counterpart_id: i64,
    pub counterpart: Option<Counterpart>,
    pub start_time: Option<String>,
}

/// Display-ready projection of one show
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowEntry {
    pub counterpart_id: i64,
    pub counterpart_name: String,
    pub counterpart_image_link: Option<String>,
    /// `MM/DD/YYYY, HH:MM`
    pub start_time: String,
}

/// A show left out of the projections, with the reason
#[derive(Debug)]
pub struct RejectedShow {
    pub show_id: i64,
    pub error: Error,
}

/// Past and upcoming shows of one venue or artist
#[derive(Debug, Default, Serialize)]
pub struct ShowPartition {
    pub past_shows: Vec<ShowEntry>,
    pub upcoming_shows: Vec<ShowEntry>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
    /// Entries with a malformed start time or a dangling counterpart
    #[serde(skip)]
    pub rejected: Vec<RejectedShow>,
}

/// Upcoming-show count of one venue or artist
#[derive(Debug, Default)]
pub struct UpcomingCount {
    pub count: usize,
    /// Entries left out of the count, as [`partition_shows`] would reject them
    pub rejected: Vec<RejectedShow>,
}

/// Position of a start time relative to the reference instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timing {
    Past,
    Upcoming,
    /// Exactly at the reference instant
    Current,
}

impl Timing {
    pub fn of(start_time: &NaiveDateTime, now: &NaiveDateTime) -> Self {
        if start_time < now {
            Timing::Past
        } else if start_time > now {
            Timing::Upcoming
        } else {
            Timing::Current
        }
    }
}

/// Parse the stored start time of a show; a missing value is invalid input
pub(crate) fn stored_start_time(show_id: i64, raw: Option<&str>) -> Result<NaiveDateTime> {
    let raw =
        raw.ok_or_else(|| Error::InvalidInput(format!("Show {} has no start_time", show_id)))?;
    time::parse_start_time(raw)
}

/// Validate one show and place it relative to `now`
fn classify<'a>(
    now: &NaiveDateTime,
    link: &'a ShowLink,
) -> Result<(Timing, NaiveDateTime, &'a Counterpart)> {
    let start_time = stored_start_time(link.show_id, link.start_time.as_deref())?;

    let counterpart = link.counterpart.as_ref().ok_or_else(|| {
        Error::DataIntegrity(format!(
            "Show {} references missing entity {}",
            link.show_id, link.counterpart_id
        ))
    })?;

    Ok((Timing::of(&start_time, now), start_time, counterpart))
}

/// Split shows into past and upcoming projections
///
/// Input order is kept within each projection. An entry that fails
/// validation is recorded in `rejected` and the remaining entries are still
/// processed.
pub fn partition_shows(now: &NaiveDateTime, shows: &[ShowLink]) -> ShowPartition {
    let mut partition = ShowPartition::default();

    for link in shows {
        let (timing, start_time, counterpart) = match classify(now, link) {
            Ok(classified) => classified,
            Err(error) => {
                partition.rejected.push(RejectedShow {
                    show_id: link.show_id,
                    error,
                });
                continue;
            }
        };

        let entry = ShowEntry {
            counterpart_id: link.counterpart_id,
            counterpart_name: counterpart.name.clone(),
            counterpart_image_link: counterpart.image_link.clone(),
            start_time: time::to_display(&start_time),
        };

        match timing {
            Timing::Past => partition.past_shows.push(entry),
            Timing::Upcoming => partition.upcoming_shows.push(entry),
            Timing::Current => {}
        }
    }

    partition.past_shows_count = partition.past_shows.len();
    partition.upcoming_shows_count = partition.upcoming_shows.len();
    partition
}

/// Number of shows strictly after `now`
///
/// Entries that [`partition_shows`] would reject are not counted; they are
/// returned in `rejected` instead.
pub fn count_upcoming(now: &NaiveDateTime, shows: &[ShowLink]) -> UpcomingCount {
    let mut upcoming = UpcomingCount::default();

    for link in shows {
        match classify(now, link) {
            Ok((Timing::Upcoming, _, _)) => upcoming.count += 1,
            Ok(_) => {}
            Err(error) => upcoming.rejected.push(RejectedShow {
                show_id: link.show_id,
                error,
            }),
        }
    }

    upcoming
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn instant(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn link(show_id: i64, counterpart_id: i64, start_time: &str) -> ShowLink {
        ShowLink {
            show_id,
            counterpart_id,
            counterpart: Some(Counterpart {
                name: format!("Artist {}", counterpart_id),
                image_link: Some(format!("https://img.example/{}.jpg", counterpart_id)),
            }),
            start_time: Some(start_time.to_string()),
        }
    }

    #[test]
    fn test_past_upcoming_and_boundary() {
        let now = instant(2023, 1, 1);
        let shows = vec![
            link(1, 10, "2022-01-01 00:00:00"),
            link(2, 20, "2024-01-01 00:00:00"),
            link(3, 30, "2023-01-01 00:00:00"),
        ];

        let partition = partition_shows(&now, &shows);

        assert_eq!(partition.past_shows_count, 1);
        assert_eq!(partition.upcoming_shows_count, 1);
        assert_eq!(partition.past_shows[0].counterpart_id, 10);
        assert_eq!(partition.upcoming_shows[0].counterpart_id, 20);
        assert!(partition.rejected.is_empty());
        assert_eq!(count_upcoming(&now, &shows).count, 1);
    }

    #[test]
    fn test_empty_input() {
        let now = instant(2023, 1, 1);
        let partition = partition_shows(&now, &[]);

        assert!(partition.past_shows.is_empty());
        assert!(partition.upcoming_shows.is_empty());
        assert_eq!(partition.past_shows_count, 0);
        assert_eq!(partition.upcoming_shows_count, 0);
        assert_eq!(count_upcoming(&now, &[]).count, 0);
    }

    #[test]
    fn test_entry_projection() {
        let now = instant(2019, 1, 1);
        let partition = partition_shows(&now, &[link(7, 4, "2019-05-21 21:30:00")]);

        assert_eq!(
            partition.upcoming_shows,
            vec![ShowEntry {
                counterpart_id: 4,
                counterpart_name: "Artist 4".to_string(),
                counterpart_image_link: Some("https://img.example/4.jpg".to_string()),
                start_time: "05/21/2019, 21:30".to_string(),
            }]
        );
    }

    #[test]
    fn test_input_order_preserved() {
        let now = instant(2023, 1, 1);
        let shows = vec![
            link(1, 3, "2025-06-01 00:00:00"),
            link(2, 1, "2024-06-01 00:00:00"),
            link(3, 2, "2026-06-01 00:00:00"),
        ];

        let partition = partition_shows(&now, &shows);
        let ids: Vec<i64> = partition
            .upcoming_shows
            .iter()
            .map(|entry| entry.counterpart_id)
            .collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_one_second_either_side_of_now() {
        let now = instant(2023, 1, 1);
        let shows = vec![
            link(1, 1, "2022-12-31 23:59:59"),
            link(2, 2, "2023-01-01 00:00:01"),
        ];

        let partition = partition_shows(&now, &shows);
        assert_eq!(partition.past_shows_count, 1);
        assert_eq!(partition.upcoming_shows_count, 1);
    }

    #[test]
    fn test_malformed_time_is_rejected_without_aborting() {
        let now = instant(2023, 1, 1);
        let mut missing = link(2, 2, "");
        missing.start_time = None;
        let shows = vec![
            link(1, 1, "not a date"),
            missing,
            link(3, 3, "2024-01-01 00:00:00"),
        ];

        let partition = partition_shows(&now, &shows);

        assert_eq!(partition.upcoming_shows_count, 1);
        assert_eq!(partition.rejected.len(), 2);
        assert!(partition
            .rejected
            .iter()
            .all(|r| matches!(r.error, Error::InvalidInput(_))));

        let upcoming = count_upcoming(&now, &shows);
        assert_eq!(upcoming.count, 1);
        let rejected_ids: Vec<i64> = upcoming.rejected.iter().map(|r| r.show_id).collect();
        assert_eq!(rejected_ids, vec![1, 2]);
        assert!(upcoming
            .rejected
            .iter()
            .all(|r| matches!(r.error, Error::InvalidInput(_))));
    }

    #[test]
    fn test_dangling_counterpart_is_data_integrity() {
        let now = instant(2023, 1, 1);
        let mut dangling = link(5, 99, "2024-01-01 00:00:00");
        dangling.counterpart = None;
        let shows = vec![dangling, link(6, 1, "2022-01-01 00:00:00")];

        let partition = partition_shows(&now, &shows);

        assert_eq!(partition.past_shows_count, 1);
        assert_eq!(partition.upcoming_shows_count, 0);
        assert_eq!(partition.rejected.len(), 1);
        assert_eq!(partition.rejected[0].show_id, 5);
        assert!(matches!(partition.rejected[0].error, Error::DataIntegrity(_)));

        let upcoming = count_upcoming(&now, &shows);
        assert_eq!(upcoming.count, 0);
        assert_eq!(upcoming.rejected.len(), 1);
        assert_eq!(upcoming.rejected[0].show_id, 5);
        assert!(matches!(upcoming.rejected[0].error, Error::DataIntegrity(_)));
    }

    #[test]
    fn test_counter_matches_partition_on_mixed_input() {
        let now = instant(2030, 6, 15);
        let mut shows = Vec::new();
        for year in 2025..2036 {
            shows.push(link(year as i64, 1, &format!("{}-06-15 00:00:00", year)));
        }
        shows.push(link(100, 1, "garbage"));

        let partition = partition_shows(&now, &shows);

        let upcoming = count_upcoming(&now, &shows);
        assert_eq!(upcoming.count, partition.upcoming_shows.len());
        assert_eq!(upcoming.rejected.len(), partition.rejected.len());
        assert_eq!(partition.past_shows_count, 5);
        assert_eq!(partition.upcoming_shows_count, 5);
        for entry in &partition.past_shows {
            assert!(!partition.upcoming_shows.contains(entry));
        }
    }

    #[test]
    fn test_serialized_shape() {
        let now = instant(2023, 1, 1);
        let partition = partition_shows(&now, &[link(1, 2, "2024-01-01 00:00:00")]);
        let json = serde_json::to_value(&partition).unwrap();

        assert_eq!(json["upcoming_shows_count"], 1);
        assert_eq!(json["past_shows_count"], 0);
        assert_eq!(json["upcoming_shows"][0]["start_time"], "01/01/2024, 00:00");
        assert!(json.get("rejected").is_none());
    }
}
