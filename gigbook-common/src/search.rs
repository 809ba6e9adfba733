//! Name search over venues and artists
//!
//! Matching is a case-insensitive substring test. The reported count is the
//! number of matched entities.

use crate::db::models::NamedEntity;
use crate::shows::{count_upcoming, RejectedShow, ShowLink};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashMap;

/// One search result row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: usize,
}

/// Search response body
#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub count: usize,
    pub data: Vec<SearchHit>,
    /// Shows of the hits left out of `num_upcoming_shows`
    #[serde(skip)]
    pub rejected: Vec<RejectedShow>,
}

impl SearchResults {
    pub fn new(data: Vec<SearchHit>) -> Self {
        Self {
            count: data.len(),
            data,
            rejected: Vec::new(),
        }
    }
}

/// True if `query` occurs in `name`, ignoring case
///
/// Surrounding whitespace in the query is ignored; an empty query matches
/// every name.
pub fn matches_name(query: &str, name: &str) -> bool {
    let needle = query.trim().to_lowercase();
    name.to_lowercase().contains(&needle)
}

/// Keep the candidates whose name matches `query`, in input order
pub fn filter_by_name(query: &str, candidates: Vec<NamedEntity>) -> Vec<NamedEntity> {
    candidates
        .into_iter()
        .filter(|candidate| matches_name(query, &candidate.name))
        .collect()
}

/// Count the upcoming shows of each matched entity
///
/// `matched` is the output of [`filter_by_name`] and `links` holds the shows
/// of those entities keyed by id; an entity with no entry has no shows.
pub fn search_hits(
    now: &NaiveDateTime,
    matched: Vec<NamedEntity>,
    links: &HashMap<i64, Vec<ShowLink>>,
) -> SearchResults {
    let mut rejected = Vec::new();
    let data = matched
        .into_iter()
        .map(|entity| {
            let upcoming = links
                .get(&entity.id)
                .map(|shows| count_upcoming(now, shows))
                .unwrap_or_default();
            rejected.extend(upcoming.rejected);
            SearchHit {
                id: entity.id,
                name: entity.name,
                num_upcoming_shows: upcoming.count,
            }
        })
        .collect();

    SearchResults {
        rejected,
        ..SearchResults::new(data)
    }
}
