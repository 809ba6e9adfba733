//! # gigbook Common Library
//!
//! Shared code for the gigbook booking directory:
//! - Venue, artist and show models
//! - SQLite entity store (schema creation, transactional writes)
//! - Show partitioning into past/upcoming and upcoming-show counting
//! - Name search matching
//! - Configuration loading and time helpers

pub mod config;
pub mod db;
pub mod error;
pub mod genres;
pub mod listing;
pub mod search;
pub mod shows;
pub mod time;

pub use error::{Error, Result};
pub use genres::GenreSet;
