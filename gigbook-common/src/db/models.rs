//! Database models

use crate::{Error, GenreSet, Result};
use serde::{Deserialize, Serialize};

/// Id and display name, used by listings and search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct NamedEntity {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Venue {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub image_link: Option<String>,
    /// Loaded from `venue_genres`
    #[sqlx(skip)]
    pub genres: GenreSet,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Artist {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub image_link: Option<String>,
    /// Loaded from `artist_genres`
    #[sqlx(skip)]
    pub genres: GenreSet,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

/// Submitted venue fields; an edit overwrites every field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VenueForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub image_link: Option<String>,
    pub genres: GenreSet,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

impl VenueForm {
    pub fn validate(&self) -> Result<()> {
        require("name", &self.name)?;
        require("city", &self.city)?;
        require("state", &self.state)
    }
}

impl From<Venue> for VenueForm {
    fn from(venue: Venue) -> Self {
        Self {
            name: venue.name,
            city: venue.city,
            state: venue.state,
            address: venue.address,
            phone: venue.phone,
            website: venue.website,
            facebook_link: venue.facebook_link,
            image_link: venue.image_link,
            genres: venue.genres,
            seeking_talent: venue.seeking_talent,
            seeking_description: venue.seeking_description,
        }
    }
}

/// Submitted artist fields; an edit overwrites every field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtistForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub image_link: Option<String>,
    pub genres: GenreSet,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

impl ArtistForm {
    pub fn validate(&self) -> Result<()> {
        require("name", &self.name)?;
        require("city", &self.city)?;
        require("state", &self.state)
    }
}

impl From<Artist> for ArtistForm {
    fn from(artist: Artist) -> Self {
        Self {
            name: artist.name,
            city: artist.city,
            state: artist.state,
            phone: artist.phone,
            website: artist.website,
            facebook_link: artist.facebook_link,
            image_link: artist.image_link,
            genres: artist.genres,
            seeking_venue: artist.seeking_venue,
            seeking_description: artist.seeking_description,
        }
    }
}

/// Submitted show fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowForm {
    pub artist_id: i64,
    pub venue_id: i64,
    pub start_time: String,
}

/// One row of the show listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct ShowRow {
    pub id: i64,
    pub venue_id: i64,
    pub venue_name: String,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: Option<String>,
}

/// Venue row used to build the area listing
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct AreaVenueRow {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
}

/// Result of a cascading delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deleted {
    pub name: String,
    pub shows_removed: i64,
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidInput(format!("{} is required", field)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_venue_form_requires_name_city_state() {
        let form = VenueForm {
            name: "The Dueling Pianos Bar".to_string(),
            city: "New York".to_string(),
            state: "NY".to_string(),
            ..Default::default()
        };
        assert!(form.validate().is_ok());

        let blank_name = VenueForm {
            name: "  ".to_string(),
            ..form.clone()
        };
        assert!(matches!(blank_name.validate(), Err(Error::InvalidInput(_))));

        let no_state = VenueForm {
            state: String::new(),
            ..form
        };
        assert!(matches!(no_state.validate(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_artist_form_defaults_from_sparse_json() {
        let form: ArtistForm = serde_json::from_str(
            r#"{"name":"Guns N Petals","city":"San Francisco","state":"CA","genres":["Rock n Roll"]}"#,
        )
        .unwrap();
        assert!(form.validate().is_ok());
        assert!(!form.seeking_venue);
        assert_eq!(form.phone, None);
        assert!(form.genres.contains("Rock n Roll"));
    }
}
