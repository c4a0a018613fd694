//! Content id parsing.
//!
//! Stremio ids arrive as `:`-separated fields, sometimes percent-encoded:
//! `tt0944947`, `tt0944947:1:5`, or, once a Kitsu id has been translated,
//! `tt0388629:1:5:1:5:true`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Kind of content requested by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Series,
    Anime,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Series => "series",
            MediaType::Anime => "anime",
        }
    }

    /// Series and anime are matched per episode, movies are not.
    pub fn is_episodic(&self) -> bool {
        !matches!(self, MediaType::Movie)
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown media type: {0}")]
pub struct UnknownMediaType(pub String);

impl FromStr for MediaType {
    type Err = UnknownMediaType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "movie" => Ok(MediaType::Movie),
            "series" => Ok(MediaType::Series),
            "anime" => Ok(MediaType::Anime),
            _ => Err(UnknownMediaType(s.to_string())),
        }
    }
}

/// What the client asked for, derived once per request.
///
/// Zero means "not provided" for every numeric field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSelector {
    pub base_id: String,
    pub season: u32,
    pub episode: u32,
    pub is_absolute: bool,
    pub absolute_season: u32,
    pub absolute_episode: u32,
    pub media_type: MediaType,
}

impl ContentSelector {
    /// Parse a canonical id: `baseId[:season:episode[:absSeason:absEpisode:absFlag]]`.
    ///
    /// Malformed numeric fields become 0; extra fields are ignored.
    pub fn parse(media_type: MediaType, canonical_id: &str) -> Self {
        let mut fields = canonical_id.split(':');
        let base_id = fields.next().unwrap_or_default().trim().to_string();
        let season = parse_number(fields.next());
        let episode = parse_number(fields.next());
        let absolute_season = parse_number(fields.next());
        let absolute_episode = parse_number(fields.next());
        let is_absolute = fields
            .next()
            .map(|flag| flag.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Self {
            base_id,
            season,
            episode,
            is_absolute,
            absolute_season,
            absolute_episode,
            media_type,
        }
    }

    /// Selector for an alternate-namespace id that could not be translated.
    ///
    /// `kitsu:1234:5` keeps `kitsu:1234` as its base id and treats the
    /// trailing number as an absolute episode of a single-season show.
    pub fn untranslated(media_type: MediaType, alternate_id: &str) -> Self {
        let mut fields = alternate_id.rsplitn(2, ':');
        let last = fields.next().unwrap_or_default();
        let head = fields.next();

        match (head, last.trim().parse::<u32>()) {
            (Some(head), Ok(episode)) if head.contains(':') => Self {
                base_id: head.to_string(),
                season: 1,
                episode,
                is_absolute: true,
                absolute_season: 1,
                absolute_episode: episode,
                media_type,
            },
            _ => Self {
                base_id: alternate_id.to_string(),
                season: 0,
                episode: 0,
                is_absolute: false,
                absolute_season: 0,
                absolute_episode: 0,
                media_type,
            },
        }
    }
}

fn parse_number(field: Option<&str>) -> u32 {
    field
        .and_then(|f| f.trim().parse::<u32>().ok())
        .unwrap_or(0)
}

/// Undo percent-encoding of the raw id (`tt1%3A2%3A3` -> `tt1:2:3`).
///
/// The result is also the cache key for the request.
pub fn normalize_content_id(raw: &str) -> String {
    match urlencoding::decode(raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw.replace("%3A", ":").replace("%3a", ":"),
    }
}
