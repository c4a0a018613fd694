//! Search query generation.
//!
//! Turns a selector plus its title metadata into the textual variants sent
//! to the indexer. Episodic content gets several phrasings (season packs,
//! French "integrale"/"complet" packs, batches, episode numbers) because
//! release naming differs wildly between groups.

use serde::{Deserialize, Serialize};

use crate::meta::TitleMeta;
use crate::selector::{ContentSelector, MediaType};

/// One query to send to the indexer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryVariant {
    pub query: String,
    pub media_type: MediaType,
}

/// Build every query variant for a request.
///
/// Movies produce one variant. Series and anime produce five, plus two
/// for first seasons and two for absolute numbering. Variants that end up
/// empty (no title and no year) are skipped.
pub fn build_queries(selector: &ContentSelector, meta: &TitleMeta) -> Vec<QueryVariant> {
    let title = meta.title.trim();
    let mut queries = Vec::with_capacity(9);

    match selector.media_type {
        MediaType::Movie => {
            queries.push(format!("{} {}", title, meta.year.trim()));
        }
        MediaType::Series | MediaType::Anime => {
            let (s, e) = (selector.season, selector.episode);
            queries.push(format!("{} S{:02}", title, s));
            queries.push(format!("{} integrale", title));
            queries.push(format!("{} batch", title));
            queries.push(format!("{} complet", title));
            queries.push(format!("{} S{:02}E{:02}", title, s, e));

            if s == 1 {
                queries.push(format!("{} E{:02}", title, e));
                queries.push(format!("{} {:02}", title, e));
            }

            if selector.is_absolute {
                let abs = selector.absolute_episode;
                queries.push(format!("{} E{:03}", title, abs));
                queries.push(format!("{} {:03}", title, abs));
            }
        }
    }

    queries
        .into_iter()
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .map(|query| QueryVariant {
            query,
            media_type: selector.media_type,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queries_for(media_type: MediaType, id: &str, title: &str, year: &str) -> Vec<String> {
        let selector = ContentSelector::parse(media_type, id);
        build_queries(&selector, &TitleMeta::new(title, year))
            .into_iter()
            .map(|v| v.query)
            .collect()
    }

    #[test]
    fn test_movie_single_variant() {
        let queries = queries_for(MediaType::Movie, "tt0133093", "The Matrix", "1999");
        assert_eq!(queries, vec!["The Matrix 1999"]);
    }

    #[test]
    fn test_series_base_variants() {
        let queries = queries_for(MediaType::Series, "tt0944947:3:9", "Game of Thrones", "2011");
        assert_eq!(
            queries,
            vec![
                "Game of Thrones S03",
                "Game of Thrones integrale",
                "Game of Thrones batch",
                "Game of Thrones complet",
                "Game of Thrones S03E09",
            ]
        );
    }

    #[test]
    fn test_first_season_adds_episode_variants() {
        let queries = queries_for(MediaType::Series, "tt0944947:1:5", "Game of Thrones", "");
        assert_eq!(queries.len(), 7);
        assert!(queries.contains(&"Game of Thrones E05".to_string()));
        assert!(queries.contains(&"Game of Thrones 05".to_string()));
    }

    #[test]
    fn test_absolute_first_season_has_nine_variants() {
        let queries = queries_for(MediaType::Anime, "tt0988824:1:7:1:7:true", "Naruto", "2002");
        assert_eq!(queries.len(), 9);
        assert!(queries.contains(&"Naruto E007".to_string()));
        assert!(queries.contains(&"Naruto 007".to_string()));
    }

    #[test]
    fn test_absolute_later_season_has_seven_variants() {
        let queries = queries_for(MediaType::Anime, "tt0988824:2:8:1:40:true", "Naruto", "");
        assert_eq!(queries.len(), 7);
        assert!(queries.contains(&"Naruto S02E08".to_string()));
        assert!(queries.contains(&"Naruto 040".to_string()));
    }

    #[test]
    fn test_variants_carry_media_type() {
        let selector = ContentSelector::parse(MediaType::Anime, "tt1:2:3");
        let variants = build_queries(&selector, &TitleMeta::new("X", ""));
        assert!(variants.iter().all(|v| v.media_type == MediaType::Anime));
    }

    #[test]
    fn test_degraded_movie_without_metadata_has_no_variants() {
        let queries = queries_for(MediaType::Movie, "tt0", "", "");
        assert!(queries.is_empty());
    }
}
