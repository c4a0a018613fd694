//! File selection inside a torrent.
//!
//! Picks at most one video file per torrent: the first video for movies,
//! or the first file satisfying the episode policy table for series.

mod rules;

pub use rules::{EpisodePolicy, MatchRule, Scope, EPISODE_RULES};

use serde::Serialize;

use crate::content::{TorrentFile, TorrentFileList};
use crate::selector::ContentSelector;

/// Extensions treated as playable video.
pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mkv", "mp4", "avi", "mov", "wmv", "m4v", "webm", "ts", "m2ts", "mpg", "mpeg", "flv",
];

/// The file chosen for a torrent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedFile {
    /// 1-based position in the unfiltered file list.
    pub file_index: usize,
    pub display_path: String,
    /// Rule that selected the file ("first_video" for movies).
    pub rule: &'static str,
}

/// Matcher for one request; compiles the episode rules once.
pub struct FileMatcher {
    policy: Option<EpisodePolicy>,
}

impl FileMatcher {
    pub fn new(selector: &ContentSelector) -> Self {
        Self {
            policy: selector
                .media_type
                .is_episodic()
                .then(|| EpisodePolicy::compile(selector)),
        }
    }

    /// Select the file for this torrent, if any qualifies.
    pub fn select(&self, list: &TorrentFileList) -> Option<MatchedFile> {
        let videos = list
            .files
            .iter()
            .enumerate()
            .filter(|(_, file)| is_video(&file.path));

        for (position, file) in videos {
            let Some(policy) = &self.policy else {
                return Some(matched(position, file, "first_video"));
            };

            if let Some(rule) = policy.first_match(&file.path.to_lowercase()) {
                return Some(matched(position, file, rule));
            }
        }

        None
    }
}

/// One-shot convenience over `FileMatcher`.
pub fn match_file(selector: &ContentSelector, list: &TorrentFileList) -> Option<MatchedFile> {
    FileMatcher::new(selector).select(list)
}

fn matched(position: usize, file: &TorrentFile, rule: &'static str) -> MatchedFile {
    MatchedFile {
        file_index: position + 1,
        display_path: file.path.clone(),
        rule,
    }
}

/// Whether the path ends in a known video extension.
pub fn is_video(path: &str) -> bool {
    match path.rsplit_once('.') {
        Some((_, ext)) => VIDEO_EXTENSIONS
            .iter()
            .any(|known| known.eq_ignore_ascii_case(ext)),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::MediaType;
    use crate::testing::fixtures::file_list;

    #[test]
    fn test_is_video() {
        assert!(is_video("Movie.2020.MKV"));
        assert!(is_video("dir/ep.m2ts"));
        assert!(!is_video("readme.txt"));
        assert!(!is_video("mkv"));
        assert!(!is_video("Show.S01E01.mkv.part"));
    }

    #[test]
    fn test_movie_picks_first_video() {
        let selector = ContentSelector::parse(MediaType::Movie, "tt0000001");
        let list = file_list(&["readme.txt", "Movie.2020.mkv", "sample.mkv"]);

        let matched = match_file(&selector, &list).unwrap();
        assert_eq!(matched.display_path, "Movie.2020.mkv");
        assert_eq!(matched.file_index, 2);
        assert_eq!(matched.rule, "first_video");
    }

    #[test]
    fn test_movie_without_video() {
        let selector = ContentSelector::parse(MediaType::Movie, "tt0000001");
        let list = file_list(&["readme.txt", "cover.jpg"]);
        assert!(match_file(&selector, &list).is_none());
    }

    #[test]
    fn test_series_season_episode() {
        let selector = ContentSelector::parse(MediaType::Series, "tt1:1:5");
        let matched = match_file(&selector, &file_list(&["Show.S01E05.mkv"])).unwrap();
        assert_eq!(matched.file_index, 1);
        assert_eq!(matched.rule, "season_episode");
    }

    #[test]
    fn test_series_bare_episode_first_season() {
        let selector = ContentSelector::parse(MediaType::Series, "tt1:1:5");
        let matched = match_file(&selector, &file_list(&["Show.E05.mkv"])).unwrap();
        assert_eq!(matched.rule, "bare_episode");
    }

    #[test]
    fn test_series_absolute_episode() {
        let selector = ContentSelector::parse(MediaType::Anime, "tt1:4:3:1:105:true");
        let matched = match_file(&selector, &file_list(&["Show.105.mkv"])).unwrap();
        assert_eq!(matched.rule, "absolute_episode");
    }

    #[test]
    fn test_series_first_satisfying_file_wins() {
        let selector = ContentSelector::parse(MediaType::Series, "tt1:1:3");
        let list = file_list(&[
            "Show.S01E01.mkv",
            "Show.S01E03.nfo",
            "Extras/Show - 03 - Making of.mkv",
            "Show.S01E03.mkv",
        ]);

        // the bare "03" in the extras file is reached before the S01E03 file
        let matched = match_file(&selector, &list).unwrap();
        assert_eq!(matched.file_index, 3);
        assert_eq!(matched.rule, "bare_episode");
    }

    #[test]
    fn test_series_season_folder_does_not_pick_wrong_episode() {
        let selector = ContentSelector::parse(MediaType::Series, "tt1:1:1");
        let list = file_list(&["Season 1/Show.S01E03.mkv", "Season 1/Show.S01E01.mkv"]);

        let matched = match_file(&selector, &list).unwrap();
        assert_eq!(matched.display_path, "Season 1/Show.S01E01.mkv");
        assert_eq!(matched.file_index, 2);
        assert_eq!(matched.rule, "season_episode");
    }

    #[test]
    fn test_series_audio_tag_does_not_pick_wrong_episode() {
        let selector = ContentSelector::parse(MediaType::Series, "tt1:1:1");
        let list = file_list(&[
            "Show.S01E03.1080p.DDP5.1.mkv",
            "Show.S01E01.1080p.DDP5.1.mkv",
        ]);

        let matched = match_file(&selector, &list).unwrap();
        assert_eq!(matched.file_index, 2);
        assert_eq!(matched.rule, "season_episode");
    }

    #[test]
    fn test_series_index_counts_non_video_files() {
        let selector = ContentSelector::parse(MediaType::Series, "tt1:2:4");
        let list = file_list(&[
            "Show.S02E03.mkv",
            "Show.S02E04.srt",
            "poster.jpg",
            "Show.S02E04.mkv",
        ]);

        let matched = match_file(&selector, &list).unwrap();
        assert_eq!(matched.file_index, 4);
    }

    #[test]
    fn test_series_no_match() {
        let selector = ContentSelector::parse(MediaType::Series, "tt1:2:9");
        let list = file_list(&["Show.S02E01.mkv", "Show.S02E02.mkv"]);
        assert!(match_file(&selector, &list).is_none());
    }
}
