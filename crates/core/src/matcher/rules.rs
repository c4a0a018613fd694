//! Episode matching policy.
//!
//! Rules are tried in priority order against the lower-cased display path.
//! A rule matches when every one of its patterns matches. Each pattern is
//! scoped either to the whole path or to its file name component, so a
//! `Season 1/` folder can name the season but never the episode. Numbers are
//! compared with optional zero padding and must sit on token boundaries, so
//! `x265` never reads as episode 5 and `s02e05` never satisfies season 1.

use regex_lite::Regex;

use crate::selector::ContentSelector;

/// Start of a token: start of path or a non-alphanumeric character.
const START: &str = "(?:^|[^a-z0-9])";
/// Start of a bare number. Like `START`, but a dot right after a digit does
/// not count, so the `1` of `ddp5.1` is never a token.
const BARE_START: &str = r"(?:^|[^a-z0-9.]|(?:^|[^0-9])\.)";
/// End of a number: anything but another digit.
const END: &str = "(?:[^0-9]|$)";
/// Any combined season/episode token, whatever the numbers.
const EXPLICIT_TOKEN: &str =
    r"(?:^|[^a-z0-9])(?:s[0-9]{1,3}[ ._-]?e[0-9]{1,4}|[0-9]{1,2}x[0-9]{1,4})(?:[^0-9]|$)";

/// Part of the display path a pattern is tested against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Path,
    FileName,
}

/// One entry of the policy table.
pub struct MatchRule {
    pub name: &'static str,
    pub priority: u8,
    /// Whether the rule is relevant for this request.
    pub applies: fn(&ContentSelector) -> bool,
    /// Skip files whose name carries a combined token for another episode.
    pub yields_to_explicit: bool,
    /// Patterns that must all match.
    pub patterns: fn(&ContentSelector) -> Vec<(Scope, String)>,
}

pub static EPISODE_RULES: &[MatchRule] = &[
    MatchRule {
        name: "season_episode",
        priority: 1,
        applies: |_| true,
        yields_to_explicit: false,
        patterns: |sel| vec![(Scope::Path, season_episode(sel))],
    },
    MatchRule {
        name: "season_and_episode",
        priority: 2,
        applies: |_| true,
        yields_to_explicit: true,
        patterns: |sel| {
            vec![
                (
                    Scope::Path,
                    format!("{START}(?:season|saison|s)[ ._-]*0*{}{END}", sel.season),
                ),
                (
                    Scope::FileName,
                    format!("{START}(?:episode|ep|e)[ ._-]*0*{}{END}", sel.episode),
                ),
            ]
        },
    },
    MatchRule {
        name: "bare_episode",
        priority: 3,
        applies: |sel| sel.season == 1,
        yields_to_explicit: true,
        patterns: |sel| vec![(Scope::FileName, bare_number(sel.episode))],
    },
    MatchRule {
        name: "absolute_episode",
        priority: 4,
        applies: |sel| sel.is_absolute,
        yields_to_explicit: true,
        patterns: |sel| vec![(Scope::FileName, bare_number(sel.absolute_episode))],
    },
];

fn season_episode(sel: &ContentSelector) -> String {
    format!(
        "{START}(?:s0*{s}[ ._-]?e0*{e}|0*{s}x0*{e}){END}",
        s = sel.season,
        e = sel.episode
    )
}

/// An episode number standing on its own, optionally prefixed by `e`/`ep`/`episode`.
fn bare_number(n: u32) -> String {
    format!("{BARE_START}(?:episode|ep|e)?[ ._-]?0*{n}{END}")
}

/// Last component of a `/`-separated path.
fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

struct CompiledRule {
    name: &'static str,
    yields_to_explicit: bool,
    patterns: Vec<(Scope, Regex)>,
}

impl CompiledRule {
    fn matches(&self, path: &str, name: &str) -> bool {
        self.patterns.iter().all(|(scope, re)| match scope {
            Scope::Path => re.is_match(path),
            Scope::FileName => re.is_match(name),
        })
    }
}

/// The policy table compiled for one selector.
pub struct EpisodePolicy {
    rules: Vec<CompiledRule>,
    explicit: Option<Regex>,
    own: Option<Regex>,
}

impl EpisodePolicy {
    /// Compile the applicable rules for `selector`, sorted by priority.
    pub fn compile(selector: &ContentSelector) -> Self {
        let mut table: Vec<&MatchRule> = EPISODE_RULES
            .iter()
            .filter(|rule| (rule.applies)(selector))
            .collect();
        table.sort_by_key(|rule| rule.priority);

        let rules = table
            .into_iter()
            .filter_map(|rule| {
                let patterns = (rule.patterns)(selector)
                    .into_iter()
                    .map(|(scope, p)| Regex::new(&p).map(|re| (scope, re)))
                    .collect::<Result<Vec<_>, _>>()
                    .ok()?;
                Some(CompiledRule {
                    name: rule.name,
                    yields_to_explicit: rule.yields_to_explicit,
                    patterns,
                })
            })
            .collect();

        Self {
            rules,
            explicit: Regex::new(EXPLICIT_TOKEN).ok(),
            own: Regex::new(&season_episode(selector)).ok(),
        }
    }

    /// Name of the first rule satisfied by `lowercase_path`.
    pub fn first_match(&self, lowercase_path: &str) -> Option<&'static str> {
        self.hits(lowercase_path).next()
    }

    fn hits<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'static str> + 'a {
        let name = file_name(path);
        let other_episode = self.names_other_episode(name);
        self.rules
            .iter()
            .filter(move |rule| !(rule.yields_to_explicit && other_episode))
            .filter(move |rule| rule.matches(path, name))
            .map(|rule| rule.name)
    }

    /// Whether the file name carries a combined token for some other episode.
    fn names_other_episode(&self, name: &str) -> bool {
        match (&self.explicit, &self.own) {
            (Some(explicit), Some(own)) => explicit.is_match(name) && !own.is_match(name),
            _ => false,
        }
    }
}
