pub mod cache;
pub mod config;
pub mod content;
pub mod matcher;
pub mod meta;
pub mod metrics;
pub mod query;
pub mod resolver;
pub mod searcher;
pub mod selector;
pub mod streams;
pub mod testing;

pub use cache::{CacheError, MemoryStreamCache, SqliteStreamCache, StreamCache};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, ContentConfig,
    DatabaseConfig, JackettConfig, MetadataConfig, ResolverConfig, ServerConfig, StreamsConfig,
};
pub use content::{
    resolve_contents, ContentError, ContentInspector, ResolvedCandidate, TorrentFile,
    TorrentFileList, TorrentInspector,
};
pub use matcher::{match_file, FileMatcher, MatchedFile};
pub use meta::{CinemetaClient, IdMapper, KitsuMapper, MetaError, MetadataProvider, TitleMeta};
pub use query::{build_queries, QueryVariant};
pub use resolver::StreamResolver;
pub use searcher::{
    rank_candidates, search_all, Candidate, JackettSearcher, SearchCategory, SearchError,
    SearchQuery, Searcher,
};
pub use selector::{normalize_content_id, ContentSelector, MediaType};
pub use streams::{assemble_streams, BehaviorHints, StreamDescriptor};
