use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Prefix for structured overrides, e.g. `GODON_JACKETT__API_KEY`.
const ENV_PREFIX: &str = "GODON_";

/// Bare variable that sets the result cap, kept for existing deployments.
const MAX_RES_VAR: &str = "MAX_RES";

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .merge(
            Env::raw()
                .only(&[MAX_RES_VAR])
                .map(|_| "resolver.max_results".into()),
        )
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MINIMAL: &str = r#"
[jackett]
url = "http://localhost:9117"
api_key = "key"

[resolver]
max_results = 20
"#;

    /// `resolver.max_results` after loading `MINIMAL` with `MAX_RES` set.
    fn max_results_with_env(value: &str) -> Option<i64> {
        let mut max_results = Some(i64::MIN);
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", MINIMAL)?;
            jail.set_env(MAX_RES_VAR, value);
            max_results = load_config(Path::new("config.toml"))
                .unwrap()
                .resolver
                .max_results;
            Ok(())
        });
        max_results
    }

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[server]
port = 9000

[jackett]
url = "http://jackett:9117"
api_key = "abc"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.jackett.url, "http://jackett:9117");
    }

    #[test]
    fn test_load_config_from_str_missing_jackett() {
        let toml = r#"
[server]
port = 8080
"#;
        let result = load_config_from_str(toml);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[server]
host = "127.0.0.1"
port = 3000

[jackett]
url = "http://localhost:9117"
api_key = "key"
indexer = "yggtorrent"

[streams]
country_whitelist = ["en", "fr"]
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host.to_string(), "127.0.0.1");
        assert_eq!(config.jackett.indexer, "yggtorrent");
        assert_eq!(config.streams.country_whitelist, vec!["en", "fr"]);
    }

    #[test]
    fn test_example_config_loads() {
        // inside a jail so a MAX_RES set by another test cannot leak in
        Jail::expect_with(|_| {
            let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config.example.toml");
            let config = load_config(&path).unwrap();
            assert_eq!(config.resolver.result_cap(), Some(20));
            assert_eq!(config.metadata.kitsu_url, "https://anime-kitsu.strem.fun");
            assert!(crate::config::validate_config(&config).is_ok());
            Ok(())
        });
    }

    #[test]
    fn test_max_res_env_overrides_file() {
        assert_eq!(max_results_with_env("7"), Some(7));
        assert_eq!(max_results_with_env("-3"), Some(-3));
    }

    #[test]
    fn test_max_res_env_garbage_disables_cap() {
        for value in ["lots", "1.5", "true"] {
            assert_eq!(max_results_with_env(value), None, "MAX_RES={:?}", value);
        }
    }
}
