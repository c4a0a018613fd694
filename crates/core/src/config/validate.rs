use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Jackett URL is set
/// - Timeouts are non-zero
/// - The librqbit listen port range is not inverted
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.jackett.url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "jackett.url cannot be empty".to_string(),
        ));
    }

    if config.jackett.timeout_secs == 0
        || config.metadata.timeout_secs == 0
        || config.resolver.search_timeout_secs == 0
        || config.resolver.content_timeout_secs == 0
        || config.resolver.metadata_timeout_secs == 0
    {
        return Err(ConfigError::ValidationError(
            "timeouts must be greater than 0".to_string(),
        ));
    }

    if let (Some(start), Some(end)) = (
        config.content.listen_port_start,
        config.content.listen_port_end,
    ) {
        if start > end {
            return Err(ConfigError::ValidationError(format!(
                "content listen port range {}..{} is inverted",
                start, end
            )));
        }
    }

    Ok(())
}
