//! Configuration validation rules.

use super::schema::Config;

/// Validate configuration and return aggregated validation errors.
pub fn validate_config(config: &Config) -> crate::Result<()> {
    let mut errors = Vec::new();

    if config.api.base_url.trim().is_empty() {
        errors.push("api.base_url must not be empty".to_string());
    } else if !config.api.base_url.starts_with("http://") && !config.api.base_url.starts_with("https://")
    {
        errors.push("api.base_url must start with http:// or https://".to_string());
    }
    if config.api.timeout_secs == 0 {
        errors.push("api.timeout_secs must be > 0".to_string());
    }

    if config.push.url.trim().is_empty() {
        errors.push("push.url must not be empty".to_string());
    } else if !config.push.url.starts_with("ws://") && !config.push.url.starts_with("wss://") {
        errors.push("push.url must start with ws:// or wss://".to_string());
    }
    if config.push.reconnect_secs == 0 {
        errors.push("push.reconnect_secs must be > 0".to_string());
    }

    match config.logging.level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        other => errors.push(format!(
            "logging.level must be one of trace/debug/info/warn/error, got '{}'",
            other
        )),
    }
    match config.logging.format.as_str() {
        "text" | "json" => {}
        other => errors.push(format!("logging.format must be text or json, got '{}'", other)),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(crate::Error::Validation(errors.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_defaults() {
        let config = Config::default();
        validate_config(&config).unwrap();
    }

    #[test]
    fn test_validate_rejects_non_websocket_push_url() {
        let mut config = Config::default();
        config.push.url = "https://push.giglink.io".to_string();

        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("push.url"));
    }

    #[test]
    fn test_validate_aggregates_errors() {
        let mut config = Config::default();
        config.api.base_url = String::new();
        config.logging.level = "loud".to_string();

        let err = validate_config(&config).unwrap_err();
        let text = err.to_string();
        assert!(text.contains("api.base_url"));
        assert!(text.contains("logging.level"));
    }
}
