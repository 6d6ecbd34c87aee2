use std::path::Path;

use tracing::warn;

use super::schema::CONFIG_SCHEMA;
use super::types::ConsoleConfig;
use crate::errors::ConsoleError;

pub async fn load_config(path: &Path) -> Result<ConsoleConfig, ConsoleError> {
    if !path.exists() {
        return Err(ConsoleError::Config(format!(
            "Config file not found: {}",
            path.display()
        )));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > 1_048_576 {
        return Err(ConsoleError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    let yaml: serde_yaml::Value = serde_yaml::from_str(&content)?;

    // JSON Schema validation
    validate_schema(&yaml)?;

    // Parse into typed config
    let config: ConsoleConfig = serde_yaml::from_value(yaml)?;

    // Semantic validation
    validate_semantics(&config)?;

    Ok(config)
}

/// Validate config against the JSON schema for structural correctness.
/// Schema findings are advisory; malformed values still fail typed parsing.
fn validate_schema(yaml: &serde_yaml::Value) -> Result<(), ConsoleError> {
    let json_str = serde_json::to_string(yaml)
        .map_err(|e| ConsoleError::Config(format!("Config conversion error: {e}")))?;
    let json_value: serde_json::Value = serde_json::from_str(&json_str)
        .map_err(|e| ConsoleError::Config(format!("Config conversion error: {e}")))?;

    let compiled = jsonschema::JSONSchema::compile(&CONFIG_SCHEMA)
        .map_err(|e| ConsoleError::Config(format!("Schema compilation error: {e}")))?;

    if let Err(errors) = compiled.validate(&json_value) {
        for err in errors {
            warn!(validation_error = %format!("{} at {}", err, err.instance_path), "Config schema warning");
        }
    }

    Ok(())
}

/// Reject configurations the background tasks cannot run with.
fn validate_semantics(config: &ConsoleConfig) -> Result<(), ConsoleError> {
    if config.poll_interval_secs == 0 {
        return Err(ConsoleError::Config("poll_interval_secs must be at least 1".into()));
    }
    if config.refresh_interval_secs == 0 {
        return Err(ConsoleError::Config(
            "refresh_interval_secs must be at least 1".into(),
        ));
    }
    if !config.base_url.starts_with("http://") && !config.base_url.starts_with("https://") {
        return Err(ConsoleError::Config(format!(
            "base_url must be an http(s) URL, got '{}'",
            config.base_url
        )));
    }
    // Both ceilings disabled would leave a stuck run tracked forever.
    if config.max_consecutive_poll_errors == 0 && config.poll_timeout_secs == 0 {
        return Err(ConsoleError::Config(
            "at least one of max_consecutive_poll_errors and poll_timeout_secs must be non-zero"
                .into(),
        ));
    }
    if config.max_inline_recommendations == 0 {
        warn!("max_inline_recommendations is 0; all recommendations will be behind view-more");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_load_valid_config() {
        let file = write_temp("organization: Acme Corp\nbase_url: https://aegis.acme.example\n");
        let config = load_config(file.path()).await.unwrap();
        assert_eq!(config.organization, "Acme Corp");
        assert_eq!(config.base_url, "https://aegis.acme.example");
        assert_eq!(config.poll_interval_secs, 5);
    }

    #[tokio::test]
    async fn test_missing_file_is_config_error() {
        let err = load_config(Path::new("/nonexistent/console.yaml"))
            .await
            .unwrap_err();
        assert!(matches!(err, ConsoleError::Config(_)));
    }

    #[tokio::test]
    async fn test_zero_poll_interval_rejected() {
        let file = write_temp("poll_interval_secs: 0\n");
        let err = load_config(file.path()).await.unwrap_err();
        assert!(matches!(err, ConsoleError::Config(_)));
    }

    #[tokio::test]
    async fn test_non_http_base_url_rejected() {
        let file = write_temp("base_url: ftp://aegis.example\n");
        let err = load_config(file.path()).await.unwrap_err();
        assert!(matches!(err, ConsoleError::Config(_)));
    }

    #[tokio::test]
    async fn test_both_ceilings_disabled_rejected() {
        let file = write_temp("max_consecutive_poll_errors: 0\npoll_timeout_secs: 0\n");
        let err = load_config(file.path()).await.unwrap_err();
        assert!(matches!(err, ConsoleError::Config(_)));
    }

    #[tokio::test]
    async fn test_one_ceiling_disabled_is_fine() {
        let file = write_temp("poll_timeout_secs: 0\n");
        let config = load_config(file.path()).await.unwrap();
        assert_eq!(config.poll_timeout_secs, 0);
        assert_eq!(config.max_consecutive_poll_errors, 10);
    }
}
