//! Gateway configuration loader for Adda.
//!
//! Reads `config.toml` from the data directory (`~/.adda/` in production)
//! and deserializes it into [`GatewayConfig`]. Falls back to defaults when
//! the file is missing or malformed, so a fresh install starts with the
//! single-provider Groq chain.

use std::path::{Path, PathBuf};

use secrecy::SecretString;

use adda_types::config::GatewayConfig;
use adda_types::llm::ProviderDescriptor;

/// Resolve the data directory: `ADDA_DATA_DIR` if set, else `~/.adda`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("ADDA_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".adda")
}

/// Load gateway configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`GatewayConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_config(data_dir: &Path) -> GatewayConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(
                "No config.toml found at {}, using defaults",
                config_path.display()
            );
            return GatewayConfig::default();
        }
        Err(err) => {
            tracing::warn!(
                "Failed to read {}: {err}, using defaults",
                config_path.display()
            );
            return GatewayConfig::default();
        }
    };

    match toml::from_str::<GatewayConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            GatewayConfig::default()
        }
    }
}

/// Resolve a provider's API key from the environment variable named in
/// its descriptor.
///
/// Whitespace-only values count as missing, so an accidental
/// `GROQ_API_KEY=""` does not produce a provider that always 401s.
pub fn resolve_api_key(descriptor: &ProviderDescriptor) -> Option<SecretString> {
    match std::env::var(&descriptor.api_key_env) {
        Ok(value) if !value.trim().is_empty() => Some(SecretString::from(value)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).await;
        assert_eq!(config.providers.len(), 1);
        assert_eq!(config.providers[0].name, "groq");
        assert_eq!(config.history_budget, 3_000);
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
history_budget = 6000

[[providers]]
name = "groq"
base_url = "https://api.groq.com/openai/v1"
api_key_env = "GROQ_API_KEY"
model = "llama-3.1-8b-instant"

[[providers]]
name = "backup"
base_url = "https://backup.example/v1"
api_key_env = "BACKUP_API_KEY"
model = "backup-model"
"#,
        )
        .await
        .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config.history_budget, 6_000);
        assert_eq!(config.providers.len(), 2);
        assert_eq!(config.providers[1].name, "backup");
    }

    #[tokio::test]
    async fn load_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config.providers.len(), 1);
        assert_eq!(config.providers[0].name, "groq");
    }

    fn descriptor_with_env(env: &str) -> ProviderDescriptor {
        ProviderDescriptor {
            name: "test".to_string(),
            base_url: "https://example.invalid/v1".to_string(),
            api_key_env: env.to_string(),
            model: "test-model".to_string(),
            models: Vec::new(),
            streaming: true,
        }
    }

    #[test]
    fn resolve_api_key_reads_the_named_variable() {
        // SAFETY: test-local variable name, removed before the test ends.
        unsafe { std::env::set_var("ADDA_TEST_KEY_PRESENT", "sk-test-123") };

        let key = resolve_api_key(&descriptor_with_env("ADDA_TEST_KEY_PRESENT"));
        assert!(key.is_some());

        unsafe { std::env::remove_var("ADDA_TEST_KEY_PRESENT") };
    }

    #[test]
    fn resolve_api_key_missing_variable_is_none() {
        assert!(resolve_api_key(&descriptor_with_env("ADDA_TEST_KEY_NEVER_SET")).is_none());
    }

    #[test]
    fn resolve_api_key_blank_value_is_none() {
        // SAFETY: test-local variable name, removed before the test ends.
        unsafe { std::env::set_var("ADDA_TEST_KEY_BLANK", "   ") };

        assert!(resolve_api_key(&descriptor_with_env("ADDA_TEST_KEY_BLANK")).is_none());

        unsafe { std::env::remove_var("ADDA_TEST_KEY_BLANK") };
    }

    #[test]
    fn data_dir_honors_override() {
        // SAFETY: test-local variable name, removed before the test ends.
        unsafe { std::env::set_var("ADDA_DATA_DIR", "/tmp/adda-test-data") };

        assert_eq!(resolve_data_dir(), PathBuf::from("/tmp/adda-test-data"));

        unsafe { std::env::remove_var("ADDA_DATA_DIR") };
    }
}
