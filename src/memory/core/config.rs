//! Process settings, loaded once at startup and immutable afterwards.

use std::fmt;

use url::Url;

use crate::memory::core::errors::{GatewayError, GatewayResult};

/// Rerank model used by cascading retrieval unless overridden.
pub const DEFAULT_RERANK_MODEL: &str = "cohere-rerank-3.5";
/// Classifier model used by the memory gate unless overridden.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-5-nano-2025-08-07";
/// Base URL of the OpenAI-compatible classifier API.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 8000;

const DENSE_HOST_ENV: &str = "PINECONE_DENSE_INDEX_HOST";
const SPARSE_HOST_ENV: &str = "PINECONE_SPARSE_INDEX_HOST";
const NAMESPACE_ENV: &str = "PINECONE_NAMESPACE";
const TOP_K_ENV: &str = "PINECONE_TOP_K";
const PINECONE_KEY_ENV: &str = "PINECONE_API_KEY";
const RERANK_MODEL_ENV: &str = "PINECONE_RERANK_MODEL";
const OPENAI_KEY_ENV: &str = "OPENAI_API_KEY";
const OPENAI_MODEL_ENV: &str = "OPENAI_MODEL";
const OPENAI_BASE_URL_ENV: &str = "OPENAI_BASE_URL";
const PORT_ENV: &str = "GATEWAY_PORT";

/// Gateway settings.
#[derive(Clone)]
pub struct Settings {
    /// Dense (semantic) index host, with scheme.
    pub dense_index_host: String,
    /// Sparse (lexical) index host, with scheme.
    pub sparse_index_host: String,
    /// Namespace shared by both indexes.
    pub namespace: String,
    /// Per-query result width, also the cascading retrieval cap.
    pub top_k: usize,
    /// Pinecone API key.
    pub pinecone_api_key: String,
    /// Rerank model requested for cascading retrieval.
    pub rerank_model: String,
    /// Classifier API key; `None` disables the memory gate.
    pub openai_api_key: Option<String>,
    /// Classifier model identifier.
    pub openai_model: String,
    /// Classifier API base URL.
    pub openai_base_url: String,
    /// HTTP listen port.
    pub port: u16,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("dense_index_host", &self.dense_index_host)
            .field("sparse_index_host", &self.sparse_index_host)
            .field("namespace", &self.namespace)
            .field("top_k", &self.top_k)
            .field("pinecone_api_key", &"<redacted>")
            .field("rerank_model", &self.rerank_model)
            .field(
                "openai_api_key",
                &self.openai_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("openai_model", &self.openai_model)
            .field("openai_base_url", &self.openai_base_url)
            .field("port", &self.port)
            .finish()
    }
}

impl Settings {
    /// Load settings from the process environment.
    ///
    /// # Errors
    /// Returns an error if a required variable is missing or a value is invalid.
    pub fn from_env() -> GatewayResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary key lookup.
    ///
    /// Blank values are treated as absent.
    ///
    /// # Errors
    /// Returns an error if a required key is missing or a value is invalid.
    pub fn from_lookup<F>(lookup: F) -> GatewayResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let required = |key: &str| {
            optional(key).ok_or_else(|| GatewayError::Config(format!("{key} must be set")))
        };

        let top_k = required(TOP_K_ENV)?.parse::<usize>().map_err(|err| {
            GatewayError::Config(format!("{TOP_K_ENV} must be a positive integer: {err}"))
        })?;
        let port = match optional(PORT_ENV) {
            Some(raw) => raw.parse::<u16>().map_err(|err| {
                GatewayError::Config(format!("{PORT_ENV} must be a valid port: {err}"))
            })?,
            None => DEFAULT_PORT,
        };

        let settings = Self {
            dense_index_host: with_scheme(&required(DENSE_HOST_ENV)?),
            sparse_index_host: with_scheme(&required(SPARSE_HOST_ENV)?),
            namespace: required(NAMESPACE_ENV)?,
            top_k,
            pinecone_api_key: required(PINECONE_KEY_ENV)?,
            rerank_model: optional(RERANK_MODEL_ENV)
                .unwrap_or_else(|| DEFAULT_RERANK_MODEL.to_string()),
            openai_api_key: optional(OPENAI_KEY_ENV),
            openai_model: optional(OPENAI_MODEL_ENV)
                .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            openai_base_url: optional(OPENAI_BASE_URL_ENV)
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            port,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    /// Returns an error if any values are out of range or invalid.
    pub fn validate(&self) -> GatewayResult<()> {
        if self.top_k == 0 {
            return Err(GatewayError::Config(format!("{TOP_K_ENV} must be > 0")));
        }

        if self.namespace.trim().is_empty() {
            return Err(GatewayError::Config(format!("{NAMESPACE_ENV} must not be empty")));
        }

        for (key, value) in [
            (DENSE_HOST_ENV, &self.dense_index_host),
            (SPARSE_HOST_ENV, &self.sparse_index_host),
            (OPENAI_BASE_URL_ENV, &self.openai_base_url),
        ] {
            Url::parse(value)
                .map_err(|err| GatewayError::Config(format!("{key} is not a valid url: {err}")))?;
        }

        Ok(())
    }

    /// Whether a classifier credential is configured for the memory gate.
    #[must_use]
    pub const fn classifier_configured(&self) -> bool {
        self.openai_api_key.is_some()
    }
}

/// Index hosts are often given bare (`my-index-abc.svc.pinecone.io`).
fn with_scheme(host: &str) -> String {
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn base_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            (DENSE_HOST_ENV, "dense-abc.svc.pinecone.io"),
            (SPARSE_HOST_ENV, "https://sparse-abc.svc.pinecone.io"),
            (NAMESPACE_ENV, "memories"),
            (TOP_K_ENV, "5"),
            (PINECONE_KEY_ENV, "pc-key"),
        ])
    }

    fn load(env: &HashMap<&'static str, &'static str>) -> GatewayResult<Settings> {
        Settings::from_lookup(|key| env.get(key).map(ToString::to_string))
    }

    #[test]
    fn test_defaults_applied() {
        let settings = load(&base_env()).unwrap();
        assert_eq!(settings.dense_index_host, "https://dense-abc.svc.pinecone.io");
        assert_eq!(settings.sparse_index_host, "https://sparse-abc.svc.pinecone.io");
        assert_eq!(settings.top_k, 5);
        assert_eq!(settings.rerank_model, DEFAULT_RERANK_MODEL);
        assert_eq!(settings.openai_model, DEFAULT_OPENAI_MODEL);
        assert_eq!(settings.port, DEFAULT_PORT);
        assert!(!settings.classifier_configured());
    }

    #[test]
    fn test_blank_openai_key_disables_classifier() {
        let mut env = base_env();
        env.insert(OPENAI_KEY_ENV, "   ");
        assert!(!load(&env).unwrap().classifier_configured());

        env.insert(OPENAI_KEY_ENV, "sk-live");
        assert!(load(&env).unwrap().classifier_configured());
    }

    #[test]
    fn test_missing_required_key() {
        let mut env = base_env();
        env.remove(NAMESPACE_ENV);
        let err = load(&env).unwrap_err();
        assert!(err.to_string().contains(NAMESPACE_ENV));
    }

    #[test]
    fn test_zero_top_k_rejected() {
        let mut env = base_env();
        env.insert(TOP_K_ENV, "0");
        assert!(matches!(load(&env), Err(GatewayError::Config(_))));
    }

    #[test]
    fn test_non_numeric_top_k_rejected() {
        let mut env = base_env();
        env.insert(TOP_K_ENV, "ten");
        assert!(matches!(load(&env), Err(GatewayError::Config(_))));
    }

    #[test]
    fn test_debug_redacts_keys() {
        let mut env = base_env();
        env.insert(OPENAI_KEY_ENV, "sk-live");
        let rendered = format!("{:?}", load(&env).unwrap());
        assert!(!rendered.contains("pc-key"));
        assert!(!rendered.contains("sk-live"));
    }
}
