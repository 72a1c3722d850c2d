use crate::ai::gemini::{DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};
use crate::ai::mock::MockBehavior;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Core application settings, stored as TOML.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// The name of the currently active provider
    #[serde(default = "default_provider_name")]
    pub active_provider: Option<String>,

    /// Map of provider name to configuration
    #[serde(default = "default_providers")]
    pub providers: HashMap<String, ProviderConfig>,

    /// Enhancement mode selected when a session starts
    #[serde(default = "default_template_id")]
    pub default_template: String,

    /// Persisted theme preference. `None` until the user toggles the theme,
    /// in which case the terminal's ambient signal is used.
    #[serde(default)]
    pub dark_mode: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ProviderConfig {
    #[serde(rename = "gemini")]
    Gemini {
        /// Environment variable holding the API key
        #[serde(default = "default_api_key_env")]
        api_key_env: String,
        #[serde(default = "default_gemini_model")]
        model: String,
        #[serde(default = "default_gemini_base_url")]
        base_url: String,
    },
    #[serde(rename = "mock")]
    Mock {
        #[serde(default)]
        behavior: MockBehavior,
    },
}

impl ProviderConfig {
    pub fn gemini() -> Self {
        ProviderConfig::Gemini {
            api_key_env: default_api_key_env(),
            model: default_gemini_model(),
            base_url: default_gemini_base_url(),
        }
    }

    /// Get the environment variable name for providers that need a credential
    pub fn api_key_env(&self) -> Option<&str> {
        match self {
            ProviderConfig::Gemini { api_key_env, .. } => Some(api_key_env.as_str()),
            ProviderConfig::Mock { .. } => None,
        }
    }
}

fn default_provider_name() -> Option<String> {
    Some("gemini".to_string())
}

fn default_providers() -> HashMap<String, ProviderConfig> {
    HashMap::from([("gemini".to_string(), ProviderConfig::gemini())])
}

fn default_template_id() -> String {
    "creative".to_string()
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

fn default_gemini_model() -> String {
    DEFAULT_GEMINI_MODEL.to_string()
}

fn default_gemini_base_url() -> String {
    DEFAULT_GEMINI_BASE_URL.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            active_provider: default_provider_name(),
            providers: default_providers(),
            default_template: default_template_id(),
            dark_mode: None,
        }
    }
}

impl Settings {
    /// Get the active provider configuration
    pub fn active_provider(&self) -> Option<&ProviderConfig> {
        let provider = self.active_provider.as_ref()?;
        self.providers.get(provider)
    }

    /// The variable the active provider reads its key from, falling back to
    /// `GEMINI_API_KEY`
    pub fn credential_env(&self) -> &str {
        self.active_provider()
            .and_then(ProviderConfig::api_key_env)
            .unwrap_or(DEFAULT_API_KEY_ENV)
    }

    /// Set the active provider (returns error if provider doesn't exist)
    pub fn set_active_provider(&mut self, name: &str) -> Result<(), String> {
        if self.providers.contains_key(name) {
            self.active_provider = Some(name.to_string());
            Ok(())
        } else {
            Err(format!("Provider '{name}' not found"))
        }
    }

    /// Add or update a provider configuration
    pub fn add_provider(&mut self, name: String, config: ProviderConfig) {
        self.providers.insert(name, config);
    }
}
