use anyhow::{bail, Result};
use std::sync::Arc;
use tracing::{info, warn};

use crate::ai::mock::MockProvider;
use crate::ai::{AiProvider, GeminiProvider};
use crate::settings::{ProviderConfig, Settings};

/// Builds the active provider from settings, reading its credential from the
/// process environment.
///
/// Returns `Ok(None)` when the provider needs a credential that is not set;
/// the controller reports that lazily on the first submit.
pub fn create_active_provider(settings: &Settings) -> Result<Option<Arc<dyn AiProvider>>> {
    create_active_provider_with(settings, |name| std::env::var(name).ok())
}

pub fn create_active_provider_with<F>(
    settings: &Settings,
    lookup_env: F,
) -> Result<Option<Arc<dyn AiProvider>>>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(name) = settings.active_provider.as_deref() else {
        bail!("No active provider configured in settings")
    };
    let Some(config) = settings.providers.get(name) else {
        bail!("Active provider '{name}' is not defined in settings")
    };

    match config {
        ProviderConfig::Gemini {
            api_key_env,
            model,
            base_url,
        } => {
            let api_key = lookup_env(api_key_env).filter(|key| !key.trim().is_empty());
            let Some(api_key) = api_key else {
                warn!(%api_key_env, "No Gemini credential in environment");
                return Ok(None);
            };

            info!(%model, "Using Gemini provider");
            let provider =
                GeminiProvider::with_options(api_key, model.clone(), base_url.clone())?;
            Ok(Some(Arc::new(provider)))
        }
        ProviderConfig::Mock { behavior } => {
            info!(?behavior, "Using mock provider");
            Ok(Some(Arc::new(MockProvider::new(behavior.clone()))))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::mock::MockBehavior;

    #[test]
    fn gemini_without_credential_is_none() {
        let settings = Settings::default();
        let provider = create_active_provider_with(&settings, |_| None).unwrap();
        assert!(provider.is_none());

        let provider = create_active_provider_with(&settings, |_| Some("  ".to_string())).unwrap();
        assert!(provider.is_none());
    }

    #[test]
    fn gemini_reads_configured_variable() {
        let mut settings = Settings::default();
        settings.add_provider(
            "gemini".to_string(),
            ProviderConfig::Gemini {
                api_key_env: "MY_KEY".to_string(),
                model: "gemini-2.5-pro".to_string(),
                base_url: "http://localhost".to_string(),
            },
        );

        let provider = create_active_provider_with(&settings, |name| {
            (name == "MY_KEY").then(|| "secret".to_string())
        })
        .unwrap()
        .unwrap();
        assert_eq!(provider.name(), "Gemini");
    }

    #[test]
    fn mock_needs_no_credential() {
        let mut settings = Settings::default();
        settings.add_provider(
            "mock".to_string(),
            ProviderConfig::Mock {
                behavior: MockBehavior::Success,
            },
        );
        settings.set_active_provider("mock").unwrap();

        let provider = create_active_provider_with(&settings, |_| None).unwrap().unwrap();
        assert_eq!(provider.name(), "mock");
    }

    #[test]
    fn undefined_active_provider_is_an_error() {
        let settings = Settings {
            active_provider: Some("nope".to_string()),
            ..Settings::default()
        };
        assert!(create_active_provider_with(&settings, |_| None).is_err());
    }
}
