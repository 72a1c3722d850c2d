use anyhow::{Context, Result};
use promptly_core::session::{create_active_provider, TemplateInfo};
use promptly_core::{EnhancementController, SettingsManager, TemplateRegistry};
use std::path::PathBuf;
use tracing::info;

use crate::banner::format_template_list;

pub fn print_templates() {
    let registry = TemplateRegistry::builtin();
    let templates: Vec<TemplateInfo> = registry.list().iter().map(TemplateInfo::from).collect();
    println!(
        "{}",
        format_template_list(&templates, registry.default_template().id)
    );
}

/// Enhances `prompt` once, without the actor, and prints the outcome.
pub async fn run_one_shot(
    settings_path: Option<PathBuf>,
    template: Option<String>,
    prompt: String,
    json: bool,
) -> Result<()> {
    let settings_manager = match settings_path {
        Some(path) => SettingsManager::from_path(path)?,
        None => SettingsManager::new()?,
    };
    let settings = settings_manager.settings();
    let provider = create_active_provider(&settings)?;

    let mut controller = EnhancementController::new(TemplateRegistry::builtin(), provider)
        .with_credential_env(settings.credential_env());
    let template = template.unwrap_or(settings.default_template);
    controller.select_template(&template)?;
    controller.set_input(prompt);

    info!(template = %template, "Running one-shot enhancement");
    let outcome = controller.submit().await;

    if json {
        let snapshot = controller.snapshot();
        println!(
            "{}",
            serde_json::to_string_pretty(&snapshot).context("Failed to serialize result")?
        );
    }

    match outcome {
        Ok(text) => {
            if !json {
                println!("{text}");
            }
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
