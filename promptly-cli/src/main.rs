use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod banner;
mod clipboard;
mod commands;
mod interactive_app;
mod one_shot;
mod tui;

use crate::interactive_app::InteractiveApp;
use crate::tui::TuiApp;

#[derive(Parser, Debug)]
#[command(name = "promptly")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Promptly - rewrite rough prompts into structured ones with Gemini")]
struct Args {
    /// Load settings from this file instead of ~/.promptly/settings.toml
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Enhancement mode to start with (creative, precise, academic, image)
    #[arg(long, value_name = "ID")]
    template: Option<String>,

    /// Enhance this prompt, print the result and exit
    #[arg(long, value_name = "TEXT")]
    prompt: Option<String>,

    /// With --prompt, print the final state as JSON
    #[arg(long, requires = "prompt")]
    json: bool,

    /// Print the available enhancement modes and exit
    #[arg(long)]
    list_templates: bool,

    /// Disable TUI and use the line-based interactive mode
    #[arg(long)]
    no_tui: bool,
}

fn main() -> Result<()> {
    setup_tracing()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let local = tokio::task::LocalSet::new();
        local.run_until(async_main()).await
    })
}

async fn async_main() -> Result<()> {
    let args = Args::parse();

    info!(
        "CLI startup: settings={:?}, template={:?}, one_shot={}, no_tui={}",
        args.settings,
        args.template,
        args.prompt.is_some(),
        args.no_tui
    );

    if args.list_templates {
        one_shot::print_templates();
        return Ok(());
    }

    if let Some(prompt) = args.prompt {
        return one_shot::run_one_shot(args.settings, args.template, prompt, args.json).await;
    }

    if args.no_tui {
        let mut app = InteractiveApp::new(args.settings, args.template)?;
        app.run().await?;
    } else {
        let mut tui_app = TuiApp::new(args.settings, args.template)?;
        tui_app.run().await?;
    }

    Ok(())
}

fn setup_tracing() -> Result<()> {
    use std::fs;
    use tracing_subscriber::fmt;

    // Create trace directory in user's home
    let home = dirs::home_dir().unwrap_or_else(std::env::temp_dir);
    let trace_dir = home.join(".promptly").join("trace");
    fs::create_dir_all(&trace_dir)
        .with_context(|| format!("Failed to create {}", trace_dir.display()))?;

    let log_file = trace_dir.join("promptly.log");
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter)
        .init();

    info!("Tracing initialized to {:?}", log_file);
    Ok(())
}
