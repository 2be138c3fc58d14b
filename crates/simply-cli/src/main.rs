use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use simply_core::session::Target;
use simply_core::SimplyConfig;

/// simply: describe a website in chat, get the code and a live preview.
///
/// Prompts go to the Simply Design generation webhook. HTML/CSS results are
/// written to a preview file you can open in a browser, and finished sites
/// can be deployed to a domain from inside the TUI.
#[derive(Parser, Debug)]
#[command(name = "simply", version, about)]
struct Cli {
    /// Code target to preselect (HTML/CSS, React, Vue, Angular, Svelte, Next.js).
    #[arg(short, long)]
    target: Option<String>,

    /// Webhook endpoint (overrides the config file).
    #[arg(long)]
    endpoint: Option<String>,

    /// Request timeout in seconds (overrides the config file).
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Directory for preview documents and transcripts.
    #[arg(long)]
    preview_dir: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging.
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // Log to a file to avoid corrupting the TUI output. If the log file
    // can't be opened, silently discard logs rather than polluting the
    // alternate screen buffer.
    let log_dir = dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("simply");
    let _ = std::fs::create_dir_all(&log_dir);
    let log_path = log_dir.join("simply.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path);

    match log_file {
        Ok(file) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
                )
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        Err(_) => {
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::new("off"))
                .with_writer(std::io::sink)
                .init();
        }
    }

    // Load config.
    let mut config = SimplyConfig::load().unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
        SimplyConfig::default()
    });

    // CLI flags win over the config file.
    if let Some(endpoint) = cli.endpoint {
        config.api.endpoint = endpoint;
    }
    if let Some(secs) = cli.timeout_secs {
        config.api.timeout_seconds = secs;
    }
    if let Some(dir) = cli.preview_dir {
        config.preview.dir = dir;
    }

    let target = match cli.target.as_deref() {
        Some(label) => match Target::from_label(label) {
            Some(target) => Some(target),
            None => anyhow::bail!(
                "Unknown target '{}'. Expected one of: {}",
                label,
                Target::all()
                    .iter()
                    .map(Target::label)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        },
        None => None,
    };

    tracing::info!(
        endpoint = %config.api.endpoint,
        timeout_secs = config.api.timeout_seconds,
        preview_dir = %config.preview.dir.display(),
        "Starting simply v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Start the TUI.
    let mut app = simply_tui::App::new(&config);
    if let Some(target) = target {
        app.set_initial_target(target);
    }

    app.run().await?;

    tracing::info!("simply exited cleanly");
    Ok(())
}
