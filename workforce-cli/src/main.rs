//! Workforce CLI: navigation, drilldown, employee list and export commands.
//!
//! Commands:
//! - `tabs`: load and validate the navigation tabs
//! - `drill`: company drilldown snapshot with breakdowns
//! - `employees`: one page of the employee list
//! - `export`: CSV export of the employee list
//! - `url`: resolve what a navigation tab opens

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use workforce_cli::{execute, Cli};
use workforce_core::Settings;
use workforce_runner::{MethodClient, SampleBackend};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let settings = Settings::load_or_default(&cli.settings)
        .with_context(|| format!("loading {}", cli.settings.display()))?;

    tracing::debug!(
        sample = cli.sample,
        settings = %cli.settings.display(),
        command = cli.command.name(),
        "backend selected"
    );

    let mut stdout = std::io::stdout().lock();
    if cli.sample {
        let backend = SampleBackend::new(&cli.export_dir);
        execute(&cli.command, &settings, &backend, &mut stdout).await
    } else {
        let client = MethodClient::new(&settings.service).context("building HTTP client")?;
        execute(&cli.command, &settings, &client, &mut stdout).await
    }
}
