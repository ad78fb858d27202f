use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use hiscore_tracker::config::{
    HiscoresConfig, TrackerConfig, DEFAULT_HISCORES_URL, DEFAULT_RECORDS_DIR, DEFAULT_TIMEOUT_SECS,
};
use hiscore_tracker::lifecycle::describe;
use hiscore_tracker::record::store::FileRecordStore;
use hiscore_tracker::record::types::{AccountType, EntityName};
use hiscore_tracker::series::types::Chart;
use hiscore_tracker::services::hiscores::HiscoresClient;
use hiscore_tracker::services::render::{SeriesRenderer, TextRenderer};
use hiscore_tracker::{Tracker, TrackerError};

#[derive(Parser)]
#[command(name = "hiscore-tracker", about = "A data tracker for Old School RuneScape.")]
struct Cli {
    /// Directory holding one folder of records per account.
    #[arg(long, global = true, env = "TRACKER_RECORDS_DIR", default_value = DEFAULT_RECORDS_DIR)]
    records_dir: PathBuf,

    #[arg(long, global = true, env = "TRACKER_HISCORES_URL", default_value = DEFAULT_HISCORES_URL)]
    hiscores_url: String,

    #[arg(long, global = true, env = "TRACKER_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Adds a time point to the account's record (acctype: N, IM, UIM, HIC).
    Track { name: String, acctype: AccountType },
    /// Shows all the accounts with records.
    Show,
    /// Renames a record, for use when the account is renamed.
    Rename { old_name: String, new_name: String },
    /// Deletes the account and all of its records.
    Delete { name: String },
    /// Prints one skill's experience, level or rank over time.
    Plot { name: String, skill: String, mode: String },
}

impl Cli {
    fn config(&self) -> TrackerConfig {
        TrackerConfig {
            records_dir: self.records_dir.clone(),
            hiscores: HiscoresConfig {
                base_url: self.hiscores_url.clone(),
                timeout: Duration::from_secs(self.timeout_secs),
            },
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to install logger: {e}");
    }

    let cli = Cli::parse();
    let config = cli.config();
    tracing::debug!("records root: {}", config.records_dir.display());

    let store = FileRecordStore::new(config.records_dir.clone());
    let fetcher = HiscoresClient::new(&config.hiscores);
    let mut tracker = Tracker::new(store, fetcher);

    let outcome = match cli.command {
        Command::Track { name, acctype } => match tracker.capture(&name, acctype).await {
            Ok(capture) => Ok(format!(
                "Recorded {} as of {}",
                capture.entity, capture.snapshot.captured_at
            )),
            Err(e) => Err(match e.downcast_ref::<TrackerError>() {
                Some(err) => describe(err),
                None => format!("Error: {e:#}"),
            }),
        },
        Command::Show => tracker.lifecycle().show().map(|names| {
            if names.is_empty() {
                "No accounts are being tracked.".to_string()
            } else {
                names.iter().map(|n| n.to_string()).collect::<Vec<_>>().join("\n")
            }
        }),
        Command::Rename { old_name, new_name } => tracker.lifecycle().rename(&old_name, &new_name),
        Command::Delete { name } => tracker.lifecycle().delete(&name),
        Command::Plot { name, skill, mode } => plot(&tracker, &name, &skill, &mode),
    };

    match outcome {
        Ok(message) => {
            if !message.is_empty() {
                println!("{message}");
            }
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn plot(
    tracker: &Tracker<FileRecordStore, HiscoresClient>,
    name: &str,
    skill: &str,
    mode: &str,
) -> Result<String, String> {
    let report = tracker.view(name, skill, mode).map_err(|e| describe(&e))?;
    if !report.warnings.is_empty() {
        tracing::warn!("{} record(s) left out of the series", report.warnings.len());
    }

    let entity = EntityName::parse(name).map_err(|e| describe(&e))?;
    let chart = Chart::new(&entity, &report.series);
    let mut renderer = TextRenderer::new(std::io::stdout().lock());
    renderer.render(&chart).map_err(|e| format!("Error: {e:#}"))?;
    Ok(String::new())
}
