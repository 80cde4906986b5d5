//! sift - Entry point for the triage CLI

use anyhow::{bail, Context};

use sift::config::Settings;
use sift::ingest::{parse_inbox_json, sample_messages};
use sift::services::{ClassificationService, FeedbackEvent, FeedbackService, StatsService};
use sift::StorageLayer;

const USAGE: &str = "\
Usage:
  sift classify <inbox.json>    Classify an inbox document
  sift mock                     Classify the built-in sample inbox
  sift feedback <message-id> [--tag <tag>] [--summary-helpful <true|false>]
                                Record a correction or confirmation
  sift stats                    Show tagging statistics and sender insights";

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!("{e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        bail!("missing command\n{USAGE}");
    };

    let settings_path = Settings::default_path()?;
    let settings = Settings::load_or_default(&settings_path)
        .with_context(|| format!("loading settings from {}", settings_path.display()))?;

    let db_path = settings.db_path()?;
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let storage = StorageLayer::new(&db_path)
        .await
        .with_context(|| format!("opening database at {}", db_path.display()))?;

    match command.as_str() {
        "classify" => {
            let path = args
                .get(1)
                .with_context(|| format!("missing inbox file\n{USAGE}"))?;
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading {path}"))?;
            let batch = parse_inbox_json(&raw)?;
            for rejected in &batch.rejected {
                tracing::warn!(
                    index = rejected.index,
                    id = rejected.id.as_deref().unwrap_or("<none>"),
                    reason = %rejected.reason,
                    "rejected inbox entry"
                );
            }
            classify_and_print(storage, settings, &batch.messages).await?;
        }
        "mock" => {
            classify_and_print(storage, settings, &sample_messages()).await?;
        }
        "feedback" => {
            let message_id = args
                .get(1)
                .with_context(|| format!("missing message id\n{USAGE}"))?
                .clone();
            let event = FeedbackEvent {
                message_id,
                corrected_tag: flag_value(&args, "--tag"),
                summary_helpful: flag_value(&args, "--summary-helpful")
                    .map(|v| v.parse::<bool>())
                    .transpose()
                    .context("--summary-helpful expects true or false")?,
            };

            let service = FeedbackService::with_policy(storage, settings.scoring);
            let updated = service.submit(event).await?;
            println!("{}", serde_json::to_string_pretty(&updated)?);
        }
        "stats" => {
            let service = StatsService::with_policy(storage, settings.scoring);
            let stats = service.tagging_stats().await?;
            let insights = service.sender_insights().await?;
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "tagging": stats,
                    "senders": insights,
                }))?
            );
        }
        other => bail!("unknown command: {other}\n{USAGE}"),
    }

    Ok(())
}

async fn classify_and_print(
    storage: StorageLayer,
    settings: Settings,
    messages: &[sift::domain::Message],
) -> anyhow::Result<()> {
    let rules = settings.rule_set()?;
    let service = ClassificationService::with_config(storage, rules, settings.scoring);
    let outputs = service.classify_batch(messages).await;
    println!("{}", serde_json::to_string_pretty(&outputs)?);
    tracing::info!(classified = outputs.len(), "batch complete");
    Ok(())
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
