//! Human and JSON renderings of a [`RunSummary`].

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use multibuild_sync::{BuildStatus, CacheStatus, RepositoryOutcome, RunSummary, StopReason, UpdateStatus};

#[derive(Serialize)]
struct SummaryJson<'a> {
    updated: usize,
    built: usize,
    failed: usize,
    duration_secs: i64,
    #[serde(flatten)]
    run: &'a RunSummary,
}

#[derive(Tabled)]
struct OutcomeRow {
    #[tabled(rename = "repository")]
    label: String,
    #[tabled(rename = "update")]
    update: String,
    #[tabled(rename = "build")]
    build: String,
    #[tabled(rename = "detail")]
    detail: String,
}

pub fn print_json(summary: &RunSummary) -> Result<()> {
    let payload = SummaryJson {
        updated: summary.updated_count(),
        built: summary.built_count(),
        failed: summary.failure_count(),
        duration_secs: duration_secs(summary),
        run: summary,
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize run summary")?
    );
    Ok(())
}

pub fn print_table(summary: &RunSummary) {
    println!(
        "multibuild v{} | {} repositories | {} updated | {} built | {} failed | {}s",
        env!("CARGO_PKG_VERSION"),
        summary.outcomes.len() + summary.not_attempted.len(),
        summary.updated_count(),
        summary.built_count(),
        summary.failure_count(),
        duration_secs(summary),
    );

    if let Some(line) = cache_line(&summary.cache) {
        println!("{line}");
    }

    if !summary.outcomes.is_empty() {
        let rows: Vec<OutcomeRow> = summary.outcomes.iter().map(row).collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
    }

    if let Some(stopped) = &summary.stopped {
        let reason = match stopped {
            StopReason::Interrupted => "interrupted".to_string(),
            StopReason::FailurePolicy { label } => format!("{label} failed"),
        };
        let skipped: Vec<String> = summary.not_attempted.iter().map(|l| l.to_string()).collect();
        println!(
            "{} ({reason}); not attempted: {}",
            "Stopped early".yellow().bold(),
            if skipped.is_empty() {
                "none".to_string()
            } else {
                skipped.join(", ")
            }
        );
    }
}

fn row(outcome: &RepositoryOutcome) -> OutcomeRow {
    OutcomeRow {
        label: outcome.label.to_string(),
        update: update_label(outcome.update),
        build: build_label(outcome.build),
        detail: outcome
            .error
            .clone()
            .unwrap_or_else(|| outcome.path.display().to_string()),
    }
}

fn update_label(status: UpdateStatus) -> String {
    match status {
        UpdateStatus::Updated => "UPDATED".green().to_string(),
        UpdateStatus::UpToDate => "UP TO DATE".normal().to_string(),
        UpdateStatus::Skipped => "SKIPPED".bright_black().to_string(),
        UpdateStatus::Failed => "FAILED".red().bold().to_string(),
    }
}

fn build_label(status: BuildStatus) -> String {
    match status {
        BuildStatus::Built => "BUILT".green().to_string(),
        BuildStatus::NotNeeded => "NOT NEEDED".normal().to_string(),
        BuildStatus::Failed => "FAILED".red().bold().to_string(),
        BuildStatus::NotAttempted => "-".bright_black().to_string(),
    }
}

fn cache_line(cache: &CacheStatus) -> Option<String> {
    match cache {
        CacheStatus::NotRequested => None,
        CacheStatus::Cleaned { path } => Some(format!("Build cache deleted: {}", path.display())),
        CacheStatus::WouldClean { path } => {
            Some(format!("[dry-run] build cache kept: {}", path.display()))
        }
        CacheStatus::Failed { reason } => Some(format!("{} {reason}", "Build cache:".yellow())),
    }
}

fn duration_secs(summary: &RunSummary) -> i64 {
    (summary.finished_at - summary.started_at).num_seconds()
}
