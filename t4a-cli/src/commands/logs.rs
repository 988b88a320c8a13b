//! Logs command - inspect and prune the local event log
//!
//! The log only holds event names, row counts and error kinds, so everything
//! here is safe to paste into a bug report.

use anyhow::Result;
use chrono::{TimeZone, Utc};
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;

use super::get_app_dir;
use crate::output;
use t4a_core::services::logging::now_ms;
use t4a_core::services::{LogEntry, LoggingService};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

#[derive(Subcommand)]
pub enum LogsCommands {
    /// Show the latest events, newest first
    List {
        /// How many events to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
        /// Only failed commands
        #[arg(long)]
        errors: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete events older than a number of days
    Clear {
        #[arg(long, default_value = "30")]
        older_than_days: u64,
        /// Don't ask for confirmation
        #[arg(long, short = 'f')]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Import outcomes and event counts
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: LogsCommands) -> Result<()> {
    let service = LoggingService::new(&get_app_dir()?, env!("CARGO_PKG_VERSION"))?;

    match command {
        LogsCommands::List { limit, errors, json } => list(&service, limit, errors, json),
        LogsCommands::Clear {
            older_than_days,
            force,
            json,
        } => clear(&service, older_than_days, force, json),
        LogsCommands::Stats { json } => stats(&service, json),
    }
}

fn when(timestamp_ms: i64) -> String {
    Utc.timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp_ms.to_string())
}

/// What happened, in words: slip counts for imports, the error kind for failures
fn outcome(entry: &LogEntry) -> String {
    let rows = entry.row_count.unwrap_or(0);
    match (entry.event.as_str(), &entry.error_message) {
        (_, Some(kind)) => match &entry.error_details {
            Some(detail) => format!("{} ({})", kind, detail).red().to_string(),
            None => kind.red().to_string(),
        },
        ("import_committed", None) => format!("{} slips appended", rows).green().to_string(),
        ("import_rejected", None) => format!("{} rows failed validation", rows).yellow().to_string(),
        _ => String::new(),
    }
}

fn list(service: &LoggingService, limit: usize, errors: bool, json: bool) -> Result<()> {
    let entries = if errors {
        service.get_errors(limit)?
    } else {
        service.get_recent(limit)?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }
    if entries.is_empty() {
        println!("Event log is empty.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["When (UTC)", "Command", "Event", "Outcome"]);
    for entry in &entries {
        table.add_row(vec![
            when(entry.timestamp),
            entry.command.clone().unwrap_or_else(|| "-".to_string()),
            entry.event.clone(),
            outcome(entry),
        ]);
    }
    println!("{}", table);
    Ok(())
}

fn clear(service: &LoggingService, older_than_days: u64, force: bool, json: bool) -> Result<()> {
    let cutoff = now_ms() - older_than_days as i64 * DAY_MS;

    if !force
        && !json
        && !Confirm::new()
            .with_prompt(format!(
                "Remove events recorded before {}?",
                when(cutoff)
            ))
            .default(false)
            .interact()?
    {
        println!("Nothing removed.");
        return Ok(());
    }

    let removed = service.delete_before(cutoff)?;
    if json {
        println!("{}", serde_json::json!({ "removed": removed }));
    } else {
        output::success(&format!("Removed {} events", removed));
    }
    Ok(())
}

fn stats(service: &LoggingService, json: bool) -> Result<()> {
    let totals = service.event_totals()?;
    let db_path = service.db_path();
    let size_bytes = std::fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let total_for = |event: &str| {
        totals
            .iter()
            .find(|t| t.event == event)
            .map(|t| (t.occurrences, t.rows))
            .unwrap_or((0, 0))
    };
    let (committed_runs, committed_slips) = total_for("import_committed");
    let (rejected_runs, _) = total_for("import_rejected");
    let (failed_runs, _) = total_for("import_failed");

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "events": totals,
                "imports": {
                    "committed": committed_runs,
                    "slipsAppended": committed_slips,
                    "rejected": rejected_runs,
                    "failed": failed_runs,
                },
                "databasePath": db_path.to_string_lossy(),
                "databaseSizeBytes": size_bytes,
            }))?
        );
        return Ok(());
    }

    println!("{}", "Imports".bold());
    println!("  Committed: {} ({} slips)", committed_runs, committed_slips);
    println!("  Rejected by validation: {}", rejected_runs);
    println!("  Failed: {}", failed_runs);
    println!();

    if !totals.is_empty() {
        let mut table = output::create_table();
        table.set_header(vec!["Event", "Count", "Rows"]);
        for total in &totals {
            table.add_row(vec![
                total.event.clone(),
                total.occurrences.to_string(),
                total.rows.to_string(),
            ]);
        }
        println!("{}", table);
        println!();
    }

    output::info(&format!("{} ({} bytes)", db_path.display(), size_bytes));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(event: &str, rows: Option<u64>, error: Option<&str>) -> LogEntry {
        LogEntry {
            id: 1,
            timestamp: 0,
            app_version: "0.1.0".to_string(),
            platform: "linux".to_string(),
            event: event.to_string(),
            command: Some("import".to_string()),
            row_count: rows,
            error_message: error.map(str::to_string),
            error_details: None,
        }
    }

    #[test]
    fn test_outcome_wording() {
        assert!(outcome(&entry("import_committed", Some(4), None)).contains("4 slips appended"));
        assert!(outcome(&entry("import_rejected", Some(2), None)).contains("2 rows failed"));
        assert!(outcome(&entry("import_failed", None, Some("MalformedFile"))).contains("MalformedFile"));
        assert_eq!(outcome(&entry("command_executed", None, None)), "");
    }

    #[test]
    fn test_when_formats_utc() {
        assert_eq!(when(0), "1970-01-01 00:00:00");
    }
}
