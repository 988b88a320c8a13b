//! Import command - build T4A slips from a CSV file

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use clap::Args;
use colored::Colorize;
use dialoguer::Confirm;

use super::{get_context, get_logger, load_slips, log_event, save_slips};
use crate::output;
use t4a_core::services::{ColumnMapping, ImportOutcome, LogEvent, LoggingService};
use t4a_core::{Error, SlipDraft};

#[derive(Args)]
pub struct ImportArgs {
    /// Path to CSV file
    pub file: Option<PathBuf>,
    /// Payer's account number (BN) stamped onto every slip
    #[arg(long, env = "T4A_PAYER_BN")]
    pub payer_bn: Option<String>,
    /// Override a column mapping, e.g. "Emp Last=recipientName.snm" (empty path unmaps)
    #[arg(long = "map", value_name = "HEADER=PATH")]
    pub map: Vec<String>,
    /// Use saved import profile
    #[arg(long)]
    pub profile: Option<String>,
    /// Save the final mapping as a profile
    #[arg(long)]
    pub save_profile: Option<String>,
    /// List saved profiles
    #[arg(long)]
    pub list_profiles: bool,
    /// Slip collection to append to
    #[arg(long, short, default_value = "slips.json")]
    pub output: PathBuf,
    /// Show mapping, slips and validation without writing anything
    #[arg(long)]
    pub preview: bool,
    /// Skip confirmation prompt
    #[arg(long, short)]
    pub yes: bool,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Parse repeated `Header=path` arguments
fn parse_overrides(raw: &[String]) -> Result<BTreeMap<String, String>> {
    raw.iter()
        .map(|entry| {
            let (header, path) = entry
                .split_once('=')
                .ok_or_else(|| anyhow!("Invalid --map value '{}', expected HEADER=PATH", entry))?;
            Ok((header.to_string(), path.trim().to_string()))
        })
        .collect()
}

/// Error kind for the event log, plus the offending field path when there is one
///
/// Never the message, which may quote file content.
fn error_kind(err: &anyhow::Error) -> (&'static str, Option<&str>) {
    match err.downcast_ref::<Error>() {
        Some(Error::MalformedFile(_)) => ("MalformedFile", None),
        Some(Error::Csv(_)) => ("Csv", None),
        Some(Error::Io(_)) => ("Io", None),
        Some(Error::UnknownField(path)) => ("UnknownField", Some(path.as_str())),
        Some(Error::UnknownColumn(_)) => ("UnknownColumn", None),
        Some(_) => ("Core", None),
        None => ("Other", None),
    }
}

pub fn run(args: ImportArgs) -> Result<()> {
    let logger = get_logger();
    let result = import(&args, &logger);
    if let (Err(e), Some(l)) = (&result, &logger) {
        let (kind, details) = error_kind(e);
        let _ = l.log_error("import", kind, details);
    }
    result
}

fn import(args: &ImportArgs, logger: &Option<LoggingService>) -> Result<()> {
    let ctx = get_context()?;

    if args.list_profiles {
        let profiles = ctx.import_service.list_profiles()?;

        if args.json {
            println!("{}", serde_json::to_string_pretty(&profiles)?);
        } else if profiles.is_empty() {
            println!("No saved profiles.");
        } else {
            println!("Saved import profiles:");
            for (name, profile) in &profiles {
                println!();
                match &profile.description {
                    Some(desc) => println!("  {} - {}", name.green(), desc),
                    None => println!("  {}", name.green()),
                }
                for (header, path) in &profile.column_mappings {
                    println!("    {} -> {}", header, path);
                }
            }
        }
        return Ok(());
    }

    let file_path = args
        .file
        .as_ref()
        .ok_or_else(|| anyhow!("File path required for import"))?;
    let payer_bn = ctx.payer_bn(args.payer_bn.as_deref());

    let mut session = ctx.import_service.open(file_path, &payer_bn)?;

    if let Some(profile_name) = &args.profile {
        let profile = ctx
            .import_service
            .get_profile(profile_name)?
            .ok_or_else(|| anyhow!("Profile not found: {}", profile_name))?;
        session.apply_profile(&profile)?;
        if !args.json {
            println!("Using profile '{}'", profile_name);
        }
    }

    let overrides = parse_overrides(&args.map)?;
    if !overrides.is_empty() {
        session.apply_overrides(&overrides)?;
    }

    if let Some(profile_name) = &args.save_profile {
        ctx.import_service.save_profile(profile_name, &session, None)?;
        if !args.json {
            println!("Profile '{}' saved", profile_name);
        }
    }

    if !args.json {
        print_mapping(session.mapping());
    }

    session.proceed()?;
    let errors = session.validate();

    if args.preview {
        if args.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "preview": true,
                    "mapping": session.mapping(),
                    "slips": session.slips(),
                    "errors": errors,
                }))?
            );
            return Ok(());
        }
        println!("{}", "PREVIEW MODE - No changes applied".yellow());
        println!();
        print_slips(session.slips());
        if errors.is_empty() {
            output::success(&format!("All {} rows are valid", session.slips().len()));
        } else {
            print_errors(&errors);
        }
        return Ok(());
    }

    if !errors.is_empty() {
        return reject(logger, &errors, session.slips().len(), args.json);
    }

    if !args.json {
        print_slips(session.slips());
    }

    let interactive = atty::is(atty::Stream::Stdin) && !args.json;
    if !args.yes
        && interactive
        && !Confirm::new()
            .with_prompt(format!(
                "Append {} slips to {}?",
                session.slips().len(),
                args.output.display()
            ))
            .default(true)
            .interact()?
    {
        session.cancel();
        println!("Cancelled.");
        return Ok(());
    }

    let mut collection = load_slips(&args.output)?;
    match session.commit(&mut collection)? {
        ImportOutcome::Committed(count) => {
            save_slips(&args.output, &collection)?;
            log_event(
                logger,
                LogEvent::new("import_committed")
                    .with_command("import")
                    .with_rows(count),
            );

            if args.json {
                println!(
                    "{}",
                    serde_json::json!({
                        "committed": count,
                        "total": collection.len(),
                        "output": args.output.to_string_lossy(),
                    })
                );
            } else {
                output::success("Import complete");
                println!();
                println!("  Imported: {}", count);
                println!("  Total slips: {}", collection.len());
                println!("  Saved to: {}", args.output.display());
            }
            Ok(())
        }
        ImportOutcome::Rejected(errors) => {
            let rows = session.slips().len();
            reject(logger, &errors, rows, args.json)
        }
    }
}

fn reject(
    logger: &Option<LoggingService>,
    errors: &BTreeMap<usize, Vec<String>>,
    rows: usize,
    json: bool,
) -> Result<()> {
    log_event(
        logger,
        LogEvent::new("import_rejected")
            .with_command("import")
            .with_rows(errors.len()),
    );

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "committed": 0,
                "errors": errors,
            }))?
        );
    } else {
        print_errors(errors);
    }
    bail!("{} of {} rows failed validation; nothing was imported", errors.len(), rows)
}

fn print_mapping(mapping: &ColumnMapping) {
    println!("{}", "Column mapping:".cyan());
    let mut table = output::create_table();
    table.set_header(vec!["Column", "Field", "Title"]);
    for column in mapping.columns() {
        match column.field {
            Some(field) => table.add_row(vec![
                column.header.clone(),
                field.path().to_string(),
                field.title().to_string(),
            ]),
            None => table.add_row(vec![
                column.header.clone(),
                "-".dimmed().to_string(),
                "(not imported)".dimmed().to_string(),
            ]),
        };
    }
    println!("{}", table);
    println!();
}

fn print_slips(slips: &[SlipDraft]) {
    let mut table = output::create_table();
    table.set_header(vec!["Row", "Type", "Recipient", "City", "Province"]);

    for (index, slip) in slips.iter().enumerate().take(10) {
        table.add_row(vec![
            (index + 1).to_string(),
            slip.recipient_type.as_str().to_string(),
            slip.display_name(),
            slip.recipient_address.cty_nm.clone(),
            slip.recipient_address.prov_cd.clone(),
        ]);
    }

    println!("{}", table);
    if slips.len() > 10 {
        println!("... and {} more", slips.len() - 10);
    }
    println!();
}

fn print_errors(errors: &BTreeMap<usize, Vec<String>>) {
    output::error(&format!("{} rows have errors:", errors.len()));
    for (index, messages) in errors {
        eprintln!("  {}", format!("Row {}", index + 1).bold());
        for message in messages {
            eprintln!("    {}", message);
        }
    }
}
