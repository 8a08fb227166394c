//! Command-line front end for the recurrence engine.

use std::io::Read;

use anyhow::{Context, Result, bail};
use cadence_core::config::EngineConfig;
use cadence_rfc::rfc::ical::build::serialize;
use cadence_rfc::{Occurrences, RuleSet, Window, Zone, all_occurrences, occurrences_in, parse};
use chrono::DateTime;
use clap::{Parser, Subcommand};
use serde::Serialize;

/// Expand RFC 5545 recurrence rules.
///
/// Rule-set text is read from the argument, or from stdin when it is absent
/// or `-`. A literal `\n` in the argument separates lines.
#[derive(Debug, Parser)]
#[command(name = "cadence", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List occurrences from the start of the set
    Expand {
        input: Option<String>,
        /// Maximum number of occurrences, defaults to the configured limit
        #[arg(short, long)]
        limit: Option<u16>,
        /// Fail instead of applying the configured limit to unbounded sets
        #[arg(long)]
        strict: bool,
    },
    /// List occurrences inside a time window
    Between {
        input: Option<String>,
        /// Lower bound, RFC 3339
        #[arg(long)]
        after: String,
        /// Upper bound, RFC 3339
        #[arg(long)]
        before: String,
        #[arg(short, long)]
        limit: Option<u16>,
        /// Leave occurrences on either bound out
        #[arg(long)]
        exclusive: bool,
    },
    /// Validate a rule set and print it in canonical form
    Check { input: Option<String> },
}

#[derive(Debug, Serialize)]
struct Report {
    zone: String,
    occurrences: Vec<String>,
    limited: bool,
}

/// Rule-set text from the argument or, failing that, from stdin.
///
/// ## Errors
/// Returns an error if stdin cannot be read.
pub fn read_input(arg: Option<&str>) -> Result<String> {
    match arg {
        Some(text) if text != "-" => Ok(text.replace("\\n", "\n")),
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read rule set from stdin")?;
            Ok(text)
        }
    }
}

/// Occurrence as RFC 3339, or as bare wall-clock time for floating sets.
#[must_use]
pub fn format_occurrence(instant: &DateTime<Zone>) -> String {
    if instant.timezone().is_floating() {
        instant.naive_local().format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        instant.to_rfc3339()
    }
}

fn parse_bound(set: &RuleSet, name: &str, value: &str) -> Result<DateTime<Zone>> {
    let bound = DateTime::parse_from_rfc3339(value)
        .with_context(|| format!("--{name} is not an RFC 3339 timestamp: {value}"))?;
    Ok(bound.with_timezone(&set.zone()))
}

fn render(set: &RuleSet, found: &Occurrences, json: bool) -> Result<String> {
    let occurrences: Vec<String> = found.dates.iter().map(format_occurrence).collect();
    if json {
        let report = Report {
            zone: set.zone().to_string(),
            occurrences,
            limited: found.limited,
        };
        return Ok(serde_json::to_string_pretty(&report)?);
    }
    Ok(occurrences.join("\n"))
}

/// ## Summary
/// Runs one command against already-read rule-set text.
///
/// ## Errors
/// Returns an error if the text does not parse, a bound is malformed, or a
/// strict expansion of an unbounded set is requested.
pub fn run(cli: &Cli, engine: &EngineConfig, text: &str) -> Result<String> {
    let set = parse(text)?;

    match &cli.command {
        Command::Expand { limit, strict, .. } => {
            let limit = match (limit, strict) {
                (Some(limit), _) => Some(*limit),
                (None, true) => None,
                (None, false) => Some(engine.default_limit),
            };
            let found = all_occurrences(&set, limit)?;
            if found.limited {
                tracing::info!(count = found.dates.len(), "Output truncated");
            }
            render(&set, &found, cli.json)
        }
        Command::Between {
            after,
            before,
            limit,
            exclusive,
            ..
        } => {
            let after = parse_bound(&set, "after", after)?;
            let before = parse_bound(&set, "before", before)?;
            if after > before {
                bail!("--after must not be later than --before");
            }
            let inclusive = engine.inclusive && !exclusive;
            let window = Window::between(after, before, inclusive);
            let found = occurrences_in(&set, &window, limit.or(Some(engine.default_limit)))?;
            render(&set, &found, cli.json)
        }
        Command::Check { .. } => Ok(serialize(&set)),
    }
}

impl Command {
    /// The rule-set argument, if one was given.
    #[must_use]
    pub fn input(&self) -> Option<&str> {
        match self {
            Self::Expand { input, .. } | Self::Between { input, .. } | Self::Check { input } => {
                input.as_deref()
            }
        }
    }
}
