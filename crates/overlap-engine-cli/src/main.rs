use std::fs;
use std::io::{self, Read};

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use overlap_engine::{
    compute_for_team, supported_timezones, OverlapOptions, ReferenceWeek, StaticRoster,
    TeamSelector, TotalOverlapMode, DEFAULT_BEST_MEETING_LIMIT,
};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "team-overlap", author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute the recurring weekly overlap for a team
    Compute {
        /// Roster JSON file ("-" reads stdin)
        #[arg(long)]
        roster: String,

        #[command(flatten)]
        team: TeamArgs,

        /// Any date inside the reference week (defaults to today, UTC)
        #[arg(long)]
        week_of: Option<NaiveDate>,

        /// Number of best meeting times to return
        #[arg(long, default_value_t = DEFAULT_BEST_MEETING_LIMIT)]
        top: usize,

        /// Count any overlap of two or more members towards the weekly total
        #[arg(long, action, default_value = "false")]
        any_pair: bool,

        /// Indent the JSON output
        #[arg(long, action, default_value = "false")]
        pretty: bool,
    },
    /// List the timezones offered to pickers
    Timezones {
        /// Date the offsets are resolved at (defaults to today, UTC)
        #[arg(long)]
        week_of: Option<NaiveDate>,

        /// Indent the JSON output
        #[arg(long, action, default_value = "false")]
        pretty: bool,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct TeamArgs {
    /// Resolve the team from a project in the roster
    #[arg(long)]
    project: Option<String>,

    /// Comma-separated user ids forming an ad-hoc team
    #[arg(long, value_delimiter = ',')]
    users: Option<Vec<String>>,
}

impl TeamArgs {
    fn selector(self) -> TeamSelector {
        match (self.project, self.users) {
            (Some(project_id), _) => TeamSelector::Project { project_id },
            (None, user_ids) => TeamSelector::Users {
                user_ids: user_ids.unwrap_or_default(),
            },
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Compute {
            roster,
            team,
            week_of,
            top,
            any_pair,
            pretty,
        } => {
            let roster = load_roster(&roster)?;
            let mode = if any_pair {
                TotalOverlapMode::AnyPair
            } else {
                TotalOverlapMode::FullTeam
            };
            let week = ReferenceWeek::containing(anchor_date(week_of))
                .context("Failed to resolve the reference week")?;
            let options = OverlapOptions::new(week)
                .with_best_meeting_limit(top)
                .with_total_overlap_mode(mode);
            let selector = team.selector();

            tracing::info!(
                ?selector,
                week = %week.start_date(),
                "computing team overlap"
            );
            let result = compute_for_team(&roster, &selector, &options)
                .context("Failed to compute team overlap")?;
            print_json(&result, pretty)
        }
        Command::Timezones { week_of, pretty } => {
            print_json(&supported_timezones(anchor_date(week_of)), pretty)
        }
    }
}

/// The reference-week clock: an explicit date, or today in UTC.
fn anchor_date(week_of: Option<NaiveDate>) -> NaiveDate {
    week_of.unwrap_or_else(|| Utc::now().date_naive())
}

fn load_roster(path: &str) -> Result<StaticRoster> {
    let raw = if path == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read roster from stdin")?;
        buf
    } else {
        fs::read_to_string(path).with_context(|| format!("Failed to read roster file '{path}'"))?
    };

    serde_json::from_str(&raw).context("Failed to parse roster JSON")
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let output = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{output}");
    Ok(())
}
