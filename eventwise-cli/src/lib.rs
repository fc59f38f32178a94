//! Command-line interface for browsing and personalising campus events.
//!
//! Every subcommand prints one JSON document on stdout. Options layer in the
//! order CLI flags, `EVENTWISE_CMDS_<COMMAND>_<OPTION>` environment variables,
//! then configuration files.
#![forbid(unsafe_code)]

use std::io::Write;

use clap::{Parser, Subcommand};

mod error;
mod interact;
mod output;
mod recommend;
mod search;
mod session;

pub use error::CliError;

use interact::{
    AttendArgs, FeedbackArgs, Interaction, RateArgs, RegisterArgs, StarsAction, run_mark_with,
    run_stars_with,
};
use recommend::{RecommendArgs, SimilarArgs, run_recommend_with, run_similar_with};
use search::{CategoriesArgs, SearchArgs, run_categories_with, run_search_with};
use session::{DefaultSessionBuilder, SessionBuilder};

const ARG_API_KEY: &str = "api-key";
const ARG_BACKEND_URL: &str = "backend-url";
const ARG_CATALOG: &str = "catalog";
const ARG_CATEGORY: &str = "category";
const ARG_DATE_RANGE: &str = "date-range";
const ARG_EVENT: &str = "event";
const ARG_LIMIT: &str = "limit";
const ARG_QUERY: &str = "query";
const ARG_RECENCY: &str = "recency";
const ARG_SORT: &str = "sort";
const ARG_STARS: &str = "stars";
const ARG_STATE_DIR: &str = "state-dir";
const ARG_STORE: &str = "store";
const ARG_TODAY: &str = "today";

/// Run the Eventwise CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    run_command(cli.command, &DefaultSessionBuilder, &mut stdout)
}

fn run_command(
    command: Command,
    builder: &dyn SessionBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    match command {
        Command::Recommend(args) => run_recommend_with(args, builder, writer),
        Command::Similar(args) => run_similar_with(args, builder, writer),
        Command::Search(args) => run_search_with(args, builder, writer),
        Command::Categories(args) => run_categories_with(args, builder, writer),
        Command::Register(args) => {
            run_mark_with(args.into_options()?, Interaction::Register, builder, writer)
        }
        Command::Attend(args) => {
            run_mark_with(args.into_options()?, Interaction::Attend, builder, writer)
        }
        Command::Rate(args) => {
            run_stars_with(args.into_options()?, StarsAction::Rate, builder, writer)
        }
        Command::Feedback(args) => {
            run_stars_with(args.into_options()?, StarsAction::Feedback, builder, writer)
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "eventwise",
    about = "Personalised recommendations for campus events",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Rank the catalog against the stored preference history.
    Recommend(RecommendArgs),
    /// List events resembling a given event.
    Similar(SimilarArgs),
    /// Filter and sort the catalog.
    Search(SearchArgs),
    /// List event categories.
    Categories(CategoriesArgs),
    /// Register for an event.
    Register(RegisterArgs),
    /// Mark an event as attended.
    Attend(AttendArgs),
    /// Rate an event from 1 to 5 stars.
    Rate(RateArgs),
    /// Give feedback on an event from 1 to 5 stars.
    Feedback(FeedbackArgs),
}

#[cfg(test)]
mod tests;
