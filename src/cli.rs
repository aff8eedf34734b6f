//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{DEFAULT_SERVICE_URL, DEFAULT_STRATEGY};

/// Top-level CLI parser for `taskrank`.
#[derive(Debug, Parser)]
#[command(
    name = "taskrank",
    version,
    about = "Collect tasks and rank them with a prioritization service"
)]
pub struct Cli {
    /// Base URL of the prioritization service.
    #[arg(long, global = true, env = "TASKRANK_URL", default_value = DEFAULT_SERVICE_URL)]
    pub url: String,

    /// Record service interactions to this cassette file.
    #[arg(long, global = true, env = "TASKRANK_RECORD", value_name = "PATH")]
    pub record: Option<PathBuf>,

    /// Serve service interactions from this cassette file instead of the network.
    #[arg(
        long,
        global = true,
        env = "TASKRANK_REPLAY",
        value_name = "PATH",
        conflicts_with = "record"
    )]
    pub replay: Option<PathBuf>,

    /// Log debug output to stderr.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Task sources shared by `analyze` and `suggest`.
#[derive(Debug, Clone, Args)]
pub struct BatchArgs {
    /// File holding a JSON array of tasks; `-` reads stdin.
    #[arg(long, value_name = "PATH")]
    pub bulk: Option<PathBuf>,

    /// Add a task, as `title;due=YYYY-MM-DD;hours=N;importance=N;deps=a,b`.
    #[arg(long = "task", value_name = "FORM")]
    pub tasks: Vec<String>,

    /// Scoring strategy passed to the service.
    #[arg(long, env = "TASKRANK_STRATEGY", default_value = DEFAULT_STRATEGY)]
    pub strategy: String,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Rank the given tasks and print the results.
    Analyze(BatchArgs),
    /// Print the service's top suggestions for the given tasks.
    Suggest(BatchArgs),
    /// Add tasks and run analyses interactively.
    Session {
        /// Scoring strategy to start with.
        #[arg(long, env = "TASKRANK_STRATEGY", default_value = DEFAULT_STRATEGY)]
        strategy: String,
    },
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;

    #[test]
    fn parses_analyze_with_tasks() {
        let cli = Cli::parse_from([
            "taskrank",
            "analyze",
            "--task",
            "A;hours=2",
            "--task",
            "B",
            "--strategy",
            "deadline",
        ]);
        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.tasks, vec!["A;hours=2", "B"]);
        assert_eq!(args.strategy, "deadline");
        assert!(args.bulk.is_none());
    }

    #[test]
    fn parses_global_url_after_subcommand() {
        let cli = Cli::parse_from(["taskrank", "suggest", "--url", "http://svc:9000/api/tasks/"]);
        assert_eq!(cli.url, "http://svc:9000/api/tasks/");
        assert!(matches!(cli.command, Command::Suggest(_)));
    }

    #[test]
    fn parses_session_subcommand() {
        let cli = Cli::parse_from(["taskrank", "session"]);
        assert!(matches!(cli.command, Command::Session { .. }));
    }

    #[test]
    fn record_and_replay_conflict() {
        let result = Cli::try_parse_from([
            "taskrank", "analyze", "--record", "a.yaml", "--replay", "b.yaml",
        ]);
        assert!(result.is_err());
    }
}
