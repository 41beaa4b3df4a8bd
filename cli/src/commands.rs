//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for conductor
#[derive(Parser, Debug)]
#[command(name = "conductor")]
#[command(author, version, about = "Safe, observable tool-calling runtime for coding agents")]
#[command(long_about = r#"
Conductor runs the tool calls a model asks for through a guarded pipeline:
safety pre-flight, permission check, per-tool circuit breaker, timeout,
secret redaction, result compaction and an audit trail.

Configuration files are loaded from (in priority order):
1. CONDUCTOR_<SECTION>__<KEY> environment variables
2. --config <path>     Explicit config file
3. ./conductor.toml    Project-level config
4. ~/.config/conductor/config.toml   Global config

Example:
  conductor check bash --args '{"command": "rm -rf build"}'
  conductor replay session.json --confirmed
  conductor config
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Also write logs to daily rotated files in this directory
    #[arg(long, value_name = "DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the safety pre-flight for one tool call without executing it
    Check {
        /// Tool name (e.g. bash, write, batch)
        tool: String,

        /// Call arguments as a JSON object
        #[arg(short, long, value_name = "JSON")]
        args: Option<String>,

        /// Treat destructive operations as confirmed
        #[arg(long)]
        confirmed: bool,
    },

    /// Replay a scripted model conversation against the built-in tools
    Replay {
        /// JSON script with the model's turns
        script: PathBuf,

        /// User message to open with (overrides the script's)
        #[arg(short, long)]
        message: Option<String>,

        /// Treat destructive operations as confirmed
        #[arg(long)]
        confirmed: bool,

        /// Directory relative tool paths resolve against
        #[arg(short = 'C', long, value_name = "DIR")]
        working_dir: Option<PathBuf>,

        /// Only print the final answer
        #[arg(short, long)]
        quiet: bool,
    },

    /// Show configuration file locations and the effective configuration
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_check() {
        let cli = Cli::parse_from([
            "conductor",
            "check",
            "bash",
            "--args",
            r#"{"command":"ls"}"#,
            "--confirmed",
        ]);
        match cli.command {
            Command::Check {
                tool,
                args,
                confirmed,
            } => {
                assert_eq!(tool, "bash");
                assert_eq!(args.as_deref(), Some(r#"{"command":"ls"}"#));
                assert!(confirmed);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["conductor", "replay", "s.json", "-vv", "--no-config"]);
        assert_eq!(cli.verbose, 2);
        assert!(cli.no_config);
        assert!(matches!(cli.command, Command::Replay { quiet: false, .. }));
    }
}
