//! CLI command definitions for the `sakai` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod chat;
pub mod prompt;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use sakai_types::chat::ChatRequest;
use sakai_types::persona::Personality;

/// Sakai, a French-speaking AI assistant.
#[derive(Parser)]
#[command(name = "sakai", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON (logs and `prompt` output).
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans to stdout through OpenTelemetry.
    #[arg(long, global = true, env = "SAKAI_OTEL")]
    pub otel: bool,

    /// Model identifier, overriding config.toml.
    #[arg(long, global = true, env = "SAKAI_MODEL")]
    pub model: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shaping the system instruction.
#[derive(Debug, Clone, Default, Args)]
pub struct PromptArgs {
    /// Personality preset.
    #[arg(long, short)]
    pub personality: Option<Personality>,

    /// Facts about you, appended to the instruction.
    #[arg(long, short)]
    pub memory: Option<String>,

    /// Replace the base persona entirely (developer mode).
    #[arg(long)]
    pub system: Option<String>,
}

impl PromptArgs {
    /// A request carrying these options and no history.
    pub fn to_request(&self, temperature: Option<f64>) -> ChatRequest {
        ChatRequest {
            history: Vec::new(),
            memory: self.memory.clone(),
            override_system_prompt: self.system.clone(),
            temperature,
            personality: self.personality.map(|p| p.tag().to_string()),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Chat with Sakai in the terminal.
    Chat {
        #[command(flatten)]
        prompt: PromptArgs,

        /// Sampling temperature (defaults to config.toml).
        #[arg(long, short)]
        temperature: Option<f64>,

        /// Send a single message, print the reply and exit.
        #[arg(long)]
        once: Option<String>,
    },

    /// Start the SSE API server.
    Serve {
        /// Port to listen on (defaults to config.toml).
        #[arg(long)]
        port: Option<u16>,

        /// Host to bind to (defaults to config.toml).
        #[arg(long)]
        host: Option<String>,
    },

    /// Print the system instruction a chat request would send.
    Prompt {
        #[command(flatten)]
        prompt: PromptArgs,

        /// Date to compose for (YYYY-MM-DD); today when omitted.
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
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
    fn test_parse_chat_options() {
        let cli = Cli::parse_from([
            "sakai",
            "chat",
            "--personality",
            "concise",
            "--memory",
            "Habite à Lyon",
            "-t",
            "0.2",
            "--once",
            "Salut",
        ]);
        match cli.command {
            Commands::Chat {
                prompt,
                temperature,
                once,
            } => {
                let request = prompt.to_request(temperature);
                assert_eq!(request.personality.as_deref(), Some("concise"));
                assert_eq!(request.memory.as_deref(), Some("Habite à Lyon"));
                assert_eq!(request.temperature, Some(0.2));
                assert!(request.history.is_empty());
                assert_eq!(once.as_deref(), Some("Salut"));
            }
            _ => panic!("expected chat"),
        }
    }

    #[test]
    fn test_unknown_personality_is_rejected() {
        assert!(Cli::try_parse_from(["sakai", "chat", "--personality", "pirate"]).is_err());
    }

    #[test]
    fn test_parse_prompt_date() {
        let cli = Cli::parse_from(["sakai", "prompt", "--date", "2026-10-19"]);
        match cli.command {
            Commands::Prompt { date, .. } => {
                assert_eq!(date, NaiveDate::from_ymd_opt(2026, 10, 19));
            }
            _ => panic!("expected prompt"),
        }
    }
}
