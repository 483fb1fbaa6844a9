//! CLI parser.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "rhea")]
#[command(about = "Character chat with a local model: chat, profiles, config", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory holding config.json and profiles.json (overrides RHEA_DATA_DIR).
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
    /// Ollama base URL (overrides OLLAMA_BASE_URL).
    #[arg(long, global = true)]
    pub ollama_url: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start an interactive chat in the terminal.
    Chat {
        /// Role key of the profile you speak as.
        #[arg(short, long, default_value = "user")]
        user: String,
        /// Role key of the profile the model plays.
        #[arg(short, long, default_value = "assistant")]
        assistant: String,
    },
    /// Show or change conversation settings.
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Manage character profiles.
    Profiles {
        #[command(subcommand)]
        command: ProfilesCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the current settings.
    Show,
    /// Change one or more settings; each value is validated before anything is saved.
    Set(ConfigSetArgs),
}

#[derive(Args, Debug, Default)]
pub struct ConfigSetArgs {
    #[arg(long)]
    pub model_name: Option<String>,
    #[arg(long)]
    pub context_limit: Option<usize>,
    #[arg(long)]
    pub refresh_rate: Option<u32>,
    #[arg(long)]
    pub max_width: Option<u32>,
}

#[derive(Subcommand, Debug)]
pub enum ProfilesCommand {
    /// List every profile by role.
    List,
    /// Create or replace the profile for a role.
    Add(ProfileArgs),
    /// Delete the profile for a role.
    Remove {
        role: String,
    },
}

#[derive(Args, Debug)]
pub struct ProfileArgs {
    pub role: String,
    #[arg(long)]
    pub name: String,
    /// Comma-separated, order preserved.
    #[arg(long, value_delimiter = ',')]
    pub traits: Vec<String>,
    #[arg(long, default_value = "")]
    pub backstory: String,
    #[arg(long, default_value = "")]
    pub goals: String,
    #[arg(long, default_value = "")]
    pub personality: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_defaults() {
        let cli = Cli::try_parse_from(["rhea", "chat"]).unwrap();
        match cli.command {
            Commands::Chat { user, assistant } => {
                assert_eq!(user, "user");
                assert_eq!(assistant, "assistant");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_profile_add_splits_traits() {
        let cli = Cli::try_parse_from([
            "rhea", "profiles", "add", "rhea", "--name", "Rhea", "--traits", "witty, curious",
            "--data-dir", "/tmp/r",
        ])
        .unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/r")));
        match cli.command {
            Commands::Profiles {
                command: ProfilesCommand::Add(args),
            } => {
                assert_eq!(args.role, "rhea");
                assert_eq!(args.traits, vec!["witty", " curious"]);
                assert_eq!(args.backstory, "");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_config_set_parses_numbers() {
        let cli =
            Cli::try_parse_from(["rhea", "config", "set", "--context-limit", "8000"]).unwrap();
        match cli.command {
            Commands::Config {
                command: ConfigCommand::Set(args),
            } => assert_eq!(args.context_limit, Some(8000)),
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(Cli::try_parse_from(["rhea", "config", "set", "--context-limit", "-1"]).is_err());
    }
}
