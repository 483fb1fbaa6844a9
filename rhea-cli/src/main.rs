//! rhea CLI: terminal chat, profile and config management. Config from env and optional CLI args.

use std::sync::Arc;

use anyhow::{Context, Result};
use chat_runtime::ChatService;
use clap::Parser;
use llm_client::OllamaLlmClient;
use prompt::Profile;
use rhea_cli::cli::{ConfigSetArgs, ProfileArgs};
use rhea_cli::{repl, Cli, Commands, ConfigCommand, ProfilesCommand};
use rhea_core::{init_tracing, AppConfig};
use storage::{ConfigUpdate, DataDir};

/// Terminal chats share one session id; each process is a single conversation.
const TERMINAL_SESSION_ID: &str = "terminal";

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = AppConfig::from_env()
        .with_data_dir(cli.data_dir)
        .with_ollama_base_url(cli.ollama_url);
    config.validate()?;
    init_tracing(&config.log_file, false)?;

    let data_dir = DataDir::open(&config.data_dir)
        .await
        .context("Failed to open data directory")?;
    let llm = Arc::new(OllamaLlmClient::with_base_url(&config.ollama_base_url));
    let service = Arc::new(ChatService::open(llm, data_dir).await);

    match cli.command {
        Commands::Chat { user, assistant } => handle_chat(service, &user, &assistant).await,
        Commands::Config { command } => handle_config(&service, command).await,
        Commands::Profiles { command } => handle_profiles(&service, command).await,
    }
}

async fn handle_chat(service: Arc<ChatService>, user: &str, assistant: &str) -> Result<()> {
    let current = service
        .select_characters(TERMINAL_SESSION_ID, user, assistant)
        .await;
    if current.assistant.is_none() {
        println!(
            "No profile for role '{}'; chatting in basic assistant mode.",
            assistant
        );
    }
    let max_width = service.config().await.max_width as usize;
    repl::run(service, TERMINAL_SESSION_ID, max_width).await
}

async fn handle_config(service: &ChatService, command: ConfigCommand) -> Result<()> {
    let config = match command {
        ConfigCommand::Show => service.config().await,
        ConfigCommand::Set(args) => {
            let update = config_update(args);
            if update.is_empty() {
                anyhow::bail!("Nothing to change; pass at least one --<setting>");
            }
            service.update_config(&update).await?
        }
    };
    println!("model_name:    {}", config.model_name);
    println!("context_limit: {}", config.context_limit);
    println!("refresh_rate:  {}", config.refresh_rate);
    println!("max_width:     {}", config.max_width);
    Ok(())
}

fn config_update(args: ConfigSetArgs) -> ConfigUpdate {
    ConfigUpdate {
        model_name: args.model_name,
        context_limit: args.context_limit,
        refresh_rate: args.refresh_rate,
        max_width: args.max_width,
    }
}

async fn handle_profiles(service: &ChatService, command: ProfilesCommand) -> Result<()> {
    match command {
        ProfilesCommand::List => {
            let store = service.profiles().await;
            if store.is_empty() {
                println!("No profiles.");
            }
            for (role, profile) in store.iter() {
                println!("{} -> {} [{}]", role, profile.name, profile.traits_line());
                if !profile.personality.is_empty() {
                    println!("    {}", profile.personality);
                }
            }
        }
        ProfilesCommand::Add(args) => {
            let role = args.role.clone();
            service.save_profile(&role, profile_from(args)).await?;
            println!("Profile added for {}", role);
        }
        ProfilesCommand::Remove { role } => {
            service.remove_profile(&role).await?;
            println!("Profile deleted for {}", role);
        }
    }
    Ok(())
}

fn profile_from(args: ProfileArgs) -> Profile {
    Profile::new(args.name)
        .with_traits(
            args.traits
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
        )
        .with_backstory(args.backstory)
        .with_goals(args.goals)
        .with_personality(args.personality)
}
