use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod commands;

use commands::{CandidatesArgs, PlayersArgs, SquadArgs};

#[derive(Parser)]
#[command(name = "sqb")]
#[command(about = "Squad builder client", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Layered config paths in merge order (base -> local ...)
    #[arg(long = "config", global = true)]
    pub config_paths: Vec<PathBuf>,

    /// Backend base URL; overrides config and SQB_API_BASE_URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Browse all players
    Players(PlayersArgs),

    /// List nationalities
    Nationalities,

    /// List teams
    Teams,

    /// List competitions
    Competitions,

    /// Search the candidate pool for a squad's limits
    Candidates(CandidatesArgs),

    /// Create a user
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Verify credentials and print the user id
    Login {
        /// Falls back to /auth/username in config
        #[arg(long)]
        username: Option<String>,

        /// Falls back to the env var named by /auth/password_env
        #[arg(long)]
        password: Option<String>,
    },

    /// List a user's squads
    Squads {
        #[arg(long)]
        user_id: i64,
    },

    /// Squad planning and saving
    Squad {
        #[command(subcommand)]
        cmd: SquadCmd,
    },
}

#[derive(Subcommand)]
enum SquadCmd {
    /// Print the calls a save would issue, without writing
    Plan(SquadArgs),

    /// Run one save cycle
    Save {
        #[command(flatten)]
        args: SquadArgs,

        /// Name for a new squad; read from stdin when omitted
        #[arg(long)]
        name: Option<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env.local if present (dev convenience).
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let cli = Cli::parse();
    let g = &cli.global;

    match cli.cmd {
        Commands::ConfigHash { paths } => commands::config_hash(&paths)?,
        Commands::Players(args) => commands::players(g, args).await?,
        Commands::Nationalities => commands::nationalities(g).await?,
        Commands::Teams => commands::teams(g).await?,
        Commands::Competitions => commands::competitions(g).await?,
        Commands::Candidates(args) => commands::candidates(g, args).await?,
        Commands::Register {
            username,
            email,
            password,
        } => commands::register(g, &username, &email, &password).await?,
        Commands::Login { username, password } => commands::login(g, username, password).await?,
        Commands::Squads { user_id } => commands::squads(g, user_id).await?,
        Commands::Squad { cmd } => match cmd {
            SquadCmd::Plan(args) => commands::squad_plan(g, args).await?,
            SquadCmd::Save { args, name } => commands::squad_save(g, args, name).await?,
        },
    }

    Ok(())
}

/// Logs go to stderr; stdout carries command output only.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}
