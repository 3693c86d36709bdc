//! Shark Tank CLI - pitch a business idea to a panel of simulated investors.

use clap::{Parser, Subcommand};
use std::error::Error;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use shark_tank::adapters::{
    AnthropicConfig, AnthropicTextGenerator, InMemoryPitchRepository, OfflineTextGenerator,
    PostgresPitchRepository, SessionMenu, StdioConsole,
};
use shark_tank::application::{
    GetConversationHandler, GetConversationQuery, InteractiveRoundController,
    ListPitchHistoryHandler, ListPitchHistoryQuery,
};
use shark_tank::config::{AiProvider, AppConfig, LoggingConfig};
use shark_tank::domain::foundation::SessionId;
use shark_tank::domain::panel::Panel;
use shark_tank::domain::pitch::PitchData;
use shark_tank::domain::session::SharedSessionRegistry;
use shark_tank::ports::{Console, PitchRepository, TextGenerator};

/// Shark Tank - interactive pitch simulation
#[derive(Parser, Debug)]
#[command(name = "shark-tank")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pitch to the panel (default)
    Pitch(PitchArgs),
    /// Open the session management menu
    Sessions,
    /// Show stored pitches, or one stored conversation
    History {
        /// Number of pitches to list
        #[arg(short, long, default_value_t = 10)]
        limit: u32,
        /// Show the full conversation of this session id
        #[arg(short, long)]
        session: Option<SessionId>,
    },
    /// Check that the database is reachable
    CheckDb,
}

#[derive(clap::Args, Debug, Default)]
struct PitchArgs {
    /// Pitch text; asked for interactively when omitted
    #[arg(short, long)]
    text: Option<String>,
    /// Requested investment in dollars
    #[arg(short, long)]
    amount: Option<i64>,
    /// Offered equity percentage
    #[arg(short, long)]
    equity: Option<i64>,
    /// Comma-separated shark names to seat (default: full panel)
    #[arg(long, value_delimiter = ',')]
    sharks: Vec<String>,
}

fn init_tracing(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));
    let registry = tracing_subscriber::registry().with(filter);

    if config.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}

/// Postgres when reachable, otherwise an in-memory store.
async fn pitch_store(config: &AppConfig) -> Arc<dyn PitchRepository> {
    match PostgresPitchRepository::connect(&config.database).await {
        Ok(repo) => Arc::new(repo),
        Err(e) => {
            warn!(error = %e, "Database unavailable; pitches will not be persisted");
            Arc::new(InMemoryPitchRepository::new())
        }
    }
}

fn text_generator(config: &AppConfig, panel: &Panel) -> Result<Arc<dyn TextGenerator>, Box<dyn Error>> {
    match config.ai.resolved_provider() {
        AiProvider::Anthropic => {
            let api_key = config.ai.anthropic_api_key.clone().unwrap_or_default();
            let anthropic = AnthropicConfig::new(api_key)
                .with_model(config.ai.model.clone())
                .with_base_url(config.ai.base_url.clone())
                .with_timeout(config.ai.timeout())
                .with_max_retries(config.ai.max_retries);
            Ok(Arc::new(AnthropicTextGenerator::new(anthropic, panel.clone())?))
        }
        AiProvider::Offline => Ok(Arc::new(OfflineTextGenerator::new(panel.clone()))),
    }
}

async fn run_pitch(config: &AppConfig, args: PitchArgs) -> Result<(), Box<dyn Error>> {
    let console: Arc<dyn Console> = Arc::new(StdioConsole::new());

    let panel = if args.sharks.is_empty() {
        Panel::classic()
    } else {
        Panel::classic().select(&args.sharks)?
    };

    let text = match args.text {
        Some(text) => text,
        None => console.prompt("Please enter your pitch: ").await?,
    };
    let pitch_data = PitchData::from_pitch(
        text,
        args.amount.unwrap_or(config.pitch.default_amount),
        args.equity.unwrap_or(config.pitch.default_equity),
    );

    let generator = text_generator(config, &panel)?;
    let repository = pitch_store(config).await;
    let controller =
        InteractiveRoundController::new(SharedSessionRegistry::new(), generator, repository, console)
            .with_panel(panel);

    let outcome = controller.run(pitch_data).await?;
    info!(
        session_id = %outcome.session_id,
        offers = outcome.offers.len(),
        "Pitch finished"
    );
    Ok(())
}

async fn run_sessions(config: &AppConfig) -> Result<(), Box<dyn Error>> {
    let repository = pitch_store(config).await;
    let menu = SessionMenu::new(
        SharedSessionRegistry::new(),
        repository,
        Arc::new(StdioConsole::new()),
    );
    menu.run().await?;
    Ok(())
}

async fn run_history(
    config: &AppConfig,
    limit: u32,
    session: Option<SessionId>,
) -> Result<(), Box<dyn Error>> {
    let repository: Arc<dyn PitchRepository> =
        Arc::new(PostgresPitchRepository::connect(&config.database).await?);
    let console = StdioConsole::new();

    if let Some(session_id) = session {
        let conversation = GetConversationHandler::new(repository)
            .handle(GetConversationQuery { session_id })
            .await?;
        console.say(&conversation.conversation_summary).await?;
        return Ok(());
    }

    let pitches = ListPitchHistoryHandler::new(repository)
        .handle(ListPitchHistoryQuery { limit })
        .await?;
    if pitches.is_empty() {
        console.say("No stored pitches.").await?;
    }
    for pitch in pitches {
        console
            .say(&format!(
                "{}  {}  {}",
                pitch.created_at,
                pitch.session_id,
                pitch.pitch_data().investment_request()
            ))
            .await?;
        console.say(&format!("    {}", pitch.pitch_text)).await?;
    }
    Ok(())
}

async fn run_check_db(config: &AppConfig) -> Result<(), Box<dyn Error>> {
    let console = StdioConsole::new();
    console.say("Testing Database Connection...").await?;

    let result = match PostgresPitchRepository::connect(&config.database).await {
        Ok(repo) => repo.health_check().await,
        Err(e) => Err(e),
    };
    match result {
        Ok(()) => console.say("Database connection successful!").await?,
        Err(e) => {
            console
                .say(&format!(
                    "Database connection failed: {}\n  Please ensure PostgreSQL is running and accessible.",
                    e
                ))
                .await?;
            return Err(e.into());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let config = AppConfig::load()?;
    init_tracing(&config.logging);
    config.validate()?;

    match args.command.unwrap_or(Command::Pitch(PitchArgs::default())) {
        Command::Pitch(pitch) => run_pitch(&config, pitch).await,
        Command::Sessions => run_sessions(&config).await,
        Command::History { limit, session } => run_history(&config, limit, session).await,
        Command::CheckDb => run_check_db(&config).await,
    }
}
