// File: services/meetscheduler_cli/src/main.rs
use clap::{Parser, Subcommand, ValueEnum};
use meetscheduler_api::{ApiGateway, MeetingFilter, TracingEventSink};
use meetscheduler_booking::DisplayZone;
use meetscheduler_common::{config_error, logging, log_error, MeetSchedulerError};
use meetscheduler_config::{load_config, AppConfig};
use meetscheduler_session::SessionStore;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, Level};

mod commands;
mod console;

use console::ConsoleNavigator;

#[derive(Parser)]
#[command(name = "meetscheduler")]
#[command(about = "MeetScheduler - book meetings and manage your scheduling account", long_about = None)]
struct Cli {
    /// Write logs to a daily-rolling file in this directory instead of stderr
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a host's booking page and book a slot
    Book {
        username: String,
        /// How many days ahead to look for free slots
        #[arg(long)]
        days: Option<u32>,
    },
    /// Print the URL that starts sign-in
    Login { username: String },
    /// Finish sign-in with the redirect URL or its query string
    Callback { query: String },
    /// Show the signed-in user
    Whoami,
    /// Forget the stored session
    Logout,
    /// List your meetings
    Meetings {
        #[arg(long, value_enum, default_value_t = FilterArg::Upcoming)]
        filter: FilterArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FilterArg {
    Upcoming,
    Past,
    All,
}

impl From<FilterArg> for MeetingFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::Upcoming => MeetingFilter::Upcoming,
            FilterArg::Past => MeetingFilter::Past,
            FilterArg::All => MeetingFilter::All,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    // Keeps the file writer flushing until exit
    let _guard = match &cli.log_dir {
        Some(dir) => Some(logging::init_with_file(dir, level)),
        None => {
            logging::init_with_level(level);
            None
        }
    };

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log_error(&e, "command failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), MeetSchedulerError> {
    let config = load_config().map_err(config_error)?;
    debug!(?config, "Configuration loaded");

    let navigator = Arc::new(ConsoleNavigator);
    let gateway = build_gateway(&config, navigator.clone())?;
    let zone = DisplayZone::from_name(config.booking.display_time_zone.as_deref()).map_err(config_error)?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();

    match cli.command {
        Commands::Book { username, days } => {
            let days = days.unwrap_or(config.booking.lookahead_days);
            commands::book(&gateway, &zone, &username, days, &mut input, &mut out).await
        }
        Commands::Login { username } => commands::login(&gateway, &username, &mut out),
        Commands::Callback { query } => {
            commands::callback(
                &gateway,
                navigator.as_ref(),
                &config.auth.after_login_route,
                &query,
                &mut out,
            )
            .await
        }
        Commands::Whoami => commands::whoami(&gateway, &mut out),
        Commands::Logout => commands::sign_out(&gateway, &mut out),
        Commands::Meetings { filter } => {
            commands::meetings(&gateway, &zone, filter.into(), &mut out).await
        }
    }
}

fn build_gateway(config: &AppConfig, navigator: Arc<ConsoleNavigator>) -> Result<ApiGateway, MeetSchedulerError> {
    let session = SessionStore::file(config.session.resolved_storage_path());
    let gateway = ApiGateway::new(config, session, Arc::new(TracingEventSink), navigator)?;
    Ok(gateway)
}
