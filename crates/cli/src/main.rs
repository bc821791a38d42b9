// MEATER CLI - probe and cook status from MEATER Cloud

mod cloud;
mod exit_codes;
mod output;

use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use meater_config::Settings;
use tracing_subscriber::EnvFilter;

use cloud::CloudContext;
use exit_codes::{EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "meater")]
#[command(about = "MEATER Cloud probe status from the command line")]
#[command(version)]
#[command(long_version = long_version())]
#[command(subcommand_required = false)]
struct Cli {
    /// MEATER Cloud API root (overrides settings.json)
    #[arg(long, global = true, env = "MEATER_API_BASE")]
    api_base: Option<String>,

    /// Use this bearer token instead of stored credentials
    #[arg(long, global = true, env = "MEATER_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// More logging on stderr (-v info, -vv debug)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the token for later commands
    #[command(after_help = "\
Examples:
  meater login
  meater login --email cook@example.com
  MEATER_PASSWORD=... meater login --email cook@example.com
  meater login --token eyJhbGciOi...")]
    Login {
        /// Account e-mail (prompted when omitted)
        #[arg(long, env = "MEATER_EMAIL")]
        email: Option<String>,

        /// Account password (prompted when omitted)
        #[arg(long, env = "MEATER_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// List every probe on the account
    #[command(after_help = "\
Examples:
  meater devices
  meater devices --json | jq '.[].id'")]
    Devices {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show one probe and its cook (first probe when ID is omitted)
    Device {
        /// Probe id as shown by `meater devices`
        id: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show which credentials would be used (no network)
    Status,

    /// Forget stored credentials
    Logout,
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("MEATER_GIT_COMMIT"), ")",
        "\nclient:  meater-client ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("MEATER_BUILD_TARGET"),
    )
}

/// Filter directive: -v flags > MEATER_LOG > settings.json.
fn log_directive(verbose: u8, env: Option<String>, settings: &Settings) -> String {
    match verbose {
        0 => env
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| settings.log_filter.clone()),
        1 => "info".to_string(),
        _ => "debug".to_string(),
    }
}

fn init_logging(directive: &str) {
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let settings = Settings::load();

    init_logging(&log_directive(cli.verbose, std::env::var("MEATER_LOG").ok(), &settings));

    let ctx = CloudContext::resolve(cli.api_base, cli.token, &settings);

    let result = match cli.command {
        None => {
            // No subcommand = show usage
            eprintln!("Usage: meater <command> [options]");
            eprintln!("       meater --help for more information");
            Ok(())
        }
        Some(Commands::Login { email, password }) => cloud::cmd_login(&ctx, email, password),
        Some(Commands::Devices { json }) => cloud::cmd_devices(&ctx, json),
        Some(Commands::Device { id, json }) => cloud::cmd_device(&ctx, id, json),
        Some(Commands::Status) => cloud::cmd_status(&ctx),
        Some(Commands::Logout) => cloud::cmd_logout(&ctx),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}
