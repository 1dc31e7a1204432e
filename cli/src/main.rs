mod api;
mod session;
mod store;
mod types;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::api::HttpApi;
use crate::session::{SessionContext, SessionError};
use crate::store::FileTokenStore;
use crate::types::{BillingCycle, PlanName};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("not signed in; run `mnstack login` first")]
    NotSignedIn,
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "mnstack", about = "MNStack account and billing CLI")]
struct Cli {
    #[arg(long, env = "MNSTACK_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    /// Where the bearer token is kept between runs. Defaults to `~/.mnstack/token`.
    #[arg(long, env = "MNSTACK_TOKEN_FILE")]
    token_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an account and sign in.
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "MNSTACK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign in and store the issued token.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "MNSTACK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out and discard the stored token.
    Logout,
    /// Show the signed-in user.
    Whoami,
    Dashboard,
    Plans,
    /// Start a hosted checkout and print its session id.
    Checkout {
        #[arg(long, value_enum)]
        plan: PlanName,
        #[arg(long, value_enum, default_value = "monthly")]
        cycle: BillingCycle,
    },
}

type CliSession = SessionContext<HttpApi, FileTokenStore>;

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let api = HttpApi::new(&cli.base_url).map_err(SessionError::from)?;
    let store = FileTokenStore::new(cli.token_file.unwrap_or_else(store::default_token_path));
    tracing::debug!(path = %store.path().display(), "token store");

    let mut session = SessionContext::new(api, store);
    if needs_restore(&cli.command) {
        if let Err(e) = session.restore().await {
            tracing::warn!(error = %e, "stored session not restored");
        }
        tracing::debug!(state = ?session.state(), "session restored");
    }

    run(&mut session, cli.command).await
}

/// Commands that act on an existing session validate the stored token first.
fn needs_restore(command: &Command) -> bool {
    matches!(command, Command::Whoami | Command::Dashboard | Command::Checkout { .. })
}

async fn run(session: &mut CliSession, command: Command) -> Result<(), CliError> {
    match command {
        Command::Signup { name, email, password } => {
            let user = session.signup(&name, &email, &password).await?;
            print_json(&user)
        }
        Command::Login { email, password } => {
            let user = session.login(&email, &password).await?;
            print_json(&user)
        }
        Command::Logout => {
            session.logout().await?;
            println!("signed out");
            Ok(())
        }
        Command::Whoami => match session.current_user() {
            Some(user) => print_json(user),
            None => Err(CliError::NotSignedIn),
        },
        Command::Dashboard => {
            let data = session.dashboard().await.map_err(signed_out)?;
            print_json(&data)
        }
        Command::Plans => print_json(&session.plans().await?),
        Command::Checkout { plan, cycle } => {
            let checkout = session.checkout(plan, cycle).await.map_err(signed_out)?;
            print_json(&checkout)
        }
    }
}

fn signed_out(err: SessionError) -> CliError {
    if err.is_unauthorized() { CliError::NotSignedIn } else { err.into() }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
