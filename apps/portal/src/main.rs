use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{DashboardState, History, HttpPortalApi, Portal, SubmitOutcome};
use shared::domain::{LoginForm, RegisterForm, Route, TOKEN_KEY};
use storage::{SessionStore, SqliteSessionStore};
use tracing_subscriber::EnvFilter;

mod config;
mod shell;

use config::{load_settings, normalize_database_url};
use shell::with_interrupt;

#[derive(Parser, Debug)]
#[command(name = "portal", about = "Registration portal client")]
struct Args {
    /// Base url of the portal service.
    #[arg(long, global = true)]
    api_base: Option<String>,
    /// Session database path or sqlite url.
    #[arg(long, global = true)]
    session_db: Option<String>,
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the landing screen.
    Home,
    Register {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        password: String,
    },
    Login {
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        password: String,
    },
    /// Verify the stored session and show the profile.
    Dashboard,
    Logout,
    /// List what the session store holds.
    Session,
    /// Walk the screens interactively (default).
    Shell,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(api_base) = args.api_base {
        settings.api_base = api_base;
    }
    if let Some(session_db) = args.session_db {
        settings.session_db_url = normalize_database_url(&session_db);
    }

    let api = HttpPortalApi::with_timeout(&settings.api_base, settings.request_timeout())
        .context("invalid api base url")?;
    let store = Arc::new(SqliteSessionStore::open(&settings.session_db_url).await?);
    store.health_check().await?;
    tracing::debug!(
        api_base = %api.base_url(),
        session_db = %settings.session_db_url,
        "settings loaded"
    );

    let command = args.command.unwrap_or(Command::Shell);
    let history = Arc::new(History::new(start_route(&command)));
    let portal = Portal::new(Arc::new(api), store.clone(), history.clone());

    match command {
        Command::Home => {
            print!("{}", portal.landing().view());
        }
        Command::Register {
            name,
            email,
            password,
        } => {
            let mut controller = portal.register();
            let outcome = with_interrupt(
                controller.lifetime(),
                controller.submit(RegisterForm::new(name, email, password)),
            )
            .await;
            match outcome {
                SubmitOutcome::Navigated(route) => {
                    println!("Account created. Sign in next ({route}).");
                }
                SubmitOutcome::Failed => bail!(controller.error().unwrap_or("registration failed")),
                SubmitOutcome::Cancelled => bail!("registration cancelled"),
            }
        }
        Command::Login { email, password } => {
            let mut controller = portal.login();
            let outcome = with_interrupt(
                controller.lifetime(),
                controller.submit(LoginForm::new(email, password)),
            )
            .await?;
            match outcome {
                SubmitOutcome::Navigated(route) => println!("Signed in. Continue at {route}."),
                SubmitOutcome::Failed => bail!(controller.error().unwrap_or("login failed")),
                SubmitOutcome::Cancelled => bail!("login cancelled"),
            }
        }
        Command::Dashboard => {
            let mut controller = portal.dashboard();
            let state = with_interrupt(controller.lifetime(), controller.mount())
                .await
                .clone();
            match (state, controller.view()) {
                (DashboardState::Authorized(_), Some(view)) => print!("{view}"),
                (DashboardState::Checking, _) => bail!("profile check cancelled"),
                _ => bail!("not signed in; continue at {}", history.current()),
            }
        }
        Command::Logout => {
            portal.dashboard().logout().await?;
            println!("Signed out.");
        }
        Command::Session => {
            let entries = store.entries().await?;
            if entries.is_empty() {
                println!("Session store is empty.");
            }
            for entry in entries {
                let value = if entry.key == TOKEN_KEY {
                    mask(&entry.value)
                } else {
                    entry.value
                };
                println!("{:<8} {:<24} {}", entry.key, value, entry.updated_at.to_rfc3339());
            }
        }
        Command::Shell => shell::run(portal, history).await?,
    }

    Ok(())
}

fn start_route(command: &Command) -> Route {
    match command {
        Command::Home | Command::Shell | Command::Session => Route::Landing,
        Command::Register { .. } => Route::Register,
        Command::Login { .. } => Route::Login,
        Command::Dashboard | Command::Logout => Route::Dashboard,
    }
}

fn mask(token: &str) -> String {
    let visible: String = token.chars().take(6).collect();
    if visible.len() == token.len() {
        "*".repeat(token.chars().count())
    } else {
        format!("{visible}...")
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
