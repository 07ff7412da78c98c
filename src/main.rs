//! Command-line driver for the app core against a live backend.
//!
//! Exists for poking at a running API without a browser: sign in, inspect
//! the catalog, and replay navigation attempts through the real guard.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use zoneboard::app::App;
use zoneboard::config::{AppConfig, default_token_file};
use zoneboard::guard::Decision;
use zoneboard::net::api::ApiError;
use zoneboard::verify::VerifyError;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Verify(#[from] VerifyError),
}

#[derive(Parser, Debug)]
#[command(name = "zoneboard", about = "DNS-management app core CLI")]
struct Cli {
    #[arg(long, env = "ZONEBOARD_BASE_URL", default_value = "http://127.0.0.1:8080")]
    base_url: String,

    /// Where the session token is persisted. Pass an empty value to keep
    /// the session in memory only.
    #[arg(long, env = "ZONEBOARD_TOKEN_FILE")]
    token_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the API answers.
    Ping,
    /// Authenticate and store the issued session token.
    Login {
        #[arg(long)]
        mail: String,
        #[arg(long)]
        password: String,
    },
    /// Verify the stored session and print who it belongs to.
    Whoami,
    /// Refresh and print the connection catalog.
    Connections,
    /// Drop the stored session.
    Logout,
    /// Evaluate the navigation rules for a destination path.
    Guard {
        dest: String,
        /// Select this connection id before evaluating.
        #[arg(long)]
        connection: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let token_file = match cli.token_file {
        Some(path) if path.as_os_str().is_empty() => None,
        Some(path) => Some(path),
        None => default_token_file(),
    };
    let config = AppConfig {
        base_url: cli.base_url.trim_end_matches('/').to_string(),
        token_file,
    };
    let app = App::new(&config)?;

    match cli.command {
        Command::Ping => run_ping(&app).await,
        Command::Login { mail, password } => run_login(&app, &mail, &password).await,
        Command::Whoami => run_whoami(&app).await,
        Command::Connections => run_connections(&app).await,
        Command::Logout => run_logout(&app).await,
        Command::Guard { dest, connection } => {
            run_guard(&app, &dest, connection.as_deref()).await
        }
    }
}

async fn run_ping(app: &App) -> Result<(), CliError> {
    app.api().healthcheck().await?;
    println!("ok");
    Ok(())
}

async fn run_login(app: &App, mail: &str, password: &str) -> Result<(), CliError> {
    let user = app.login(mail, password).await?;
    if user.is_admin {
        println!("signed in as {} (admin)", user.username);
    } else {
        println!("signed in as {}", user.username);
    }
    Ok(())
}

async fn run_whoami(app: &App) -> Result<(), CliError> {
    let user = app.verify().await?;
    if user.is_admin {
        println!("{} (admin)", user.username);
    } else {
        println!("{}", user.username);
    }
    Ok(())
}

async fn run_connections(app: &App) -> Result<(), CliError> {
    app.connections().refresh().await?;
    let catalog = app.connections().catalog().await;
    if catalog.is_empty() {
        println!("no connections");
        return Ok(());
    }
    for option in catalog {
        if option.authorized_users.is_empty() {
            println!("{}  {}", option.id, option.name);
        } else {
            println!(
                "{}  {}  users: {}",
                option.id,
                option.name,
                option.authorized_users.join(", ")
            );
        }
    }
    Ok(())
}

async fn run_logout(app: &App) -> Result<(), CliError> {
    app.logout().await;
    println!("signed out");
    Ok(())
}

async fn run_guard(app: &App, dest: &str, connection: Option<&str>) -> Result<(), CliError> {
    if let Some(id) = connection {
        app.connections().select(id).await;
    }
    match app.guard().before_navigate(dest).await {
        Decision::Allow => println!("allow {dest}"),
        Decision::Redirect(path) => println!("redirect {path}"),
    }
    Ok(())
}
