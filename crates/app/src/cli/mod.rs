use clap::{Parser, Subcommand};
use rigenerato_app::{
    auth::{AuthSettings, PgAuthService, SessionKey},
    database::{self, Db},
};

mod db;
mod session;
mod user;

#[derive(Debug, Parser)]
#[command(name = "rigenerato-app", about = "Rigenerato shop administration", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    User(user::UserCommand),
    Session(session::SessionCommand),
    Db(db::DbCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::User(command) => user::run(command).await,
            Commands::Session(command) => session::run(command).await,
            Commands::Db(command) => db::run(command).await,
        }
    }
}

pub(crate) async fn connect(database_url: &str) -> Result<Db, String> {
    database::connect(database_url)
        .await
        .map(Db::new)
        .map_err(|error| format!("failed to connect to database: {error}"))
}

pub(crate) fn auth_service(db: Db, session_key: &str) -> Result<PgAuthService, String> {
    if session_key.trim().is_empty() {
        return Err("session key cannot be empty".to_string());
    }

    Ok(PgAuthService::new(
        db,
        AuthSettings::new(SessionKey::new(session_key.as_bytes())),
    ))
}
