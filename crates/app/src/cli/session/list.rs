use clap::Args;
use rigenerato_app::domain::users::records::UserUuid;
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct ListSessionsArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Key used to sign session tokens
    #[arg(long, env = "SESSION_SECRET", hide_env_values = true)]
    session_key: String,

    /// User whose sessions should be listed
    #[arg(long)]
    user_uuid: Uuid,
}

pub(crate) async fn run(args: ListSessionsArgs) -> Result<(), String> {
    let db = crate::cli::connect(&args.database_url).await?;
    let service = crate::cli::auth_service(db, &args.session_key)?;

    let sessions = service
        .list_sessions(UserUuid::from_uuid(args.user_uuid))
        .await
        .map_err(|error| format!("failed to list sessions: {error}"))?;

    if sessions.is_empty() {
        println!("no sessions found for user {}", args.user_uuid);
        return Ok(());
    }

    for session in sessions {
        println!("session_uuid: {}", session.uuid);
        println!("created_at: {}", session.created_at);
        println!(
            "last_used_at: {}",
            session
                .last_used_at
                .map_or_else(|| "never".to_string(), |value| value.to_string())
        );
        println!("expires_at: {}", session.expires_at);
        println!(
            "revoked_at: {}",
            session
                .revoked_at
                .map_or_else(|| "active".to_string(), |value| value.to_string())
        );
        println!();
    }

    Ok(())
}
