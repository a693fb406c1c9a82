use clap::Args;
use rigenerato_app::auth::SessionUuid;
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct RevokeSessionArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Key used to sign session tokens
    #[arg(long, env = "SESSION_SECRET", hide_env_values = true)]
    session_key: String,

    #[arg(long)]
    session_uuid: Uuid,
}

pub(crate) async fn run(args: RevokeSessionArgs) -> Result<(), String> {
    let db = crate::cli::connect(&args.database_url).await?;
    let service = crate::cli::auth_service(db, &args.session_key)?;

    let revoked = service
        .revoke_session(SessionUuid::from_uuid(args.session_uuid))
        .await
        .map_err(|error| format!("failed to revoke session: {error}"))?;

    if revoked {
        println!("revoked session {}", args.session_uuid);
    } else {
        println!("session {} was not active", args.session_uuid);
    }

    Ok(())
}
