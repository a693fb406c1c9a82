use clap::Args;
use rigenerato_app::domain::users::{PgUsersService, UsersService, data::UserRole, records::UserUuid};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct SetRoleArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    #[arg(long)]
    user_uuid: Uuid,

    /// `customer` or `admin`
    #[arg(long)]
    role: String,
}

pub(crate) async fn run(args: SetRoleArgs) -> Result<(), String> {
    let role: UserRole = args.role.parse().map_err(|error| format!("{error}"))?;

    let db = crate::cli::connect(&args.database_url).await?;

    let user = PgUsersService::new(db)
        .set_role(UserUuid::from_uuid(args.user_uuid), role)
        .await
        .map_err(|error| format!("failed to update role: {error}"))?;

    println!("user {} is now {}", user.uuid, user.role);

    Ok(())
}
