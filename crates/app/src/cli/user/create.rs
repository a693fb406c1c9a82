use clap::Args;
use rigenerato_app::{
    auth::Registration,
    domain::users::data::UserRole,
};

#[derive(Debug, Args)]
pub(crate) struct CreateUserArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Key used to sign session tokens
    #[arg(long, env = "SESSION_SECRET", hide_env_values = true)]
    session_key: String,

    #[arg(long)]
    email: String,

    /// Display name
    #[arg(long)]
    name: String,

    #[arg(long, env = "USER_PASSWORD", hide_env_values = true)]
    password: String,

    /// Create the user as an administrator
    #[arg(long)]
    admin: bool,
}

pub(crate) async fn run(args: CreateUserArgs) -> Result<(), String> {
    let db = crate::cli::connect(&args.database_url).await?;
    let service = crate::cli::auth_service(db, &args.session_key)?;

    let role = if args.admin {
        UserRole::Admin
    } else {
        UserRole::Customer
    };

    let user = service
        .create_user(
            Registration {
                email: args.email,
                name: args.name,
                password: args.password,
            },
            role,
        )
        .await
        .map_err(|error| format!("failed to create user: {error}"))?;

    println!("user_uuid: {}", user.uuid);
    println!("email: {}", user.email);
    println!("role: {}", user.role);

    Ok(())
}
