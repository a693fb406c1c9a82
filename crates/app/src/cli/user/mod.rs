use clap::{Args, Subcommand};

mod create;
mod list;
mod set_role;

#[derive(Debug, Args)]
pub(crate) struct UserCommand {
    #[command(subcommand)]
    command: UserSubcommand,
}

#[derive(Debug, Subcommand)]
enum UserSubcommand {
    Create(create::CreateUserArgs),
    List(list::ListUsersArgs),
    SetRole(set_role::SetRoleArgs),
}

pub(crate) async fn run(command: UserCommand) -> Result<(), String> {
    match command.command {
        UserSubcommand::Create(args) => create::run(args).await,
        UserSubcommand::List(args) => list::run(args).await,
        UserSubcommand::SetRole(args) => set_role::run(args).await,
    }
}
