use clap::{Args, Subcommand};

mod list;
mod revoke;

#[derive(Debug, Args)]
pub(crate) struct SessionCommand {
    #[command(subcommand)]
    command: SessionSubcommand,
}

#[derive(Debug, Subcommand)]
enum SessionSubcommand {
    List(list::ListSessionsArgs),
    Revoke(revoke::RevokeSessionArgs),
}

pub(crate) async fn run(command: SessionCommand) -> Result<(), String> {
    match command.command {
        SessionSubcommand::List(args) => list::run(args).await,
        SessionSubcommand::Revoke(args) => revoke::run(args).await,
    }
}
