//! Operator console for the regdesk registry.

pub mod bootstrap;
pub mod commands;
pub mod handlers;
pub mod parser;
pub mod presentation;
pub mod session_store;

use anyhow::Result;

use crate::bootstrap::CliContext;
use crate::commands::{AgentCommands, CentralCommands, Commands, ModelCommands, ServerCommands};
use crate::parser::Cli;

/// Dispatch a parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    let ctx = CliContext::build(cli.api_base)?;

    match &cli.command {
        Commands::Login { username, password } => {
            return handlers::session::login(&ctx, username, password);
        }
        Commands::Logout => return handlers::session::logout(&ctx),
        _ => {
            // Everything below the login gate requires a session
            ctx.authenticated_session()?;
        }
    }

    match cli.command {
        Commands::Login { .. } | Commands::Logout => unreachable!("handled above"),

        Commands::Agents(command) => match command {
            AgentCommands::List(args) => handlers::agents::list(&ctx, &args).await,
            AgentCommands::Show { id } => handlers::agents::show(&ctx, id).await,
            AgentCommands::Create(args) => handlers::agents::create(&ctx, &args).await,
            AgentCommands::Edit { id, changes } => {
                handlers::agents::edit(&ctx, id, &changes).await
            }
            AgentCommands::Delete { id, yes } => handlers::agents::delete(&ctx, id, yes).await,
            AgentCommands::Export { id, out } => {
                handlers::agents::export(&ctx, id, out.as_deref()).await
            }
            AgentCommands::Import { file } => handlers::agents::import(&ctx, &file).await,
            AgentCommands::Test(args) => handlers::agents::test(&ctx, &args).await,
        },

        Commands::Servers(command) => match command {
            ServerCommands::List(args) => handlers::servers::list(&ctx, &args).await,
            ServerCommands::Create(args) => handlers::servers::create(&ctx, &args).await,
            ServerCommands::Edit { id, changes } => {
                handlers::servers::edit(&ctx, id, &changes).await
            }
            ServerCommands::Delete { id, yes } => handlers::servers::delete(&ctx, id, yes).await,
            ServerCommands::Export { id, out } => {
                handlers::servers::export(&ctx, id, out.as_deref()).await
            }
            ServerCommands::Import {
                file,
                dry_run,
                no_upsert,
            } => handlers::servers::import(&ctx, &file, dry_run, !no_upsert).await,
            ServerCommands::Test { url } => handlers::servers::test(&ctx, &url).await,
            ServerCommands::Invoke(args) => handlers::servers::invoke(&ctx, &args).await,
        },

        Commands::Models(command) => match command {
            ModelCommands::List(args) => handlers::models::list(&ctx, &args).await,
            ModelCommands::Create {
                name,
                description,
                provider,
            } => {
                handlers::models::create(&ctx, &name, description.as_deref(), provider.as_deref())
                    .await
            }
            ModelCommands::Edit {
                id,
                name,
                description,
                provider,
            } => {
                handlers::models::edit(
                    &ctx,
                    id,
                    name.as_deref(),
                    description.as_deref(),
                    provider.as_deref(),
                )
                .await
            }
            ModelCommands::Delete { id, yes } => handlers::models::delete(&ctx, id, yes).await,
        },

        Commands::Central(command) => match command {
            CentralCommands::List {
                cursor,
                limit,
                search,
            } => handlers::central::list(&ctx, cursor.as_deref(), limit, search.as_deref()).await,
            CentralCommands::Import { name, version } => {
                handlers::central::import(&ctx, &name, &version).await
            }
        },
    }
}
