//! Passit CLI library.
//!
//! Types and command handlers behind the `passit` binary.

pub mod cli;
pub mod commands;
pub mod context;
pub mod error;

use cli::{Cli, Commands, LifecycleAction};
use commands::page::PageArgs;
use passit_db_api::TablesConfig;

/// Dispatch a parsed [`Cli`] to the appropriate command handler.
pub async fn run(cli: Cli) -> error::CliResult<()> {
    let store = context::build_store(&cli).await?;

    match cli.command {
        Commands::Lifecycle { action } => match action {
            LifecycleAction::OnEvent { event, resumable } => {
                let event = context::read_json(&event)?;
                let config = commands::lifecycle::migration_config(resumable);
                let response = commands::lifecycle::on_event(store, config, event).await?;
                context::print_json(&response)
            }
            LifecycleAction::IsComplete { event, resumable } => {
                let event = context::read_json(&event)?;
                let config = commands::lifecycle::migration_config(resumable);
                let event = commands::lifecycle::is_complete(store, config, event).await?;
                context::print_json(&event)
            }
        },

        Commands::Page {
            table,
            index,
            partition,
            after,
            limit,
            descending,
        } => {
            let args = PageArgs {
                table,
                index,
                partition,
                after,
                limit,
                descending,
            };
            let page = commands::page::run(store, &args).await?;
            if !cli.quiet {
                eprintln!("{} item(s), more: {}", page.len(), page.has_more());
            }
            context::print_json(&page)
        }

        Commands::Conversation { member_a, member_b } => {
            let tables = TablesConfig::from_env()?;
            let link = commands::conversation::run(store, tables, &member_a, &member_b).await?;
            context::print_json(&link)
        }
    }
}
