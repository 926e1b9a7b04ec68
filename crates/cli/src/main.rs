use clap::Parser;
use cli::{Cli, Command};
use isard_common::prelude::Result;
use isard_common::telemetry;
use isard_provider::config::ProviderConfig;
use isard_provider::data_sources::{medias, network_interfaces, templates, users};
use isard_provider::isard::{Desktops, StatusRef};
use isard_provider::isard::types::NewDesktop;
use isard_provider::poller;
use isard_provider::resources::desktop::{DesktopResource, DesktopState};
use isard_provider::resources::{Diagnostics, Resource};
use isard_provider::state::ProviderState;
use serde::Serialize;
use std::time::Duration;
use tracing::Level;

mod cli;

/// The main entry point for the Isard command-line tool.
///
#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr, stdout carries the JSON output.
    let subscriber = telemetry::get_subscriber(Level::INFO, std::io::stderr);
    telemetry::init_subscriber(subscriber)?;
    tracing::debug!(target: "cli", "Logger ready.");

    let cli = Cli::parse();
    tracing::debug!(target: "cli", ?cli, "Cli arguments parsed.");

    let config = ProviderConfig::from_env()?;
    let provider = ProviderState::configure(&config).await?;

    run(cli.command, &provider).await
}

async fn run(command: Command, provider: &ProviderState) -> Result<()> {
    let isard = provider.isard.as_ref();

    match command {
        Command::Templates { name } => print_json(&templates::read(isard, &name).await?),
        Command::Users(args) => print_json(&users::read(isard, &args.into()).await?),
        Command::Medias(args) => print_json(&medias::read(isard, &args.into()).await?),
        Command::Interfaces(args) => print_json(&network_interfaces::read(isard, &args.into()).await?),
        Command::DesktopStatus { id } => {
            let status = isard.desktop_status(&id).await?;
            print_json(&serde_json::json!({ "id": id, "status": status }))
        }
        Command::WaitStopped { kind, id, timeout } => {
            let entity = StatusRef::new(kind.into(), &id);
            let timeout = timeout
                .map(Duration::from_secs)
                .unwrap_or_else(|| provider.poll.stop_timeout());
            poller::wait_until_stopped(isard, &entity, timeout, provider.poll.settings()).await?;
            tracing::info!(target: "cli", %entity, "Entity stopped.");
            Ok(())
        }
        Command::DestroyDesktop { id, force_stop } => {
            let state = DesktopState {
                id,
                desktop: NewDesktop::default(),
                force_stop_on_destroy: force_stop,
            };
            let mut diagnostics = Diagnostics::new();
            DesktopResource::new(provider.clone())
                .delete(&state, &mut diagnostics)
                .await?;

            let warnings: Vec<String> = diagnostics
                .warnings()
                .iter()
                .map(ToString::to_string)
                .collect();
            print_json(&serde_json::json!({ "id": state.id, "deleted": true, "warnings": warnings }))
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
