//! # winctrld: winctrl daemon
//!
//! Composition root that wires the adapters together and runs the relay.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Initialize structured logging
//! - Declare the `command`, `response` and `status` keys
//! - Construct the device client and the command relay, injecting the
//!   state store via port traits
//! - Optionally bind and serve the status server
//! - Feed stdin lines into the `command` key
//! - Unload on SIGTERM/SIGINT
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no relay logic belongs here.

mod config;
mod console;
mod lifecycle;

use std::sync::Arc;
use std::time::Instant;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use winctrl_adapter_http_axum::{StatusServer, StatusState};
use winctrl_adapter_http_reqwest::ReqwestHttpClient;
use winctrl_adapter_state_memory::InMemoryStateStore;
use winctrl_app::context::RelayContext;
use winctrl_app::services::command_relay::CommandRelay;
use winctrl_app::services::state_setup::declare_relay_states;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let started = Instant::now();
    let config = Config::load()?;

    let filter =
        EnvFilter::try_new(&config.logging.filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let instance = config.instance.name.clone();
    let endpoint = config.device_endpoint();
    tracing::info!(%instance, "adapter started");
    tracing::info!(
        %instance,
        client_ip = %endpoint.host,
        port = endpoint.port,
        "device configured"
    );

    // State
    let store = Arc::new(InMemoryStateStore::new());
    declare_relay_states(store.as_ref()).await?;

    // Relay
    let client = ReqwestHttpClient::new(config.request_timeout())?;
    let ctx = RelayContext::new(endpoint.clone(), instance.as_str(), Arc::clone(&store));
    let relay = CommandRelay::new(ctx, client)
        .with_failure_policy(config.relay.on_failure)
        .with_overlap_policy(config.relay.on_overlap);
    let commands = relay.subscribe().await?;
    let relay_task = tokio::spawn(async move { relay.run(commands).await });

    // Status server
    let status_server = if config.status_server.enabled {
        let state = StatusState::new(started, &endpoint);
        match StatusServer::bind(&config.status_bind_addr(), state).await {
            Ok(server) => Some(server.serve()),
            Err(err) => {
                tracing::error!(%instance, error = %err, "status server unavailable");
                None
            }
        }
    } else {
        None
    };

    // Input
    let input_store = store.as_ref().clone();
    let lines = console::spawn_stdin_reader();
    let input_task = tokio::spawn(async move { console::feed_commands(&input_store, lines).await });

    lifecycle::shutdown_signal().await;

    input_task.abort();
    relay_task.abort();
    lifecycle::unload(status_server, || tracing::info!(%instance, "adapter unloaded")).await;

    Ok(())
}
