//! # barrelhubd — barrelhub demo daemon
//!
//! Composition root that wires a client to the virtual server and plays a
//! short admin session against it.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Install the tracing subscriber
//! - Start the virtual server and build the [`Client`]
//! - Pump the server feed into the client
//! - Log in, impersonate a team member, switch back, then idle until Ctrl-C
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use anyhow::Context;
use barrelhub_adapter_virtual::{VirtualServer, feed, seed};
use barrelhub_app::client::{Client, ClientOptions};
use barrelhub_domain::barrel::BarrelState;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use config::Config;

type DemoClient = Client<Arc<VirtualServer>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading barrelhub.toml")?;

    let filter = EnvFilter::try_new(&config.logging.filter)
        .with_context(|| format!("invalid log filter '{}'", config.logging.filter))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Server
    let dataset = if config.demo.seed {
        seed::demo()
    } else {
        seed::Seed::default()
    };
    let server = Arc::new(VirtualServer::new(dataset, config.feed.capacity));

    // Client
    let client = Arc::new(Client::new(
        Arc::clone(&server),
        ClientOptions {
            ordering: config.store.response_ordering,
            ..ClientOptions::default()
        },
    )?);

    // Feed
    let receiver = server.subscribe_feed();
    let pump_client = Arc::clone(&client);
    tokio::spawn(async move { feed::pump(receiver, &pump_client).await });

    let _barrels = client.barrels().on_change(|snapshot| {
        let opened = snapshot
            .iter()
            .filter(|barrel| barrel.state == BarrelState::Opened)
            .count();
        tracing::info!(total = snapshot.len(), opened, "barrels changed");
    });

    run_session(&client).await?;

    tracing::info!("session done, press Ctrl-C to exit");
    tokio::signal::ctrl_c().await?;
    Ok(())
}

async fn run_session(client: &DemoClient) -> anyhow::Result<()> {
    client
        .auth_service()
        .check_ip_address()
        .await
        .context("ip login")?;
    client.wait_until_ready().await;
    log_counts(client);

    if let Some(barrel) = client
        .barrels()
        .sorted_by_number()
        .into_iter()
        .find(|barrel| barrel.state != BarrelState::Empty)
    {
        tracing::info!(num = barrel.num, from = %barrel.state, "advancing barrel");
        client.barrel_service().advance_state(&barrel).await?;
    }

    let member = client.users().snapshot().iter().find(|user| !user.admin).cloned();
    if let Some(member) = member {
        tracing::info!(user = %member.name, "logging in as team member");
        client.auth_service().login_as(&member.id).await?;
        client.wait_until_ready().await;
        log_counts(client);

        if client.auth_service().back_to_main_account() {
            client.wait_until_ready().await;
        }
        tracing::info!(
            impersonating = client.auth().is_impersonating(),
            "back to main account"
        );
    }
    Ok(())
}

fn log_counts(client: &DemoClient) {
    let by_state = client.barrels().count_by_state();
    tracing::info!(
        teams = client.teams().len(),
        users = client.users().len(),
        alert_buttons = client.alert_buttons().len(),
        barrels = client.barrels().len(),
        new = by_state.get(&BarrelState::New).copied().unwrap_or(0),
        opened = by_state.get(&BarrelState::Opened).copied().unwrap_or(0),
        empty = by_state.get(&BarrelState::Empty).copied().unwrap_or(0),
        "stores ready"
    );
}
