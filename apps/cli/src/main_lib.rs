use std::sync::Arc;

use anyhow::Context;
use neomarket_client::ApiClient;
use neomarket_core::{
    dashboard::DashboardGatewayTrait,
    investments::{CycleLifecycleService, CycleLifecycleServiceTrait},
    payments::PaymentGatewayTrait,
    session::{AccessToken, Session},
    users::UserGatewayTrait,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::{config::Config, notifications::ConsoleNotificationSink};

pub struct AppState {
    pub session: Arc<Session>,
    pub cycle_service: Arc<dyn CycleLifecycleServiceTrait>,
    pub user_gateway: Arc<dyn UserGatewayTrait>,
    pub dashboard_gateway: Arc<dyn DashboardGatewayTrait>,
    pub payment_gateway: Arc<dyn PaymentGatewayTrait>,
}

impl AppState {
    pub fn token(&self) -> anyhow::Result<AccessToken> {
        Ok(self.session.access_token()?)
    }
}

pub fn init_tracing(log_format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so command output stays pipeable.
    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let raw_token = config
        .access_token
        .clone()
        .context("NM_ACCESS_TOKEN is not set; pass --token or export it")?;
    let token = AccessToken::new(raw_token)?;

    let client = Arc::new(ApiClient::with_timeout(
        &config.api_url,
        config.request_timeout,
    )?);
    tracing::debug!("Using NeoMarket API at {}", client.base_url());

    let session = Arc::new(Session::new());
    // The profile only decorates the console header, so a failed lookup is not fatal.
    let user = match client.me(&token).await {
        Ok(user) => {
            if !user.is_admin() {
                tracing::warn!("Signed in as {} without the admin role", user.display_name());
            }
            Some(user)
        }
        Err(e) => {
            tracing::warn!("Could not load the signed-in profile: {}", e);
            None
        }
    };
    session.sign_in(token, user);

    let cycle_service: Arc<dyn CycleLifecycleServiceTrait> = Arc::new(CycleLifecycleService::new(
        client.clone(),
        session.clone(),
        Arc::new(ConsoleNotificationSink::new()),
    ));

    Ok(Arc::new(AppState {
        session,
        cycle_service,
        user_gateway: client.clone(),
        dashboard_gateway: client.clone(),
        payment_gateway: client,
    }))
}
