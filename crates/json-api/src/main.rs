//! Rigenerato JSON API Server

use std::{process, sync::Arc};

use jiff::SignedDuration;
use salvo::{
    affix_state::inject,
    oapi::{
        OpenApi,
        security::{Http, HttpAuthScheme, SecurityScheme},
        swagger_ui::SwaggerUi,
    },
    prelude::*,
    trailing_slash::remove_slash,
};
use tracing::{error, info};

use rigenerato_app::{
    auth::SessionKey,
    context::{AppContext, AppSettings},
    domain::{checkout::data::CheckoutSettings, webhooks::WebhookSecret},
};

use crate::{
    config::ServerConfig,
    observability::{Observability, request_logging},
    router::app_router,
    state::State,
};

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod auth;
mod categories;
mod checkout;
mod config;
mod discount_codes;
mod extensions;
mod healthcheck;
mod money;
mod observability;
mod orders;
mod products;
mod router;
mod shutdown;
mod state;
#[cfg(test)]
mod test_helpers;
mod users;
mod webhooks;

fn app_settings(config: ServerConfig) -> AppSettings {
    let payments = config.payments;

    AppSettings {
        database_url: config.database.database_url,
        run_migrations: config.database.run_migrations,
        session_key: SessionKey::new(config.auth.session_secret.into_bytes()),
        session_ttl: SignedDuration::from_hours(i64::from(config.auth.session_ttl_hours)),
        checkout: CheckoutSettings {
            currency: payments.store_currency.to_ascii_lowercase(),
            success_url: payments.checkout_success_url,
            cancel_url: payments.checkout_cancel_url,
            shipping_countries: payments.shipping_countries,
        },
        stripe_secret_key: payments.stripe_secret_key,
        stripe_api_base: payments.stripe_api_base,
        webhook_secret: WebhookSecret::new(payments.stripe_webhook_secret),
        webhook_tolerance: SignedDuration::from_secs(i64::from(
            payments.stripe_webhook_tolerance_seconds,
        )),
    }
}

/// Rigenerato JSON API Server entry point
#[tokio::main]
pub async fn main() {
    let config = ServerConfig::load().unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized yet, must use eprintln for config errors"
        )]
        {
            eprintln!("Configuration error: {e}");
        }

        process::exit(1);
    });

    let observability = Observability::init(&config).unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "tracing subscriber failed to install, nothing else can report it"
        )]
        {
            eprintln!("Observability error: {e}");
        }

        process::exit(1);
    });

    let addr = config.socket_addr();
    let currency = config.payments.store_currency.to_ascii_lowercase();

    let app = match AppContext::from_settings(app_settings(config)).await {
        Ok(app) => app,
        Err(init_error) => {
            error!("failed to initialize app context: {init_error}");

            observability.shutdown();
            process::exit(1);
        }
    };

    info!("Starting server on {addr}");

    let listener = TcpListener::new(addr).bind().await;

    let router = Router::new()
        .hoop(CatchPanic::new())
        .hoop(remove_slash())
        .hoop(request_logging)
        .hoop(inject(Arc::new(State::new(app, currency))))
        .push(app_router());

    let doc = OpenApi::new("Rigenerato API", env!("CARGO_PKG_VERSION"))
        .add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
        .merge_router(&router);

    let router = router
        .push(doc.into_router("/api-doc/openapi.json"))
        .push(SwaggerUi::new("/api-doc/openapi.json").into_router("docs"));

    let server = Server::new(listener);

    let handle = server.handle();

    tokio::spawn(async move {
        if let Err(error) = shutdown::listen(handle).await {
            error!("failed to listen for shutdown signal: {error}");
        }
    });

    server.serve(router).await;

    info!("server stopped");

    observability.shutdown();
}
