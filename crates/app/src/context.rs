//! App Context

use std::sync::Arc;

use jiff::SignedDuration;
use thiserror::Error;

use crate::{
    auth::{AuthService, AuthSettings, PgAuthService, SessionKey},
    database::{self, Db},
    domain::{
        categories::{CategoriesService, PgCategoriesService},
        checkout::{CheckoutService, PgCheckoutService, data::CheckoutSettings},
        discounts::{DiscountCodesService, PgDiscountCodesService},
        orders::{OrdersService, PgOrdersService},
        products::{PgProductsService, ProductsService},
        users::{PgUsersService, UsersService},
        webhooks::{PaymentWebhooks, WebhookSecret, WebhooksService},
    },
    payments::{PaymentGateway, StripeGateway},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to apply migrations")]
    Migrations(#[source] sqlx::migrate::MigrateError),
}

/// Everything needed to wire the services together.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub database_url: String,
    pub run_migrations: bool,
    pub session_key: SessionKey,
    pub session_ttl: SignedDuration,
    pub checkout: CheckoutSettings,
    pub stripe_secret_key: String,
    pub stripe_api_base: String,
    pub webhook_secret: WebhookSecret,
    pub webhook_tolerance: SignedDuration,
}

#[derive(Clone)]
pub struct AppContext {
    pub auth: Arc<dyn AuthService>,
    pub users: Arc<dyn UsersService>,
    pub categories: Arc<dyn CategoriesService>,
    pub products: Arc<dyn ProductsService>,
    pub discounts: Arc<dyn DiscountCodesService>,
    pub orders: Arc<dyn OrdersService>,
    pub checkout: Arc<dyn CheckoutService>,
    pub webhooks: Arc<dyn WebhooksService>,
}

impl AppContext {
    /// Connect to the database and build every service.
    ///
    /// # Errors
    ///
    /// Returns an error when the database is unreachable or migrations fail.
    pub async fn from_settings(settings: AppSettings) -> Result<Self, AppInitError> {
        let pool = database::connect(&settings.database_url)
            .await
            .map_err(AppInitError::Database)?;

        if settings.run_migrations {
            database::migrate(&pool)
                .await
                .map_err(AppInitError::Migrations)?;
        }

        let gateway: Arc<dyn PaymentGateway> = Arc::new(StripeGateway::new(
            settings.stripe_secret_key,
            settings.stripe_api_base,
        ));

        Ok(Self::from_db(
            Db::new(pool),
            gateway,
            AuthSettings::new(settings.session_key).with_session_ttl(settings.session_ttl),
            settings.checkout,
            settings.webhook_secret,
            settings.webhook_tolerance,
        ))
    }

    /// Build every service on top of an existing pool and gateway.
    #[must_use]
    pub fn from_db(
        db: Db,
        gateway: Arc<dyn PaymentGateway>,
        auth: AuthSettings,
        checkout: CheckoutSettings,
        webhook_secret: WebhookSecret,
        webhook_tolerance: SignedDuration,
    ) -> Self {
        let orders: Arc<dyn OrdersService> = Arc::new(PgOrdersService::new(db.clone()));

        Self {
            auth: Arc::new(PgAuthService::new(db.clone(), auth)),
            users: Arc::new(PgUsersService::new(db.clone())),
            categories: Arc::new(PgCategoriesService::new(db.clone())),
            products: Arc::new(PgProductsService::new(db.clone())),
            discounts: Arc::new(PgDiscountCodesService::new(db.clone())),
            checkout: Arc::new(PgCheckoutService::new(db, gateway, checkout)),
            webhooks: Arc::new(
                PaymentWebhooks::new(orders.clone(), webhook_secret)
                    .with_tolerance(webhook_tolerance),
            ),
            orders,
        }
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext").finish_non_exhaustive()
    }
}
