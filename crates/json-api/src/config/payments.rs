//! Payments Config

use clap::Args;
use rigenerato_app::payments::DEFAULT_STRIPE_API_BASE;

/// Payment vendor and checkout settings.
#[derive(Debug, Args)]
pub struct PaymentsConfig {
    /// Vendor API secret key
    #[arg(long, env = "STRIPE_SECRET_KEY", hide_env_values = true)]
    pub stripe_secret_key: String,

    /// Shared secret used to sign webhook deliveries
    #[arg(long, env = "STRIPE_WEBHOOK_SECRET", hide_env_values = true)]
    pub stripe_webhook_secret: String,

    /// Vendor API base URL
    #[arg(long, env = "STRIPE_API_BASE", default_value = DEFAULT_STRIPE_API_BASE)]
    pub stripe_api_base: String,

    /// Accepted age of a webhook signature, in seconds
    #[arg(long, env = "STRIPE_WEBHOOK_TOLERANCE_SECONDS", default_value_t = 300)]
    pub stripe_webhook_tolerance_seconds: u32,

    /// Where the hosted payment page sends the customer after paying
    #[arg(long, env = "CHECKOUT_SUCCESS_URL")]
    pub checkout_success_url: String,

    /// Where the hosted payment page sends the customer on cancel
    #[arg(long, env = "CHECKOUT_CANCEL_URL")]
    pub checkout_cancel_url: String,

    /// Lowercase ISO 4217 store currency
    #[arg(long, env = "STORE_CURRENCY", default_value = "eur")]
    pub store_currency: String,

    /// Countries the hosted page accepts shipping addresses for
    #[arg(
        long,
        env = "SHIPPING_COUNTRIES",
        value_delimiter = ',',
        default_value = "IT"
    )]
    pub shipping_countries: Vec<String>,
}
