//! State

use std::sync::Arc;

use rigenerato_app::context::AppContext;

/// Store currency used when a response has no currency of its own.
pub(crate) const DEFAULT_CURRENCY: &str = "eur";

#[derive(Clone)]
pub(crate) struct State {
    pub(crate) app: AppContext,
    pub(crate) currency: String,
}

impl State {
    #[must_use]
    pub(crate) fn new(app: AppContext, currency: impl Into<String>) -> Self {
        Self {
            app,
            currency: currency.into(),
        }
    }

    #[must_use]
    pub(crate) fn from_app_context(app: AppContext) -> Arc<Self> {
        Arc::new(Self::new(app, DEFAULT_CURRENCY))
    }
}
