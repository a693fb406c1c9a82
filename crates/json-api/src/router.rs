//! App Router

use salvo::Router;

use crate::{
    auth, categories, checkout, discount_codes, healthcheck, observability::metrics_handler,
    orders, products, users, webhooks,
};

/// Storefront routes, open to anonymous callers.
fn storefront() -> Router {
    Router::new()
        .push(
            Router::with_path("categories")
                .get(categories::index::handler)
                .push(Router::with_path("{slug}").get(categories::get::handler)),
        )
        .push(
            Router::with_path("products")
                .get(products::index::handler)
                .push(Router::with_path("{slug}").get(products::get::handler)),
        )
        .push(Router::with_path("cart/quote").post(checkout::quote::handler))
        .push(
            Router::with_path("checkout/sessions")
                .hoop(auth::middleware::optional)
                .post(checkout::session::handler),
        )
        .push(Router::with_path("webhooks/payments").post(webhooks::payments::handler))
        .push(Router::with_path("orders/session/{session_id}").get(orders::session::handler))
}

fn account() -> Router {
    Router::with_path("auth")
        .push(Router::with_path("register").post(auth::register::handler))
        .push(Router::with_path("login").post(auth::login::handler))
        .push(
            Router::new()
                .hoop(auth::middleware::handler)
                .push(Router::with_path("logout").post(auth::logout::handler))
                .push(Router::with_path("me").get(auth::me::handler)),
        )
}

/// Back-office routes. Every request needs an administrator session.
fn admin() -> Router {
    Router::with_path("admin")
        .hoop(auth::middleware::handler)
        .hoop(auth::middleware::require_admin)
        .push(
            Router::with_path("products")
                .get(products::admin_index::handler)
                .post(products::create::handler)
                .push(
                    Router::with_path("{uuid}")
                        .get(products::show::handler)
                        .put(products::update::handler)
                        .delete(products::delete::handler)
                        .push(
                            Router::with_path("images")
                                .post(products::images::create::handler)
                                .push(
                                    Router::with_path("{image}")
                                        .delete(products::images::delete::handler),
                                ),
                        ),
                ),
        )
        .push(
            Router::with_path("categories")
                .get(categories::index::handler)
                .post(categories::create::handler)
                .push(
                    Router::with_path("{uuid}")
                        .get(categories::show::handler)
                        .put(categories::update::handler)
                        .delete(categories::delete::handler),
                ),
        )
        .push(
            Router::with_path("discount-codes")
                .get(discount_codes::index::handler)
                .post(discount_codes::create::handler)
                .push(
                    Router::with_path("{uuid}")
                        .get(discount_codes::show::handler)
                        .put(discount_codes::update::handler)
                        .delete(discount_codes::delete::handler),
                ),
        )
        .push(
            Router::with_path("orders")
                .get(orders::index::handler)
                .push(
                    Router::with_path("{uuid}")
                        .get(orders::show::handler)
                        .delete(orders::delete::handler)
                        .push(Router::with_path("shipping").put(orders::shipping::handler)),
                ),
        )
        .push(
            Router::with_path("users")
                .get(users::index::handler)
                .push(Router::with_path("{uuid}/role").put(users::role::handler)),
        )
}

pub(crate) fn app_router() -> Router {
    Router::new()
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(Router::with_path("metrics").get(metrics_handler))
        .push(storefront())
        .push(account())
        .push(admin())
}
