//! Checkout service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use rigenerato::{
    cart::{CartLine, line_subtotal},
    pricing::{PricingError, price_cart},
};
use rustc_hash::FxHashMap;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        checkout::{
            data::{CartRequest, CheckoutRequest, CheckoutSettings, Quote, QuoteLine},
            digest::{DigestEntry, digest_metadata},
            errors::CheckoutServiceError,
        },
        discounts::{
            DiscountsServiceError, data::normalise_code, repository::PgDiscountCodesRepository,
        },
        products::{records::ProductUuid, repository::PgProductsRepository},
    },
    payments::{CheckoutSession, NewCheckoutSession, PaymentGateway, SessionLineItem},
};

/// Metadata key holding the applied discount code.
pub const DISCOUNT_CODE_METADATA_KEY: &str = "discount_code";

/// Metadata key holding the discount quoted for the session, in minor units.
pub const DISCOUNT_AMOUNT_METADATA_KEY: &str = "discount_amount";

/// Metadata key holding the signed-in customer.
pub const USER_UUID_METADATA_KEY: &str = "user_uuid";

/// Merge repeated products, keeping first-seen order.
fn merge_items(cart: &CartRequest) -> Result<Vec<(ProductUuid, u32)>, CheckoutServiceError> {
    let mut merged: Vec<(ProductUuid, u32)> = Vec::with_capacity(cart.items.len());
    let mut positions: FxHashMap<ProductUuid, usize> = FxHashMap::default();

    for item in &cart.items {
        if item.quantity == 0 {
            return Err(CheckoutServiceError::InvalidQuantity(item.product_uuid));
        }

        match positions.get(&item.product_uuid) {
            Some(&position) => {
                let line = merged
                    .get_mut(position)
                    .ok_or(CheckoutServiceError::InvalidQuantity(item.product_uuid))?;

                line.1 = line
                    .1
                    .checked_add(item.quantity)
                    .ok_or(CheckoutServiceError::InvalidQuantity(item.product_uuid))?;
            }
            None => {
                positions.insert(item.product_uuid, merged.len());
                merged.push((item.product_uuid, item.quantity));
            }
        }
    }

    Ok(merged)
}

#[derive(Clone)]
pub struct PgCheckoutService {
    db: Db,
    products: PgProductsRepository,
    discounts: PgDiscountCodesRepository,
    gateway: Arc<dyn PaymentGateway>,
    settings: CheckoutSettings,
}

impl std::fmt::Debug for PgCheckoutService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgCheckoutService")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl PgCheckoutService {
    #[must_use]
    pub fn new(db: Db, gateway: Arc<dyn PaymentGateway>, settings: CheckoutSettings) -> Self {
        Self {
            db,
            products: PgProductsRepository::new(),
            discounts: PgDiscountCodesRepository::new(),
            gateway,
            settings,
        }
    }
}

#[async_trait]
impl CheckoutService for PgCheckoutService {
    #[tracing::instrument(
        name = "checkout.service.quote",
        skip(self, cart),
        fields(items = cart.items.len()),
        err
    )]
    async fn quote(&self, cart: CartRequest) -> Result<Quote, CheckoutServiceError> {
        if cart.items.is_empty() {
            return Err(CheckoutServiceError::EmptyCart);
        }

        let merged = merge_items(&cart)?;

        let uuids: Vec<ProductUuid> = merged.iter().map(|(uuid, _)| *uuid).collect();

        let mut tx = self.db.begin().await?;

        let products = self.products.get_products(&mut tx, &uuids).await?;

        let code = match cart.discount_code.as_deref().map(normalise_code) {
            Some(code) if !code.is_empty() => Some(
                self.discounts
                    .find_discount_code(&mut tx, &code)
                    .await?
                    .ok_or(CheckoutServiceError::Discount(DiscountsServiceError::NotFound))?,
            ),
            _ => None,
        };

        tx.commit().await?;

        if let Some(code) = &code {
            code.ensure_redeemable(Timestamp::now())
                .map_err(CheckoutServiceError::Discount)?;
        }

        let mut lines = Vec::with_capacity(merged.len());

        for (product_uuid, quantity) in merged {
            let product = products
                .get(&product_uuid)
                .ok_or(CheckoutServiceError::ProductNotFound(product_uuid))?;

            if !product.published {
                return Err(CheckoutServiceError::ProductUnavailable(product_uuid));
            }

            if !product.can_sell(quantity) {
                return Err(CheckoutServiceError::InsufficientStock {
                    product: product_uuid,
                    available: product.stock,
                });
            }

            lines.push(QuoteLine {
                product_uuid,
                name: product.name.clone(),
                unit_price: product.price,
                quantity,
                subtotal: line_subtotal(&CartLine::new(product.price, quantity))
                    .map_err(PricingError::from)?,
            });
        }

        let discount = code
            .as_ref()
            .map(|code| code.kind.discount())
            .transpose()
            .map_err(PricingError::from)?;

        let cart_lines: Vec<CartLine> = lines
            .iter()
            .map(|line| CartLine::new(line.unit_price, line.quantity))
            .collect();

        let totals = price_cart(&cart_lines, discount.as_ref())?;

        Ok(Quote {
            lines,
            discount_code: code.map(|code| code.code),
            totals,
        })
    }

    #[tracing::instrument(
        name = "checkout.service.create_checkout_session",
        skip(self, request),
        fields(user_uuid = ?request.user, session_id = tracing::field::Empty),
        err
    )]
    async fn create_checkout_session(
        &self,
        request: CheckoutRequest,
    ) -> Result<CheckoutSession, CheckoutServiceError> {
        let quote = self.quote(request.cart).await?;

        let digest: Vec<DigestEntry> = quote
            .lines
            .iter()
            .map(|line| DigestEntry {
                product_uuid: line.product_uuid,
                quantity: line.quantity,
                unit_price: line.unit_price,
            })
            .collect();

        let mut metadata = digest_metadata(&digest)?;

        if let Some(code) = &quote.discount_code {
            metadata.insert(DISCOUNT_CODE_METADATA_KEY.to_string(), code.clone());
            metadata.insert(
                DISCOUNT_AMOUNT_METADATA_KEY.to_string(),
                quote.totals.discount.to_string(),
            );
        }

        if let Some(user) = request.user {
            metadata.insert(USER_UUID_METADATA_KEY.to_string(), user.to_string());
        }

        let session = self
            .gateway
            .create_checkout_session(NewCheckoutSession {
                currency: self.settings.currency.clone(),
                line_items: quote
                    .lines
                    .iter()
                    .map(|line| SessionLineItem {
                        name: line.name.clone(),
                        unit_amount: line.unit_price,
                        quantity: line.quantity,
                    })
                    .collect(),
                discount_amount: quote.totals.discount,
                customer_email: request.customer_email,
                success_url: self.settings.success_url_with_session(),
                cancel_url: self.settings.cancel_url.clone(),
                shipping_countries: self.settings.shipping_countries.clone(),
                metadata,
            })
            .await?;

        tracing::Span::current().record("session_id", session.id.as_str());

        info!(total = quote.totals.total, "checkout session created");

        Ok(session)
    }
}

#[automock]
#[async_trait]
pub trait CheckoutService: Send + Sync {
    /// Price a client-side cart against current catalog prices and stock.
    async fn quote(&self, cart: CartRequest) -> Result<Quote, CheckoutServiceError>;

    /// Price the cart and open a hosted payment page for it.
    async fn create_checkout_session(
        &self,
        request: CheckoutRequest,
    ) -> Result<CheckoutSession, CheckoutServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::{
            checkout::{data::CartItemRequest, digest::decode_metadata},
            discounts::data::DiscountKind,
            products::{ProductsService, data::NewProduct},
            users::records::UserUuid,
        },
        payments::MockPaymentGateway,
        test::{
            TestContext,
            helpers::{create_discount_code, create_product, new_product},
        },
    };

    use super::*;

    fn settings() -> CheckoutSettings {
        CheckoutSettings {
            currency: "eur".to_string(),
            success_url: "https://shop.example.com/checkout/success".to_string(),
            cancel_url: "https://shop.example.com/cart".to_string(),
            shipping_countries: vec!["IT".to_string()],
        }
    }

    fn service(ctx: &TestContext, gateway: MockPaymentGateway) -> PgCheckoutService {
        PgCheckoutService::new(ctx.db(), Arc::new(gateway), settings())
    }

    fn untouched_gateway() -> MockPaymentGateway {
        let mut gateway = MockPaymentGateway::new();

        gateway.expect_create_checkout_session().never();

        gateway
    }

    fn item(product_uuid: ProductUuid, quantity: u32) -> CartItemRequest {
        CartItemRequest {
            product_uuid,
            quantity,
        }
    }

    fn cart(items: Vec<CartItemRequest>, discount_code: Option<&str>) -> CartRequest {
        CartRequest {
            items,
            discount_code: discount_code.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn quote_merges_duplicate_lines() -> TestResult {
        let ctx = TestContext::new().await;
        let vinyl = create_product(&ctx, "Control Vinyl", "control-vinyl", 2_499, 10).await?;
        let deck = create_product(&ctx, "Pioneer CDJ-2000", "pioneer-cdj-2000", 60_000, 2).await?;

        let quote = service(&ctx, untouched_gateway())
            .quote(cart(
                vec![item(vinyl.uuid, 1), item(deck.uuid, 1), item(vinyl.uuid, 2)],
                None,
            ))
            .await?;

        assert_eq!(quote.lines.len(), 2);
        assert_eq!(quote.lines[0].product_uuid, vinyl.uuid);
        assert_eq!(quote.lines[0].quantity, 3);
        assert_eq!(quote.lines[0].subtotal, 7_497);
        assert_eq!(quote.totals.subtotal, 67_497);
        assert_eq!(quote.totals.total, 67_497);

        Ok(())
    }

    #[tokio::test]
    async fn quote_applies_discount_code() -> TestResult {
        let ctx = TestContext::new().await;
        let deck = create_product(&ctx, "Pioneer CDJ-2000", "pioneer-cdj-2000", 60_000, 2).await?;
        create_discount_code(&ctx, "SPRING", DiscountKind::PercentOff(10)).await?;

        let quote = service(&ctx, untouched_gateway())
            .quote(cart(vec![item(deck.uuid, 1)], Some(" spring ")))
            .await?;

        assert_eq!(quote.discount_code.as_deref(), Some("SPRING"));
        assert_eq!(quote.totals.discount, 6_000);
        assert_eq!(quote.totals.total, 54_000);
        assert_eq!(quote.totals.total + quote.totals.discount, quote.totals.subtotal);

        Ok(())
    }

    #[tokio::test]
    async fn quote_unknown_discount_code_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let deck = create_product(&ctx, "Pioneer CDJ-2000", "pioneer-cdj-2000", 60_000, 2).await?;

        let result = service(&ctx, untouched_gateway())
            .quote(cart(vec![item(deck.uuid, 1)], Some("NOPE")))
            .await;

        assert!(
            matches!(
                result,
                Err(CheckoutServiceError::Discount(DiscountsServiceError::NotFound))
            ),
            "expected Discount(NotFound), got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn quote_rejects_unavailable_products() -> TestResult {
        let ctx = TestContext::new().await;
        let deck = create_product(&ctx, "Pioneer CDJ-2000", "pioneer-cdj-2000", 60_000, 1).await?;
        let hidden = ctx
            .products
            .create_product(NewProduct {
                published: false,
                ..new_product("Rane Sixty-Two", "rane-sixty-two", 80_000, 1)
            })
            .await?;
        let checkout = service(&ctx, untouched_gateway());

        let result = checkout.quote(cart(vec![item(deck.uuid, 2)], None)).await;
        assert!(
            matches!(
                result,
                Err(CheckoutServiceError::InsufficientStock { available: 1, .. })
            ),
            "expected InsufficientStock, got {result:?}"
        );

        let result = checkout.quote(cart(vec![item(hidden.uuid, 1)], None)).await;
        assert!(
            matches!(result, Err(CheckoutServiceError::ProductUnavailable(uuid)) if uuid == hidden.uuid),
            "expected ProductUnavailable, got {result:?}"
        );

        let missing = ProductUuid::new();
        let result = checkout.quote(cart(vec![item(missing, 1)], None)).await;
        assert!(
            matches!(result, Err(CheckoutServiceError::ProductNotFound(uuid)) if uuid == missing),
            "expected ProductNotFound, got {result:?}"
        );

        let result = checkout.quote(cart(vec![item(deck.uuid, 0)], None)).await;
        assert!(
            matches!(result, Err(CheckoutServiceError::InvalidQuantity(_))),
            "expected InvalidQuantity, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn empty_cart_never_reaches_gateway() {
        let ctx = TestContext::new().await;

        let result = service(&ctx, untouched_gateway())
            .create_checkout_session(CheckoutRequest {
                cart: CartRequest::default(),
                customer_email: None,
                user: None,
            })
            .await;

        assert!(
            matches!(result, Err(CheckoutServiceError::EmptyCart)),
            "expected EmptyCart, got {result:?}"
        );
    }

    #[tokio::test]
    async fn checkout_session_carries_cart_digest() -> TestResult {
        let ctx = TestContext::new().await;
        let deck = create_product(&ctx, "Pioneer CDJ-2000", "pioneer-cdj-2000", 60_000, 2).await?;
        create_discount_code(&ctx, "SPRING", DiscountKind::AmountOff(5_000)).await?;
        let user = UserUuid::new();
        let deck_uuid = deck.uuid;

        let mut gateway = MockPaymentGateway::new();

        gateway
            .expect_create_checkout_session()
            .once()
            .withf(move |session| {
                let digest = decode_metadata(&session.metadata);

                session.currency == "eur"
                    && session.discount_amount == 5_000
                    && session.line_items.len() == 1
                    && session.line_items[0].unit_amount == 60_000
                    && session.line_items[0].quantity == 2
                    && session.success_url.ends_with("session_id={CHECKOUT_SESSION_ID}")
                    && session.metadata.get("discount_code").map(String::as_str) == Some("SPRING")
                    && session.metadata.get("discount_amount").map(String::as_str) == Some("5000")
                    && session.metadata.get("user_uuid") == Some(&user.to_string())
                    && digest.is_ok_and(|entries| {
                        entries.len() == 1
                            && entries[0].product_uuid == deck_uuid
                            && entries[0].quantity == 2
                            && entries[0].unit_price == 60_000
                    })
            })
            .return_once(|_| {
                Ok(CheckoutSession {
                    id: "cs_test_123".to_string(),
                    url: "https://checkout.stripe.com/c/pay/cs_test_123".to_string(),
                })
            });

        let session = service(&ctx, gateway)
            .create_checkout_session(CheckoutRequest {
                cart: cart(vec![item(deck.uuid, 2)], Some("spring")),
                customer_email: Some("dj@example.com".to_string()),
                user: Some(user),
            })
            .await?;

        assert_eq!(session.id, "cs_test_123");

        Ok(())
    }
}
