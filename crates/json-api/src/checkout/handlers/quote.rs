//! Cart Quote Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rigenerato_app::domain::checkout::data::{Quote, QuoteLine};

use crate::{
    checkout::{
        errors::into_status_error,
        handlers::{CartItemBody, into_cart},
    },
    extensions::*,
    money::display_amount,
    state::State,
};

/// Cart Quote Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct QuoteRequest {
    pub items: Vec<CartItemBody>,
    pub discount_code: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct QuoteLineResponse {
    pub product_uuid: Uuid,
    pub name: String,
    pub unit_price: u64,
    pub unit_price_display: String,
    pub quantity: u32,
    pub subtotal: u64,
    pub subtotal_display: String,
}

impl QuoteLineResponse {
    fn new(line: QuoteLine, currency: &str) -> Self {
        QuoteLineResponse {
            product_uuid: line.product_uuid.into_uuid(),
            name: line.name,
            unit_price: line.unit_price,
            unit_price_display: display_amount(line.unit_price, currency),
            quantity: line.quantity,
            subtotal: line.subtotal,
            subtotal_display: display_amount(line.subtotal, currency),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct QuoteResponse {
    pub lines: Vec<QuoteLineResponse>,
    pub discount_code: Option<String>,
    pub currency: String,
    pub subtotal: u64,
    pub subtotal_display: String,
    pub discount: u64,
    pub discount_display: String,
    pub total: u64,
    pub total_display: String,
}

impl QuoteResponse {
    fn new(quote: Quote, currency: &str) -> Self {
        let totals = quote.totals;

        QuoteResponse {
            lines: quote
                .lines
                .into_iter()
                .map(|line| QuoteLineResponse::new(line, currency))
                .collect(),
            discount_code: quote.discount_code,
            currency: currency.to_string(),
            subtotal: totals.subtotal,
            subtotal_display: display_amount(totals.subtotal, currency),
            discount: totals.discount,
            discount_display: display_amount(totals.discount, currency),
            total: totals.total,
            total_display: display_amount(totals.total, currency),
        }
    }
}

/// Cart Quote Handler
///
/// Prices a client-side cart against current prices, stock and the optional
/// discount code. Nothing is reserved.
#[endpoint(
    tags("checkout"),
    summary = "Quote Cart",
    responses(
        (status_code = StatusCode::OK, description = "Cart priced"),
        (status_code = StatusCode::BAD_REQUEST, description = "Empty cart or invalid quantity"),
        (status_code = StatusCode::NOT_FOUND, description = "Unknown product or discount code"),
        (status_code = StatusCode::CONFLICT, description = "Not enough stock or code not redeemable"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<QuoteRequest>,
    depot: &mut Depot,
) -> Result<Json<QuoteResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let quote = state
        .app
        .checkout
        .quote(into_cart(request.items, request.discount_code))
        .await
        .map_err(into_status_error)?;

    Ok(Json(QuoteResponse::new(quote, &state.currency)))
}

#[cfg(test)]
mod tests {
    use rigenerato::pricing::Totals;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use rigenerato_app::domain::{
        checkout::{
            CheckoutServiceError,
            data::{CartItemRequest, CartRequest},
        },
        discounts::DiscountsServiceError,
        products::records::ProductUuid,
    };

    use crate::test_helpers::{Mocks, public_service};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        public_service(mocks, Router::with_path("cart/quote").post(handler))
    }

    #[tokio::test]
    async fn test_quote_with_discount() -> TestResult {
        let product = ProductUuid::new();
        let mut mocks = Mocks::default();

        mocks
            .checkout
            .expect_quote()
            .once()
            .withf(move |cart| {
                *cart
                    == CartRequest {
                        items: vec![CartItemRequest {
                            product_uuid: product,
                            quantity: 2,
                        }],
                        discount_code: Some("spring10".to_string()),
                    }
            })
            .return_once(move |_| {
                Ok(Quote {
                    lines: vec![QuoteLine {
                        product_uuid: product,
                        name: "Technics SL-1210MK2".to_string(),
                        unit_price: 64_900,
                        quantity: 2,
                        subtotal: 129_800,
                    }],
                    discount_code: Some("SPRING10".to_string()),
                    totals: Totals {
                        subtotal: 129_800,
                        discount: 12_980,
                        total: 116_820,
                    },
                })
            });

        let mut res = TestClient::post("http://example.com/cart/quote")
            .json(&json!({
                "items": [{ "product_uuid": product.into_uuid(), "quantity": 2 }],
                "discount_code": "spring10",
            }))
            .send(&make_service(mocks))
            .await;

        let body: QuoteResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.lines[0].unit_price_display, "€649,00");
        assert_eq!(body.discount, 12_980);
        assert_eq!(body.total, 116_820);
        assert_eq!(body.total_display, "€1.168,20");
        assert_eq!(body.discount_code.as_deref(), Some("SPRING10"));

        Ok(())
    }

    #[tokio::test]
    async fn test_blank_discount_code_is_ignored() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .checkout
            .expect_quote()
            .once()
            .withf(|cart| cart.discount_code.is_none())
            .return_once(|_| Err(CheckoutServiceError::EmptyCart));

        let res = TestClient::post("http://example.com/cart/quote")
            .json(&json!({ "items": [], "discount_code": "  " }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_insufficient_stock_returns_409() -> TestResult {
        let product = ProductUuid::new();
        let mut mocks = Mocks::default();

        mocks.checkout.expect_quote().once().return_once(move |_| {
            Err(CheckoutServiceError::InsufficientStock {
                product,
                available: 1,
            })
        });

        let res = TestClient::post("http://example.com/cart/quote")
            .json(&json!({ "items": [{ "product_uuid": product.into_uuid(), "quantity": 3 }] }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn test_expired_code_returns_409() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .checkout
            .expect_quote()
            .once()
            .return_once(|_| Err(CheckoutServiceError::Discount(DiscountsServiceError::Expired)));

        let res = TestClient::post("http://example.com/cart/quote")
            .json(&json!({
                "items": [{ "product_uuid": ProductUuid::new().into_uuid(), "quantity": 1 }],
                "discount_code": "WINTER",
            }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_product_returns_404() -> TestResult {
        let product = ProductUuid::new();
        let mut mocks = Mocks::default();

        mocks
            .checkout
            .expect_quote()
            .once()
            .return_once(move |_| Err(CheckoutServiceError::ProductNotFound(product)));

        let res = TestClient::post("http://example.com/cart/quote")
            .json(&json!({ "items": [{ "product_uuid": product.into_uuid(), "quantity": 1 }] }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
