//! Orders service.

use async_trait::async_trait;
use mockall::automock;
use rigenerato::{
    cart::{CartLine, line_subtotal},
    discounts::Discount,
    pricing::{PricingError, price_cart},
};
use tracing::{info, warn};

use crate::{
    database::Db,
    domain::{
        discounts::{data::normalise_code, repository::PgDiscountCodesRepository},
        orders::{
            data::{CompletedCheckout, OrderOutcome, ShippingStatus, ShippingUpdate},
            errors::OrdersServiceError,
            records::{OrderRecord, OrderUuid},
            repository::{OrderAmounts, PgOrdersRepository},
        },
        products::repository::PgProductsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    orders: PgOrdersRepository,
    products: PgProductsRepository,
    discounts: PgDiscountCodesRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            orders: PgOrdersRepository::new(),
            products: PgProductsRepository::new(),
            discounts: PgDiscountCodesRepository::new(),
        }
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    #[tracing::instrument(
        name = "orders.service.create_from_checkout",
        skip(self, checkout),
        fields(session_id = %checkout.session_id, order_uuid = tracing::field::Empty),
        err
    )]
    async fn create_from_checkout(
        &self,
        checkout: CompletedCheckout,
    ) -> Result<OrderOutcome, OrdersServiceError> {
        if checkout.lines.is_empty() {
            return Err(OrdersServiceError::EmptyOrder);
        }

        let mut tx = self.db.begin().await?;

        let code = match checkout.discount_code.as_deref() {
            Some(code) => {
                let found = self
                    .discounts
                    .find_discount_code(&mut tx, &normalise_code(code))
                    .await?;

                if found.is_none() {
                    warn!(code, "discount code on paid session no longer exists");
                }

                found
            }
            None => None,
        };

        let discount = match checkout.discount_amount {
            Some(amount) => Some(Discount::amount_off(amount)),
            None => code
                .as_ref()
                .map(|code| code.kind.discount())
                .transpose()
                .map_err(PricingError::from)?,
        };

        let applied_code = match (&code, checkout.discount_amount) {
            (Some(code), _) => Some(code.code.clone()),
            (None, Some(_)) => checkout.discount_code.as_deref().map(normalise_code),
            (None, None) => None,
        };

        let cart_lines: Vec<CartLine> = checkout
            .lines
            .iter()
            .map(|line| CartLine::new(line.unit_price, line.quantity))
            .collect();

        let totals = price_cart(&cart_lines, discount.as_ref())?;

        let inserted = self
            .orders
            .insert_order(
                &mut tx,
                &checkout,
                applied_code.as_deref(),
                OrderAmounts {
                    subtotal: totals.subtotal,
                    discount_total: totals.discount,
                    total: totals.total,
                },
            )
            .await?;

        let Some(mut order) = inserted else {
            let existing = self
                .orders
                .get_order_by_session(&mut tx, &checkout.session_id)
                .await?;

            tx.commit().await?;

            tracing::Span::current().record("order_uuid", tracing::field::display(existing.uuid));

            info!("order already recorded for session");

            return Ok(OrderOutcome::Duplicate(existing));
        };

        for (position, (line, cart_line)) in checkout.lines.iter().zip(&cart_lines).enumerate() {
            let subtotal = line_subtotal(cart_line).map_err(PricingError::from)?;
            let position =
                u32::try_from(position).map_err(|_overflow| OrdersServiceError::InvalidData)?;

            let item = self
                .orders
                .insert_item(&mut tx, order.uuid, line, subtotal, position)
                .await?;

            self.products
                .decrement_stock(&mut tx, line.product_uuid, line.quantity)
                .await?;

            order.items.push(item);
        }

        if let Some(code) = &code {
            self.discounts
                .increment_redemptions(&mut tx, &code.code)
                .await?;
        }

        tx.commit().await?;

        tracing::Span::current().record("order_uuid", tracing::field::display(order.uuid));

        info!(total = order.total, items = order.items.len(), "created order");

        Ok(OrderOutcome::Created(order))
    }

    async fn get_order(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let order = self.orders.get_order(&mut tx, order).await?;

        tx.commit().await?;

        Ok(order)
    }

    async fn get_order_by_session(
        &self,
        session_id: &str,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let order = self.orders.get_order_by_session(&mut tx, session_id).await?;

        tx.commit().await?;

        Ok(order)
    }

    async fn list_orders(
        &self,
        status: Option<ShippingStatus>,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let orders = self.orders.list_orders(&mut tx, status).await?;

        tx.commit().await?;

        Ok(orders)
    }

    #[tracing::instrument(
        name = "orders.service.update_shipping",
        skip(self, update),
        fields(order_uuid = %order, status = %update.status),
        err
    )]
    async fn update_shipping(
        &self,
        order: OrderUuid,
        update: ShippingUpdate,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let updated = self.orders.update_shipping(&mut tx, order, &update).await?;

        tx.commit().await?;

        info!("updated shipping status");

        Ok(updated)
    }

    #[tracing::instrument(
        name = "orders.service.delete_order",
        skip(self),
        fields(order_uuid = %order),
        err
    )]
    async fn delete_order(&self, order: OrderUuid) -> Result<(), OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.orders.delete_order(&mut tx, order).await?;

        if rows_affected == 0 {
            return Err(OrdersServiceError::NotFound);
        }

        tx.commit().await?;

        info!("deleted order");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Record a paid checkout as an order. Replaying the same session returns
    /// the stored order as [`OrderOutcome::Duplicate`] without side effects.
    async fn create_from_checkout(
        &self,
        checkout: CompletedCheckout,
    ) -> Result<OrderOutcome, OrdersServiceError>;

    /// Retrieve a single order with its items.
    async fn get_order(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError>;

    /// Retrieve the order created for a payment session.
    async fn get_order_by_session(
        &self,
        session_id: &str,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Retrieves orders, newest first, optionally only those in one shipping status.
    async fn list_orders(
        &self,
        status: Option<ShippingStatus>,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError>;

    /// Set the shipping status and tracking number.
    async fn update_shipping(
        &self,
        order: OrderUuid,
        update: ShippingUpdate,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Deletes an order together with its items.
    async fn delete_order(&self, order: OrderUuid) -> Result<(), OrdersServiceError>;
}
