//! Orders Repository

use std::str::FromStr;

use jiff_sqlx::Timestamp as SqlxTimestamp;
use rustc_hash::FxHashMap;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    database::try_column,
    domain::{
        orders::{
            data::{
                CheckoutLine, CompletedCheckout, PaymentStatus, ShippingAddress, ShippingStatus,
                ShippingUpdate,
            },
            records::{OrderItemRecord, OrderItemUuid, OrderRecord, OrderUuid},
        },
        products::records::ProductUuid,
        users::records::UserUuid,
    },
};

const INSERT_ORDER_SQL: &str = include_str!("sql/insert_order.sql");
const INSERT_ORDER_ITEM_SQL: &str = include_str!("sql/insert_order_item.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const GET_ORDER_BY_SESSION_SQL: &str = include_str!("sql/get_order_by_session.sql");
const LIST_ORDERS_SQL: &str = include_str!("sql/list_orders.sql");
const LIST_ORDER_ITEMS_SQL: &str = include_str!("sql/list_order_items.sql");
const UPDATE_SHIPPING_SQL: &str = include_str!("sql/update_shipping.sql");
const DELETE_ORDER_SQL: &str = include_str!("sql/delete_order.sql");

/// Totals written alongside a new order.
#[derive(Debug, Clone, Copy)]
pub(crate) struct OrderAmounts {
    pub subtotal: u64,
    pub discount_total: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Insert the order header. Returns `None` when an order for the same
    /// session already exists.
    pub(crate) async fn insert_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        checkout: &CompletedCheckout,
        discount_code: Option<&str>,
        amounts: OrderAmounts,
    ) -> Result<Option<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(INSERT_ORDER_SQL)
            .bind(checkout.uuid.into_uuid())
            .bind(&checkout.session_id)
            .bind(checkout.user_uuid.map(UserUuid::into_uuid))
            .bind(&checkout.customer_email)
            .bind(&checkout.customer_name)
            .bind(&checkout.shipping.line1)
            .bind(&checkout.shipping.line2)
            .bind(&checkout.shipping.city)
            .bind(&checkout.shipping.postal_code)
            .bind(&checkout.shipping.country)
            .bind(&checkout.currency)
            .bind(try_column::<u64, i64>(amounts.subtotal, "subtotal")?)
            .bind(try_column::<u64, i64>(amounts.discount_total, "discount_total")?)
            .bind(try_column::<u64, i64>(amounts.total, "total")?)
            .bind(discount_code)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn insert_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        line: &CheckoutLine,
        subtotal: u64,
        position: u32,
    ) -> Result<OrderItemRecord, sqlx::Error> {
        query_as::<Postgres, OrderItemRecord>(INSERT_ORDER_ITEM_SQL)
            .bind(OrderItemUuid::new().into_uuid())
            .bind(order.into_uuid())
            .bind(line.product_uuid.into_uuid())
            .bind(try_column::<u64, i64>(line.unit_price, "unit_price")?)
            .bind(try_column::<u32, i32>(line.quantity, "quantity")?)
            .bind(try_column::<u64, i64>(subtotal, "subtotal")?)
            .bind(try_column::<u32, i32>(position, "position")?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        let order = query_as::<Postgres, OrderRecord>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        self.with_items(tx, order).await
    }

    pub(crate) async fn get_order_by_session(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        session_id: &str,
    ) -> Result<OrderRecord, sqlx::Error> {
        let order = query_as::<Postgres, OrderRecord>(GET_ORDER_BY_SESSION_SQL)
            .bind(session_id)
            .fetch_one(&mut **tx)
            .await?;

        self.with_items(tx, order).await
    }

    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        status: Option<ShippingStatus>,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        let mut orders = query_as::<Postgres, OrderRecord>(LIST_ORDERS_SQL)
            .bind(status.map(ShippingStatus::as_str))
            .fetch_all(&mut **tx)
            .await?;

        self.attach_items(tx, &mut orders).await?;

        Ok(orders)
    }

    pub(crate) async fn update_shipping(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        update: &ShippingUpdate,
    ) -> Result<OrderRecord, sqlx::Error> {
        let order = query_as::<Postgres, OrderRecord>(UPDATE_SHIPPING_SQL)
            .bind(order.into_uuid())
            .bind(update.status.as_str())
            .bind(update.tracking_number.as_deref())
            .fetch_one(&mut **tx)
            .await?;

        self.with_items(tx, order).await
    }

    pub(crate) async fn delete_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_ORDER_SQL)
            .bind(order.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    async fn with_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderRecord,
    ) -> Result<OrderRecord, sqlx::Error> {
        let mut orders = vec![order];

        self.attach_items(tx, &mut orders).await?;

        orders.pop().ok_or(sqlx::Error::RowNotFound)
    }

    async fn attach_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &mut [OrderRecord],
    ) -> Result<(), sqlx::Error> {
        if orders.is_empty() {
            return Ok(());
        }

        let uuids: Vec<Uuid> = orders.iter().map(|o| o.uuid.into_uuid()).collect();

        let items = query_as::<Postgres, OrderItemRecord>(LIST_ORDER_ITEMS_SQL)
            .bind(&uuids)
            .fetch_all(&mut **tx)
            .await?;

        let mut by_order: FxHashMap<OrderUuid, Vec<OrderItemRecord>> = FxHashMap::default();

        for item in items {
            by_order.entry(item.order_uuid).or_default().push(item);
        }

        for order in orders.iter_mut() {
            if let Some(items) = by_order.remove(&order.uuid) {
                order.items = items;
            }
        }

        Ok(())
    }
}

fn parse_column<T: FromStr>(row: &PgRow, column: &'static str) -> Result<T, sqlx::Error>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value: String = row.try_get(column)?;

    value.parse::<T>().map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            session_id: row.try_get("session_id")?,
            user_uuid: row
                .try_get::<Option<Uuid>, _>("user_uuid")?
                .map(UserUuid::from_uuid),
            customer_email: row.try_get("customer_email")?,
            customer_name: row.try_get("customer_name")?,
            shipping: ShippingAddress {
                line1: row.try_get("shipping_line1")?,
                line2: row.try_get("shipping_line2")?,
                city: row.try_get("shipping_city")?,
                postal_code: row.try_get("shipping_postal_code")?,
                country: row.try_get("shipping_country")?,
            },
            currency: row.try_get("currency")?,
            subtotal: try_column::<i64, u64>(row.try_get("subtotal")?, "subtotal")?,
            discount_total: try_column::<i64, u64>(
                row.try_get("discount_total")?,
                "discount_total",
            )?,
            total: try_column::<i64, u64>(row.try_get("total")?, "total")?,
            discount_code: row.try_get("discount_code")?,
            payment_status: parse_column::<PaymentStatus>(row, "payment_status")?,
            shipping_status: parse_column::<ShippingStatus>(row, "shipping_status")?,
            tracking_number: row.try_get("tracking_number")?,
            items: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderItemRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderItemUuid::from_uuid(row.try_get("uuid")?),
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            product_uuid: row
                .try_get::<Option<Uuid>, _>("product_uuid")?
                .map(ProductUuid::from_uuid),
            product_name: row.try_get("product_name")?,
            unit_price: try_column::<i64, u64>(row.try_get("unit_price")?, "unit_price")?,
            quantity: try_column::<i32, u32>(row.try_get("quantity")?, "quantity")?,
            subtotal: try_column::<i64, u64>(row.try_get("subtotal")?, "subtotal")?,
            position: try_column::<i32, u32>(row.try_get("position")?, "position")?,
        })
    }
}
