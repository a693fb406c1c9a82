//! Discount Codes Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::{
    database::try_column,
    domain::discounts::{
        data::{DiscountCodeUpdate, DiscountKind, NewDiscountCode},
        records::{DiscountCodeRecord, DiscountCodeUuid},
    },
};

const LIST_DISCOUNT_CODES_SQL: &str = include_str!("sql/list_discount_codes.sql");
const GET_DISCOUNT_CODE_SQL: &str = include_str!("sql/get_discount_code.sql");
const FIND_DISCOUNT_CODE_SQL: &str = include_str!("sql/find_discount_code.sql");
const CREATE_DISCOUNT_CODE_SQL: &str = include_str!("sql/create_discount_code.sql");
const UPDATE_DISCOUNT_CODE_SQL: &str = include_str!("sql/update_discount_code.sql");
const DELETE_DISCOUNT_CODE_SQL: &str = include_str!("sql/delete_discount_code.sql");
const INCREMENT_REDEMPTIONS_SQL: &str = include_str!("sql/increment_redemptions.sql");

/// Column values shared by inserts and updates.
struct DiscountCodeColumns {
    percent_off: Option<i16>,
    amount_off: Option<i64>,
    expires_at: Option<SqlxTimestamp>,
    max_redemptions: Option<i32>,
}

impl DiscountCodeColumns {
    fn new(
        kind: DiscountKind,
        expires_at: Option<Timestamp>,
        max_redemptions: Option<u32>,
    ) -> Result<Self, sqlx::Error> {
        let (percent_off, amount_off) = match kind {
            DiscountKind::PercentOff(points) => (Some(i16::from(points)), None),
            DiscountKind::AmountOff(amount) => (None, Some(try_column(amount, "amount_off")?)),
        };

        Ok(Self {
            percent_off,
            amount_off,
            expires_at: expires_at.map(SqlxTimestamp::from),
            max_redemptions: max_redemptions
                .map(|max| try_column(max, "max_redemptions"))
                .transpose()?,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgDiscountCodesRepository;

impl PgDiscountCodesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_discount_codes(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<DiscountCodeRecord>, sqlx::Error> {
        query_as::<Postgres, DiscountCodeRecord>(LIST_DISCOUNT_CODES_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_discount_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        discount_code: DiscountCodeUuid,
    ) -> Result<DiscountCodeRecord, sqlx::Error> {
        query_as::<Postgres, DiscountCodeRecord>(GET_DISCOUNT_CODE_SQL)
            .bind(discount_code.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Look up a code by its normalised text.
    pub(crate) async fn find_discount_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<Option<DiscountCodeRecord>, sqlx::Error> {
        query_as::<Postgres, DiscountCodeRecord>(FIND_DISCOUNT_CODE_SQL)
            .bind(code)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn create_discount_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        discount_code: &NewDiscountCode,
    ) -> Result<DiscountCodeRecord, sqlx::Error> {
        let columns = DiscountCodeColumns::new(
            discount_code.kind,
            discount_code.expires_at,
            discount_code.max_redemptions,
        )?;

        query_as::<Postgres, DiscountCodeRecord>(CREATE_DISCOUNT_CODE_SQL)
            .bind(discount_code.uuid.into_uuid())
            .bind(&discount_code.code)
            .bind(columns.percent_off)
            .bind(columns.amount_off)
            .bind(discount_code.active)
            .bind(columns.expires_at)
            .bind(columns.max_redemptions)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_discount_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        discount_code: DiscountCodeUuid,
        update: &DiscountCodeUpdate,
    ) -> Result<DiscountCodeRecord, sqlx::Error> {
        let columns =
            DiscountCodeColumns::new(update.kind, update.expires_at, update.max_redemptions)?;

        query_as::<Postgres, DiscountCodeRecord>(UPDATE_DISCOUNT_CODE_SQL)
            .bind(discount_code.into_uuid())
            .bind(&update.code)
            .bind(columns.percent_off)
            .bind(columns.amount_off)
            .bind(update.active)
            .bind(columns.expires_at)
            .bind(columns.max_redemptions)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_discount_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        discount_code: DiscountCodeUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_DISCOUNT_CODE_SQL)
            .bind(discount_code.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn increment_redemptions(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(INCREMENT_REDEMPTIONS_SQL)
            .bind(code)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

fn try_get_kind(row: &PgRow) -> Result<DiscountKind, sqlx::Error> {
    let percent_off: Option<i16> = row.try_get("percent_off")?;
    let amount_off: Option<i64> = row.try_get("amount_off")?;

    match (percent_off, amount_off) {
        (Some(points), None) => Ok(DiscountKind::PercentOff(try_column(points, "percent_off")?)),
        (None, Some(amount)) => Ok(DiscountKind::AmountOff(try_column(amount, "amount_off")?)),
        _ => Err(sqlx::Error::ColumnDecode {
            index: "percent_off".to_string(),
            source: "discount code must have exactly one of percent_off or amount_off".into(),
        }),
    }
}

impl<'r> FromRow<'r, PgRow> for DiscountCodeRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: DiscountCodeUuid::from_uuid(row.try_get("uuid")?),
            code: row.try_get("code")?,
            kind: try_get_kind(row)?,
            active: row.try_get("active")?,
            expires_at: row
                .try_get::<Option<SqlxTimestamp>, _>("expires_at")?
                .map(SqlxTimestamp::to_jiff),
            max_redemptions: row
                .try_get::<Option<i32>, _>("max_redemptions")?
                .map(|max| try_column(max, "max_redemptions"))
                .transpose()?,
            times_redeemed: try_column(row.try_get::<i32, _>("times_redeemed")?, "times_redeemed")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
