//! Discount codes service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::discounts::{
        data::{DiscountCodeUpdate, NewDiscountCode, normalise_code},
        errors::DiscountsServiceError,
        records::{DiscountCodeRecord, DiscountCodeUuid},
        repository::PgDiscountCodesRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgDiscountCodesService {
    db: Db,
    repository: PgDiscountCodesRepository,
}

impl PgDiscountCodesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgDiscountCodesRepository::new(),
        }
    }
}

#[async_trait]
impl DiscountCodesService for PgDiscountCodesService {
    async fn list_discount_codes(&self) -> Result<Vec<DiscountCodeRecord>, DiscountsServiceError> {
        let mut tx = self.db.begin().await?;

        let codes = self.repository.list_discount_codes(&mut tx).await?;

        tx.commit().await?;

        Ok(codes)
    }

    async fn get_discount_code(
        &self,
        discount_code: DiscountCodeUuid,
    ) -> Result<DiscountCodeRecord, DiscountsServiceError> {
        let mut tx = self.db.begin().await?;

        let code = self
            .repository
            .get_discount_code(&mut tx, discount_code)
            .await?;

        tx.commit().await?;

        Ok(code)
    }

    #[tracing::instrument(
        name = "discounts.service.create_discount_code",
        skip(self, discount_code),
        fields(discount_code_uuid = %discount_code.uuid),
        err
    )]
    async fn create_discount_code(
        &self,
        discount_code: NewDiscountCode,
    ) -> Result<DiscountCodeRecord, DiscountsServiceError> {
        let discount_code = NewDiscountCode {
            code: normalise_code(&discount_code.code),
            ..discount_code
        };

        discount_code
            .kind
            .discount()
            .map_err(|_out_of_range| DiscountsServiceError::InvalidData)?;

        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_discount_code(&mut tx, &discount_code)
            .await?;

        tx.commit().await?;

        info!(code = %created.code, "created discount code");

        Ok(created)
    }

    #[tracing::instrument(
        name = "discounts.service.update_discount_code",
        skip(self, update),
        fields(discount_code_uuid = %discount_code),
        err
    )]
    async fn update_discount_code(
        &self,
        discount_code: DiscountCodeUuid,
        update: DiscountCodeUpdate,
    ) -> Result<DiscountCodeRecord, DiscountsServiceError> {
        let update = DiscountCodeUpdate {
            code: normalise_code(&update.code),
            ..update
        };

        update
            .kind
            .discount()
            .map_err(|_out_of_range| DiscountsServiceError::InvalidData)?;

        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .update_discount_code(&mut tx, discount_code, &update)
            .await?;

        tx.commit().await?;

        info!("updated discount code");

        Ok(updated)
    }

    #[tracing::instrument(
        name = "discounts.service.delete_discount_code",
        skip(self),
        fields(discount_code_uuid = %discount_code),
        err
    )]
    async fn delete_discount_code(
        &self,
        discount_code: DiscountCodeUuid,
    ) -> Result<(), DiscountsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self
            .repository
            .delete_discount_code(&mut tx, discount_code)
            .await?;

        if rows_affected == 0 {
            return Err(DiscountsServiceError::NotFound);
        }

        tx.commit().await?;

        info!("deleted discount code");

        Ok(())
    }

    async fn redeemable_code(
        &self,
        code: &str,
        now: Timestamp,
    ) -> Result<DiscountCodeRecord, DiscountsServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self
            .repository
            .find_discount_code(&mut tx, &normalise_code(code))
            .await?
            .ok_or(DiscountsServiceError::NotFound)?;

        tx.commit().await?;

        record.ensure_redeemable(now)?;

        Ok(record)
    }
}

#[automock]
#[async_trait]
pub trait DiscountCodesService: Send + Sync {
    /// Retrieves all discount codes, newest first.
    async fn list_discount_codes(&self) -> Result<Vec<DiscountCodeRecord>, DiscountsServiceError>;

    /// Retrieve a single discount code.
    async fn get_discount_code(
        &self,
        discount_code: DiscountCodeUuid,
    ) -> Result<DiscountCodeRecord, DiscountsServiceError>;

    /// Creates a discount code. The code text is stored uppercase.
    async fn create_discount_code(
        &self,
        discount_code: NewDiscountCode,
    ) -> Result<DiscountCodeRecord, DiscountsServiceError>;

    /// Replaces the editable fields of a discount code.
    async fn update_discount_code(
        &self,
        discount_code: DiscountCodeUuid,
        update: DiscountCodeUpdate,
    ) -> Result<DiscountCodeRecord, DiscountsServiceError>;

    /// Deletes a discount code. Orders keep the code text they were placed with.
    async fn delete_discount_code(
        &self,
        discount_code: DiscountCodeUuid,
    ) -> Result<(), DiscountsServiceError>;

    /// Look up a code a customer typed in and check it can be applied at `now`.
    async fn redeemable_code(
        &self,
        code: &str,
        now: Timestamp,
    ) -> Result<DiscountCodeRecord, DiscountsServiceError>;
}
