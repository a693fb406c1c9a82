//! Products Repository

use std::str::FromStr;

use jiff_sqlx::Timestamp as SqlxTimestamp;
use rustc_hash::FxHashMap;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    database::try_column,
    domain::{
        categories::records::CategoryUuid,
        products::{
            data::{NewProduct, NewProductImage, ProductCondition, ProductFilter, ProductUpdate},
            records::{
                ProductImageRecord, ProductImageUuid, ProductImages, ProductRecord, ProductUuid,
            },
        },
    },
};

const LIST_PRODUCTS_SQL: &str = include_str!("sql/list_products.sql");
const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const GET_PRODUCT_BY_SLUG_SQL: &str = include_str!("sql/get_product_by_slug.sql");
const GET_PRODUCTS_SQL: &str = include_str!("sql/get_products.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const UPDATE_PRODUCT_SQL: &str = include_str!("sql/update_product.sql");
const DELETE_PRODUCT_SQL: &str = include_str!("sql/delete_product.sql");
const DECREMENT_STOCK_SQL: &str = include_str!("sql/decrement_stock.sql");
const LIST_PRODUCT_IMAGES_SQL: &str = include_str!("sql/list_product_images.sql");
const CREATE_PRODUCT_IMAGE_SQL: &str = include_str!("sql/create_product_image.sql");
const DELETE_PRODUCT_IMAGE_SQL: &str = include_str!("sql/delete_product_image.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProductsRepository;

impl PgProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: ProductFilter,
    ) -> Result<Vec<ProductRecord>, sqlx::Error> {
        let mut products = query_as::<Postgres, ProductRecord>(LIST_PRODUCTS_SQL)
            .bind(filter.category.map(CategoryUuid::into_uuid))
            .bind(filter.published_only)
            .fetch_all(&mut **tx)
            .await?;

        self.attach_images(tx, &mut products).await?;

        Ok(products)
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<ProductRecord, sqlx::Error> {
        let product = query_as::<Postgres, ProductRecord>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        self.with_images(tx, product).await
    }

    pub(crate) async fn get_product_by_slug(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        slug: &str,
    ) -> Result<ProductRecord, sqlx::Error> {
        let product = query_as::<Postgres, ProductRecord>(GET_PRODUCT_BY_SLUG_SQL)
            .bind(slug)
            .fetch_one(&mut **tx)
            .await?;

        self.with_images(tx, product).await
    }

    /// Load the given products without images. Unknown uuids are absent
    /// from the result.
    pub(crate) async fn get_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        products: &[ProductUuid],
    ) -> Result<FxHashMap<ProductUuid, ProductRecord>, sqlx::Error> {
        let uuids: Vec<Uuid> = products.iter().map(|p| p.into_uuid()).collect();

        let rows = query_as::<Postgres, ProductRecord>(GET_PRODUCTS_SQL)
            .bind(&uuids)
            .fetch_all(&mut **tx)
            .await?;

        Ok(rows.into_iter().map(|p| (p.uuid, p)).collect())
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: &NewProduct,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(CREATE_PRODUCT_SQL)
            .bind(product.uuid.into_uuid())
            .bind(product.category_uuid.map(CategoryUuid::into_uuid))
            .bind(&product.name)
            .bind(&product.slug)
            .bind(&product.brand)
            .bind(&product.description)
            .bind(product.condition.as_str())
            .bind(try_column::<u64, i64>(product.price, "price")?)
            .bind(try_column::<u32, i32>(product.stock, "stock")?)
            .bind(product.published)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        update: &ProductUpdate,
    ) -> Result<ProductRecord, sqlx::Error> {
        let product = query_as::<Postgres, ProductRecord>(UPDATE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .bind(update.category_uuid.map(CategoryUuid::into_uuid))
            .bind(&update.name)
            .bind(&update.slug)
            .bind(&update.brand)
            .bind(&update.description)
            .bind(update.condition.as_str())
            .bind(try_column::<u64, i64>(update.price, "price")?)
            .bind(try_column::<u32, i32>(update.stock, "stock")?)
            .bind(update.published)
            .fetch_one(&mut **tx)
            .await?;

        self.with_images(tx, product).await
    }

    pub(crate) async fn delete_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Take `quantity` units out of stock, stopping at zero.
    pub(crate) async fn decrement_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DECREMENT_STOCK_SQL)
            .bind(product.into_uuid())
            .bind(try_column::<u32, i32>(quantity, "quantity")?)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn create_image(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        image: &NewProductImage,
    ) -> Result<ProductImageRecord, sqlx::Error> {
        query_as::<Postgres, ProductImageRecord>(CREATE_PRODUCT_IMAGE_SQL)
            .bind(image.uuid.into_uuid())
            .bind(product.into_uuid())
            .bind(&image.url)
            .bind(&image.alt)
            .bind(try_column::<u32, i32>(image.position, "position")?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_image(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        image: ProductImageUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_PRODUCT_IMAGE_SQL)
            .bind(image.into_uuid())
            .bind(product.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    async fn with_images(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductRecord,
    ) -> Result<ProductRecord, sqlx::Error> {
        let mut products = vec![product];

        self.attach_images(tx, &mut products).await?;

        products.pop().ok_or(sqlx::Error::RowNotFound)
    }

    async fn attach_images(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        products: &mut [ProductRecord],
    ) -> Result<(), sqlx::Error> {
        if products.is_empty() {
            return Ok(());
        }

        let uuids: Vec<Uuid> = products.iter().map(|p| p.uuid.into_uuid()).collect();

        let images = query_as::<Postgres, ProductImageRecord>(LIST_PRODUCT_IMAGES_SQL)
            .bind(&uuids)
            .fetch_all(&mut **tx)
            .await?;

        let mut by_product: FxHashMap<ProductUuid, ProductImages> = FxHashMap::default();

        for image in images {
            by_product.entry(image.product_uuid).or_default().push(image);
        }

        for product in products.iter_mut() {
            if let Some(images) = by_product.remove(&product.uuid) {
                product.images = images;
            }
        }

        Ok(())
    }
}

impl<'r> FromRow<'r, PgRow> for ProductRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let condition: String = row.try_get("condition")?;

        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            category_uuid: row
                .try_get::<Option<Uuid>, _>("category_uuid")?
                .map(CategoryUuid::from_uuid),
            name: row.try_get("name")?,
            slug: row.try_get("slug")?,
            brand: row.try_get("brand")?,
            description: row.try_get("description")?,
            condition: ProductCondition::from_str(&condition).map_err(|e| {
                sqlx::Error::ColumnDecode {
                    index: "condition".to_string(),
                    source: Box::new(e),
                }
            })?,
            price: try_column::<i64, u64>(row.try_get("price")?, "price")?,
            stock: try_column::<i32, u32>(row.try_get("stock")?, "stock")?,
            published: row.try_get("published")?,
            images: ProductImages::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for ProductImageRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ProductImageUuid::from_uuid(row.try_get("uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            url: row.try_get("url")?,
            alt: row.try_get("alt")?,
            position: try_column::<i32, u32>(row.try_get("position")?, "position")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
