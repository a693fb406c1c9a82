//! Product Handlers

pub(crate) mod admin_index;
pub(crate) mod create;
pub(crate) mod delete;
pub(crate) mod get;
pub(crate) mod images;
pub(crate) mod index;
pub(crate) mod show;
pub(crate) mod update;

use salvo::{http::StatusError, oapi::ToSchema};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rigenerato_app::domain::products::{
    data::ProductCondition,
    records::{ProductImageRecord, ProductRecord},
};

use crate::{extensions::*, money::display_amount};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductImageResponse {
    pub uuid: Uuid,
    pub url: String,
    pub alt: String,
    pub position: u32,
}

impl From<ProductImageRecord> for ProductImageResponse {
    fn from(image: ProductImageRecord) -> Self {
        ProductImageResponse {
            uuid: image.uuid.into_uuid(),
            url: image.url,
            alt: image.alt,
            position: image.position,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductResponse {
    pub uuid: Uuid,
    pub category_uuid: Option<Uuid>,
    pub name: String,
    pub slug: String,
    pub brand: String,
    pub description: String,
    /// One of `like_new`, `excellent`, `good`, `fair`
    pub condition: String,
    /// Price in minor units
    pub price: u64,
    pub price_display: String,
    pub stock: u32,
    pub in_stock: bool,
    pub published: bool,
    pub images: Vec<ProductImageResponse>,
    pub created_at: String,
    pub updated_at: String,
}

impl ProductResponse {
    pub(crate) fn new(product: ProductRecord, currency: &str) -> Self {
        ProductResponse {
            uuid: product.uuid.into_uuid(),
            category_uuid: product.category_uuid.map(|uuid| uuid.into_uuid()),
            name: product.name,
            slug: product.slug,
            brand: product.brand,
            description: product.description,
            condition: product.condition.to_string(),
            price: product.price,
            price_display: display_amount(product.price, currency),
            stock: product.stock,
            in_stock: product.stock > 0,
            published: product.published,
            images: product.images.into_iter().map(Into::into).collect(),
            created_at: product.created_at.to_string(),
            updated_at: product.updated_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductsResponse {
    pub products: Vec<ProductResponse>,
}

impl ProductsResponse {
    pub(crate) fn new(products: Vec<ProductRecord>, currency: &str) -> Self {
        ProductsResponse {
            products: products
                .into_iter()
                .map(|product| ProductResponse::new(product, currency))
                .collect(),
        }
    }
}

/// Product create and update payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductRequest {
    pub category_uuid: Option<Uuid>,
    pub name: String,
    pub slug: String,
    pub brand: String,
    #[serde(default)]
    pub description: String,
    pub condition: String,
    pub price: u64,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub published: bool,
}

pub(crate) fn parse_condition(value: &str) -> Result<ProductCondition, StatusError> {
    value.parse::<ProductCondition>().or_400("Unknown product condition")
}
