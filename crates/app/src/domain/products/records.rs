//! Product Records

use jiff::Timestamp;
use smallvec::SmallVec;

use crate::{
    domain::{categories::records::CategoryUuid, products::data::ProductCondition},
    uuids::TypedUuid,
};

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// Product Image UUID
pub type ProductImageUuid = TypedUuid<ProductImageRecord>;

/// Images of a single product, ordered by position.
pub type ProductImages = SmallVec<[ProductImageRecord; 4]>;

/// Product Record
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub uuid: ProductUuid,
    pub category_uuid: Option<CategoryUuid>,
    pub name: String,
    pub slug: String,
    pub brand: String,
    pub description: String,
    pub condition: ProductCondition,
    pub price: u64,
    pub stock: u32,
    pub published: bool,
    pub images: ProductImages,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ProductRecord {
    /// Whether `quantity` units can be sold right now.
    #[must_use]
    pub fn can_sell(&self, quantity: u32) -> bool {
        self.published && quantity > 0 && quantity <= self.stock
    }
}

/// Product Image Record
#[derive(Debug, Clone, PartialEq)]
pub struct ProductImageRecord {
    pub uuid: ProductImageUuid,
    pub product_uuid: ProductUuid,
    pub url: String,
    pub alt: String,
    pub position: u32,
    pub created_at: Timestamp,
}
