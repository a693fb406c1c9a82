//! Products Data

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{
    categories::records::CategoryUuid,
    products::records::{ProductImageUuid, ProductUuid},
};

/// Grading of a refurbished unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductCondition {
    LikeNew,
    Excellent,
    Good,
    Fair,
}

impl ProductCondition {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LikeNew => "like_new",
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
        }
    }
}

impl fmt::Display for ProductCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown product condition: {0}")]
pub struct UnknownConditionError(pub String);

impl FromStr for ProductCondition {
    type Err = UnknownConditionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "like_new" => Ok(Self::LikeNew),
            "excellent" => Ok(Self::Excellent),
            "good" => Ok(Self::Good),
            "fair" => Ok(Self::Fair),
            other => Err(UnknownConditionError(other.to_string())),
        }
    }
}

/// New Product Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
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
}

/// Product Update Data
#[derive(Debug, Clone, PartialEq)]
pub struct ProductUpdate {
    pub category_uuid: Option<CategoryUuid>,
    pub name: String,
    pub slug: String,
    pub brand: String,
    pub description: String,
    pub condition: ProductCondition,
    pub price: u64,
    pub stock: u32,
    pub published: bool,
}

/// Product listing filter
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProductFilter {
    pub category: Option<CategoryUuid>,
    pub published_only: bool,
}

impl ProductFilter {
    /// Filter for the public storefront.
    #[must_use]
    pub fn storefront(category: Option<CategoryUuid>) -> Self {
        Self {
            category,
            published_only: true,
        }
    }
}

/// New Product Image Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewProductImage {
    pub uuid: ProductImageUuid,
    pub url: String,
    pub alt: String,
    pub position: u32,
}
