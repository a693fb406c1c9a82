//! Test Helpers

use crate::{
    auth::{AuthService, AuthServiceError, Registration},
    domain::{
        categories::{
            CategoriesService, CategoriesServiceError,
            data::NewCategory,
            records::{CategoryRecord, CategoryUuid},
        },
        discounts::{
            DiscountCodesService, DiscountsServiceError,
            data::{DiscountKind, NewDiscountCode},
            records::{DiscountCodeRecord, DiscountCodeUuid},
        },
        orders::{
            data::{CheckoutLine, CompletedCheckout, ShippingAddress},
            records::OrderUuid,
        },
        products::{
            ProductsService, ProductsServiceError,
            data::{NewProduct, ProductCondition},
            records::{ProductRecord, ProductUuid},
        },
        users::records::UserRecord,
    },
    test::TestContext,
};

/// Password used for every user registered through [`register_user`].
pub(crate) const TEST_PASSWORD: &str = "rotary-mixer";

pub(crate) async fn register_user(
    ctx: &TestContext,
    email: &str,
) -> Result<UserRecord, AuthServiceError> {
    ctx.auth
        .register(Registration {
            email: email.to_string(),
            name: "Selector".to_string(),
            password: TEST_PASSWORD.to_string(),
        })
        .await
}

pub(crate) async fn create_category(
    ctx: &TestContext,
    name: &str,
    slug: &str,
) -> Result<CategoryRecord, CategoriesServiceError> {
    ctx.categories
        .create_category(NewCategory {
            uuid: CategoryUuid::new(),
            name: name.to_string(),
            slug: slug.to_string(),
            description: String::new(),
        })
        .await
}

/// A published, uncategorised product in good condition.
pub(crate) fn new_product(name: &str, slug: &str, price: u64, stock: u32) -> NewProduct {
    NewProduct {
        uuid: ProductUuid::new(),
        category_uuid: None,
        name: name.to_string(),
        slug: slug.to_string(),
        brand: "Pioneer DJ".to_string(),
        description: String::new(),
        condition: ProductCondition::Good,
        price,
        stock,
        published: true,
    }
}

pub(crate) async fn create_product(
    ctx: &TestContext,
    name: &str,
    slug: &str,
    price: u64,
    stock: u32,
) -> Result<ProductRecord, ProductsServiceError> {
    ctx.products
        .create_product(new_product(name, slug, price, stock))
        .await
}

pub(crate) async fn create_discount_code(
    ctx: &TestContext,
    code: &str,
    kind: DiscountKind,
) -> Result<DiscountCodeRecord, DiscountsServiceError> {
    ctx.discounts
        .create_discount_code(NewDiscountCode {
            uuid: DiscountCodeUuid::new(),
            code: code.to_string(),
            kind,
            active: true,
            expires_at: None,
            max_redemptions: None,
        })
        .await
}

pub(crate) fn completed_checkout(
    session_id: &str,
    lines: Vec<CheckoutLine>,
    discount_code: Option<&str>,
) -> CompletedCheckout {
    CompletedCheckout {
        uuid: OrderUuid::new(),
        session_id: session_id.to_string(),
        user_uuid: None,
        customer_email: "dj@example.com".to_string(),
        customer_name: "Selector".to_string(),
        shipping: ShippingAddress {
            line1: "Via Roma 1".to_string(),
            city: "Milano".to_string(),
            postal_code: "20121".to_string(),
            country: "IT".to_string(),
            ..ShippingAddress::default()
        },
        currency: "eur".to_string(),
        lines,
        discount_code: discount_code.map(str::to_string),
        discount_amount: None,
    }
}
