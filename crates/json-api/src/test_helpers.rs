//! Test helpers.

use std::sync::Arc;

use jiff::{SignedDuration, Timestamp};
use salvo::{affix_state::inject, prelude::*};
use smallvec::smallvec;
use uuid::Uuid;

use rigenerato_app::{
    auth::{Identity, MockAuthService, SessionUuid},
    context::AppContext,
    domain::{
        categories::{
            MockCategoriesService,
            records::{CategoryRecord, CategoryUuid},
        },
        checkout::MockCheckoutService,
        discounts::{
            MockDiscountCodesService,
            data::DiscountKind,
            records::{DiscountCodeRecord, DiscountCodeUuid},
        },
        orders::{
            MockOrdersService,
            data::{PaymentStatus, ShippingAddress, ShippingStatus},
            records::{OrderItemRecord, OrderItemUuid, OrderRecord, OrderUuid},
        },
        products::{
            MockProductsService,
            data::ProductCondition,
            records::{ProductImageRecord, ProductImageUuid, ProductRecord, ProductUuid},
        },
        users::{
            MockUsersService,
            data::UserRole,
            records::{UserRecord, UserUuid},
        },
        webhooks::{PaymentWebhooks, WebhookSecret},
    },
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_WEBHOOK_SECRET: &str = "whsec_test_secret";

pub(crate) const TEST_CUSTOMER_UUID: UserUuid = UserUuid::from_uuid(Uuid::nil());

pub(crate) const TEST_ADMIN_UUID: UserUuid = UserUuid::from_uuid(Uuid::from_u128(1));

/// One mock per service. Calls without a matching expectation panic.
pub(crate) struct Mocks {
    pub auth: MockAuthService,
    pub users: MockUsersService,
    pub categories: MockCategoriesService,
    pub products: MockProductsService,
    pub discounts: MockDiscountCodesService,
    pub orders: MockOrdersService,
    pub checkout: MockCheckoutService,
    /// Orders service seen by the payment webhook.
    pub webhook_orders: MockOrdersService,
}

impl Default for Mocks {
    fn default() -> Self {
        Self {
            auth: MockAuthService::new(),
            users: MockUsersService::new(),
            categories: MockCategoriesService::new(),
            products: MockProductsService::new(),
            discounts: MockDiscountCodesService::new(),
            orders: MockOrdersService::new(),
            checkout: MockCheckoutService::new(),
            webhook_orders: MockOrdersService::new(),
        }
    }
}

impl Mocks {
    pub(crate) fn into_state(self) -> Arc<State> {
        let webhooks = PaymentWebhooks::new(
            Arc::new(self.webhook_orders),
            WebhookSecret::new(TEST_WEBHOOK_SECRET),
        )
        .with_tolerance(SignedDuration::from_mins(5));

        State::from_app_context(AppContext {
            auth: Arc::new(self.auth),
            users: Arc::new(self.users),
            categories: Arc::new(self.categories),
            products: Arc::new(self.products),
            discounts: Arc::new(self.discounts),
            orders: Arc::new(self.orders),
            checkout: Arc::new(self.checkout),
            webhooks: Arc::new(webhooks),
        })
    }
}

pub(crate) fn customer_identity() -> Identity {
    Identity {
        user: TEST_CUSTOMER_UUID,
        role: UserRole::Customer,
        session: SessionUuid::from_uuid(Uuid::nil()),
    }
}

pub(crate) fn admin_identity() -> Identity {
    Identity {
        user: TEST_ADMIN_UUID,
        role: UserRole::Admin,
        session: SessionUuid::from_uuid(Uuid::from_u128(1)),
    }
}

#[salvo::handler]
pub(crate) async fn inject_customer(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_identity(customer_identity());
    ctrl.call_next(req, depot, res).await;
}

#[salvo::handler]
pub(crate) async fn inject_admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_identity(admin_identity());
    ctrl.call_next(req, depot, res).await;
}

/// Serve `route` without an authenticated caller.
pub(crate) fn public_service(mocks: Mocks, route: Router) -> Service {
    Service::new(Router::new().hoop(inject(mocks.into_state())).push(route))
}

/// Serve `route` as a signed-in customer.
pub(crate) fn customer_service(mocks: Mocks, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(mocks.into_state()))
            .hoop(inject_customer)
            .push(route),
    )
}

/// Serve `route` as a signed-in administrator.
pub(crate) fn admin_service(mocks: Mocks, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(mocks.into_state()))
            .hoop(inject_admin)
            .push(route),
    )
}

pub(crate) fn make_category(uuid: CategoryUuid) -> CategoryRecord {
    CategoryRecord {
        uuid,
        name: "Mixer".to_string(),
        slug: "mixer".to_string(),
        description: "Mixer DJ revisionati".to_string(),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_product(uuid: ProductUuid) -> ProductRecord {
    ProductRecord {
        uuid,
        category_uuid: None,
        name: "Pioneer DJM-900NXS2".to_string(),
        slug: "pioneer-djm-900nxs2".to_string(),
        brand: "Pioneer DJ".to_string(),
        description: "Four channel club mixer".to_string(),
        condition: ProductCondition::Excellent,
        price: 149_900,
        stock: 1,
        published: true,
        images: smallvec![ProductImageRecord {
            uuid: ProductImageUuid::from_uuid(Uuid::nil()),
            product_uuid: uuid,
            url: "https://cdn.example.com/djm-900.jpg".to_string(),
            alt: "Front panel".to_string(),
            position: 0,
            created_at: Timestamp::UNIX_EPOCH,
        }],
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_discount_code(uuid: DiscountCodeUuid) -> DiscountCodeRecord {
    DiscountCodeRecord {
        uuid,
        code: "SPRING10".to_string(),
        kind: DiscountKind::PercentOff(10),
        active: true,
        expires_at: None,
        max_redemptions: Some(100),
        times_redeemed: 3,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_user(uuid: UserUuid, role: UserRole) -> UserRecord {
    UserRecord {
        uuid,
        email: "dj@example.com".to_string(),
        name: "Selector".to_string(),
        role,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_order(uuid: OrderUuid, session_id: &str) -> OrderRecord {
    OrderRecord {
        uuid,
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
        subtotal: 149_900,
        discount_total: 14_990,
        total: 134_910,
        discount_code: Some("SPRING10".to_string()),
        payment_status: PaymentStatus::Paid,
        shipping_status: ShippingStatus::Pending,
        tracking_number: None,
        items: vec![OrderItemRecord {
            uuid: OrderItemUuid::from_uuid(Uuid::nil()),
            order_uuid: uuid,
            product_uuid: Some(ProductUuid::from_uuid(Uuid::nil())),
            product_name: "Pioneer DJM-900NXS2".to_string(),
            unit_price: 149_900,
            quantity: 1,
            subtotal: 149_900,
            position: 0,
        }],
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
