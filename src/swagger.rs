use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::signup,
        handlers::auth::login,
        handlers::user::get_me,
        handlers::user::update_profile,
        handlers::user::change_password,
        handlers::publication::list_publications,
        handlers::publication::get_publication,
        handlers::cart::get_cart,
        handlers::cart::add_item,
        handlers::cart::remove_item,
        handlers::cart::clear_cart,
        handlers::subscription::get_my_subscriptions,
        handlers::subscription::get_active_subscriptions,
        handlers::subscription::create_subscription,
        handlers::subscription::create_from_cart,
        handlers::subscription::update_period,
        handlers::subscription::cancel_subscription,
        handlers::subscription::check_active,
    ),
    components(
        schemas(
            SignupRequest,
            LoginRequest,
            UserResponse,
            UserSummary,
            UpdateProfileRequest,
            ChangePasswordRequest,
            AuthResponse,
            PublicationResponse,
            PublicationSummary,
            AddCartItemRequest,
            CartItemResponse,
            CartResponse,
            SubscriptionRequest,
            CreateSubscriptionsRequest,
            UpdatePeriodRequest,
            SubscriptionResponse,
            ActiveSubscriptionCheck,
            ApiError,
            ApiErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Signup and login"),
        (name = "user", description = "Current account"),
        (name = "publication", description = "Publication catalog"),
        (name = "cart", description = "Cart of pending subscriptions"),
        (name = "subscription", description = "Subscription lifecycle and cart checkout"),
    ),
    info(
        title = "Subscription Backend API",
        version = "1.0.0",
        description = "Magazine and newspaper subscription REST API"
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
