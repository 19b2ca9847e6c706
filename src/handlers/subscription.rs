use crate::middlewares::current_user;
use crate::models::*;
use crate::services::{CheckoutService, SubscriptionService};
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/api/v1/subscriptions/my",
    tag = "subscription",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "All subscriptions, newest start date first", body = [SubscriptionResponse]),
        (status = 401, description = "Not authenticated", body = ApiErrorResponse)
    )
)]
pub async fn get_my_subscriptions(
    subscription_service: web::Data<SubscriptionService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user = current_user(&req)?;

    match subscription_service.get_user_subscriptions(user.id).await {
        Ok(subscriptions) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": subscriptions
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/subscriptions/active",
    tag = "subscription",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Active subscriptions", body = [SubscriptionResponse])
    )
)]
pub async fn get_active_subscriptions(
    subscription_service: web::Data<SubscriptionService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user = current_user(&req)?;

    match subscription_service.get_active_subscriptions(user.id).await {
        Ok(subscriptions) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": subscriptions
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/subscriptions",
    tag = "subscription",
    request_body = SubscriptionRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Subscription created", body = SubscriptionResponse),
        (status = 400, description = "Invalid period or request", body = ApiErrorResponse),
        (status = 404, description = "Publication not found", body = ApiErrorResponse),
        (status = 409, description = "Active subscription already exists", body = ApiErrorResponse)
    )
)]
pub async fn create_subscription(
    subscription_service: web::Data<SubscriptionService>,
    req: HttpRequest,
    request: web::Json<SubscriptionRequest>,
) -> Result<HttpResponse> {
    let user = current_user(&req)?;

    match subscription_service
        .create_subscription(user.id, request.into_inner())
        .await
    {
        Ok(subscription) => Ok(HttpResponse::Created().json(json!({
            "success": true,
            "data": subscription
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/subscriptions/create-from-cart",
    tag = "subscription",
    request_body = CreateSubscriptionsRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Every item converted, cart cleared", body = [SubscriptionResponse]),
        (status = 400, description = "Some or all items failed; created subscriptions are kept", body = ApiErrorResponse)
    )
)]
pub async fn create_from_cart(
    checkout_service: web::Data<CheckoutService>,
    req: HttpRequest,
    request: web::Json<CreateSubscriptionsRequest>,
) -> Result<HttpResponse> {
    let user = current_user(&req)?;

    match checkout_service
        .create_subscriptions_from_cart_requests(user.id, request.into_inner().subscriptions)
        .await
    {
        Ok(subscriptions) => Ok(HttpResponse::Created().json(json!({
            "success": true,
            "data": subscriptions
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/subscriptions/{id}/period",
    tag = "subscription",
    request_body = UpdatePeriodRequest,
    params(
        ("id" = i64, Path, description = "Subscription id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Period and price updated", body = SubscriptionResponse),
        (status = 400, description = "Invalid period", body = ApiErrorResponse),
        (status = 404, description = "Subscription not found", body = ApiErrorResponse),
        (status = 409, description = "Subscription is not active", body = ApiErrorResponse)
    )
)]
pub async fn update_period(
    subscription_service: web::Data<SubscriptionService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<UpdatePeriodRequest>,
) -> Result<HttpResponse> {
    let user = current_user(&req)?;

    match subscription_service
        .update_subscription_period(user.id, path.into_inner(), request.subscription_period)
        .await
    {
        Ok(subscription) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": subscription
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/subscriptions/{id}",
    tag = "subscription",
    params(
        ("id" = i64, Path, description = "Subscription id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Subscription cancelled"),
        (status = 404, description = "Subscription not found", body = ApiErrorResponse),
        (status = 409, description = "Subscription is not active", body = ApiErrorResponse)
    )
)]
pub async fn cancel_subscription(
    subscription_service: web::Data<SubscriptionService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user = current_user(&req)?;

    match subscription_service
        .cancel_subscription(user.id, path.into_inner())
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Subscription cancelled"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/subscriptions/check/{publication_id}",
    tag = "subscription",
    params(
        ("publication_id" = i64, Path, description = "Publication id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Whether an active subscription exists", body = ActiveSubscriptionCheck),
        (status = 404, description = "Publication not found", body = ApiErrorResponse)
    )
)]
pub async fn check_active(
    subscription_service: web::Data<SubscriptionService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user = current_user(&req)?;

    match subscription_service
        .find_active_subscription_for_publication(user.id, path.into_inner())
        .await
    {
        Ok(active) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": ActiveSubscriptionCheck::from(active)
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn subscription_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/subscriptions")
            .route("", web::post().to(create_subscription))
            .route("/my", web::get().to(get_my_subscriptions))
            .route("/active", web::get().to(get_active_subscriptions))
            .route("/create-from-cart", web::post().to(create_from_cart))
            .route("/check/{publication_id}", web::get().to(check_active))
            .route("/{id}/period", web::put().to(update_period))
            .route("/{id}", web::delete().to(cancel_subscription)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middlewares::AuthMiddleware;
    use crate::services::CartService;
    use crate::test_support::*;
    use crate::utils::JwtService;
    use actix_web::{App, http::StatusCode, test as actix_test};
    use serde_json::Value;

    #[actix_web::test]
    async fn test_subscription_routes_end_to_end() {
        let db = setup_db().await;
        let user = create_user(&db, "http@example.com").await;
        let publication = create_publication(&db, "Route Review", 1500).await;
        let jwt = JwtService::new("route-secret", 3600);
        let token = jwt.generate_access_token(user.id, &user.email).unwrap();
        let cart_service = CartService::new(db.clone());

        let app = actix_test::init_service(
            App::new()
                .wrap(AuthMiddleware::new(jwt))
                .app_data(web::Data::new(SubscriptionService::new(db.clone())))
                .app_data(web::Data::new(CheckoutService::new(
                    db.clone(),
                    cart_service,
                )))
                .service(web::scope("/api/v1").configure(subscription_config)),
        )
        .await;
        let bearer = ("Authorization", format!("Bearer {token}"));

        let req = actix_test::TestRequest::get()
            .uri(&format!("/api/v1/subscriptions/check/{}", publication.id))
            .insert_header(bearer.clone())
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["has_active_subscription"], false);

        let req = actix_test::TestRequest::post()
            .uri("/api/v1/subscriptions")
            .insert_header(bearer.clone())
            .set_json(json!({
                "publication_id": publication.id,
                "subscription_period": 2,
                "total_price": 3000
            }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = actix_test::read_body_json(resp).await;
        let id = body["data"]["id"].as_i64().unwrap();
        assert_eq!(body["data"]["publication"]["title"], "Route Review");

        let req = actix_test::TestRequest::post()
            .uri("/api/v1/subscriptions")
            .insert_header(bearer.clone())
            .set_json(json!({
                "publication_id": publication.id,
                "subscription_period": 2,
                "total_price": 3000
            }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "DUPLICATE_ACTIVE_SUBSCRIPTION");

        let req = actix_test::TestRequest::put()
            .uri(&format!("/api/v1/subscriptions/{id}/period"))
            .insert_header(bearer.clone())
            .set_json(json!({ "subscription_period": 13 }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/subscriptions/{id}"))
            .insert_header(bearer.clone())
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/subscriptions/{id}"))
            .insert_header(bearer.clone())
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let req = actix_test::TestRequest::get()
            .uri("/api/v1/subscriptions/check/999999")
            .insert_header(bearer.clone())
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_batch_failure_reports_details() {
        let db = setup_db().await;
        let user = create_user(&db, "batch@example.com").await;
        let jwt = JwtService::new("route-secret", 3600);
        let token = jwt.generate_access_token(user.id, &user.email).unwrap();

        let app = actix_test::init_service(
            App::new()
                .wrap(AuthMiddleware::new(jwt))
                .app_data(web::Data::new(CheckoutService::new(
                    db.clone(),
                    CartService::new(db.clone()),
                )))
                .service(web::scope("/api/v1").configure(subscription_config)),
        )
        .await;

        let req = actix_test::TestRequest::post()
            .uri("/api/v1/subscriptions/create-from-cart")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(json!({
                "subscriptions": [
                    { "publication_id": 424242, "subscription_period": 1, "total_price": 100 }
                ]
            }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "SUBSCRIPTION_BATCH_ERROR");
        assert_eq!(
            body["error"]["details"][0],
            "Publication #424242: publication not found"
        );
    }
}
