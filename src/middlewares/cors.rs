use actix_cors::Cors;
use actix_web::http::header;

/// An empty origin list allows any origin, which is only meant for local development.
pub fn create_cors(allowed_origins: &[String]) -> Cors {
    let cors = allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin));
    let cors = if allowed_origins.is_empty() {
        cors.allow_any_origin()
    } else {
        cors
    };

    cors.allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(3600)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, http::StatusCode, test as actix_test, web};

    async fn ok() -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    #[actix_web::test]
    async fn test_configured_origin_only() {
        let app = actix_test::init_service(
            App::new()
                .wrap(create_cors(&["https://shop.example.com".to_string()]))
                .route("/ping", web::get().to(ok)),
        )
        .await;

        let req = actix_test::TestRequest::get()
            .uri("/ping")
            .insert_header((header::ORIGIN, "https://shop.example.com"))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://shop.example.com"
        );

        let req = actix_test::TestRequest::get()
            .uri("/ping")
            .insert_header((header::ORIGIN, "https://evil.example.com"))
            .to_request();
        let resp = actix_test::try_call_service(&app, req).await;
        assert!(resp.is_err() || resp.unwrap().status() != StatusCode::OK);
    }
}
