use crate::models::*;
use crate::services::PublicationService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/api/v1/publications",
    tag = "publication",
    params(PublicationQuery),
    responses(
        (status = 200, description = "One page of the catalog, ordered by title", body = [PublicationResponse])
    )
)]
pub async fn list_publications(
    publication_service: web::Data<PublicationService>,
    query: web::Query<PublicationQuery>,
) -> Result<HttpResponse> {
    match publication_service.list_publications(&query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": page
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/publications/{id}",
    tag = "publication",
    params(
        ("id" = i64, Path, description = "Publication id")
    ),
    responses(
        (status = 200, description = "Publication", body = PublicationResponse),
        (status = 404, description = "Publication not found", body = ApiErrorResponse)
    )
)]
pub async fn get_publication(
    publication_service: web::Data<PublicationService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match publication_service.get_publication(path.into_inner()).await {
        Ok(publication) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": publication
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn publication_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/publications")
            .route("", web::get().to(list_publications))
            .route("/{id}", web::get().to(get_publication)),
    );
}
