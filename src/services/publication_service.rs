use crate::entities::publication_entity as publications;
use crate::error::{AppError, AppResult};
use crate::models::*;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};

/// Resolves a publication inside any connection or open transaction.
pub async fn resolve_publication<C: ConnectionTrait>(
    conn: &C,
    publication_id: i64,
) -> AppResult<publications::Model> {
    publications::Entity::find_by_id(publication_id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Publication {publication_id} not found")))
}

#[derive(Clone)]
pub struct PublicationService {
    pool: DatabaseConnection,
}

impl PublicationService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn list_publications(
        &self,
        query: &PublicationQuery,
    ) -> AppResult<PaginatedResponse<PublicationResponse>> {
        let (page, per_page) = normalize_page(query.page, query.per_page);

        let mut select = publications::Entity::find();
        if let Some(search) = query.search.as_deref().map(str::trim)
            && !search.is_empty()
        {
            let pattern = format!("%{}%", search.to_lowercase());
            select = select.filter(
                Expr::expr(Func::lower(Expr::col(publications::Column::Title))).like(pattern),
            );
        }

        let paginator = select
            .order_by_asc(publications::Column::Title)
            .order_by_asc(publications::Column::Id)
            .paginate(&self.pool, per_page);
        let total = paginator.num_items().await?;
        let items = paginator
            .fetch_page(page - 1)
            .await?
            .into_iter()
            .map(PublicationResponse::from)
            .collect();

        Ok(PaginatedResponse::new(items, page, per_page, total))
    }

    pub async fn get_publication(&self, publication_id: i64) -> AppResult<PublicationResponse> {
        resolve_publication(&self.pool, publication_id)
            .await
            .map(PublicationResponse::from)
    }
}
