use crate::entities::{cart_item_entity as cart_items, publication_entity as publications};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::publication_service::resolve_publication;
use crate::services::subscription_service::validate_period;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use std::collections::HashSet;

/// Sole owner of cart state. Other services only ask for itemised removal or a full clear.
#[derive(Clone)]
pub struct CartService {
    pool: DatabaseConnection,
}

impl CartService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn get_cart(&self, user_id: i64) -> AppResult<CartResponse> {
        let rows = cart_items::Entity::find()
            .filter(cart_items::Column::UserId.eq(user_id))
            .order_by_asc(cart_items::Column::CreatedAt)
            .order_by_asc(cart_items::Column::Id)
            .find_also_related(publications::Entity)
            .all(&self.pool)
            .await?;

        let items = rows
            .into_iter()
            .map(|(item, publication)| {
                let publication = publication.ok_or_else(|| {
                    AppError::InternalError(format!(
                        "Cart item {} references a missing publication",
                        item.id
                    ))
                })?;
                Ok(CartItemResponse::new(item, &publication))
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(CartResponse::new(items))
    }

    /// Adds a publication to the cart; a publication already in the cart gets its
    /// period and price replaced.
    pub async fn add_item(
        &self,
        user_id: i64,
        request: AddCartItemRequest,
    ) -> AppResult<CartItemResponse> {
        validate_period(request.subscription_period)?;

        let txn = self.pool.begin().await?;
        let publication = resolve_publication(&txn, request.publication_id).await?;
        let total_price = publication
            .price_per_month
            .checked_mul(i64::from(request.subscription_period))
            .ok_or_else(|| AppError::InternalError("Cart line price overflow".to_string()))?;

        let existing = cart_items::Entity::find()
            .filter(cart_items::Column::UserId.eq(user_id))
            .filter(cart_items::Column::PublicationId.eq(publication.id))
            .one(&txn)
            .await?;

        let item = match existing {
            Some(item) => {
                let mut am = item.into_active_model();
                am.subscription_period = Set(request.subscription_period);
                am.total_price = Set(total_price);
                am.update(&txn).await?
            }
            None => {
                cart_items::ActiveModel {
                    user_id: Set(user_id),
                    publication_id: Set(publication.id),
                    subscription_period: Set(request.subscription_period),
                    total_price: Set(total_price),
                    created_at: Set(Utc::now()),
                    ..Default::default()
                }
                .insert(&txn)
                .await?
            }
        };
        txn.commit().await?;

        Ok(CartItemResponse::new(item, &publication))
    }

    pub async fn remove_item(&self, user_id: i64, item_id: i64) -> AppResult<()> {
        let result = cart_items::Entity::delete_many()
            .filter(cart_items::Column::Id.eq(item_id))
            .filter(cart_items::Column::UserId.eq(user_id))
            .exec(&self.pool)
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Cart item not found".to_string()));
        }
        Ok(())
    }

    /// Removes the lines for the given publications, leaving every other line untouched.
    pub async fn remove_cart_items(
        &self,
        user_id: i64,
        publication_ids: &HashSet<i64>,
    ) -> AppResult<u64> {
        if publication_ids.is_empty() {
            return Ok(0);
        }
        let result = cart_items::Entity::delete_many()
            .filter(cart_items::Column::UserId.eq(user_id))
            .filter(cart_items::Column::PublicationId.is_in(publication_ids.iter().copied()))
            .exec(&self.pool)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn clear_cart(&self, user_id: i64) -> AppResult<u64> {
        let result = cart_items::Entity::delete_many()
            .filter(cart_items::Column::UserId.eq(user_id))
            .exec(&self.pool)
            .await?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    #[tokio::test]
    async fn test_add_item_computes_price_and_replaces_existing_line() {
        let db = setup_db().await;
        let user = create_user(&db, "cart@example.com").await;
        let publication = create_publication(&db, "Weekly Planet", 1250).await;
        let service = CartService::new(db);

        let item = service
            .add_item(
                user.id,
                AddCartItemRequest {
                    publication_id: publication.id,
                    subscription_period: 3,
                },
            )
            .await
            .unwrap();
        assert_eq!(item.total_price, 3750);

        let updated = service
            .add_item(
                user.id,
                AddCartItemRequest {
                    publication_id: publication.id,
                    subscription_period: 6,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.id, item.id);
        assert_eq!(updated.total_price, 7500);

        let cart = service.get_cart(user.id).await.unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.total_price, 7500);
    }

    #[tokio::test]
    async fn test_add_item_rejects_bad_input() {
        let db = setup_db().await;
        let user = create_user(&db, "cart@example.com").await;
        let publication = create_publication(&db, "Weekly Planet", 1250).await;
        let service = CartService::new(db);

        let err = service
            .add_item(
                user.id,
                AddCartItemRequest {
                    publication_id: publication.id,
                    subscription_period: 13,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidPeriod(13)));

        let err = service
            .add_item(
                user.id,
                AddCartItemRequest {
                    publication_id: publication.id + 1000,
                    subscription_period: 1,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_remove_cart_items_by_publication() {
        let db = setup_db().await;
        let user = create_user(&db, "cart@example.com").await;
        let other = create_user(&db, "other@example.com").await;
        let first = create_publication(&db, "First", 100).await;
        let second = create_publication(&db, "Second", 200).await;
        let service = CartService::new(db);

        for (owner, publication) in [(&user, &first), (&user, &second), (&other, &first)] {
            service
                .add_item(
                    owner.id,
                    AddCartItemRequest {
                        publication_id: publication.id,
                        subscription_period: 1,
                    },
                )
                .await
                .unwrap();
        }

        let removed = service
            .remove_cart_items(user.id, &HashSet::from([first.id]))
            .await
            .unwrap();
        assert_eq!(removed, 1);

        let cart = service.get_cart(user.id).await.unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].publication.id, second.id);
        // other users' carts are not touched
        assert_eq!(service.get_cart(other.id).await.unwrap().items.len(), 1);

        assert_eq!(service.clear_cart(user.id).await.unwrap(), 1);
        assert!(service.get_cart(user.id).await.unwrap().items.is_empty());
    }

    #[tokio::test]
    async fn test_remove_item_of_another_user() {
        let db = setup_db().await;
        let user = create_user(&db, "cart@example.com").await;
        let other = create_user(&db, "other@example.com").await;
        let publication = create_publication(&db, "First", 100).await;
        let service = CartService::new(db);

        let item = service
            .add_item(
                user.id,
                AddCartItemRequest {
                    publication_id: publication.id,
                    subscription_period: 2,
                },
            )
            .await
            .unwrap();

        assert!(matches!(
            service.remove_item(other.id, item.id).await,
            Err(AppError::NotFound(_))
        ));
        service.remove_item(user.id, item.id).await.unwrap();
        assert!(service.get_cart(user.id).await.unwrap().items.is_empty());
    }

    #[tokio::test]
    async fn test_add_item_rejects_price_overflow() {
        let db = setup_db().await;
        let user = create_user(&db, "cart@example.com").await;
        let publication = create_publication(&db, "Gilded Quarterly", i64::MAX / 2).await;
        let service = CartService::new(db);

        let err = service
            .add_item(
                user.id,
                AddCartItemRequest {
                    publication_id: publication.id,
                    subscription_period: 3,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InternalError(_)));
        assert!(service.get_cart(user.id).await.unwrap().items.is_empty());
    }
}
