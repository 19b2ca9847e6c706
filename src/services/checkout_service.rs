use crate::entities::{publication_entity as publications, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::cart_service::CartService;
use crate::services::subscription_service::{
    find_active_subscription, insert_active_subscription, validate_request,
};
use crate::services::user_service::load_user;
use chrono::Utc;
use sea_orm::{DatabaseConnection, DatabaseTransaction, EntityTrait, TransactionTrait};
use std::collections::HashSet;

/// What happened to one request of a batch.
#[derive(Debug)]
pub enum ItemOutcome {
    Created(SubscriptionResponse),
    Failed(String),
}

/// Turns a list of cart-derived requests into subscriptions, one transaction per item.
#[derive(Clone)]
pub struct CheckoutService {
    pool: DatabaseConnection,
    cart_service: CartService,
}

impl CheckoutService {
    pub fn new(pool: DatabaseConnection, cart_service: CartService) -> Self {
        Self { pool, cart_service }
    }

    /// Items are attempted in input order and a failing item never stops the rest.
    ///
    /// * every item created: the cart is cleared and the subscriptions are returned
    /// * some created: only their cart lines are removed and `SubscriptionBatch` is
    ///   returned, the created subscriptions stay
    /// * none created: the cart is left alone and `SubscriptionBatch` is returned
    pub async fn create_subscriptions_from_cart_requests(
        &self,
        user_id: i64,
        requests: Vec<SubscriptionRequest>,
    ) -> AppResult<Vec<SubscriptionResponse>> {
        let user = load_user(&self.pool, user_id).await?;

        let mut created = Vec::with_capacity(requests.len());
        let mut messages = Vec::new();
        for request in &requests {
            match self.convert_item(&user, request).await {
                ItemOutcome::Created(subscription) => created.push(subscription),
                ItemOutcome::Failed(message) => {
                    log::warn!("User {} checkout item failed: {}", user.id, message);
                    messages.push(message);
                }
            }
        }

        if messages.is_empty() {
            let removed = self.cart_service.clear_cart(user.id).await?;
            log::info!(
                "User {} converted cart into {} subscriptions ({} cart lines cleared)",
                user.id,
                created.len(),
                removed
            );
            return Ok(created);
        }

        if !created.is_empty() {
            let converted: HashSet<i64> = created.iter().map(|s| s.publication.id).collect();
            let removed = self
                .cart_service
                .remove_cart_items(user.id, &converted)
                .await?;
            log::info!(
                "User {} partially converted cart: {} created, {} failed, {} cart lines removed",
                user.id,
                created.len(),
                messages.len(),
                removed
            );
        }

        Err(AppError::SubscriptionBatch {
            created: created.len(),
            messages,
        })
    }

    async fn convert_item(&self, user: &users::Model, request: &SubscriptionRequest) -> ItemOutcome {
        let publication = match publications::Entity::find_by_id(request.publication_id)
            .one(&self.pool)
            .await
        {
            Ok(Some(publication)) => publication,
            Ok(None) => {
                return ItemOutcome::Failed(format!(
                    "Publication #{}: publication not found",
                    request.publication_id
                ));
            }
            Err(e) => {
                return ItemOutcome::Failed(format!(
                    "Publication #{}: {}",
                    request.publication_id,
                    AppError::from(e).public_message()
                ));
            }
        };

        match self.create_item(user, &publication, request).await {
            Ok(outcome) => outcome,
            Err(e) => item_failure(&publication, &e),
        }
    }

    async fn create_item(
        &self,
        user: &users::Model,
        publication: &publications::Model,
        request: &SubscriptionRequest,
    ) -> AppResult<ItemOutcome> {
        validate_request(request)?;

        let txn = self.pool.begin().await?;
        if let Some(existing) = find_active_subscription(&txn, user.id, publication.id).await? {
            return Ok(ItemOutcome::Failed(format!(
                "Publication '{}': active subscription already exists until {}",
                publication.title,
                existing.end_date.format("%d.%m.%Y")
            )));
        }
        self.insert_item(txn, user, publication, request).await
    }

    /// Second half of an item: the existence check already passed on `txn`. A
    /// concurrent insert for the same pair still surfaces here as
    /// `DuplicateActiveSubscription` and the transaction is rolled back on drop.
    async fn insert_item(
        &self,
        txn: DatabaseTransaction,
        user: &users::Model,
        publication: &publications::Model,
        request: &SubscriptionRequest,
    ) -> AppResult<ItemOutcome> {
        let subscription =
            insert_active_subscription(&txn, user.id, publication, request, Utc::now()).await?;
        txn.commit().await?;

        Ok(ItemOutcome::Created(SubscriptionResponse::new(
            subscription,
            publication,
            user,
        )))
    }
}

fn item_failure(publication: &publications::Model, error: &AppError) -> ItemOutcome {
    ItemOutcome::Failed(format!(
        "Publication '{}': {}",
        publication.title,
        error.public_message()
    ))
}
