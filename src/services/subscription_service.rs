use crate::entities::{
    publication_entity as publications, subscription_entity as subscriptions,
    user_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::publication_service::resolve_publication;
use crate::services::user_service::load_user;
use chrono::{DateTime, Months, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};

pub const MIN_PERIOD_MONTHS: i32 = 1;
pub const MAX_PERIOD_MONTHS: i32 = 12;

pub fn validate_period(period: i32) -> AppResult<()> {
    if !(MIN_PERIOD_MONTHS..=MAX_PERIOD_MONTHS).contains(&period) {
        return Err(AppError::InvalidPeriod(period));
    }
    Ok(())
}

/// `start` plus `period` calendar months, clamped to the end of the month.
pub fn end_date_for(start: DateTime<Utc>, period: i32) -> AppResult<DateTime<Utc>> {
    let months = u32::try_from(period).map_err(|_| AppError::InvalidPeriod(period))?;
    start
        .checked_add_months(Months::new(months))
        .filter(|end| *end > start)
        .ok_or(AppError::InvalidDateRange)
}

pub(crate) fn validate_request(request: &SubscriptionRequest) -> AppResult<()> {
    validate_period(request.subscription_period)?;
    if request.total_price < 0 {
        return Err(AppError::ValidationError(
            "Total price cannot be negative".to_string(),
        ));
    }
    if let Some(quantity) = request.quantity
        && quantity < 1
    {
        return Err(AppError::ValidationError(
            "Quantity must be at least 1".to_string(),
        ));
    }
    Ok(())
}

pub(crate) async fn find_active_subscription<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
    publication_id: i64,
) -> AppResult<Option<subscriptions::Model>> {
    Ok(subscriptions::Entity::find()
        .filter(subscriptions::Column::UserId.eq(user_id))
        .filter(subscriptions::Column::PublicationId.eq(publication_id))
        .filter(subscriptions::Column::Active.eq(true))
        .one(conn)
        .await?)
}

/// Inserts an active subscription without looking for an existing one first.
/// The partial unique index still rejects a second active row for the pair, which
/// surfaces as `DuplicateActiveSubscription`.
pub(crate) async fn insert_active_subscription<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
    publication: &publications::Model,
    request: &SubscriptionRequest,
    start_date: DateTime<Utc>,
) -> AppResult<subscriptions::Model> {
    validate_request(request)?;
    let end_date = end_date_for(start_date, request.subscription_period)?;

    subscriptions::ActiveModel {
        user_id: Set(user_id),
        publication_id: Set(publication.id),
        start_date: Set(start_date),
        end_date: Set(end_date),
        subscription_period: Set(request.subscription_period),
        // client supplied, see DESIGN.md
        total_price: Set(request.total_price),
        active: Set(true),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(conn)
    .await
    .map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::DuplicateActiveSubscription,
        _ => AppError::from(e),
    })
}

async fn find_owned_subscription<C: ConnectionTrait>(
    conn: &C,
    subscription_id: i64,
    user_id: i64,
) -> AppResult<subscriptions::Model> {
    // someone else's subscription is reported exactly like a missing one
    subscriptions::Entity::find_by_id(subscription_id)
        .filter(subscriptions::Column::UserId.eq(user_id))
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NotFound("Subscription not found".to_string()))
}

#[derive(Clone)]
pub struct SubscriptionService {
    pool: DatabaseConnection,
}

impl SubscriptionService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn create_subscription(
        &self,
        user_id: i64,
        request: SubscriptionRequest,
    ) -> AppResult<SubscriptionResponse> {
        let txn = self.pool.begin().await?;
        let user = load_user(&txn, user_id).await?;
        let publication = resolve_publication(&txn, request.publication_id).await?;
        validate_request(&request)?;

        if find_active_subscription(&txn, user.id, publication.id)
            .await?
            .is_some()
        {
            return Err(AppError::DuplicateActiveSubscription);
        }

        let subscription =
            insert_active_subscription(&txn, user.id, &publication, &request, Utc::now()).await?;
        txn.commit().await?;

        log::info!(
            "User {} subscribed to publication {} for {} months (subscription {})",
            user.id,
            publication.id,
            subscription.subscription_period,
            subscription.id
        );
        Ok(SubscriptionResponse::new(subscription, &publication, &user))
    }

    /// Deactivates a subscription. There is no way back to active.
    pub async fn cancel_subscription(&self, user_id: i64, subscription_id: i64) -> AppResult<()> {
        let txn = self.pool.begin().await?;
        let subscription = find_owned_subscription(&txn, subscription_id, user_id).await?;
        if !subscription.active {
            return Err(AppError::AlreadyInactive);
        }

        let mut am = subscription.into_active_model();
        am.active = Set(false);
        am.update(&txn).await?;
        txn.commit().await?;

        log::info!("User {user_id} cancelled subscription {subscription_id}");
        Ok(())
    }

    /// Moves the end date and recomputes the price from the catalog. The start date
    /// never changes.
    pub async fn update_subscription_period(
        &self,
        user_id: i64,
        subscription_id: i64,
        new_period: i32,
    ) -> AppResult<SubscriptionResponse> {
        let txn = self.pool.begin().await?;
        let subscription = find_owned_subscription(&txn, subscription_id, user_id).await?;
        if !subscription.active {
            return Err(AppError::AlreadyInactive);
        }
        validate_period(new_period)?;

        let publication = resolve_publication(&txn, subscription.publication_id).await?;
        let user = load_user(&txn, user_id).await?;
        let end_date = end_date_for(subscription.start_date, new_period)?;
        let total_price = publication
            .price_per_month
            .checked_mul(i64::from(new_period))
            .ok_or_else(|| AppError::InternalError("Subscription price overflow".to_string()))?;

        let mut am = subscription.into_active_model();
        am.subscription_period = Set(new_period);
        am.end_date = Set(end_date);
        am.total_price = Set(total_price);
        let updated = am.update(&txn).await?;
        txn.commit().await?;

        log::info!(
            "User {user_id} changed subscription {subscription_id} to {new_period} months"
        );
        Ok(SubscriptionResponse::new(updated, &publication, &user))
    }

    /// `Ok(None)` means the publication exists but the user has no active subscription to it.
    pub async fn find_active_subscription_for_publication(
        &self,
        user_id: i64,
        publication_id: i64,
    ) -> AppResult<Option<SubscriptionResponse>> {
        let publication = resolve_publication(&self.pool, publication_id).await?;
        let Some(subscription) =
            find_active_subscription(&self.pool, user_id, publication.id).await?
        else {
            return Ok(None);
        };

        let user = load_user(&self.pool, user_id).await?;
        Ok(Some(SubscriptionResponse::new(
            subscription,
            &publication,
            &user,
        )))
    }

    /// Newest start date first.
    pub async fn get_user_subscriptions(
        &self,
        user_id: i64,
    ) -> AppResult<Vec<SubscriptionResponse>> {
        self.list_subscriptions(user_id, false).await
    }

    pub async fn get_active_subscriptions(
        &self,
        user_id: i64,
    ) -> AppResult<Vec<SubscriptionResponse>> {
        self.list_subscriptions(user_id, true).await
    }

    async fn list_subscriptions(
        &self,
        user_id: i64,
        active_only: bool,
    ) -> AppResult<Vec<SubscriptionResponse>> {
        let user: users::Model = load_user(&self.pool, user_id).await?;

        let mut select =
            subscriptions::Entity::find().filter(subscriptions::Column::UserId.eq(user_id));
        if active_only {
            select = select.filter(subscriptions::Column::Active.eq(true));
        }
        let rows = select
            .order_by_desc(subscriptions::Column::StartDate)
            .order_by_desc(subscriptions::Column::Id)
            .find_also_related(publications::Entity)
            .all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|(subscription, publication)| {
                let publication = publication.ok_or_else(|| {
                    AppError::InternalError(format!(
                        "Subscription {} references a missing publication",
                        subscription.id
                    ))
                })?;
                Ok(SubscriptionResponse::new(subscription, &publication, &user))
            })
            .collect()
    }
}
