use crate::entities::{publication_entity, subscription_entity, user_entity};
use crate::models::{PublicationSummary, UserSummary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One subscription to open. `total_price` is taken as sent by the client.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionRequest {
    pub publication_id: i64,
    #[schema(example = 6)]
    pub subscription_period: i32,
    #[schema(example = 1)]
    pub quantity: Option<i32>,
    /// cents
    #[schema(example = 179994)]
    pub total_price: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateSubscriptionsRequest {
    pub subscriptions: Vec<SubscriptionRequest>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdatePeriodRequest {
    #[schema(example = 12)]
    pub subscription_period: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionResponse {
    pub id: i64,
    pub user: UserSummary,
    pub publication: PublicationSummary,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub subscription_period: i32,
    /// cents
    pub total_price: i64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl SubscriptionResponse {
    pub fn new(
        m: subscription_entity::Model,
        publication: &publication_entity::Model,
        user: &user_entity::Model,
    ) -> Self {
        Self {
            id: m.id,
            user: UserSummary::from(user),
            publication: PublicationSummary::from(publication),
            start_date: m.start_date,
            end_date: m.end_date,
            subscription_period: m.subscription_period,
            total_price: m.total_price,
            active: m.active,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ActiveSubscriptionCheck {
    pub has_active_subscription: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
}

impl From<Option<SubscriptionResponse>> for ActiveSubscriptionCheck {
    fn from(active: Option<SubscriptionResponse>) -> Self {
        Self {
            has_active_subscription: active.is_some(),
            end_date: active.map(|s| s.end_date),
        }
    }
}
