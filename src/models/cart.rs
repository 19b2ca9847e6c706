use crate::entities::{cart_item_entity, publication_entity};
use crate::models::PublicationSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AddCartItemRequest {
    pub publication_id: i64,
    #[schema(example = 3)]
    pub subscription_period: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CartItemResponse {
    pub id: i64,
    pub publication: PublicationSummary,
    pub subscription_period: i32,
    /// cents
    pub total_price: i64,
    pub created_at: DateTime<Utc>,
}

impl CartItemResponse {
    pub fn new(item: cart_item_entity::Model, publication: &publication_entity::Model) -> Self {
        Self {
            id: item.id,
            publication: PublicationSummary::from(publication),
            subscription_period: item.subscription_period,
            total_price: item.total_price,
            created_at: item.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CartResponse {
    pub items: Vec<CartItemResponse>,
    /// cents
    pub total_price: i64,
}

impl CartResponse {
    pub fn new(items: Vec<CartItemResponse>) -> Self {
        let total_price = items.iter().map(|i| i.total_price).sum();
        Self { items, total_price }
    }
}
