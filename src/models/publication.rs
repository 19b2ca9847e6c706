use crate::entities::{PublicationType, publication_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PublicationResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    /// cents
    pub price_per_month: i64,
    #[serde(rename = "type")]
    pub publication_type: PublicationType,
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<publication_entity::Model> for PublicationResponse {
    fn from(m: publication_entity::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            price_per_month: m.price_per_month,
            publication_type: m.publication_type,
            content: m.content,
            created_at: m.created_at,
        }
    }
}

/// Catalog data embedded into subscription and cart responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct PublicationSummary {
    pub id: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub publication_type: PublicationType,
    pub price_per_month: i64,
}

impl From<&publication_entity::Model> for PublicationSummary {
    fn from(m: &publication_entity::Model) -> Self {
        Self {
            id: m.id,
            title: m.title.clone(),
            publication_type: m.publication_type,
            price_per_month: m.price_per_month,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PublicationQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    /// Case-insensitive title filter
    pub search: Option<String>,
}
