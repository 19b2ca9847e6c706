//! Fixtures shared by service tests: a migrated in-memory SQLite database.

use crate::entities::{PublicationType, publication_entity as publications, user_entity as users};
use chrono::Utc;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};

pub async fn setup_db() -> DatabaseConnection {
    // one connection: every connection to sqlite::memory: is its own database
    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

pub async fn create_user(db: &DatabaseConnection, email: &str) -> users::Model {
    users::ActiveModel {
        email: Set(email.to_string()),
        password_hash: Set("not-a-real-hash".to_string()),
        first_name: Set(Some("Test".to_string())),
        last_name: Set(Some("Reader".to_string())),
        role: Set("USER".to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn create_publication(
    db: &DatabaseConnection,
    title: &str,
    price_per_month: i64,
) -> publications::Model {
    publications::ActiveModel {
        title: Set(title.to_string()),
        description: Set(Some(format!("{title} description"))),
        price_per_month: Set(price_per_month),
        publication_type: Set(PublicationType::Magazine),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}
