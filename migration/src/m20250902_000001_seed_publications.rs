use chrono::Utc;
use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Publications {
    Table,
    Title,
    Description,
    PricePerMonth,
    PublicationType,
    CreatedAt,
}

/// (title, description, price per month in cents, type)
const CATALOG: &[(&str, &str, i64, &str)] = &[
    (
        "National Geographic",
        "Popular science magazine about nature, science, culture and travel",
        29999,
        "magazine",
    ),
    (
        "Nature",
        "One of the oldest and most authoritative scientific journals",
        39999,
        "magazine",
    ),
    ("New Scientist", "Weekly popular science magazine", 24999, "magazine"),
    (
        "Scientific American",
        "Popular science magazine covering science and technology news",
        24999,
        "magazine",
    ),
    (
        "Science",
        "Leading journal of the American Association for the Advancement of Science",
        34999,
        "magazine",
    ),
    (
        "The Economist",
        "Weekly magazine on news, international affairs and economics",
        29999,
        "magazine",
    ),
    ("Forbes", "American business and finance magazine", 19999, "magazine"),
    ("TIME", "Weekly news magazine", 14999, "magazine"),
    (
        "The New York Times",
        "Daily American newspaper with worldwide influence",
        19999,
        "newspaper",
    ),
    (
        "The Wall Street Journal",
        "Business daily focused on financial news",
        24999,
        "newspaper",
    ),
];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let now = Utc::now();
        let mut insert = Query::insert();
        insert.into_table(Publications::Table).columns([
            Publications::Title,
            Publications::Description,
            Publications::PricePerMonth,
            Publications::PublicationType,
            Publications::CreatedAt,
        ]);
        for (title, description, price, kind) in CATALOG {
            insert
                .values([
                    (*title).into(),
                    (*description).into(),
                    (*price).into(),
                    (*kind).into(),
                    now.into(),
                ])
                .map_err(|e| DbErr::Migration(e.to_string()))?;
        }
        manager.exec_stmt(insert.to_owned()).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let titles: Vec<&str> = CATALOG.iter().map(|(title, ..)| *title).collect();
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(Publications::Table)
                    .and_where(Expr::col(Publications::Title).is_in(titles))
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}
