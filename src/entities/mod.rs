pub mod cart_items;
pub mod publications;
pub mod subscriptions;
pub mod users;

pub use cart_items as cart_item_entity;
pub use publications as publication_entity;
pub use publications::PublicationType;
pub use subscriptions as subscription_entity;
pub use users as user_entity;
