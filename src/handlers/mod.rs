pub mod auth;
pub mod cart;
pub mod publication;
pub mod subscription;
pub mod user;

pub use auth::auth_config;
pub use cart::cart_config;
pub use publication::publication_config;
pub use subscription::subscription_config;
pub use user::user_config;
