pub mod auth_service;
pub mod cart_service;
pub mod checkout_service;
pub mod publication_service;
pub mod subscription_service;
pub mod user_service;

pub use auth_service::*;
pub use cart_service::*;
pub use checkout_service::*;
pub use publication_service::*;
pub use subscription_service::*;
pub use user_service::*;
