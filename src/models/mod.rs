pub mod cart;
pub mod common;
pub mod pagination;
pub mod publication;
pub mod subscription;
pub mod user;

pub use cart::*;
pub use common::*;
pub use pagination::*;
pub use publication::*;
pub use subscription::*;
pub use user::*;
