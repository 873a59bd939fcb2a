pub mod auth;
pub mod contact;
pub mod dispatch;
pub mod inbox;
pub mod schema;
pub mod shared;
pub mod user;
