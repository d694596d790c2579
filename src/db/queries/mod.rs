pub mod ban;
pub mod strike;
pub mod user;
