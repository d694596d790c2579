mod ban;
mod strike;
mod user;

pub use ban::Ban;
pub use strike::Strike;
pub use user::User;
