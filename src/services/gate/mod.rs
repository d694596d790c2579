pub mod confirmation;
pub mod pending;
