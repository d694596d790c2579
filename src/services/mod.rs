pub mod gate;
pub mod moderation;
