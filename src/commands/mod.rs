pub mod info;
pub mod moderation;
