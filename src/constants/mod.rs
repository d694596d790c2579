pub mod embeds;
pub mod moderation;
