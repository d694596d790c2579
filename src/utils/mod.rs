pub mod formatting;
pub mod profanity;
