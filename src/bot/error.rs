use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Discord API error: {0}")]
    Serenity(#[from] serenity::Error),

    #[error("Invalid profanity pattern: {0}")]
    Pattern(#[from] regex::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_error_converts() {
        let bad = regex::Regex::new("(unclosed").unwrap_err();
        let err: Error = bad.into();
        assert!(matches!(err, Error::Pattern(_)));
        assert!(err.to_string().starts_with("Invalid profanity pattern"));
    }
}
