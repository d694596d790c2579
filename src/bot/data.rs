use std::fmt;
use std::sync::Arc;

use sqlx::PgPool;

use crate::bot::error::Error;
use crate::config::Settings;
use crate::services::gate::pending::PendingConfirmations;
use crate::utils::profanity::ProfanityFilter;

/// Shared data available to all commands and handlers
pub struct Data {
    pub pool: PgPool,
    pub settings: Settings,
    /// Compiled from the configured roots and exact words
    pub filter: ProfanityFilter,
    /// Cleanup tasks for members who have not confirmed yet
    pub pending_confirmations: Arc<PendingConfirmations>,
}

impl Data {
    pub fn new(pool: PgPool, settings: Settings) -> Result<Self, Error> {
        let filter = ProfanityFilter::new(&settings.obscene_roots, &settings.full_word_patterns)?;

        Ok(Self {
            pool,
            settings,
            filter,
            pending_confirmations: Arc::new(PendingConfirmations::new()),
        })
    }
}

impl fmt::Debug for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Data")
            .field("profanity_patterns", &self.filter.len())
            .field("pending_confirmations", &self.pending_confirmations.len())
            .finish_non_exhaustive()
    }
}

pub type Context<'a> = poise::Context<'a, Arc<Data>, crate::bot::error::Error>;
