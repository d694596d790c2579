use std::sync::Arc;
use std::time::Duration;

use serenity::all::{ChannelId, Context, Http, Message, MessageId, UserId};
use tracing::{debug, error, info, warn};

use crate::bot::data::Data;
use crate::bot::error::Error;
use crate::components::confirm_button;
use crate::db::queries::user;

/// Messages to clean up if the member never confirms
#[derive(Debug, Clone, Copy)]
pub struct Cleanup {
    pub channel_id: ChannelId,
    pub user_id: UserId,
    pub user_message_id: MessageId,
    pub prompt_message_id: MessageId,
}

/// Reply to an unconfirmed member with the confirmation button and schedule the cleanup
pub async fn prompt_unconfirmed(
    ctx: &Context,
    data: &Arc<Data>,
    message: &Message,
) -> Result<(), Error> {
    let prompt = message
        .channel_id
        .send_message(ctx, confirm_button::prompt(message))
        .await?;

    schedule_cleanup(
        ctx.http.clone(),
        data.clone(),
        Cleanup {
            channel_id: message.channel_id,
            user_id: message.author.id,
            user_message_id: message.id,
            prompt_message_id: prompt.id,
        },
    );

    Ok(())
}

/// Spawn the delayed cleanup. Confirming cancels it through `PendingConfirmations`.
pub fn schedule_cleanup(http: Arc<Http>, data: Arc<Data>, cleanup: Cleanup) {
    let delay = Duration::from_secs(data.settings.confirmation_timeout_seconds);
    let task_data = data.clone();

    data.pending_confirmations.schedule(
        cleanup.channel_id.get(),
        cleanup.prompt_message_id.get(),
        cleanup.user_id.get(),
        delay,
        async move {
            cleanup_if_unconfirmed(&http, &task_data, cleanup).await;
        },
    );

    debug!(
        "Scheduled confirmation cleanup for user {} in {:?}",
        cleanup.user_id, delay
    );
}

/// Remove the prompt, and the member's message too if they still have not confirmed.
/// Failures are logged and dropped.
async fn cleanup_if_unconfirmed(http: &Http, data: &Arc<Data>, cleanup: Cleanup) {
    if let Err(e) = cleanup
        .channel_id
        .delete_message(http, cleanup.prompt_message_id)
        .await
    {
        warn!(
            "Could not delete confirmation prompt {}: {:?}",
            cleanup.prompt_message_id, e
        );
    }

    let confirmed = match user::get(&data.pool, &cleanup.user_id.to_string()).await {
        Ok(Some(found)) => found.confirmed,
        Ok(None) => false,
        Err(e) => {
            error!(
                "Failed to look up user {} for confirmation cleanup: {:?}",
                cleanup.user_id, e
            );
            return;
        }
    };

    if confirmed {
        debug!("User {} confirmed in time", cleanup.user_id);
        return;
    }

    match cleanup
        .channel_id
        .delete_message(http, cleanup.user_message_id)
        .await
    {
        Ok(()) => info!(
            "Deleted message {} from unconfirmed user {}",
            cleanup.user_message_id, cleanup.user_id
        ),
        Err(e) => warn!(
            "Could not delete message {} from unconfirmed user {}: {:?}",
            cleanup.user_message_id, cleanup.user_id, e
        ),
    }
}
