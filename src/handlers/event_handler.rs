use std::sync::Arc;

use poise::serenity_prelude::{self as serenity, FullEvent};
use tracing::{error, info};

use crate::bot::data::Data;
use crate::bot::error::Error;
use crate::handlers::{interaction, message};

pub async fn event_handler(
    ctx: &serenity::Context,
    event: &FullEvent,
    framework: poise::FrameworkContext<'_, Arc<Data>, Error>,
    data: &Arc<Data>,
) -> Result<(), Error> {
    match event {
        FullEvent::Ready { data_about_bot, .. } => {
            info!("Bot ready as {}", data_about_bot.user.name);
        }

        FullEvent::Message { new_message } => {
            // Commands are dispatched by poise; everything else goes through moderation
            let command_names = framework.options().commands.iter().map(|c| c.name.as_str());
            if message::is_command_invocation(
                &new_message.content,
                &data.settings.command_prefix,
                command_names,
            ) {
                return Ok(());
            }

            if let Err(e) = message::handle_message(ctx, data, new_message).await {
                error!(
                    "Message handler error for message {} from {}: {:?}",
                    new_message.id, new_message.author.id, e
                );
            }
        }

        FullEvent::InteractionCreate { interaction } => {
            // Poise handles slash commands; buttons are routed here
            if let serenity::Interaction::Component(_) = interaction {
                if let Err(e) = interaction::handle_interaction(ctx, data, interaction).await {
                    error!("Component interaction handler error: {:?}", e);
                }
            }
        }

        _ => {}
    }

    Ok(())
}
