use std::sync::Arc;

use serenity::all::{
    ComponentInteraction, Context, CreateInteractionResponse, CreateInteractionResponseMessage,
    Interaction,
};
use tracing::{debug, error};

use crate::bot::data::Data;
use crate::bot::error::Error;
use crate::components::confirm_button;
use crate::constants::embeds;
use crate::constants::moderation::CONFIRM_BUTTON_PREFIX;

pub async fn handle_interaction(
    ctx: &Context,
    data: &Arc<Data>,
    interaction: &Interaction,
) -> Result<(), Error> {
    match interaction {
        Interaction::Component(component) => {
            handle_component(ctx, data, component).await?;
        }
        Interaction::Command(_) => {
            // Slash commands are handled by poise framework, not here
            debug!("Received ApplicationCommand interaction - should be handled by poise");
        }
        _ => {
            debug!("Unhandled interaction type: {:?}", interaction.kind());
        }
    }

    Ok(())
}

async fn handle_component(
    ctx: &Context,
    data: &Arc<Data>,
    component: &ComponentInteraction,
) -> Result<(), Error> {
    let custom_id = &component.data.custom_id;
    debug!("Component interaction: {}", custom_id);

    let result = if custom_id.starts_with(CONFIRM_BUTTON_PREFIX) {
        confirm_button::handle_press(ctx, data, component).await
    } else {
        debug!("Unknown component interaction: {}", custom_id);
        Ok(())
    };

    // If handler failed, send error response
    if let Err(e) = result {
        error!("Component interaction error for {}: {:?}", custom_id, e);
        let _ = send_component_error(ctx, component, &format!("An error occurred: {}", e)).await;
    }

    Ok(())
}

/// Send an ephemeral error message for a component interaction
pub async fn send_component_error(
    ctx: &Context,
    component: &ComponentInteraction,
    message: &str,
) -> Result<(), Error> {
    let embed = embeds::error_embed()
        .title("Error")
        .description(message);

    component
        .create_response(
            ctx,
            CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new()
                    .embed(embed)
                    .ephemeral(true),
            ),
        )
        .await?;

    Ok(())
}
