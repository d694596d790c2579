use std::sync::Arc;

use serenity::all::{
    ButtonStyle, ComponentInteraction, Context, CreateActionRow, CreateButton,
    CreateInteractionResponse, CreateInteractionResponseMessage, CreateMessage, Message, UserId,
};
use tracing::{debug, info};

use crate::bot::data::Data;
use crate::bot::error::Error;
use crate::constants::embeds;
use crate::constants::moderation::CONFIRM_BUTTON_PREFIX;
use crate::db::queries::user;
use crate::handlers::interaction::send_component_error;
use crate::utils::formatting::mention_user;

/// Button id carrying the member allowed to press it
pub fn custom_id(user_id: UserId) -> String {
    format!("{}{}", CONFIRM_BUTTON_PREFIX, user_id)
}

pub fn parse_custom_id(custom_id: &str) -> Option<u64> {
    custom_id
        .strip_prefix(CONFIRM_BUTTON_PREFIX)?
        .parse()
        .ok()
}

/// Greeting with the confirmation button, sent as a reply to the member's message
pub fn prompt(message: &Message) -> CreateMessage {
    let embed = embeds::standard_embed()
        .title("Welcome!")
        .description(format!(
            "Hi, {}!\n\n\
            This community runs on order and mutual respect. \
            Please read the rules in the rules channel.\n\n\
            But first confirm you are not a bot, otherwise your messages are removed automatically \
            (press the button below).",
            mention_user(message.author.id)
        ));

    let button = CreateActionRow::Buttons(vec![CreateButton::new(custom_id(message.author.id))
        .label("I'm not a bot and will be a good neighbour")
        .style(ButtonStyle::Success)]);

    CreateMessage::new()
        .embed(embed)
        .components(vec![button])
        .reference_message(message)
}

/// Handle a press on the confirmation button
pub async fn handle_press(
    ctx: &Context,
    data: &Arc<Data>,
    component: &ComponentInteraction,
) -> Result<(), Error> {
    let Some(owner_id) = parse_custom_id(&component.data.custom_id) else {
        send_component_error(ctx, component, "Invalid button state").await?;
        return Ok(());
    };

    debug!(
        "Confirmation press by {} on button for {}",
        component.user.id, owner_id
    );

    if component.user.id.get() != owner_id {
        send_component_error(ctx, component, "This button belongs to another member").await?;
        return Ok(());
    }

    if user::confirm(&data.pool, &owner_id.to_string())
        .await?
        .is_none()
    {
        send_component_error(ctx, component, "Send a message in the chat first").await?;
        return Ok(());
    }

    let cancelled = data.pending_confirmations.cancel_for_user(owner_id);
    info!(
        "User {} confirmed, cancelled {} pending cleanup(s)",
        owner_id, cancelled
    );

    let embed = embeds::success_embed().description(format!(
        "{}, welcome aboard!",
        mention_user(component.user.id)
    ));

    component
        .create_response(
            ctx,
            CreateInteractionResponse::UpdateMessage(
                CreateInteractionResponseMessage::new()
                    .embed(embed)
                    .components(vec![]),
            ),
        )
        .await?;

    Ok(())
}
