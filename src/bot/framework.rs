use std::sync::Arc;

use poise::serenity_prelude::{self as serenity, GatewayIntents, GuildId};
use sqlx::PgPool;
use tracing::{debug, error, info};

use crate::bot::data::Data;
use crate::bot::error::Error;
use crate::commands;
use crate::config::Settings;
use crate::handlers::event_handler::event_handler;

pub async fn run(settings: Settings, pool: PgPool) -> Result<(), Error> {
    let data = Arc::new(Data::new(pool, settings.clone())?);

    info!(
        "Loaded {} profanity patterns, {} moderators, strike limit {}",
        data.filter.len(),
        data.settings.moderator_ids.len(),
        data.settings.escalation.strike_limit
    );

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::info::start(),
                commands::info::help(),
                commands::moderation::strike(),
                commands::moderation::ban(),
                commands::moderation::warn(),
            ],
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(settings.command_prefix.clone()),
                ..Default::default()
            },
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            on_error: |error| {
                Box::pin(async move {
                    match error {
                        poise::FrameworkError::Command { error, ctx, .. } => {
                            error!("Command {} failed: {:?}", ctx.command().name, error);
                        }
                        poise::FrameworkError::ArgumentParse { error, ctx, .. } => {
                            // Moderation commands delete their trigger; no public error reply
                            debug!(
                                "Bad arguments for {}: {}",
                                ctx.command().qualified_name,
                                error
                            );
                        }
                        poise::FrameworkError::UnknownCommand { .. } => {
                            // Plain messages starting with the prefix are not commands
                        }
                        err => {
                            error!("Framework error: {:?}", err);
                        }
                    }
                })
            },
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Bot connected as {}", ready.user.name);

                // Only start/help are slash commands; moderation works through replies
                match data.settings.guild_id {
                    Some(guild_id) => {
                        let guild_id = GuildId::new(guild_id);
                        match poise::builtins::register_in_guild(
                            ctx,
                            &framework.options().commands,
                            guild_id,
                        )
                        .await
                        {
                            Ok(_) => info!("Registered slash commands in guild {}", guild_id),
                            Err(e) => {
                                error!("Failed to register guild commands: {:?}", e);
                                return Err(Error::Serenity(e));
                            }
                        }
                    }
                    None => {
                        match poise::builtins::register_globally(ctx, &framework.options().commands)
                            .await
                        {
                            Ok(_) => {
                                info!("Registered slash commands globally");
                                info!("Note: Global commands can take up to 1 hour to appear in all servers");
                            }
                            Err(e) => {
                                error!("Failed to register commands globally: {:?}", e);
                                return Err(Error::Serenity(e));
                            }
                        }
                    }
                }

                Ok(data)
            })
        })
        .build();

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = serenity::ClientBuilder::new(&settings.discord_token, intents)
        .framework(framework)
        .await
        .map_err(Error::Serenity)?;

    info!("Starting Discord client...");
    client.start().await.map_err(Error::Serenity)
}
