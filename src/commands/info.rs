use crate::bot::data::Context;
use crate::bot::error::Error;
use crate::constants::embeds;

/// Check that the bot is alive
#[poise::command(slash_command, prefix_command)]
pub async fn start(ctx: Context<'_>) -> Result<(), Error> {
    ctx.say("Hi! I'm alive 👋").await?;
    Ok(())
}

/// List the available commands
#[poise::command(slash_command, prefix_command)]
pub async fn help(ctx: Context<'_>) -> Result<(), Error> {
    let prefix = &ctx.data().settings.command_prefix;

    let everyone = [format!("`{}start`", prefix), format!("`{}help`", prefix)];
    let moderators = [
        format!("`{}warn`: friendly rules reminder", prefix),
        format!("`{}strike`: strike with message removal", prefix),
        format!("`{}ban <days>`: block for the given number of days", prefix),
    ];

    let everyone: Vec<&str> = everyone.iter().map(String::as_str).collect();
    let moderators: Vec<&str> = moderators.iter().map(String::as_str).collect();

    let description = format!(
        "{}\n\n{}\n\nModerator commands are sent as a reply to the offending message.",
        embeds::section("Available to everyone", &embeds::bullet_list(&everyone)),
        embeds::section("Moderators only", &embeds::bullet_list(&moderators)),
    );

    let embed = embeds::info_embed().title("Commands").description(description);

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}
