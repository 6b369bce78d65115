pub mod events;
pub mod proposals;

use crate::bot::data::Context;
use crate::bot::error::Error;
use crate::constants::embeds;

pub(crate) const NOT_IN_THREAD: &str = "This command can only be used in forum threads.";

/// Tell the invoking user why the command did nothing, visible only to them
pub(crate) async fn reply_rejected(ctx: Context<'_>, error: &Error) -> Result<(), Error> {
    let embed = embeds::error_embed().description(error.to_string());
    ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
        .await?;
    Ok(())
}
