use poise::serenity_prelude::{ChannelId, ChannelType, MessageId, UserId};
use tracing::{info, warn};

use crate::bot::data::Context;
use crate::bot::error::Error;
use crate::commands::{reply_rejected, NOT_IN_THREAD};
use crate::config::ProposalRoute;
use crate::constants::embeds::{VOTE_AGAINST, VOTE_FOR};
use crate::services::admission::ForumPlatform;
use crate::utils::formatting::{channel_link, mention_channels, mention_user, message_link};

/// Accept the current proposal for voting
#[poise::command(slash_command, guild_only)]
pub async fn promote(
    ctx: Context<'_>,
    #[description = "Comment added to the voting message"] comment: Option<String>,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or(Error::custom("Not in a guild"))?;

    let Some(channel) = ctx.guild_channel().await else {
        return reply_rejected(ctx, &Error::mismatch(NOT_IN_THREAD)).await;
    };

    let voting_id =
        match voting_channel_for(&ctx.data().settings.proposal_routes, channel.kind, channel.parent_id) {
            Ok(id) => id,
            Err(e) => return reply_rejected(ctx, &e).await,
        };

    let text = promotion_message(
        &channel_link(guild_id, channel.id),
        channel.owner_id,
        ctx.author().id,
        comment.as_deref(),
    );

    match post_vote(ctx.data().platform.as_ref(), voting_id, &text).await {
        Ok(message_id) => {
            info!(
                "User {} promoted proposal {} to voting",
                ctx.author().id,
                channel.id
            );
            ctx.say(format!(
                "Proposal accepted for voting. Link: {}.",
                message_link(guild_id, voting_id, message_id)
            ))
            .await?;
        }
        Err(e) => {
            warn!("Failed to promote proposal {}: {}", channel.id, e);
            reply_rejected(ctx, &Error::custom(format!("Failed to send the message: {}.", e)))
                .await?;
        }
    }

    Ok(())
}

/// Post the voting message and seed it with both vote reactions
pub async fn post_vote(
    platform: &dyn ForumPlatform,
    voting_id: ChannelId,
    text: &str,
) -> Result<MessageId, Error> {
    let message_id = platform.send_message(voting_id, text).await?;
    platform.add_reaction(voting_id, message_id, VOTE_FOR).await?;
    platform.add_reaction(voting_id, message_id, VOTE_AGAINST).await?;
    Ok(message_id)
}

/// Voting channel paired with the forum this thread lives in
pub fn voting_channel_for(
    routes: &[ProposalRoute],
    kind: ChannelType,
    parent_id: Option<ChannelId>,
) -> Result<ChannelId, Error> {
    if kind != ChannelType::PublicThread {
        return Err(Error::mismatch(NOT_IN_THREAD));
    }

    routes
        .iter()
        .find(|route| Some(route.forum_id) == parent_id)
        .map(|route| route.voting_id)
        .ok_or_else(|| {
            let forums: Vec<ChannelId> = routes.iter().map(|r| r.forum_id).collect();
            Error::mismatch(format!(
                "This command can only be used in {}.",
                mention_channels(&forums)
            ))
        })
}

pub fn promotion_message(
    thread_link: &str,
    author_id: Option<UserId>,
    promoter_id: UserId,
    comment: Option<&str>,
) -> String {
    let author = author_id
        .map(mention_user)
        .unwrap_or_else(|| "unknown".to_string());
    let comment = comment
        .filter(|c| !c.trim().is_empty())
        .map(|c| format!("\nComment from the reviewer: {}", c))
        .unwrap_or_default();

    format!(
        "Proposal {} has been accepted for voting\n\
        Proposal author: {}\n\
        Accepted by: {}{}\n\
        The outcome will be decided by the reactions under this message.\n\
        {} I support this proposal.\n\
        {} I am against this proposal.",
        thread_link,
        author,
        mention_user(promoter_id),
        comment,
        VOTE_FOR,
        VOTE_AGAINST
    )
}
