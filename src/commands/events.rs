use poise::serenity_prelude::{ChannelId, ChannelType, MessageId, RoleId, UserId};
use tracing::{info, warn};

use crate::bot::data::Context;
use crate::bot::error::Error;
use crate::commands::{reply_rejected, NOT_IN_THREAD};
use crate::config::Settings;
use crate::services::admission::ForumPlatform;
use crate::utils::formatting::{
    channel_link, mention_channels, mention_role, mention_user, message_link,
};

/// Where an announcement was invoked from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSource {
    /// A post in the event forum; the announcement links back to it
    Forum,
    /// A post in the event schedule forum
    Schedule,
}

/// Fields of an event announcement
#[derive(Debug, Clone)]
pub struct EventDetails<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub location: &'a str,
}

/// Announce the event described in the current thread
#[poise::command(slash_command, guild_only)]
pub async fn announce_event(
    ctx: Context<'_>,
    #[description = "Event name"] name: String,
    #[description = "Short description of the event"] description: String,
    #[description = "Where and when the event takes place"] location: String,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or(Error::custom("Not in a guild"))?;
    let settings = &ctx.data().settings;

    let Some(channel) = ctx.guild_channel().await else {
        return reply_rejected(ctx, &Error::mismatch(NOT_IN_THREAD)).await;
    };

    let (source, announcements_id) =
        match event_target_for(settings, channel.kind, channel.parent_id) {
            Ok(target) => target,
            Err(e) => return reply_rejected(ctx, &e).await,
        };

    let details = EventDetails {
        name: &name,
        description: &description,
        location: &location,
    };
    let thread_link = channel_link(guild_id, channel.id);
    let text = announcement_message(
        &details,
        channel.owner_id,
        ctx.author().id,
        (source == EventSource::Forum).then_some(thread_link.as_str()),
        settings.event_ping_role_id,
    );

    match post_announcement(ctx.data().platform.as_ref(), announcements_id, &text).await {
        Ok(message_id) => {
            info!(
                "User {} announced event '{}' from thread {}",
                ctx.author().id,
                name,
                channel.id
            );
            ctx.say(format!(
                "Event announcement sent. Link: {}.",
                message_link(guild_id, announcements_id, message_id)
            ))
            .await?;
        }
        Err(e) => {
            warn!("Failed to announce event from {}: {}", channel.id, e);
            reply_rejected(ctx, &Error::custom(format!("Failed to send the message: {}.", e)))
                .await?;
        }
    }

    Ok(())
}

/// Send the announcement to the announcements channel
pub async fn post_announcement(
    platform: &dyn ForumPlatform,
    announcements_id: ChannelId,
    text: &str,
) -> Result<MessageId, Error> {
    platform.send_message(announcements_id, text).await
}

/// Check the invoking thread and pick the announcement channel
pub fn event_target_for(
    settings: &Settings,
    kind: ChannelType,
    parent_id: Option<ChannelId>,
) -> Result<(EventSource, ChannelId), Error> {
    if kind != ChannelType::PublicThread {
        return Err(Error::mismatch(NOT_IN_THREAD));
    }

    let source = match parent_id {
        Some(id) if settings.event_forum_channel_id == Some(id) => EventSource::Forum,
        Some(id) if settings.event_schedule_channel_id == Some(id) => EventSource::Schedule,
        _ => {
            let allowed: Vec<ChannelId> = [
                settings.event_forum_channel_id,
                settings.event_schedule_channel_id,
            ]
            .into_iter()
            .flatten()
            .collect();

            if allowed.is_empty() {
                return Err(Error::mismatch("Event forums are not configured."));
            }
            return Err(Error::mismatch(format!(
                "This command can only be used in {}.",
                mention_channels(&allowed)
            )));
        }
    };

    let announcements_id = settings
        .event_announcements_channel_id
        .ok_or_else(|| Error::mismatch("The event announcements channel is not configured."))?;

    Ok((source, announcements_id))
}

pub fn announcement_message(
    details: &EventDetails<'_>,
    author_id: Option<UserId>,
    announcer_id: UserId,
    forum_link: Option<&str>,
    ping_role_id: Option<RoleId>,
) -> String {
    let author = author_id
        .map(mention_user)
        .unwrap_or_else(|| "unknown".to_string());

    let mut text = format!(
        "Event announcement\n\
        Title: {}\n\
        Event author: {}\n\
        Announced by: {}\n\
        Description: {}\n\
        Where and when: {}",
        details.name,
        author,
        mention_user(announcer_id),
        details.description,
        details.location
    );

    if let Some(link) = forum_link {
        text.push_str(&format!("\nEvent forum post: {}", link));
    }
    if let Some(role_id) = ping_role_id {
        text.push('\n');
        text.push_str(&mention_role(role_id));
    }

    text
}
