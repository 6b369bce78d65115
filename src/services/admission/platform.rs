use std::sync::Arc;

use async_trait::async_trait;
use serenity::all::{ChannelId, GuildId, Http, MessageId, ReactionType, UserId};

use crate::bot::error::Error;

/// Author and body of the first message of a forum thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarterMessage {
    pub author_id: UserId,
    pub content: String,
}

/// The slice of the Discord API the bot drives
#[async_trait]
pub trait ForumPlatform: Send + Sync {
    async fn fetch_starter_message(&self, thread_id: ChannelId) -> Result<StarterMessage, Error>;

    async fn send_message(&self, channel_id: ChannelId, text: &str) -> Result<MessageId, Error>;

    async fn add_reaction(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        emoji: char,
    ) -> Result<(), Error>;

    /// Active threads of the guild whose parent is `parent_id`
    async fn list_active_threads(
        &self,
        guild_id: GuildId,
        parent_id: ChannelId,
    ) -> Result<Vec<ChannelId>, Error>;

    async fn delete_thread(&self, thread_id: ChannelId) -> Result<(), Error>;
}

/// `ForumPlatform` over serenity's HTTP client
pub struct SerenityPlatform {
    http: Arc<Http>,
}

impl SerenityPlatform {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ForumPlatform for SerenityPlatform {
    async fn fetch_starter_message(&self, thread_id: ChannelId) -> Result<StarterMessage, Error> {
        // In forum channels the starter message shares the thread's id
        let message = thread_id
            .message(self.http.as_ref(), MessageId::new(thread_id.get()))
            .await?;

        Ok(StarterMessage {
            author_id: message.author.id,
            content: message.content,
        })
    }

    async fn send_message(&self, channel_id: ChannelId, text: &str) -> Result<MessageId, Error> {
        let message = channel_id.say(self.http.as_ref(), text).await?;
        Ok(message.id)
    }

    async fn add_reaction(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        emoji: char,
    ) -> Result<(), Error> {
        channel_id
            .create_reaction(self.http.as_ref(), message_id, ReactionType::from(emoji))
            .await?;
        Ok(())
    }

    async fn list_active_threads(
        &self,
        guild_id: GuildId,
        parent_id: ChannelId,
    ) -> Result<Vec<ChannelId>, Error> {
        let active = guild_id.get_active_threads(self.http.as_ref()).await?;

        Ok(active
            .threads
            .into_iter()
            .filter(|thread| thread.parent_id == Some(parent_id))
            .map(|thread| thread.id)
            .collect())
    }

    async fn delete_thread(&self, thread_id: ChannelId) -> Result<(), Error> {
        thread_id.delete(self.http.as_ref()).await?;
        Ok(())
    }
}
