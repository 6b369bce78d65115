//! Recording `ForumPlatform` for tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serenity::all::{ChannelId, GuildId, MessageId, UserId};

use crate::bot::error::Error;
use crate::services::admission::platform::{ForumPlatform, StarterMessage};

#[derive(Default)]
pub struct MockPlatform {
    pub starters: Mutex<HashMap<ChannelId, StarterMessage>>,
    pub active_threads: Mutex<HashSet<ChannelId>>,
    pub sent: Mutex<Vec<(ChannelId, String)>>,
    pub reactions: Mutex<Vec<(ChannelId, MessageId, char)>>,
    pub deleted: Mutex<Vec<ChannelId>>,
    /// Channels whose sends fail
    pub failing_channels: Mutex<HashSet<ChannelId>>,
    pub fail_delete: bool,
    pub fail_list: bool,
    pub fail_reactions: bool,
    /// Drop the thread from the active list as soon as the bot posts into it,
    /// as if a moderator removed it during the grace window
    pub vanish_on_warning: bool,
    pub next_message_id: AtomicU64,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an existing forum thread and its starter message
    pub fn add_thread(&self, thread_id: ChannelId, author_id: UserId, content: &str) {
        self.starters.lock().unwrap().insert(
            thread_id,
            StarterMessage {
                author_id,
                content: content.to_string(),
            },
        );
        self.active_threads.lock().unwrap().insert(thread_id);
    }

    /// Register a thread whose starter message cannot be fetched
    pub fn add_thread_without_starter(&self, thread_id: ChannelId) {
        self.active_threads.lock().unwrap().insert(thread_id);
    }

    pub fn fail_sends_to(&self, channel_id: ChannelId) {
        self.failing_channels.lock().unwrap().insert(channel_id);
    }

    pub fn sent_to(&self, channel_id: ChannelId) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| *id == channel_id)
            .map(|(_, text)| text.clone())
            .collect()
    }

    pub fn deleted(&self) -> Vec<ChannelId> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl ForumPlatform for MockPlatform {
    async fn fetch_starter_message(&self, thread_id: ChannelId) -> Result<StarterMessage, Error> {
        self.starters
            .lock()
            .unwrap()
            .get(&thread_id)
            .cloned()
            .ok_or_else(|| Error::custom("Unknown Message"))
    }

    async fn send_message(&self, channel_id: ChannelId, text: &str) -> Result<MessageId, Error> {
        if self.failing_channels.lock().unwrap().contains(&channel_id) {
            return Err(Error::custom("Missing Access"));
        }

        self.sent.lock().unwrap().push((channel_id, text.to_string()));
        if self.vanish_on_warning {
            self.active_threads.lock().unwrap().remove(&channel_id);
        }

        let id = self.next_message_id.fetch_add(1, Ordering::SeqCst) + 1000;
        Ok(MessageId::new(id))
    }

    async fn add_reaction(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        emoji: char,
    ) -> Result<(), Error> {
        if self.fail_reactions {
            return Err(Error::custom("Unknown Emoji"));
        }
        self.reactions
            .lock()
            .unwrap()
            .push((channel_id, message_id, emoji));
        Ok(())
    }

    async fn list_active_threads(
        &self,
        _guild_id: GuildId,
        _parent_id: ChannelId,
    ) -> Result<Vec<ChannelId>, Error> {
        if self.fail_list {
            return Err(Error::custom("Service Unavailable"));
        }
        Ok(self.active_threads.lock().unwrap().iter().copied().collect())
    }

    async fn delete_thread(&self, thread_id: ChannelId) -> Result<(), Error> {
        if self.fail_delete {
            return Err(Error::custom("Missing Permissions"));
        }
        self.active_threads.lock().unwrap().remove(&thread_id);
        self.deleted.lock().unwrap().push(thread_id);
        Ok(())
    }
}
