use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serenity::all::{ChannelId, GuildId, UserId};
use tracing::{debug, error, info, warn};

use crate::config::Settings;
use crate::constants::timeouts::NEW_THREAD_MAX_AGE_SECONDS;
use crate::db::{CooldownStore, Verdict};
use crate::services::admission::notices;
use crate::services::admission::platform::ForumPlatform;

/// A thread as reported by the gateway
#[derive(Debug, Clone)]
pub struct NewThread {
    pub id: ChannelId,
    pub guild_id: GuildId,
    pub parent_id: Option<ChannelId>,
    pub title: String,
    pub owner_id: Option<UserId>,
    /// Creation time encoded in the thread id
    pub created_at: DateTime<Utc>,
}

/// A proposal thread whose author has been resolved
#[derive(Debug, Clone)]
pub struct PendingThread {
    pub thread: NewThread,
    pub parent_id: ChannelId,
    pub author_id: UserId,
    pub content: Option<String>,
}

/// Terminal state of one admission decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionOutcome {
    /// Not a proposal forum
    Ignored,
    /// Thread predates the event by more than the new-thread window
    Stale,
    /// A decision for this thread was already made or is in progress
    AlreadyHandled,
    /// Neither the starter message nor the thread owner was available
    AuthorUnknown,
    Accepted,
    Deleted,
    DeleteFailed,
    /// Thread was gone by the time the grace window ended
    Vanished,
}

#[derive(Debug, Clone)]
pub struct AdmissionPolicy {
    pub proposal_forums: HashSet<ChannelId>,
    pub cooldown: Duration,
    pub grace: Duration,
    pub log_channel_id: Option<ChannelId>,
    /// Oldest thread still treated as new
    pub max_thread_age: Duration,
}

impl AdmissionPolicy {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            proposal_forums: settings.proposal_forums(),
            cooldown: settings.post_cooldown,
            grace: settings.deletion_grace,
            log_channel_id: settings.moderation_log_channel_id,
            max_thread_age: Duration::from_secs(NEW_THREAD_MAX_AGE_SECONDS),
        }
    }
}

/// Gates new proposal threads on the per-user cooldown
pub struct AdmissionController {
    platform: Arc<dyn ForumPlatform>,
    store: Arc<CooldownStore>,
    policy: AdmissionPolicy,
    /// thread_id -> thread creation time, for every thread a decision was started on
    decided: DashMap<ChannelId, DateTime<Utc>>,
}

impl AdmissionController {
    pub fn new(
        platform: Arc<dyn ForumPlatform>,
        store: Arc<CooldownStore>,
        policy: AdmissionPolicy,
    ) -> Self {
        Self {
            platform,
            store,
            policy,
            decided: DashMap::new(),
        }
    }

    pub fn store(&self) -> &Arc<CooldownStore> {
        &self.store
    }

    /// Decide on a newly created thread.
    ///
    /// Each thread is decided at most once. The gateway also reports old
    /// threads as created (the bot joining one, unarchiving), so threads
    /// older than the policy's `max_thread_age` are left alone.
    ///
    /// A rejected thread is warned, left alone for the grace window, then
    /// deleted if it still exists. Platform failures never escape; they end
    /// up in the tracing log or the moderation log channel.
    pub async fn handle_new_thread(&self, thread: NewThread, now: DateTime<Utc>) -> AdmissionOutcome {
        let parent_id = match thread.parent_id {
            Some(parent_id) if self.policy.proposal_forums.contains(&parent_id) => parent_id,
            _ => return AdmissionOutcome::Ignored,
        };

        if !self.is_fresh(thread.created_at, now) {
            debug!(
                "Thread {} was created at {}, not a new post",
                thread.id, thread.created_at
            );
            return AdmissionOutcome::Stale;
        }

        if !self.claim(&thread, now) {
            debug!("Thread {} was already handled", thread.id);
            return AdmissionOutcome::AlreadyHandled;
        }

        let pending = match self.resolve_author(thread, parent_id).await {
            Some(pending) => pending,
            None => return AdmissionOutcome::AuthorUnknown,
        };

        match self
            .store
            .admit(pending.author_id, now, self.policy.cooldown)
            .await
        {
            Ok(Verdict::Admitted) => {
                info!(
                    "Accepted proposal {} by user {}",
                    pending.thread.id, pending.author_id
                );
                AdmissionOutcome::Accepted
            }
            Ok(Verdict::CoolingDown {
                last_post_at,
                remaining,
            }) => {
                info!(
                    "User {} posted proposal {} within cooldown (last accepted {}, {}s remaining)",
                    pending.author_id,
                    pending.thread.id,
                    last_post_at,
                    remaining.num_seconds()
                );
                self.reject(pending).await
            }
            Err(e) => {
                // Admitted in memory only; the limit still holds until restart
                error!(
                    "Failed to persist cooldown for user {}: {}",
                    pending.author_id, e
                );
                self.audit(notices::cooldown_not_saved(pending.author_id, &e.to_string()))
                    .await;
                AdmissionOutcome::Accepted
            }
        }
    }

    fn is_fresh(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let max_age = chrono::Duration::from_std(self.policy.max_thread_age)
            .unwrap_or(chrono::Duration::MAX);
        now - created_at <= max_age
    }

    /// Mark the thread as decided; false if it already was
    fn claim(&self, thread: &NewThread, now: DateTime<Utc>) -> bool {
        // Anything past the window is rejected as stale, so its entry can go
        self.decided
            .retain(|_, created_at| self.is_fresh(*created_at, now));

        match self.decided.entry(thread.id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(thread.created_at);
                true
            }
        }
    }

    /// Find who opened the thread, preferring the starter message
    async fn resolve_author(&self, thread: NewThread, parent_id: ChannelId) -> Option<PendingThread> {
        let (author_id, content) = match self.platform.fetch_starter_message(thread.id).await {
            Ok(starter) => (starter.author_id, Some(starter.content)),
            Err(e) => match thread.owner_id {
                Some(owner_id) => {
                    warn!(
                        "Could not fetch starter message of thread {}: {}, using thread owner",
                        thread.id, e
                    );
                    (owner_id, None)
                }
                None => {
                    warn!(
                        "Could not resolve author of thread {}: {}, skipping",
                        thread.id, e
                    );
                    return None;
                }
            },
        };

        Some(PendingThread {
            thread,
            parent_id,
            author_id,
            content,
        })
    }

    /// Warn, wait out the grace window, then remove the thread if it is still there
    async fn reject(&self, pending: PendingThread) -> AdmissionOutcome {
        let thread_id = pending.thread.id;
        let warning =
            notices::cooldown_warning(pending.author_id, self.policy.cooldown, self.policy.grace);

        if let Err(e) = self.platform.send_message(thread_id, &warning).await {
            warn!("Failed to post cooldown warning in thread {}: {}", thread_id, e);
        }

        tokio::time::sleep(self.policy.grace).await;

        match self
            .platform
            .list_active_threads(pending.thread.guild_id, pending.parent_id)
            .await
        {
            Ok(threads) if !threads.contains(&thread_id) => {
                debug!("Thread {} already gone, nothing to delete", thread_id);
                return AdmissionOutcome::Vanished;
            }
            Ok(_) => {}
            Err(e) => {
                warn!(
                    "Could not list active threads of {}: {}, attempting deletion anyway",
                    pending.parent_id, e
                );
            }
        }

        match self.platform.delete_thread(thread_id).await {
            Ok(()) => {
                info!(
                    "Deleted proposal {} by user {} (post limit exceeded)",
                    thread_id, pending.author_id
                );
                self.audit(notices::thread_deleted(
                    &pending.thread.title,
                    pending.author_id,
                    pending.content.as_deref(),
                ))
                .await;
                AdmissionOutcome::Deleted
            }
            Err(e) => {
                warn!("Failed to delete proposal {}: {}", thread_id, e);
                self.audit(notices::thread_delete_failed(
                    &pending.thread.title,
                    pending.author_id,
                    &e.to_string(),
                ))
                .await;
                AdmissionOutcome::DeleteFailed
            }
        }
    }

    /// Post an audit record to the moderation log channel, if one is configured
    async fn audit(&self, record: String) {
        let Some(log_channel_id) = self.policy.log_channel_id else {
            info!("Moderation audit: {}", record);
            return;
        };

        if let Err(e) = self.platform.send_message(log_channel_id, &record).await {
            warn!("Failed to send audit record to {}: {}", log_channel_id, e);
        }
    }
}

impl std::fmt::Debug for AdmissionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdmissionController")
            .field("policy", &self.policy)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}
