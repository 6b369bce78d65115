use std::sync::Arc;

use chrono::{DateTime, Utc};
use serenity::all::GuildChannel;
use tracing::debug;

use crate::bot::data::Data;
use crate::services::admission::NewThread;

/// Hand a new thread to the admission controller on its own task.
///
/// Rejections sleep through the grace window, so the decision must not run
/// on the gateway's event path.
pub fn handle_thread_create(data: &Arc<Data>, thread: &GuildChannel) {
    // The gateway attaches the bot's membership when it is added to an existing thread
    if thread.member.is_some() {
        debug!("Thread {} reported again after the bot joined, skipping", thread.id);
        return;
    }

    let now = Utc::now();
    let created_at = DateTime::from_timestamp(thread.id.created_at().unix_timestamp(), 0)
        .unwrap_or(now);

    let new_thread = NewThread {
        id: thread.id,
        guild_id: thread.guild_id,
        parent_id: thread.parent_id,
        title: thread.name.clone(),
        owner_id: thread.owner_id,
        created_at,
    };
    let admission = data.admission.clone();

    tokio::spawn(async move {
        let thread_id = new_thread.id;
        let outcome = admission.handle_new_thread(new_thread, now).await;
        debug!("Thread {} admission finished: {:?}", thread_id, outcome);
    });
}
