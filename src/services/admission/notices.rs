use std::time::Duration;

use serenity::all::UserId;

use crate::constants::timeouts::format_duration;
use crate::utils::formatting::{mention_user, truncate};

/// Discord rejects messages longer than this
const MESSAGE_LIMIT: usize = 2000;

/// Posted into a thread that breaks the cooldown
pub fn cooldown_warning(author_id: UserId, cooldown: Duration, grace: Duration) -> String {
    format!(
        "{} you can only open a new proposal once every {}. \
        This post will be deleted in {}.",
        mention_user(author_id),
        format_duration(cooldown),
        format_duration(grace)
    )
}

/// Audit record for a thread the bot removed
pub fn thread_deleted(title: &str, author_id: UserId, content: Option<&str>) -> String {
    let header = format!(
        "Post titled \"{}\" was deleted. Author: {}. Reason: post limit exceeded.",
        title,
        mention_user(author_id)
    );

    match content {
        Some(content) if !content.is_empty() => {
            let prefix = format!("{}\nContent: ", header);
            let room = MESSAGE_LIMIT.saturating_sub(prefix.chars().count());
            format!("{}{}", prefix, truncate(content, room))
        }
        _ => header,
    }
}

/// Audit record for a thread the bot tried and failed to remove
pub fn thread_delete_failed(title: &str, author_id: UserId, error: &str) -> String {
    truncate(
        &format!(
            "Failed to delete post \"{}\". Author: {}. Error: {}",
            title,
            mention_user(author_id),
            error
        ),
        MESSAGE_LIMIT,
    )
}

/// Operator alert when an accepted post could not be written to disk
pub fn cooldown_not_saved(author_id: UserId, error: &str) -> String {
    format!(
        "Cooldown for {} could not be saved and will be lost on restart. Error: {}",
        mention_user(author_id),
        error
    )
}
