use serenity::all::{ChannelId, GuildId, MessageId, RoleId, UserId};

/// Format a user mention
pub fn mention_user(user_id: UserId) -> String {
    format!("<@{}>", user_id)
}

/// Format a channel mention
pub fn mention_channel(channel_id: ChannelId) -> String {
    format!("<#{}>", channel_id)
}

/// Format a role mention
pub fn mention_role(role_id: RoleId) -> String {
    format!("<@&{}>", role_id)
}

/// Link to a channel or thread inside a guild
pub fn channel_link(guild_id: GuildId, channel_id: ChannelId) -> String {
    format!("https://discord.com/channels/{}/{}", guild_id, channel_id)
}

/// Link to a single message
pub fn message_link(guild_id: GuildId, channel_id: ChannelId, message_id: MessageId) -> String {
    format!("{}/{}", channel_link(guild_id, channel_id), message_id)
}

/// Join channel mentions with " or " for rejection notices
pub fn mention_channels(channel_ids: &[ChannelId]) -> String {
    channel_ids
        .iter()
        .map(|id| mention_channel(*id))
        .collect::<Vec<_>>()
        .join(" or ")
}

/// Truncate a string to a maximum length in characters, adding ellipsis if needed
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mentions() {
        assert_eq!(mention_user(UserId::new(42)), "<@42>");
        assert_eq!(mention_role(RoleId::new(7)), "<@&7>");
        assert_eq!(
            mention_channels(&[ChannelId::new(1), ChannelId::new(2)]),
            "<#1> or <#2>"
        );
    }

    #[test]
    fn test_channel_link() {
        assert_eq!(
            channel_link(GuildId::new(10), ChannelId::new(20)),
            "https://discord.com/channels/10/20"
        );
        assert_eq!(
            message_link(GuildId::new(10), ChannelId::new(20), MessageId::new(30)),
            "https://discord.com/channels/10/20/30"
        );
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 8), "abcde...");
        assert_eq!(truncate("ПриветМир", 7), "Прив...");
        assert_eq!(truncate("abcdef", 2), "ab");
    }
}
