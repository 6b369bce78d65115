use std::collections::HashSet;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serenity::all::{ChannelId, RoleId};

use crate::constants::timeouts::{DEFAULT_DELETION_GRACE_SECONDS, DEFAULT_POST_COOLDOWN_HOURS};

const DEFAULT_COOLDOWN_FILE: &str = "proposals_cooldown.json";

/// A proposal forum and the voting channel its posts are promoted to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProposalRoute {
    pub forum_id: ChannelId,
    pub voting_id: ChannelId,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub discord_token: String,
    pub guild_id: Option<u64>,
    pub proposal_routes: Vec<ProposalRoute>,
    /// Audit records for automated deletions go here
    pub moderation_log_channel_id: Option<ChannelId>,
    pub event_forum_channel_id: Option<ChannelId>,
    pub event_schedule_channel_id: Option<ChannelId>,
    pub event_announcements_channel_id: Option<ChannelId>,
    pub event_ping_role_id: Option<RoleId>,
    pub cooldown_file: PathBuf,
    /// Minimum time between two accepted proposals by the same user
    pub post_cooldown: Duration,
    /// Time between the cooldown warning and the thread deletion
    pub deletion_grace: Duration,
}

impl Settings {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let discord_token = lookup("DISCORD_TOKEN")
            .filter(|s| !s.is_empty())
            .ok_or("DISCORD_TOKEN environment variable not set")?;

        let guild_id = lookup("GUILD_ID").and_then(|s| s.parse::<u64>().ok());

        let proposal_routes = lookup("PROPOSAL_ROUTES")
            .ok_or("PROPOSAL_ROUTES environment variable not set")
            .and_then(|raw| parse_routes(&raw).map_err(|_| "PROPOSAL_ROUTES is malformed"))?;

        let channel = |key: &str| {
            lookup(key)
                .and_then(|s| s.parse::<u64>().ok())
                .filter(|id| *id != 0)
                .map(ChannelId::new)
        };

        let post_cooldown_hours = lookup("POST_COOLDOWN_HOURS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_POST_COOLDOWN_HOURS);

        let deletion_grace_seconds = lookup("DELETION_GRACE_SECONDS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_DELETION_GRACE_SECONDS);

        Ok(Self {
            discord_token,
            guild_id,
            proposal_routes,
            moderation_log_channel_id: channel("MODERATION_LOG_CHANNEL_ID"),
            event_forum_channel_id: channel("EVENT_FORUM_CHANNEL_ID"),
            event_schedule_channel_id: channel("EVENT_SCHEDULE_CHANNEL_ID"),
            event_announcements_channel_id: channel("EVENT_ANNOUNCEMENTS_CHANNEL_ID"),
            event_ping_role_id: lookup("EVENT_PING_ROLE_ID")
                .and_then(|s| s.parse::<u64>().ok())
                .filter(|id| *id != 0)
                .map(RoleId::new),
            cooldown_file: lookup("COOLDOWN_FILE")
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_COOLDOWN_FILE)),
            post_cooldown: Duration::from_secs(post_cooldown_hours.saturating_mul(3600)),
            deletion_grace: Duration::from_secs(deletion_grace_seconds),
        })
    }

    /// Forums whose new posts are subject to the cooldown
    pub fn proposal_forums(&self) -> HashSet<ChannelId> {
        self.proposal_routes.iter().map(|r| r.forum_id).collect()
    }
}

/// Parse `forum:voting[,forum:voting...]`
fn parse_routes(raw: &str) -> Result<Vec<ProposalRoute>, ()> {
    let routes = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|pair| -> Result<ProposalRoute, ()> {
            let (forum, voting) = pair.split_once(':').ok_or(())?;
            let forum = forum.trim().parse::<u64>().map_err(|_| ())?;
            let voting = voting.trim().parse::<u64>().map_err(|_| ())?;
            if forum == 0 || voting == 0 {
                return Err(());
            }
            Ok(ProposalRoute {
                forum_id: ChannelId::new(forum),
                voting_id: ChannelId::new(voting),
            })
        })
        .collect::<Result<Vec<_>, ()>>()?;

    if routes.is_empty() {
        return Err(());
    }
    Ok(routes)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn settings_from(pairs: &[(&str, &str)]) -> Result<Settings, String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings =
            settings_from(&[("DISCORD_TOKEN", "token"), ("PROPOSAL_ROUTES", "11:12")]).unwrap();

        assert_eq!(settings.post_cooldown, Duration::from_secs(24 * 3600));
        assert_eq!(settings.deletion_grace, Duration::from_secs(30));
        assert_eq!(settings.cooldown_file, PathBuf::from("proposals_cooldown.json"));
        assert!(settings.moderation_log_channel_id.is_none());
        assert!(settings.guild_id.is_none());
    }

    #[test]
    fn test_routes() {
        let settings = settings_from(&[
            ("DISCORD_TOKEN", "token"),
            ("PROPOSAL_ROUTES", "11:12, 21:22"),
            ("MODERATION_LOG_CHANNEL_ID", "99"),
        ])
        .unwrap();

        assert_eq!(
            settings.proposal_routes,
            vec![
                ProposalRoute { forum_id: ChannelId::new(11), voting_id: ChannelId::new(12) },
                ProposalRoute { forum_id: ChannelId::new(21), voting_id: ChannelId::new(22) },
            ]
        );
        assert!(settings.proposal_forums().contains(&ChannelId::new(21)));
        assert_eq!(settings.moderation_log_channel_id, Some(ChannelId::new(99)));
        assert!(settings.event_ping_role_id.is_none());
    }

    #[test]
    fn test_overrides() {
        let settings = settings_from(&[
            ("DISCORD_TOKEN", "token"),
            ("PROPOSAL_ROUTES", "11:12"),
            ("POST_COOLDOWN_HOURS", "48"),
            ("DELETION_GRACE_SECONDS", "5"),
            ("COOLDOWN_FILE", "/data/cooldowns.json"),
            ("EVENT_PING_ROLE_ID", "1167"),
        ])
        .unwrap();

        assert_eq!(settings.post_cooldown, Duration::from_secs(48 * 3600));
        assert_eq!(settings.deletion_grace, Duration::from_secs(5));
        assert_eq!(settings.cooldown_file, PathBuf::from("/data/cooldowns.json"));
        assert_eq!(settings.event_ping_role_id, Some(RoleId::new(1167)));
    }

    #[test]
    fn test_invalid_ping_role_is_ignored() {
        for raw in ["0", "everyone", "-5"] {
            let settings = settings_from(&[
                ("DISCORD_TOKEN", "token"),
                ("PROPOSAL_ROUTES", "11:12"),
                ("EVENT_PING_ROLE_ID", raw),
            ])
            .unwrap();
            assert!(settings.event_ping_role_id.is_none(), "input: {raw}");
        }
    }

    #[test]
    fn test_missing_or_bad_required() {
        assert!(settings_from(&[("PROPOSAL_ROUTES", "11:12")]).is_err());
        assert!(settings_from(&[("DISCORD_TOKEN", "token")]).is_err());
        assert!(settings_from(&[("DISCORD_TOKEN", "token"), ("PROPOSAL_ROUTES", "11")]).is_err());
        assert!(settings_from(&[("DISCORD_TOKEN", "token"), ("PROPOSAL_ROUTES", "0:12")]).is_err());
        assert!(settings_from(&[("DISCORD_TOKEN", "token"), ("PROPOSAL_ROUTES", "")]).is_err());
    }
}
