use model::user::User;
use model::Snowflake;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashSet;
use std::time::Duration;

/// Live state of the gateway session, written by the shard and read by the status endpoints
#[derive(Default)]
pub struct SessionStatus {
    inner: RwLock<StatusInner>,
}

#[derive(Default)]
struct StatusInner {
    ready: bool,
    user: Option<User>,
    guilds: HashSet<Snowflake>,
    latency: Option<Duration>,
}

#[derive(Serialize, Debug, Clone)]
pub struct StatusSnapshot {
    pub bot_ready: bool,
    pub bot_user: Option<String>,
    pub bot_id: Option<Snowflake>,
    pub guilds: usize,
    pub latency_ms: Option<u128>,
}

impl SessionStatus {
    pub fn new() -> SessionStatus {
        SessionStatus::default()
    }

    pub fn is_ready(&self) -> bool {
        self.inner.read().ready
    }

    pub fn latency(&self) -> Option<Duration> {
        self.inner.read().latency
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        let inner = self.inner.read();

        StatusSnapshot {
            bot_ready: inner.ready,
            bot_user: inner.user.as_ref().map(|user| user.username.clone()),
            bot_id: inner.user.as_ref().map(|user| user.id),
            guilds: inner.guilds.len(),
            latency_ms: inner.latency.map(|latency| latency.as_millis()),
        }
    }

    pub(crate) fn set_ready(&self, user: User, guilds: impl IntoIterator<Item = Snowflake>) {
        let mut inner = self.inner.write();
        inner.ready = true;
        inner.user = Some(user);
        inner.guilds = guilds.into_iter().collect();
    }

    pub(crate) fn set_resumed(&self) {
        self.inner.write().ready = true;
    }

    pub(crate) fn set_disconnected(&self) {
        let mut inner = self.inner.write();
        inner.ready = false;
        inner.latency = None;
    }

    pub(crate) fn add_guild(&self, guild_id: Snowflake) {
        self.inner.write().guilds.insert(guild_id);
    }

    pub(crate) fn remove_guild(&self, guild_id: Snowflake) {
        self.inner.write().guilds.remove(&guild_id);
    }

    pub(crate) fn set_latency(&self, latency: Duration) {
        self.inner.write().latency = Some(latency);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        serde_json::from_str(r#"{"id": "10", "username": "bridge", "bot": true}"#).unwrap()
    }

    #[test]
    fn test_snapshot_before_ready() {
        let snapshot = SessionStatus::new().snapshot();

        assert!(!snapshot.bot_ready);
        assert_eq!(snapshot.bot_id, None);
        assert_eq!(snapshot.guilds, 0);
    }

    #[test]
    fn test_guild_tracking() {
        let status = SessionStatus::new();
        status.set_ready(user(), [Snowflake(1), Snowflake(2)]);
        status.add_guild(Snowflake(2));
        status.add_guild(Snowflake(3));
        status.remove_guild(Snowflake(1));
        status.set_latency(Duration::from_millis(42));

        let snapshot = status.snapshot();
        assert!(snapshot.bot_ready);
        assert_eq!(snapshot.bot_user.as_deref(), Some("bridge"));
        assert_eq!(snapshot.bot_id, Some(Snowflake(10)));
        assert_eq!(snapshot.guilds, 2);
        assert_eq!(snapshot.latency_ms, Some(42));

        status.set_disconnected();
        assert!(!status.is_ready());
        assert_eq!(status.latency(), None);
    }
}
