use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_DURATION_MS: u64 = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub message: String,
    /// Zero means the notification stays until dismissed.
    pub duration_ms: u64,
    pub created_at_ms: i64,
}

impl Notification {
    fn is_expired(&self, now_ms: i64) -> bool {
        self.duration_ms > 0 && now_ms >= self.created_at_ms + self.duration_ms as i64
    }
}

/// Toast queue. Auto-dismissal happens through `expire` instead of timers, so
/// the frontend (or any poller) decides when time moves.
#[derive(Debug, Default)]
pub struct NotificationCenter {
    items: Vec<Notification>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, kind: NotificationKind, message: impl Into<String>, duration_ms: Option<u64>) -> String {
        self.add_at(kind, message, duration_ms, now_ms())
    }

    fn add_at(
        &mut self,
        kind: NotificationKind,
        message: impl Into<String>,
        duration_ms: Option<u64>,
        created_at_ms: i64,
    ) -> String {
        let id = Uuid::new_v4().to_string();
        self.items.push(Notification {
            id: id.clone(),
            kind,
            message: message.into(),
            duration_ms: duration_ms.unwrap_or(DEFAULT_DURATION_MS),
            created_at_ms,
        });
        id
    }

    pub fn remove(&mut self, id: &str) {
        self.items.retain(|n| n.id != id);
    }

    pub fn info(&mut self, message: impl Into<String>) -> String {
        self.add(NotificationKind::Info, message, None)
    }

    pub fn success(&mut self, message: impl Into<String>) -> String {
        self.add(NotificationKind::Success, message, None)
    }

    pub fn error(&mut self, message: impl Into<String>) -> String {
        self.add(NotificationKind::Error, message, None)
    }

    pub fn warning(&mut self, message: impl Into<String>) -> String {
        self.add(NotificationKind::Warning, message, None)
    }

    pub fn get(&self, id: &str) -> Option<&Notification> {
        self.items.iter().find(|n| n.id == id)
    }

    /// Drops every notification whose deadline is at or before `now_ms`.
    pub fn expire(&mut self, now_ms: i64) {
        self.items.retain(|n| !n.is_expired(now_ms));
    }

    pub fn list(&self) -> &[Notification] {
        &self.items
    }
}

pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
