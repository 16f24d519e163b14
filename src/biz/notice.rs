//! User-visible notifications emitted by the session store.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use log::{error, info};
use serde::Serialize;
use tokio::sync::broadcast;

const NOTICE_CAPACITY: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Loading,
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Position in the notifier's history, assigned when sent.
    pub seq: u64,
    pub level: NoticeLevel,
    pub message: String,
    /// Notices sharing an id replace each other in the UI, e.g. loading → success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Notice {
    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            seq: 0,
            level,
            message: message.into(),
            id: None,
        }
    }

    pub fn loading(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Loading, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }
}

/// Fans notices out to every subscriber, and keeps the last few for pollers.
#[derive(Debug, Clone)]
pub struct Notifier {
    sender: broadcast::Sender<Notice>,
    recent: Arc<Mutex<VecDeque<Notice>>>,
}

impl Notifier {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(NOTICE_CAPACITY);
        Self {
            sender,
            recent: Arc::new(Mutex::new(VecDeque::with_capacity(NOTICE_CAPACITY))),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.sender.subscribe()
    }

    pub fn notify(&self, mut notice: Notice) {
        match notice.level {
            NoticeLevel::Error => error!("❌ {}", notice.message),
            _ => info!("📣 {}", notice.message),
        }

        // Sequence and send under the lock, so pollers and subscribers agree on order.
        let mut recent = self.recent.lock().unwrap();
        notice.seq = recent.back().map_or(1, |last| last.seq + 1);
        if recent.len() == NOTICE_CAPACITY {
            recent.pop_front();
        }
        recent.push_back(notice.clone());

        let _ = self.sender.send(notice);
    }

    /// Retained notices with a sequence number greater than `after`, oldest first.
    pub fn since(&self, after: Option<u64>) -> Vec<Notice> {
        let after = after.unwrap_or(0);
        self.recent
            .lock()
            .unwrap()
            .iter()
            .filter(|notice| notice.seq > after)
            .cloned()
            .collect()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notices_reach_every_subscriber() {
        let notifier = Notifier::new();
        let mut rx1 = notifier.subscribe();
        let mut rx2 = notifier.subscribe();

        notifier.notify(Notice::success("Connected to Keplr").with_id("wallet-connect"));

        for rx in [&mut rx1, &mut rx2] {
            let notice = rx.try_recv().unwrap();
            assert_eq!(notice.level, NoticeLevel::Success);
            assert_eq!(notice.id.as_deref(), Some("wallet-connect"));
        }
    }

    #[test]
    fn notify_without_subscribers() {
        let notifier = Notifier::new();
        notifier.notify(Notice::info("nobody listens"));

        let kept = notifier.since(None);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].seq, 1);
        assert_eq!(kept[0].message, "nobody listens");
    }

    #[test]
    fn history_is_bounded_and_ordered() {
        let notifier = Notifier::new();
        for i in 0..NOTICE_CAPACITY + 5 {
            notifier.notify(Notice::info(format!("notice {i}")));
        }

        let all = notifier.since(None);
        assert_eq!(all.len(), NOTICE_CAPACITY);
        assert_eq!(all[0].seq, 6);
        assert_eq!(all.last().unwrap().seq, (NOTICE_CAPACITY + 5) as u64);

        let tail = notifier.since(Some(35));
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].message, "notice 35");
        assert!(notifier.since(Some(37)).is_empty());
    }

    #[test]
    fn notice_json() {
        let value = serde_json::to_value(Notice::error("boom")).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "seq": 0, "level": "error", "message": "boom" })
        );
    }
}
