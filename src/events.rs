use tokio::sync::broadcast;
use tracing::{debug, info};
use uuid::Uuid;

pub const BLOG_VIEWS: &[&str] = &["/dashboard/blogs", "/blog"];
pub const CATEGORY_VIEWS: &[&str] = &["/dashboard/categories", "/categories"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Blog,
    Category,
}

/// A successful write; `stale_views` lists the pages that must be rebuilt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentChanged {
    pub kind: ContentKind,
    pub id: Uuid,
    pub stale_views: &'static [&'static str],
}

impl ContentChanged {
    pub fn blog(id: Uuid) -> Self {
        Self {
            kind: ContentKind::Blog,
            id,
            stale_views: BLOG_VIEWS,
        }
    }

    pub fn category(id: Uuid) -> Self {
        Self {
            kind: ContentKind::Category,
            id,
            stale_views: CATEGORY_VIEWS,
        }
    }
}

#[derive(Clone)]
pub struct ContentEvents {
    tx: broadcast::Sender<ContentChanged>,
}

impl ContentEvents {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ContentChanged> {
        self.tx.subscribe()
    }

    pub fn publish(&self, event: ContentChanged) {
        if self.tx.send(event).is_err() {
            debug!("no content subscribers");
        }
    }
}

impl Default for ContentEvents {
    fn default() -> Self {
        Self::new(64)
    }
}

/// Logs every invalidation until the sender side is gone.
pub async fn log_invalidations(mut rx: broadcast::Receiver<ContentChanged>) {
    loop {
        match rx.recv().await {
            Ok(event) => info!(
                kind = ?event.kind,
                id = %event.id,
                views = ?event.stale_views,
                "content changed; views invalidated"
            ),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                debug!(skipped, "invalidation log lagged")
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_see_published_events() {
        let events = ContentEvents::default();
        let mut rx = events.subscribe();
        let id = Uuid::new_v4();

        events.publish(ContentChanged::blog(id));

        let got = rx.recv().await.unwrap();
        assert_eq!(got.kind, ContentKind::Blog);
        assert_eq!(got.id, id);
        assert!(got.stale_views.contains(&"/dashboard/blogs"));
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        ContentEvents::default().publish(ContentChanged::category(Uuid::new_v4()));
    }
}
