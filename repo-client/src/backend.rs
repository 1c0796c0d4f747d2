//! Seams to the hosted auth service and document database.
//!
//! Everything the client persists or reads goes through [`AuthProvider`] and
//! [`DocumentStore`]. Both are `?Send`: the client runs on a single
//! cooperative event loop (the browser, or a current-thread runtime in
//! tests), so handles are `Rc` and callbacks never cross threads.

use std::cell::RefCell;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use async_trait::async_trait;
use futures::channel::mpsc;
use futures::stream::{LocalBoxStream, Stream, StreamExt};
use shared_types::{Document, DocumentWrite};

use crate::error::{ClientError, ClientResult};

/// Authenticated handle issued by the auth collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub uid: String,
    pub anonymous: bool,
    /// Bearer token for subsequent backend calls, when the provider issues one
    pub token: Option<String>,
}

impl Identity {
    pub fn anonymous(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            anonymous: true,
            token: None,
        }
    }
}

/// Current identity first, then every change.
pub type IdentityStream = LocalBoxStream<'static, Option<Identity>>;

#[async_trait(?Send)]
pub trait AuthProvider {
    async fn sign_in_with_token(&self, token: &str) -> ClientResult<Identity>;

    async fn sign_in_anonymously(&self) -> ClientResult<Identity>;

    async fn sign_out(&self) -> ClientResult<()>;

    fn current_identity(&self) -> Option<Identity>;

    fn watch_identity(&self) -> IdentityStream;
}

#[async_trait(?Send)]
pub trait DocumentStore {
    /// `Ok(None)` when the document does not exist.
    async fn get(&self, path: &str) -> ClientResult<Option<Document>>;

    /// Create or fully replace a document.
    async fn set(&self, path: &str, write: DocumentWrite) -> ClientResult<()>;

    /// Overwrite the given fields of an existing document.
    async fn update(&self, path: &str, write: DocumentWrite) -> ClientResult<()>;

    /// Create a document with a server-assigned id.
    async fn add(&self, collection_path: &str, write: DocumentWrite) -> ClientResult<String>;

    async fn delete(&self, path: &str) -> ClientResult<()>;

    /// Subscribe to full snapshots of a collection.
    fn listen(&self, collection_path: &str) -> Subscription;
}

/// The pair of collaborators a client session talks to.
#[derive(Clone)]
pub struct Backend {
    pub auth: Rc<dyn AuthProvider>,
    pub store: Rc<dyn DocumentStore>,
}

impl Backend {
    pub fn new(auth: Rc<dyn AuthProvider>, store: Rc<dyn DocumentStore>) -> Self {
        Self { auth, store }
    }
}

// ============================================================================
// Subscriptions
// ============================================================================

pub type SnapshotResult = ClientResult<Vec<Document>>;
pub type SnapshotSender = mpsc::UnboundedSender<SnapshotResult>;

/// Live handle on a collection listener.
///
/// Yields a full snapshot per backend push until the listener fails or is
/// closed by the backend. Dropping the handle releases the listener.
pub struct Subscription {
    path: String,
    rx: mpsc::UnboundedReceiver<SnapshotResult>,
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(
        path: impl Into<String>,
        rx: mpsc::UnboundedReceiver<SnapshotResult>,
        release: impl FnOnce() + 'static,
    ) -> Self {
        Self {
            path: path.into(),
            rx,
            release: Some(Box::new(release)),
        }
    }

    /// A listener that could not be opened: yields the error once, then ends.
    pub fn failed(path: impl Into<String>, error: ClientError) -> Self {
        let (tx, rx) = mpsc::unbounded();
        let _ = tx.unbounded_send(Err(error));
        Self {
            path: path.into(),
            rx,
            release: None,
        }
    }
}

impl Stream for Subscription {
    type Item = SnapshotResult;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_next_unpin(cx)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.rx.close();
        if let Some(release) = self.release.take() {
            tracing::debug!(path = %self.path, "releasing subscription");
            release();
        }
    }
}

// ============================================================================
// Identity Feed
// ============================================================================

/// Identity state plus its watchers, for [`AuthProvider`] implementations.
#[derive(Clone, Default)]
pub struct IdentityFeed {
    inner: Rc<RefCell<IdentityFeedInner>>,
}

#[derive(Default)]
struct IdentityFeedInner {
    current: Option<Identity>,
    watchers: Vec<mpsc::UnboundedSender<Option<Identity>>>,
}

impl IdentityFeed {
    pub fn current(&self) -> Option<Identity> {
        self.inner.borrow().current.clone()
    }

    /// Record a change and notify live watchers; closed watchers are pruned.
    pub fn publish(&self, identity: Option<Identity>) {
        let mut inner = self.inner.borrow_mut();
        inner.current = identity.clone();
        inner
            .watchers
            .retain(|tx| tx.unbounded_send(identity.clone()).is_ok());
    }

    pub fn watch(&self) -> IdentityStream {
        let (tx, rx) = mpsc::unbounded();
        let mut inner = self.inner.borrow_mut();
        let _ = tx.unbounded_send(inner.current.clone());
        inner.watchers.push(tx);
        rx.boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_subscription_release_on_drop() {
        let released = Rc::new(Cell::new(false));
        let (_tx, rx) = mpsc::unbounded();
        let flag = released.clone();
        let sub = Subscription::new("a/b", rx, move || flag.set(true));

        assert!(!released.get());
        drop(sub);
        assert!(released.get());
    }

    #[test]
    fn test_failed_subscription_yields_error_then_ends() {
        futures::executor::block_on(async {
            let mut sub = Subscription::failed("a/b", ClientError::Subscription("denied".into()));
            assert!(matches!(sub.next().await, Some(Err(ClientError::Subscription(_)))));
            assert!(sub.next().await.is_none());
        });
    }

    #[test]
    fn test_identity_feed_replays_current() {
        futures::executor::block_on(async {
            let feed = IdentityFeed::default();
            feed.publish(Some(Identity::anonymous("u1")));

            let mut watch = feed.watch();
            assert_eq!(watch.next().await.unwrap().unwrap().uid, "u1");

            feed.publish(None);
            assert_eq!(watch.next().await, Some(None));
            assert!(feed.current().is_none());
        });
    }
}
