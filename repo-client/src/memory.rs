//! In-process backend.
//!
//! Serves both [`AuthProvider`] and [`DocumentStore`] from memory, with the
//! same observable behavior as the hosted service: full-collection snapshots
//! pushed after every write, server-stamped timestamps, and listeners that
//! deliver the current contents as soon as they are opened. Used for the
//! offline preview and as the test double, so it also carries fault
//! injection switches.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::{Rc, Weak};

use async_trait::async_trait;
use chrono::Utc;
use futures::channel::mpsc;
use serde_json::{Map, Value};
use shared_types::{Document, DocumentWrite, Timestamp};

use crate::backend::{
    AuthProvider, Backend, DocumentStore, Identity, IdentityFeed, IdentityStream, SnapshotSender,
    Subscription,
};
use crate::error::{ClientError, ClientResult};

/// Switches that make the next operations fail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Faults {
    pub reject_sign_in: bool,
    pub fail_reads: bool,
    pub fail_writes: bool,
    pub fail_listen: bool,
}

#[derive(Default)]
struct MemoryState {
    /// collection path -> documents in insertion order
    collections: BTreeMap<String, Vec<Document>>,
    listeners: HashMap<String, Vec<(u64, SnapshotSender)>>,
    next_listener_id: u64,
    listen_calls: usize,
    tokens: HashMap<String, String>,
    server_time: Option<Timestamp>,
    pushes_paused: bool,
    dirty: Vec<String>,
    faults: Faults,
}

#[derive(Clone, Default)]
pub struct MemoryBackend {
    state: Rc<RefCell<MemoryState>>,
    identity: IdentityFeed,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Both collaborator handles backed by this instance.
    pub fn backend(&self) -> Backend {
        Backend::new(Rc::new(self.clone()), Rc::new(self.clone()))
    }

    pub fn set_faults(&self, faults: Faults) {
        self.state.borrow_mut().faults = faults;
    }

    /// Register a custom token that signs in as `uid`.
    pub fn issue_token(&self, uid: &str) -> String {
        let token = format!("tok-{}", uuid::Uuid::new_v4().simple());
        self.state
            .borrow_mut()
            .tokens
            .insert(token.clone(), uid.to_string());
        token
    }

    /// Pin the clock used for server timestamps.
    pub fn set_server_time(&self, at: Timestamp) {
        self.state.borrow_mut().server_time = Some(at);
    }

    /// Hold snapshot pushes until [`MemoryBackend::resume_pushes`].
    pub fn pause_pushes(&self) {
        self.state.borrow_mut().pushes_paused = true;
    }

    pub fn resume_pushes(&self) {
        let dirty = {
            let mut state = self.state.borrow_mut();
            state.pushes_paused = false;
            std::mem::take(&mut state.dirty)
        };
        for collection in dirty {
            self.notify(&collection);
        }
    }

    /// Fail every open listener on a collection. Listeners end after the error.
    pub fn break_listeners(&self, collection_path: &str, message: &str) {
        let listeners = self
            .state
            .borrow_mut()
            .listeners
            .remove(collection_path)
            .unwrap_or_default();
        for (_, tx) in listeners {
            let _ = tx.unbounded_send(Err(ClientError::Subscription(message.to_string())));
        }
    }

    /// Write raw data, bypassing faults. For seeding.
    pub fn insert_raw(&self, path: &str, data: Value) {
        let (collection, id) = split_path(path);
        {
            let mut state = self.state.borrow_mut();
            let docs = state.collections.entry(collection.to_string()).or_default();
            match docs.iter_mut().find(|d| d.id == id) {
                Some(doc) => doc.data = data,
                None => docs.push(Document::new(id, data)),
            }
        }
        self.changed(collection);
    }

    pub fn document(&self, path: &str) -> Option<Document> {
        let (collection, id) = split_path(path);
        self.state
            .borrow()
            .collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id).cloned())
    }

    pub fn documents(&self, collection_path: &str) -> Vec<Document> {
        self.state
            .borrow()
            .collections
            .get(collection_path)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of `listen` calls ever made, successful or not.
    pub fn listen_calls(&self) -> usize {
        self.state.borrow().listen_calls
    }

    pub fn listener_count(&self, collection_path: &str) -> usize {
        self.state
            .borrow()
            .listeners
            .get(collection_path)
            .map_or(0, Vec::len)
    }

    fn now(&self) -> Timestamp {
        self.state
            .borrow()
            .server_time
            .unwrap_or_else(|| Timestamp::from_datetime(Utc::now()))
    }

    fn check_writes(&self) -> ClientResult<()> {
        if self.state.borrow().faults.fail_writes {
            return Err(ClientError::Store("write rejected".to_string()));
        }
        Ok(())
    }

    fn materialize(&self, write: DocumentWrite) -> ClientResult<Map<String, Value>> {
        let mut fields = write.fields;
        if !write.server_timestamps.is_empty() {
            let stamp = serde_json::to_value(self.now())?;
            for field in write.server_timestamps {
                fields.insert(field, stamp.clone());
            }
        }
        Ok(fields)
    }

    fn changed(&self, collection: &str) {
        {
            let mut state = self.state.borrow_mut();
            if state.pushes_paused {
                if !state.dirty.iter().any(|c| c == collection) {
                    state.dirty.push(collection.to_string());
                }
                return;
            }
        }
        self.notify(collection);
    }

    fn notify(&self, collection: &str) {
        let mut state = self.state.borrow_mut();
        let snapshot = state.collections.get(collection).cloned().unwrap_or_default();
        if let Some(listeners) = state.listeners.get_mut(collection) {
            listeners.retain(|(_, tx)| tx.unbounded_send(Ok(snapshot.clone())).is_ok());
        }
    }
}

fn split_path(path: &str) -> (&str, &str) {
    path.rsplit_once('/').unwrap_or(("", path))
}

#[async_trait(?Send)]
impl AuthProvider for MemoryBackend {
    async fn sign_in_with_token(&self, token: &str) -> ClientResult<Identity> {
        let uid = {
            let state = self.state.borrow();
            if state.faults.reject_sign_in {
                return Err(ClientError::Auth("sign-in rejected".to_string()));
            }
            state
                .tokens
                .get(token)
                .cloned()
                .ok_or_else(|| ClientError::Auth("invalid custom token".to_string()))?
        };

        let identity = Identity {
            uid,
            anonymous: false,
            token: Some(token.to_string()),
        };
        self.identity.publish(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_in_anonymously(&self) -> ClientResult<Identity> {
        if self.state.borrow().faults.reject_sign_in {
            return Err(ClientError::Auth("sign-in rejected".to_string()));
        }
        let identity = Identity::anonymous(uuid::Uuid::new_v4().simple().to_string());
        self.identity.publish(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> ClientResult<()> {
        self.identity.publish(None);
        Ok(())
    }

    fn current_identity(&self) -> Option<Identity> {
        self.identity.current()
    }

    fn watch_identity(&self) -> IdentityStream {
        self.identity.watch()
    }
}

#[async_trait(?Send)]
impl DocumentStore for MemoryBackend {
    async fn get(&self, path: &str) -> ClientResult<Option<Document>> {
        if self.state.borrow().faults.fail_reads {
            return Err(ClientError::Store("read rejected".to_string()));
        }
        Ok(self.document(path))
    }

    async fn set(&self, path: &str, write: DocumentWrite) -> ClientResult<()> {
        self.check_writes()?;
        let fields = self.materialize(write)?;
        self.insert_raw(path, Value::Object(fields));
        Ok(())
    }

    async fn update(&self, path: &str, write: DocumentWrite) -> ClientResult<()> {
        self.check_writes()?;
        let fields = self.materialize(write)?;
        let (collection, id) = split_path(path);
        {
            let mut state = self.state.borrow_mut();
            let doc = state
                .collections
                .get_mut(collection)
                .and_then(|docs| docs.iter_mut().find(|d| d.id == id))
                .ok_or_else(|| ClientError::NotFound(path.to_string()))?;
            match &mut doc.data {
                Value::Object(existing) => existing.extend(fields),
                other => *other = Value::Object(fields),
            }
        }
        self.changed(collection);
        Ok(())
    }

    async fn add(&self, collection_path: &str, write: DocumentWrite) -> ClientResult<String> {
        self.check_writes()?;
        let id = uuid::Uuid::new_v4().simple().to_string();
        let fields = self.materialize(write)?;
        self.insert_raw(&format!("{collection_path}/{id}"), Value::Object(fields));
        Ok(id)
    }

    async fn delete(&self, path: &str) -> ClientResult<()> {
        self.check_writes()?;
        let (collection, id) = split_path(path);
        let removed = {
            let mut state = self.state.borrow_mut();
            match state.collections.get_mut(collection) {
                Some(docs) => {
                    let before = docs.len();
                    docs.retain(|d| d.id != id);
                    before != docs.len()
                }
                None => false,
            }
        };
        if removed {
            self.changed(collection);
        }
        Ok(())
    }

    fn listen(&self, collection_path: &str) -> Subscription {
        let mut state = self.state.borrow_mut();
        state.listen_calls += 1;
        if state.faults.fail_listen {
            return Subscription::failed(
                collection_path,
                ClientError::Subscription("listen rejected".to_string()),
            );
        }

        let (tx, rx) = mpsc::unbounded();
        let snapshot = state
            .collections
            .get(collection_path)
            .cloned()
            .unwrap_or_default();
        let _ = tx.unbounded_send(Ok(snapshot));

        let listener_id = state.next_listener_id;
        state.next_listener_id += 1;
        state
            .listeners
            .entry(collection_path.to_string())
            .or_default()
            .push((listener_id, tx));

        let weak: Weak<RefCell<MemoryState>> = Rc::downgrade(&self.state);
        let path = collection_path.to_string();
        Subscription::new(collection_path, rx, move || {
            let Some(state) = weak.upgrade() else {
                return;
            };
            if let Ok(mut state) = state.try_borrow_mut() {
                if let Some(listeners) = state.listeners.get_mut(&path) {
                    listeners.retain(|(id, _)| *id != listener_id);
                }
            };
        })
    }
}
