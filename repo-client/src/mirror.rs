//! Live collection mirror.
//!
//! [`MirrorFeed`] owns the two collection listeners for a signed-in
//! identity and turns their pushes into typed [`MirrorUpdate`]s. Every push
//! replaces the corresponding list wholesale. A listener that fails is
//! logged and dropped; its list stays at the last snapshot it delivered.

use futures::future::{self, Either};
use futures::StreamExt;
use shared_types::{Collection, Document, Material, Namespace, Profile};
use tracing::{debug, error, info, warn};

use crate::backend::{DocumentStore, Identity, SnapshotResult, Subscription};
use crate::error::{ClientError, ClientResult};

#[derive(Debug, Clone, PartialEq)]
pub enum MirrorUpdate {
    Materials(Vec<Material>),
    Profiles(Vec<Profile>),
}

pub struct MirrorFeed {
    materials: Option<Subscription>,
    profiles: Option<Subscription>,
}

impl MirrorFeed {
    /// Open both listeners. Requires a signed-in identity.
    pub fn attach(
        store: &dyn DocumentStore,
        namespace: &Namespace,
        identity: Option<&Identity>,
    ) -> ClientResult<Self> {
        let identity = identity.ok_or(ClientError::NotSignedIn)?;
        info!(uid = %identity.uid, namespace = %namespace.as_str(), "attaching live mirror");

        Ok(Self {
            materials: Some(store.listen(&namespace.collection_path(Collection::Materials))),
            profiles: Some(store.listen(&namespace.collection_path(Collection::Profiles))),
        })
    }

    /// True while at least one listener is still delivering.
    pub fn is_live(&self) -> bool {
        self.materials.is_some() || self.profiles.is_some()
    }

    /// Wait for the next snapshot from either listener.
    ///
    /// Returns `None` once both listeners have failed or closed.
    pub async fn next_update(&mut self) -> Option<MirrorUpdate> {
        loop {
            let (collection, item) = match (self.materials.as_mut(), self.profiles.as_mut()) {
                (None, None) => return None,
                (Some(materials), None) => (Collection::Materials, materials.next().await),
                (None, Some(profiles)) => (Collection::Profiles, profiles.next().await),
                (Some(materials), Some(profiles)) => {
                    match future::select(materials.next(), profiles.next()).await {
                        Either::Left((item, _)) => (Collection::Materials, item),
                        Either::Right((item, _)) => (Collection::Profiles, item),
                    }
                }
            };

            if let Some(update) = self.handle(collection, item) {
                return Some(update);
            }
        }
    }

    fn handle(&mut self, collection: Collection, item: Option<SnapshotResult>) -> Option<MirrorUpdate> {
        match item {
            Some(Ok(documents)) => {
                debug!(collection = %collection, count = documents.len(), "snapshot received");
                Some(match collection {
                    Collection::Materials => MirrorUpdate::Materials(decode_all(&documents, Document::to_material)),
                    Collection::Profiles => MirrorUpdate::Profiles(decode_all(&documents, Document::to_profile)),
                })
            }
            Some(Err(e)) => {
                error!(collection = %collection, error = %e, "subscription failed; mirror frozen");
                self.stop(collection);
                None
            }
            None => {
                warn!(collection = %collection, "subscription closed by backend");
                self.stop(collection);
                None
            }
        }
    }

    fn stop(&mut self, collection: Collection) {
        match collection {
            Collection::Materials => self.materials = None,
            Collection::Profiles => self.profiles = None,
        }
    }

    /// Release both listeners.
    pub fn detach(self) {
        info!("detaching live mirror");
    }
}

fn decode_all<T>(documents: &[Document], decode: fn(&Document) -> Result<T, serde_json::Error>) -> Vec<T> {
    documents
        .iter()
        .filter_map(|doc| match decode(doc) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(id = %doc.id, error = %e, "skipping undecodable document");
                None
            }
        })
        .collect()
}

/// Local replicas of both collections.
#[derive(Debug, Clone, PartialEq)]
pub struct MirrorState {
    pub materials: Vec<Material>,
    pub profiles: Vec<Profile>,
    /// True until the first materials snapshot arrives
    pub loading: bool,
}

impl Default for MirrorState {
    fn default() -> Self {
        Self {
            materials: Vec::new(),
            profiles: Vec::new(),
            loading: true,
        }
    }
}

impl MirrorState {
    /// Replace the matching list with the snapshot contents.
    pub fn apply(&mut self, update: MirrorUpdate) {
        match update {
            MirrorUpdate::Materials(materials) => {
                self.materials = materials;
                self.loading = false;
            }
            MirrorUpdate::Profiles(profiles) => self.profiles = profiles,
        }
    }

    /// Drop both lists and go back to loading. Used when the identity changes.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn material(&self, id: &str) -> Option<&Material> {
        self.materials.iter().find(|m| m.id == id)
    }
}
