//! Mutation gateway: every write the client issues.
//!
//! Writes are fire-and-observe. Nothing here touches local state; the
//! change shows up once the backend pushes the next snapshot through the
//! mirror.

use std::rc::Rc;

use shared_types::{Collection, DocumentWrite, Material, MaterialFields, Namespace, Profile, Role};
use tracing::info;

use crate::backend::{Backend, DocumentStore, Identity};
use crate::error::{ClientError, ClientResult};

pub const DELETE_PROMPT: &str = "¿Estás seguro de eliminar este recurso educativo?";

/// Interactive yes/no prompt shown before destructive writes.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
}

#[derive(Clone)]
pub struct MutationGateway {
    store: Rc<dyn DocumentStore>,
    namespace: Namespace,
}

impl MutationGateway {
    pub fn new(backend: &Backend, namespace: Namespace) -> Self {
        Self {
            store: backend.store.clone(),
            namespace,
        }
    }

    /// Publish a new material stamped with its uploader.
    ///
    /// `verified` is set from the uploader's role at creation time and never
    /// recomputed.
    pub async fn create_material(
        &self,
        fields: &MaterialFields,
        identity: Option<&Identity>,
        profile: Option<&Profile>,
    ) -> ClientResult<String> {
        let identity = identity.ok_or(ClientError::NotSignedIn)?;
        let profile = profile.ok_or(ClientError::ProfileNotLoaded)?;

        let write = DocumentWrite::from_serialize(fields)?
            .set("uploaderId", identity.uid.clone())
            .set("uploaderName", profile.name.clone())
            .set("verified", profile.role != Role::Student)
            .with_server_timestamp("createdAt");

        let id = self
            .store
            .add(&self.namespace.collection_path(Collection::Materials), write)
            .await?;
        info!(id = %id, uid = %identity.uid, role = %profile.role, "material created");
        Ok(id)
    }

    /// Overwrite the editable fields of an existing material.
    pub async fn update_material(&self, id: &str, fields: &MaterialFields) -> ClientResult<()> {
        let path = self.namespace.document_path(Collection::Materials, id);
        self.store
            .update(&path, DocumentWrite::from_serialize(fields)?)
            .await?;
        info!(id = %id, "material updated");
        Ok(())
    }

    /// Delete a material after the user confirms. Irreversible.
    pub async fn delete_material(&self, id: &str, confirm: &dyn Confirm) -> ClientResult<DeleteOutcome> {
        if !confirm.confirm(DELETE_PROMPT) {
            return Ok(DeleteOutcome::Cancelled);
        }

        let path = self.namespace.document_path(Collection::Materials, id);
        self.store.delete(&path).await?;
        info!(id = %id, "material deleted");
        Ok(DeleteOutcome::Deleted)
    }

    /// Overwrite a profile's role. Used for both self-service and admin edits.
    pub async fn set_role(&self, uid: &str, role: Role) -> ClientResult<()> {
        let path = self.namespace.document_path(Collection::Profiles, uid);
        self.store
            .update(&path, DocumentWrite::default().set("role", role.as_str()))
            .await?;
        info!(uid = %uid, role = %role, "role changed");
        Ok(())
    }
}

/// Whether edit/delete controls are shown for `item`.
///
/// Only gates rendering; the gateway itself does not re-check it.
pub fn can_modify(item: &Material, identity: Option<&Identity>, profile: Option<&Profile>) -> bool {
    let Some(profile) = profile else {
        return false;
    };
    if profile.role.is_moderator() {
        return true;
    }
    identity.is_some_and(|identity| item.uploader_id == identity.uid)
}
