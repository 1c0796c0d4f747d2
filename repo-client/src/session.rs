//! Session manager: identity establishment and the per-identity profile.

use std::rc::Rc;

use chrono::Utc;
use shared_types::{Collection, DocumentWrite, Namespace, Profile};
use tracing::{error, info, warn};

use crate::backend::{AuthProvider, Backend, DocumentStore, Identity, IdentityStream};
use crate::config::AppConfig;
use crate::error::ClientResult;

/// Identity plus its profile, as the shell sees them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub identity: Option<Identity>,
    pub profile: Option<Profile>,
}

impl Session {
    pub fn is_signed_in(&self) -> bool {
        self.identity.is_some()
    }

    pub fn uid(&self) -> Option<&str> {
        self.identity.as_ref().map(|i| i.uid.as_str())
    }
}

#[derive(Clone)]
pub struct SessionManager {
    auth: Rc<dyn AuthProvider>,
    store: Rc<dyn DocumentStore>,
    namespace: Namespace,
    initial_credential: Option<String>,
}

impl SessionManager {
    pub fn new(backend: &Backend, config: &AppConfig) -> Self {
        Self {
            auth: backend.auth.clone(),
            store: backend.store.clone(),
            namespace: config.namespace.clone(),
            initial_credential: config.initial_credential.clone(),
        }
    }

    /// Sign in with the injected credential, or anonymously without one.
    ///
    /// Failures are logged and leave the client without an identity.
    pub async fn establish_session(&self) -> Option<Identity> {
        let result = match self.initial_credential.as_deref() {
            Some(token) => self.auth.sign_in_with_token(token).await,
            None => self.auth.sign_in_anonymously().await,
        };

        match result {
            Ok(identity) => {
                info!(uid = %identity.uid, anonymous = identity.anonymous, "signed in");
                Some(identity)
            }
            Err(e) => {
                error!(error = %e, "authentication failed");
                None
            }
        }
    }

    pub fn watch_identity(&self) -> IdentityStream {
        self.auth.watch_identity()
    }

    /// Resolve the session for a new identity.
    ///
    /// A profile read/write failure keeps the previous profile when it
    /// belongs to the same identity, and otherwise leaves it unset.
    pub async fn on_identity_change(&self, identity: Option<Identity>, current: &Session) -> Session {
        let Some(identity) = identity else {
            if current.is_signed_in() {
                info!("identity cleared");
            }
            return Session::default();
        };

        match self.load_or_create_profile(&identity).await {
            Ok(profile) => Session {
                identity: Some(identity),
                profile: Some(profile),
            },
            Err(e) => {
                error!(uid = %identity.uid, error = %e, "failed to load profile");
                let profile = current
                    .profile
                    .clone()
                    .filter(|p| p.uid == identity.uid);
                Session {
                    identity: Some(identity),
                    profile,
                }
            }
        }
    }

    /// Read the identity's profile, writing the default one if absent.
    pub async fn load_or_create_profile(&self, identity: &Identity) -> ClientResult<Profile> {
        let path = self.namespace.document_path(Collection::Profiles, &identity.uid);

        if let Some(doc) = self.store.get(&path).await? {
            let mut profile = doc.to_profile()?;
            if profile.uid != identity.uid {
                warn!(path = %path, stored = %profile.uid, "profile uid mismatch; using document key");
                profile.uid = identity.uid.clone();
            }
            return Ok(profile);
        }

        let profile = Profile::new_default(identity.uid.clone(), Utc::now());
        self.store
            .set(&path, DocumentWrite::from_serialize(&profile)?)
            .await?;
        info!(uid = %identity.uid, name = %profile.name, "created default profile");
        Ok(profile)
    }

    pub async fn sign_out(&self) -> ClientResult<()> {
        self.auth.sign_out().await
    }
}
