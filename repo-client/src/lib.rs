//! Client core of the UT Learning Hub.
//!
//! The browser shell drives four pieces, all running on one event loop:
//! - [`session`]: sign-in and the per-identity profile
//! - [`mirror`]: live replicas of the profiles and materials collections
//! - [`view`]: the filtered/sorted projection rendered in the grid
//! - [`gateway`]: create/update/delete/role writes
//!
//! The hosted backend sits behind the traits in [`backend`]; [`memory`]
//! provides an in-process implementation.

pub mod backend;
pub mod config;
pub mod error;
pub mod form;
pub mod gateway;
pub mod memory;
pub mod mirror;
pub mod session;
pub mod view;

pub use backend::{AuthProvider, Backend, DocumentStore, Identity, IdentityFeed, Subscription};
pub use config::{AppConfig, ConnectionConfig};
pub use error::{ClientError, ClientResult};
pub use form::MaterialForm;
pub use gateway::{can_modify, Confirm, DeleteOutcome, MutationGateway};
pub use memory::MemoryBackend;
pub use mirror::{MirrorFeed, MirrorState, MirrorUpdate};
pub use session::{Session, SessionManager};
pub use view::derive_view;
