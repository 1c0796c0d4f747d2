//! Shared document shapes for the UT Learning Hub
//!
//! These types are used by both:
//! - the client core (`repo-client`, native and WASM)
//! - the Dioxus presentation shell (WASM)
//!
//! Field names and enum strings match the documents already stored in the
//! hosted database, so they serialize with serde straight onto the wire.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ============================================================================
// Roles
// ============================================================================

/// Access tier of a profile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default, TS)]
#[ts(export, export_to = "../../repo-ui/bindings/documents.ts")]
pub enum Role {
    #[default]
    #[serde(rename = "estudiante")]
    Student,
    #[serde(rename = "verificador")]
    Verifier,
    #[serde(rename = "administrador")]
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Student, Role::Verifier, Role::Admin];

    /// Wire value stored in the `role` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "estudiante",
            Role::Verifier => "verificador",
            Role::Admin => "administrador",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Student => "Estudiante",
            Role::Verifier => "Verificador",
            Role::Admin => "Administrador",
        }
    }

    /// Verifiers and admins may edit or delete any material.
    pub fn is_moderator(&self) -> bool {
        matches!(self, Role::Verifier | Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| format!("unknown role '{s}'"))
    }
}

// ============================================================================
// Careers
// ============================================================================

/// Academic programs a material can be filed under.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, TS)]
#[ts(export, export_to = "../../repo-ui/bindings/documents.ts")]
pub enum Career {
    #[serde(rename = "Ingeniería en Software")]
    SoftwareEngineering,
    #[serde(rename = "Mantenimiento Industrial")]
    IndustrialMaintenance,
    #[serde(rename = "Desarrollo de Negocios")]
    BusinessDevelopment,
    #[serde(rename = "Gastronomía")]
    Gastronomy,
    #[serde(rename = "Mecatrónica")]
    Mechatronics,
    #[serde(rename = "Energías Renovables")]
    RenewableEnergy,
}

impl Career {
    pub const ALL: [Career; 6] = [
        Career::SoftwareEngineering,
        Career::IndustrialMaintenance,
        Career::BusinessDevelopment,
        Career::Gastronomy,
        Career::Mechatronics,
        Career::RenewableEnergy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Career::SoftwareEngineering => "Ingeniería en Software",
            Career::IndustrialMaintenance => "Mantenimiento Industrial",
            Career::BusinessDevelopment => "Desarrollo de Negocios",
            Career::Gastronomy => "Gastronomía",
            Career::Mechatronics => "Mecatrónica",
            Career::RenewableEnergy => "Energías Renovables",
        }
    }
}

impl fmt::Display for Career {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Career {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Career::ALL
            .into_iter()
            .find(|career| career.as_str() == s)
            .ok_or_else(|| format!("unknown career '{s}'"))
    }
}

/// Sentinel shown in the career select meaning "no constraint".
pub const FILTER_ALL: &str = "Todas";

/// Career constraint applied to the materials list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CareerFilter {
    #[default]
    All,
    Only(Career),
}

impl CareerFilter {
    /// Every option of the filter select, `Todas` first.
    pub fn options() -> impl Iterator<Item = CareerFilter> {
        std::iter::once(CareerFilter::All).chain(Career::ALL.into_iter().map(CareerFilter::Only))
    }

    pub fn matches(&self, career: Career) -> bool {
        match self {
            CareerFilter::All => true,
            CareerFilter::Only(wanted) => *wanted == career,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CareerFilter::All => FILTER_ALL,
            CareerFilter::Only(career) => career.as_str(),
        }
    }
}

impl fmt::Display for CareerFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CareerFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == FILTER_ALL {
            return Ok(CareerFilter::All);
        }
        s.parse().map(CareerFilter::Only)
    }
}

// ============================================================================
// Documents
// ============================================================================

/// Server-assigned timestamp as stored by the document database.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, TS,
)]
#[ts(export, export_to = "../../repo-ui/bindings/documents.ts")]
pub struct Timestamp {
    pub seconds: i64,
    #[serde(default)]
    pub nanoseconds: u32,
}

impl Timestamp {
    pub fn from_seconds(seconds: i64) -> Self {
        Self {
            seconds,
            nanoseconds: 0,
        }
    }

    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self {
            seconds: at.timestamp(),
            nanoseconds: at.timestamp_subsec_nanos(),
        }
    }
}

/// Per-identity record carrying display name and role.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../../repo-ui/bindings/documents.ts")]
pub struct Profile {
    pub uid: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub name: String,
    /// ISO-8601 instant of the first sign-in
    #[serde(default)]
    pub joined_at: String,
}

impl Profile {
    /// Profile written on first sign-in when none exists yet.
    pub fn new_default(uid: impl Into<String>, now: DateTime<Utc>) -> Self {
        let uid = uid.into();
        let short: String = uid.chars().take(4).collect();
        Self {
            name: format!("Estudiante_{short}"),
            role: Role::Student,
            joined_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            uid,
        }
    }

    /// First character of the display name, for avatars.
    pub fn initial(&self) -> String {
        initial_of(&self.name, "U")
    }
}

/// Shared educational resource with a download link.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../../repo-ui/bindings/documents.ts")]
pub struct Material {
    /// Document id; not part of the stored fields
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub career: Career,
    pub url: String,
    #[serde(default)]
    pub author: String,
    pub uploader_id: String,
    #[serde(default)]
    pub uploader_name: String,
    /// Absent until the server has stamped the write
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub verified: bool,
}

impl Material {
    pub fn uploader_initial(&self) -> String {
        initial_of(&self.uploader_name, "U")
    }
}

/// The user-editable subset of a material.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, TS)]
#[ts(export, export_to = "../../repo-ui/bindings/documents.ts")]
pub struct MaterialFields {
    pub title: String,
    pub career: Career,
    pub url: String,
    pub author: String,
}

fn initial_of(name: &str, fallback: &str) -> String {
    name.chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| fallback.to_string())
}

// ============================================================================
// Collections
// ============================================================================

/// Namespace used when the hosting environment does not inject one.
pub const DEFAULT_NAMESPACE: &str = "ut-repo-react-node";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Profiles,
    Materials,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Profiles => "profiles",
            Collection::Materials => "materials",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deployment partition all collections live under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace(String);

impl Namespace {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `artifacts/<namespace>/public/data/<collection>`
    pub fn collection_path(&self, collection: Collection) -> String {
        format!("artifacts/{}/public/data/{}", self.0, collection.as_str())
    }

    pub fn document_path(&self, collection: Collection, id: &str) -> String {
        format!("{}/{}", self.collection_path(collection), id)
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}

// ============================================================================
// Wire Types
// ============================================================================

/// A stored document as returned by reads and snapshots.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../../repo-ui/bindings/documents.ts")]
pub struct Document {
    pub id: String,
    #[ts(type = "unknown")]
    pub data: serde_json::Value,
}

impl Document {
    pub fn new(id: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    /// Decode as a material, taking the id from the document handle.
    pub fn to_material(&self) -> Result<Material, serde_json::Error> {
        let mut material: Material = serde_json::from_value(self.data.clone())?;
        material.id = self.id.clone();
        Ok(material)
    }

    pub fn to_profile(&self) -> Result<Profile, serde_json::Error> {
        serde_json::from_value(self.data.clone())
    }
}

/// Field writes sent to set/update/add. Fields named in `server_timestamps`
/// are stamped by the server with its own clock.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../../repo-ui/bindings/documents.ts")]
pub struct DocumentWrite {
    #[ts(type = "Record<string, unknown>")]
    pub fields: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub server_timestamps: Vec<String>,
}

impl DocumentWrite {
    pub fn from_fields(fields: serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            fields,
            server_timestamps: Vec::new(),
        }
    }

    /// Serialize a struct into a write. Non-object values yield an empty write.
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        match serde_json::to_value(value)? {
            serde_json::Value::Object(fields) => Ok(Self::from_fields(fields)),
            _ => Ok(Self::default()),
        }
    }

    pub fn set(mut self, field: &str, value: impl Into<serde_json::Value>) -> Self {
        self.fields.insert(field.to_string(), value.into());
        self
    }

    pub fn with_server_timestamp(mut self, field: &str) -> Self {
        self.server_timestamps.push(field.to_string());
        self
    }
}

/// Frames pushed over a listen socket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export, export_to = "../../repo-ui/bindings/documents.ts")]
pub enum ListenMsg {
    /// Full current contents of the collection
    Snapshot { documents: Vec<Document> },
    Error { message: String },
}

// ============================================================================
// Tests
// ============================================================================
