//! Serde document model for persisted definitions.
//!
//! Every identifier is stored as canonical codec text; the two declared
//! kinds are stored as names resolved through the document's own enum
//! table, so a document is self-contained. Behavior objects and guard
//! templates are stored by name and re-bound at load time.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::EnumKind;

use super::error::PersistError;

/// Version identifier for the definition document format.
pub const DEFINITION_VERSION: u32 = 1;

/// One persisted state entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateDoc {
    /// Identifier in canonical codec text.
    pub id: String,
    /// Name of the attached behavior, if any.
    #[serde(default)]
    pub behavior: Option<String>,
}

/// One persisted transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionDoc {
    /// Source state identifier text.
    pub from: String,
    /// Trigger identifier text.
    pub trigger: String,
    /// Target state identifier text.
    pub to: String,
    /// Guard template names, in attachment order.
    #[serde(default)]
    pub guards: Vec<String>,
}

/// One persisted hierarchy edge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HierarchyDoc {
    /// Parent state identifier text.
    pub parent: String,
    /// Initial child identifier text.
    pub initial_child: String,
    /// Child identifier texts, in attachment order.
    pub children: Vec<String>,
}

/// A complete persisted definition.
///
/// Metadata values are stored as JSON text so the document round-trips
/// through non-self-describing encodings unchanged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DefinitionDocument {
    /// Document format version.
    pub version: u32,
    /// Unique document identifier.
    pub id: Uuid,
    /// When the document was produced.
    pub saved_at: DateTime<Utc>,
    /// Declared state kind name.
    pub state_kind: String,
    /// Declared trigger kind name.
    pub trigger_kind: String,
    /// Enumeration descriptors referenced by the kind names.
    #[serde(default)]
    pub enums: Vec<EnumKind>,
    /// Initial state identifier text, if any state is declared.
    #[serde(default)]
    pub initial_state: Option<String>,
    /// Persisted states, in declaration order.
    #[serde(default)]
    pub states: Vec<StateDoc>,
    /// Persisted transitions, in registration order.
    #[serde(default)]
    pub transitions: Vec<TransitionDoc>,
    /// Persisted hierarchy edges.
    #[serde(default)]
    pub hierarchy: Vec<HierarchyDoc>,
    /// Metadata entries, values as JSON text.
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl DefinitionDocument {
    /// Encode as JSON.
    pub fn to_json(&self) -> Result<String, PersistError> {
        serde_json::to_string_pretty(self).map_err(|e| PersistError::Serialization(e.to_string()))
    }

    /// Decode from JSON.
    pub fn from_json(json: &str) -> Result<Self, PersistError> {
        serde_json::from_str(json).map_err(|e| PersistError::Deserialization(e.to_string()))
    }

    /// Encode as the compact binary format.
    pub fn to_bytes(&self) -> Result<Vec<u8>, PersistError> {
        bincode::serialize(self).map_err(|e| PersistError::Serialization(e.to_string()))
    }

    /// Decode from the compact binary format.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PersistError> {
        bincode::deserialize(bytes).map_err(|e| PersistError::Deserialization(e.to_string()))
    }
}
