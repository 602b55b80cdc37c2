//! Saving and loading definition documents.
//!
//! A [`DefinitionDocument`] is the portable form of a
//! [`MachineBuilder`]: identifiers as canonical codec text, kinds as
//! names backed by an enum table, behaviors and guards as names re-bound
//! through a [`TemplateCatalog`] at load time.

mod catalog;
mod document;
mod error;

pub use catalog::TemplateCatalog;
pub use document::{
    DefinitionDocument, HierarchyDoc, StateDoc, TransitionDoc, DEFINITION_VERSION,
};
pub use error::PersistError;

use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use crate::builder::MachineBuilder;
use crate::core::{codec, EnumKind, GuardTemplate, GuardTemplateRef, Kind};

impl MachineBuilder {
    /// Capture the definition as a portable document.
    pub fn to_document(&self) -> DefinitionDocument {
        let mut enums: Vec<EnumKind> = Vec::new();
        for kind in [self.state_kind(), self.trigger_kind()] {
            if let Kind::Enum(descriptor) = kind {
                if !enums.iter().any(|e| e.name() == descriptor.name()) {
                    enums.push(descriptor.clone());
                }
            }
        }

        DefinitionDocument {
            version: DEFINITION_VERSION,
            id: Uuid::new_v4(),
            saved_at: Utc::now(),
            state_kind: self.state_kind().name().to_string(),
            trigger_kind: self.trigger_kind().name().to_string(),
            enums,
            initial_state: self.initial_state().map(codec::serialize),
            states: self
                .states()
                .iter()
                .map(|entry| StateDoc {
                    id: codec::serialize(entry.id()),
                    behavior: entry
                        .behavior()
                        .map(|b| b.borrow().name().to_string())
                        .filter(|name| !name.is_empty()),
                })
                .collect(),
            transitions: self
                .transitions()
                .iter()
                .map(|entry| TransitionDoc {
                    from: codec::serialize(entry.from()),
                    trigger: codec::serialize(entry.trigger()),
                    to: codec::serialize(entry.to()),
                    guards: entry
                        .guards()
                        .iter()
                        .map(|template| template.name().to_string())
                        .collect(),
                })
                .collect(),
            hierarchy: self
                .hierarchy_links()
                .iter()
                .map(|link| HierarchyDoc {
                    parent: codec::serialize(link.parent()),
                    initial_child: codec::serialize(link.initial_child()),
                    children: link.children().iter().map(codec::serialize).collect(),
                })
                .collect(),
            metadata: self
                .metadata_raw()
                .iter()
                .map(|(key, value)| (key.clone(), value.to_string()))
                .collect(),
        }
    }

    /// Reconstruct a definition from a document, re-binding behaviors and
    /// guard templates through `catalog`.
    ///
    /// Kind names outside the document's enum table are a hard
    /// [`CodecError::UnsupportedKind`](crate::core::CodecError) failure;
    /// unresolvable behavior or guard names degrade the affected entity
    /// and are logged rather than failing the load.
    pub fn from_document(
        document: &DefinitionDocument,
        catalog: &TemplateCatalog,
    ) -> Result<Self, PersistError> {
        if document.version != DEFINITION_VERSION {
            return Err(PersistError::UnsupportedVersion {
                found: document.version,
                supported: DEFINITION_VERSION,
            });
        }

        let state_kind = codec::resolve_kind(&document.state_kind, &document.enums)?;
        let trigger_kind = codec::resolve_kind(&document.trigger_kind, &document.enums)?;
        let mut builder = MachineBuilder::new(state_kind.clone(), trigger_kind.clone());

        for state in &document.states {
            let id = codec::deserialize(&state.id, &state_kind)?;
            let behavior = match state.behavior.as_deref() {
                Some(name) => {
                    let resolved = catalog.behavior(name);
                    if resolved.is_none() {
                        warn!(behavior = %name, "behavior not in catalog; state loads bare");
                    }
                    resolved
                }
                None => None,
            };
            builder.add_state(id, behavior);
        }

        if let Some(text) = &document.initial_state {
            let id = codec::deserialize(text, &state_kind)?;
            builder.set_initial_state(&id);
        }

        for transition in &document.transitions {
            let from = codec::deserialize(&transition.from, &state_kind)?;
            let trigger = codec::deserialize(&transition.trigger, &trigger_kind)?;
            let to = codec::deserialize(&transition.to, &state_kind)?;

            let mut guards: Vec<GuardTemplateRef> = Vec::new();
            for name in &transition.guards {
                match catalog.guard(name) {
                    Some(template) => guards.push(template),
                    None => warn!(guard = %name, "guard template not in catalog; dropped"),
                }
            }
            builder.add_transition(from, trigger, to, &guards);
        }

        for edge in &document.hierarchy {
            let parent = codec::deserialize(&edge.parent, &state_kind)?;
            for child in &edge.children {
                let child = codec::deserialize(child, &state_kind)?;
                builder.add_child(&parent, &child);
            }
            let initial_child = codec::deserialize(&edge.initial_child, &state_kind)?;
            builder.set_initial_child(&parent, &initial_child);
        }

        for (key, text) in &document.metadata {
            let value = serde_json::from_str(text)
                .map_err(|e| PersistError::Deserialization(e.to_string()))?;
            builder.set_metadata_raw(key.clone(), value);
        }

        Ok(builder)
    }
}
