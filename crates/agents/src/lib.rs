//! Static persona catalog: the specialized agents the gateway routes to,
//! their tool grants, and the handoff edges between them.

pub mod catalog;
pub mod persona;

pub use {
    catalog::{CatalogError, PersonaCatalog},
    persona::{ModelSettings, Persona, PersonaId, ToolName},
};
