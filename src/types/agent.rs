//! Agent identity
//!
//! Agents are purely descriptive: the name is printed on event lines and
//! journal records but carries no authority.

use std::fmt;

/// Human-readable name of an agent
///
/// Worker agents have a short identifier (`DT3`, `WT7`) that is displayed as
/// `Agent DT3`. Named agents such as auditors (`INTERNAL BANK`) display
/// verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AgentName {
    id: String,
    label: String,
}

impl AgentName {
    /// Create the name of a worker agent from its short identifier
    pub fn worker(id: impl Into<String>) -> Self {
        let id = id.into();
        let label = format!("Agent {}", id);
        Self { id, label }
    }

    /// Create a name that is displayed exactly as given
    pub fn named(name: impl Into<String>) -> Self {
        let id = name.into();
        Self {
            label: id.clone(),
            id,
        }
    }

    /// Short identifier (`DT3`), used in journal records
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Displayed label (`Agent DT3`), used on event lines
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Display for AgentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}
