use cfgsnap_core::types::PresetId;
use serde::{Deserialize, Serialize};

/// Lifecycle of the one preset being edited.
///
/// There is no dirty state: every edit made while `Editing` is saved before
/// the call returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EditSession {
    #[default]
    Unattached,
    Editing(PresetId),
    Detached(PresetId),
}

impl EditSession {
    pub fn editing(&self) -> Option<PresetId> {
        match self {
            EditSession::Editing(id) => Some(*id),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EditSession::Unattached => "unattached",
            EditSession::Editing(_) => "editing",
            EditSession::Detached(_) => "detached",
        }
    }
}
