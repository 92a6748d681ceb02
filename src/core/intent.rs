use serde::{Deserialize, Serialize};

use crate::core::notification::{NotificationId, NotificationPatch};

/// Requests applied to the notification queue by the reducer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Insert a new entry; dropped when the queue is full or the id exists
    Add(NotificationPatch),
    /// Shallow-merge into the entry with the same id
    Update(NotificationPatch),
    Remove(NotificationId),
}

impl Intent {
    pub fn add(patch: NotificationPatch) -> Self {
        Intent::Add(patch)
    }

    pub fn update(patch: NotificationPatch) -> Self {
        Intent::Update(patch)
    }

    pub fn remove(id: impl Into<NotificationId>) -> Self {
        Intent::Remove(id.into())
    }

    /// Identifier the intent is addressed at, if any
    pub fn target(&self) -> Option<&NotificationId> {
        match self {
            Intent::Add(patch) | Intent::Update(patch) => patch.id.as_ref(),
            Intent::Remove(id) => Some(id),
        }
    }

    /// Short name used in log lines
    pub fn kind(&self) -> &'static str {
        match self {
            Intent::Add(_) => "add",
            Intent::Update(_) => "update",
            Intent::Remove(_) => "remove",
        }
    }
}
