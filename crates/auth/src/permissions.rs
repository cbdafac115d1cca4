use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bastion_core::{PermissionId, SoftDeletable};

/// Atomic capability identified by a unique `name` and a (resource, action) pair.
///
/// The (resource, action) pair is what checks match on; `name` is only the
/// storage key. Two permissions with different names may share a pair: either
/// one satisfies a check for that pair, but they remain distinct permissions
/// and both are listed by `PermissionResolver::user_permissions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub id: PermissionId,
    pub name: String,
    pub resource: String,
    pub action: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Permission {
    pub fn new(
        name: impl Into<String>,
        resource: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: PermissionId::new(),
            name: name.into(),
            resource: resource.into(),
            action: action.into(),
            description: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// `"resource:action"`.
    pub fn key(&self) -> String {
        format!("{}:{}", self.resource, self.action)
    }

    /// Compares both halves of the pair without short-circuiting between them.
    pub fn matches(&self, resource: &str, action: &str) -> bool {
        (self.resource == resource) & (self.action == action)
    }
}

impl SoftDeletable for Permission {
    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }
}

/// A requested (resource, action) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionCheck {
    pub resource: String,
    pub action: String,
}

impl PermissionCheck {
    pub fn new(resource: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            action: action.into(),
        }
    }

    /// Map key used by batch results: `"resource:action"`.
    pub fn key(&self) -> String {
        format!("{}:{}", self.resource, self.action)
    }
}

impl<R, A> From<(R, A)> for PermissionCheck
where
    R: Into<String>,
    A: Into<String>,
{
    fn from((resource, action): (R, A)) -> Self {
        Self::new(resource, action)
    }
}

impl core::fmt::Display for PermissionCheck {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}:{}", self.resource, self.action)
    }
}
