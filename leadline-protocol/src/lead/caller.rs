use serde::{Deserialize, Serialize};

/// Identity and role of whoever is asking, as supplied by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    pub identity: String,
    #[serde(default)]
    pub is_admin: bool,
    /// Only consulted by the trash view.
    #[serde(default)]
    pub is_superuser: bool,
}

impl Caller {
    pub fn member(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            is_admin: false,
            is_superuser: false,
        }
    }

    pub fn admin(identity: impl Into<String>) -> Self {
        Self {
            is_admin: true,
            ..Self::member(identity)
        }
    }

    pub fn superuser(identity: impl Into<String>) -> Self {
        Self {
            is_superuser: true,
            ..Self::member(identity)
        }
    }
}

/// Which side of the soft-delete line a query looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Active,
    Trash,
}
