use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Account role, stored as lowercase text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Employee,
    Judge,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Judge => "judge",
            Self::Admin => "admin",
        }
    }

    /// Whether this role may award podium points.
    pub fn can_judge(&self) -> bool {
        match self {
            Self::Judge | Self::Admin => true,
            Self::Employee => false,
        }
    }

    /// Whether this role may manage events and act on behalf of other users.
    pub fn is_admin(&self) -> bool {
        match self {
            Self::Admin => true,
            Self::Employee | Self::Judge => false,
        }
    }

    /// Admins run the competition and are kept off the leaderboard.
    pub fn is_ranked(&self) -> bool {
        !self.is_admin()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "employee" => Ok(Self::Employee),
            "judge" => Ok(Self::Judge),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}
