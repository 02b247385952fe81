use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{Result, StorageError};

/// Finishing place awarded by a judge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Place {
    First,
    Second,
    Third,
}

impl Place {
    /// Fixed point table applied to the team and to each of its members.
    pub fn points(&self) -> i64 {
        match self {
            Self::First => 5,
            Self::Second => 3,
            Self::Third => 1,
        }
    }
}

/// Three distinct teams, one per place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Podium {
    first: Uuid,
    second: Uuid,
    third: Uuid,
}

impl Podium {
    pub fn new(first: Uuid, second: Uuid, third: Uuid) -> Result<Self> {
        if first == second || first == third || second == third {
            return Err(StorageError::Validation(
                "a team can only hold one place on the podium".to_string(),
            ));
        }

        Ok(Self {
            first,
            second,
            third,
        })
    }

    pub fn team_for(&self, place: Place) -> Uuid {
        match place {
            Place::First => self.first,
            Place::Second => self.second,
            Place::Third => self.third,
        }
    }

    /// Placements in podium order.
    pub fn placements(&self) -> [(Place, Uuid); 3] {
        [
            (Place::First, self.first),
            (Place::Second, self.second),
            (Place::Third, self.third),
        ]
    }
}
