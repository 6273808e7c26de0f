use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::CoreError;

/// Permission category assigned to an account.
///
/// The backing store assigns roles; the client only ever reads them. A record
/// carrying anything outside this set is invalid, never defaulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
    Admin,
    Educator,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Educator => "educator",
            Role::Student => "student",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "educator" => Ok(Role::Educator),
            "student" => Ok(Role::Student),
            other => Err(CoreError::InvalidRole(other.to_string())),
        }
    }
}

/// The authenticated user as the client sees it, after the raw account
/// record and its role relation have been validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

/// Partial profile update. Only display data is mutable from the client;
/// email and role belong to the account store.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserPatch {
    pub full_name: Option<String>,
}

impl User {
    /// Merge a patch into this record, field by field.
    pub fn apply(&mut self, patch: &UserPatch) {
        if let Some(full_name) = &patch.full_name {
            self.full_name = full_name.clone();
        }
    }
}
