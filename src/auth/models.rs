use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::Account;

/// Privilege tiers, ordered from least to most privileged
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[serde(alias = "aluno")]
    Student,
    #[serde(alias = "professor")]
    Instructor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Instructor => "instructor",
            Role::Admin => "admin",
        }
    }

    /// True when this role meets or exceeds `minimum`
    pub fn satisfies(&self, minimum: Role) -> bool {
        *self >= minimum
    }

    /// Where a user of this role lands after login or a denied request
    pub fn landing_path(&self) -> &'static str {
        match self {
            Role::Student => "/student",
            Role::Instructor | Role::Admin => "/",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "student" | "aluno" => Ok(Role::Student),
            "instructor" | "professor" => Ok(Role::Instructor),
            "admin" => Ok(Role::Admin),
            other => Err(format!("Unknown role '{}'", other)),
        }
    }
}

/// Session token claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,   // Account identifier
    pub role: Role,    // Role at login time
    pub exp: usize,    // Expiration time
    pub iat: usize,    // Issued at
    pub jti: String,   // Token ID
}

/// The caller behind a request, resolved against the account store
#[derive(Debug, Clone, Serialize)]
pub struct UserSession {
    pub identifier: String,
    pub name: String,
    pub role: Role,
}

impl From<&Account> for UserSession {
    fn from(account: &Account) -> Self {
        Self {
            identifier: account.identifier.clone(),
            name: account.name.clone(),
            role: account.role,
        }
    }
}
