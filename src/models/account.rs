use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::auth::Role;

/// Monthly payment standing of an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentStatus {
    Pending,
    Paid,
    NotApplicable,
    Other(String),
}

impl PaymentStatus {
    /// Status given to a freshly registered account
    pub fn initial_for(role: Role) -> Self {
        match role {
            Role::Student => PaymentStatus::Pending,
            Role::Instructor | Role::Admin => PaymentStatus::NotApplicable,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Paid => "Paid",
            PaymentStatus::NotApplicable => "N/A",
            PaymentStatus::Other(value) => value,
        }
    }
}

impl From<String> for PaymentStatus {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("pending") || trimmed.eq_ignore_ascii_case("pendente") {
            PaymentStatus::Pending
        } else if trimmed.eq_ignore_ascii_case("paid") || trimmed.eq_ignore_ascii_case("pago") {
            PaymentStatus::Paid
        } else if trimmed.eq_ignore_ascii_case("n/a") {
            PaymentStatus::NotApplicable
        } else {
            PaymentStatus::Other(trimmed.to_string())
        }
    }
}

impl From<PaymentStatus> for String {
    fn from(status: PaymentStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A login identity as persisted in the accounts document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub identifier: String,
    pub name: String,
    pub password_hash: String,
    pub role: Role,
    pub enrolled_on: NaiveDate,
    pub payment_status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_reason: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub identifier: String,
    pub name: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone)]
pub struct PaymentUpdate {
    pub status: PaymentStatus,
    pub payment_type: Option<String>,
    pub reason: Option<String>,
}

/// Account data safe to hand to a view
#[derive(Debug, Clone, Serialize)]
pub struct AccountView {
    pub identifier: String,
    pub name: String,
    pub role: Role,
    pub enrolled_on: NaiveDate,
    pub payment_status: PaymentStatus,
    pub payment_type: Option<String>,
    pub payment_reason: Option<String>,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            identifier: account.identifier.clone(),
            name: account.name.clone(),
            role: account.role,
            enrolled_on: account.enrolled_on,
            payment_status: account.payment_status.clone(),
            payment_type: account.payment_type.clone(),
            payment_reason: account.payment_reason.clone(),
        }
    }
}
