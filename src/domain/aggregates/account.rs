//! Accounts: customers, employees and sign-in

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::value_objects::{not_blank, validate_phone};
use crate::Id;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role { #[default] Customer, Employee, Admin }

impl Role {
    pub fn is_staff(&self) -> bool { matches!(self, Self::Employee | Self::Admin) }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Id,
    pub email: String,
    pub full_name: String,
    #[serde(default)] pub phone: Option<String>,
    #[serde(default)] pub address: Option<String>,
    #[serde(default)] pub role: Role,
    #[serde(default)] pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthToken { pub token: String, pub account: Account }

#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, message = "is required"))]
    pub password: String,
}

#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 100))]
    pub password: String,
    #[validate(must_match = "password")]
    pub confirm_password: String,
    #[validate(length(min = 1, max = 100), custom = "not_blank")]
    pub full_name: String,
    #[validate(custom = "validate_phone")]
    pub phone: String,
    #[serde(default)] pub address: Option<String>,
}

/// Body for `POST /Accounts/Register`; the confirmation never leaves the front end.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone: String,
    pub address: Option<String>,
}

impl From<RegisterForm> for NewAccount {
    fn from(f: RegisterForm) -> Self {
        Self { email: f.email.trim().to_lowercase(), password: f.password, full_name: f.full_name.trim().to_string(), phone: f.phone.trim().to_string(), address: f.address }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeForm {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 100), custom = "not_blank")]
    pub full_name: String,
    #[serde(default)] #[validate(custom = "validate_phone")]
    pub phone: Option<String>,
    #[serde(default)] pub address: Option<String>,
    #[serde(default = "employee_role")]
    pub role: Role,
    /// Required on create, optional on update.
    #[serde(default, skip_serializing_if = "Option::is_none")] #[validate(length(min = 6, max = 100))]
    pub password: Option<String>,
}

fn employee_role() -> Role { Role::Employee }
