//! Back-office user accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dashdesk_core::{
    ActiveStatus, AdminRole, AdminUserId, Permissions, Validate, ValidationErrors, Validator,
};

use crate::marketplace::{EntityStore, MockData, Resource};

/// Minimum password length for new admin accounts.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// An admin user as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub id: AdminUserId,
    pub name: String,
    pub email: String,
    pub role: AdminRole,
    #[serde(default)]
    pub permissions: Permissions,
    #[serde(default = "default_status")]
    pub status: ActiveStatus,
    #[serde(default)]
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const fn default_status() -> ActiveStatus {
    ActiveStatus::Active
}

impl AdminUser {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == ActiveStatus::Active
    }
}

/// Editable admin user fields.
///
/// `password` is only sent when set; leaving it blank on edit keeps the
/// current password.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserInput {
    pub name: String,
    pub email: String,
    pub role: AdminRole,
    pub permissions: Permissions,
    pub status: ActiveStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl std::fmt::Debug for AdminUserInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminUserInput")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("permissions", &self.permissions)
            .field("status", &self.status)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Validate for AdminUserInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .required("name", &self.name)
            .min_len("name", &self.name, 2)
            .required("email", &self.email)
            .email("email", &self.email)
            .min_len(
                "password",
                self.password.as_deref().unwrap_or_default(),
                MIN_PASSWORD_LENGTH,
            )
            .finish()
    }
}

impl Resource for AdminUser {
    type Id = AdminUserId;
    type Input = AdminUserInput;

    const NAME: &'static str = "admin user";
    const ID_PREFIX: &'static str = "adm";
    const LIST_PATH: &'static str = "/admin/";
    const CREATE_PATH: &'static str = "/admin/";
    const ITEM_PREFIX: &'static str = "/admin";

    fn id(&self) -> &AdminUserId {
        &self.id
    }

    fn status_key(&self) -> &'static str {
        self.status.as_str()
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.email.as_str(), self.role.as_str()]
    }

    fn from_input(id: AdminUserId, input: AdminUserInput, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: input.name.trim().to_string(),
            email: input.email.trim().to_string(),
            role: input.role,
            permissions: input.permissions,
            status: input.status,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_input(&mut self, input: AdminUserInput, now: DateTime<Utc>) {
        self.name = input.name.trim().to_string();
        self.email = input.email.trim().to_string();
        self.role = input.role;
        self.permissions = input.permissions;
        self.status = input.status;
        self.updated_at = now;
    }

    fn store(data: &MockData) -> &EntityStore<Self> {
        &data.users
    }

    fn validate_new(input: &AdminUserInput) -> Result<(), ValidationErrors> {
        let password = input.password.as_deref().unwrap_or_default();
        let mut errors = input.validate().err().unwrap_or_default();
        if password.trim().is_empty() {
            errors.add("password", "Password is required");
        }
        errors.into_result()
    }
}
