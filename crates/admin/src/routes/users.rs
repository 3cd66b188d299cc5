//! Admin user pages.
//!
//! Permissions are one checkbox per flag, named after the flag. A user saved
//! with no box ticked gets the preset for their role.

use dashdesk_core::{ActiveStatus, AdminRole, Permission, Permissions, ValidationErrors};

use crate::components::{Cell, DataTableConfig, FormField, FormParser, FormValues, TableColumn};
use crate::models::admin_user::MIN_PASSWORD_LENGTH;
use crate::models::{AdminUser, AdminUserInput};

use super::resources::{AdminPage, Detail};

fn permission_values(mut values: FormValues, permissions: &Permissions) -> FormValues {
    for permission in permissions.granted() {
        values.set(permission.as_str(), "on");
    }
    values
}

fn permission_summary(permissions: &Permissions) -> String {
    let granted = permissions.granted();
    if granted.is_empty() {
        return "None".to_string();
    }
    granted
        .iter()
        .map(|p| p.label())
        .collect::<Vec<_>>()
        .join(", ")
}

impl AdminPage for AdminUser {
    const SLUG: &'static str = "users";
    const TITLE: &'static str = "Admin users";
    const LABEL: &'static str = "Admin user";

    fn table() -> DataTableConfig {
        DataTableConfig::new("users")
            .column(TableColumn::new("name", "Name"))
            .column(TableColumn::new("email", "Email"))
            .column(TableColumn::new("role", "Role"))
            .column(TableColumn::numeric("permissions", "Permissions"))
            .column(TableColumn::new("last_login_at", "Last sign-in"))
            .column(TableColumn::new("status", "Status"))
            .status_filter::<ActiveStatus>("Status")
            .search_placeholder("Search name, email or role...")
            .empty_state("No admin users found", None)
    }

    fn row(&self) -> Vec<Cell> {
        vec![
            Cell::text(&self.name),
            Cell::text(&self.email),
            Cell::text(self.role.label()),
            Cell::text(self.permissions.granted().len().to_string()),
            self.last_login_at
                .as_ref()
                .map_or_else(|| Cell::text("Never"), Cell::date),
            Cell::status(self.status),
        ]
    }

    fn heading(&self) -> String {
        self.name.clone()
    }

    fn details(&self) -> Vec<Detail> {
        vec![
            Detail::text("ID", self.id.as_str()),
            Detail::text("Email", &self.email),
            Detail::text("Role", self.role.label()),
            Detail::text("Permissions", permission_summary(&self.permissions)),
            Detail::new("Status", Cell::status(self.status)),
            Detail::new(
                "Last sign-in",
                self.last_login_at
                    .as_ref()
                    .map_or_else(|| Cell::text("Never"), Cell::date),
            ),
            Detail::new("Created", Cell::date(&self.created_at)),
        ]
    }

    fn default_values() -> FormValues {
        let values = FormValues::new()
            .with("role", AdminRole::Admin.as_str())
            .with("status", ActiveStatus::Active.as_str());
        permission_values(values, &Permissions::for_role(AdminRole::Admin))
    }

    fn form_values(&self) -> FormValues {
        let values = FormValues::new()
            .with("name", &self.name)
            .with("email", &self.email)
            .with("role", self.role.as_str())
            .with("status", self.status.as_str());
        permission_values(values, &self.permissions)
    }

    fn form_fields(values: &FormValues, editing: bool) -> Vec<FormField> {
        let password_help = format!(
            "At least {MIN_PASSWORD_LENGTH} characters.{}",
            if editing { " Leave blank to keep the current password." } else { "" }
        );
        let mut password = FormField::password("password", "Password").help(&password_help);
        if !editing {
            password = password.required();
        }

        let mut fields = vec![
            FormField::text("name", "Full name", values).required(),
            FormField::email("email", "Email", values).required(),
            password,
            FormField::choice::<AdminRole>("role", "Role", values),
            FormField::choice::<ActiveStatus>("status", "Status", values),
        ];
        fields.extend(
            Permission::ALL
                .iter()
                .map(|p| FormField::checkbox(p.as_str(), p.label(), values)),
        );
        fields
    }

    fn parse_form(values: &FormValues) -> Result<AdminUserInput, ValidationErrors> {
        let mut form = FormParser::new(values);
        let role = form.choice("role", AdminRole::Support);

        let mut permissions = Permissions::none();
        for permission in Permission::ALL {
            permissions.set(*permission, form.checked(permission.as_str()));
        }
        if permissions == Permissions::none() {
            permissions = Permissions::for_role(role);
        }

        let input = AdminUserInput {
            name: form.text("name"),
            email: form.text("email"),
            role,
            permissions,
            status: form.choice("status", ActiveStatus::Active),
            password: form.optional("password"),
        };
        form.finish(input)
    }
}
