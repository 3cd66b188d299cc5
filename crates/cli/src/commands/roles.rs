//! Role preset checks.

use thiserror::Error;
use tracing::info;

use dashdesk_core::{
    AdminRole, Permission, Permissions, UnknownVariant, has_all, has_any, has_permission,
};

/// Errors from `roles check`.
#[derive(Debug, Error)]
pub enum RolesError {
    #[error(transparent)]
    Role(#[from] UnknownVariant),

    #[error("unknown permission: {0}")]
    UnknownPermission(String),

    /// The preset does not grant what was asked for.
    #[error("{role} does not grant {wanted}")]
    Denied { role: &'static str, wanted: String },
}

/// Check the default permissions of `role` against permission flag names.
///
/// With no names, lists what the preset grants. Otherwise every name must be
/// granted, or at least one of them when `any` is set.
///
/// # Errors
///
/// Returns an error for unknown roles or permissions, or when the preset
/// falls short.
pub fn check(role: &str, names: &[String], any: bool) -> Result<(), RolesError> {
    let role: AdminRole = role.parse()?;
    let permissions = Permissions::for_role(role);

    if names.is_empty() {
        info!("{} grants:", role.label());
        for permission in permissions.granted() {
            info!("  {} ({})", permission.as_str(), permission.label());
        }
        return Ok(());
    }

    let mut required = Vec::with_capacity(names.len());
    for name in names {
        let permission = Permission::from_name(name.trim())
            .ok_or_else(|| RolesError::UnknownPermission(name.clone()))?;
        let verdict = if has_permission(&permissions, permission.as_str()) {
            "granted"
        } else {
            "denied"
        };
        info!("  {}: {verdict}", permission.as_str());
        required.push(permission);
    }

    let allowed = if any {
        has_any(&permissions, &required)
    } else {
        has_all(&permissions, &required)
    };
    if !allowed {
        return Err(RolesError::Denied {
            role: role.label(),
            wanted: names.join(if any { " or " } else { " and " }),
        });
    }

    info!("{} OK", role.label());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_lists_preset_without_names() {
        assert!(check("admin", &[], false).is_ok());
    }

    #[test]
    fn test_all_versus_any() {
        let wanted = names(&["manage_support", "manage_users"]);
        assert!(matches!(
            check("support", &wanted, false),
            Err(RolesError::Denied { role: "Support", .. })
        ));
        assert!(check("support", &wanted, true).is_ok());
        assert!(check("super_admin", &wanted, false).is_ok());
    }

    #[test]
    fn test_unknown_names() {
        assert!(matches!(
            check("owner", &[], false),
            Err(RolesError::Role(_))
        ));
        assert!(matches!(
            check("admin", &names(&["launch_rockets"]), false),
            Err(RolesError::UnknownPermission(name)) if name == "launch_rockets"
        ));
    }
}
