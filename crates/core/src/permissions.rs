//! Permission evaluation for admin users.
//!
//! An admin's permissions are a flat record of boolean flags stored on the
//! user. Checking a permission is a lookup of the matching flag; the `any` and
//! `all` combinators are plain predicates over a list of permissions. Routes
//! are mapped to permissions through a static table, and routes missing from
//! the table are open to every signed-in admin.

use serde::{Deserialize, Serialize};

use crate::types::AdminRole;

/// A named capability an admin may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ManageCustomers,
    ManageMerchants,
    ManageRiders,
    ManageOrders,
    ManagePromotions,
    ManageBanners,
    ManageCategories,
    ManageRecipes,
    ManageUsers,
    ManageSupport,
    ViewReports,
}

impl Permission {
    /// Every permission, in settings-page order.
    pub const ALL: &'static [Self] = &[
        Self::ManageCustomers,
        Self::ManageMerchants,
        Self::ManageRiders,
        Self::ManageOrders,
        Self::ManagePromotions,
        Self::ManageBanners,
        Self::ManageCategories,
        Self::ManageRecipes,
        Self::ManageUsers,
        Self::ManageSupport,
        Self::ViewReports,
    ];

    /// Flag name as stored on the user record.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ManageCustomers => "manage_customers",
            Self::ManageMerchants => "manage_merchants",
            Self::ManageRiders => "manage_riders",
            Self::ManageOrders => "manage_orders",
            Self::ManagePromotions => "manage_promotions",
            Self::ManageBanners => "manage_banners",
            Self::ManageCategories => "manage_categories",
            Self::ManageRecipes => "manage_recipes",
            Self::ManageUsers => "manage_users",
            Self::ManageSupport => "manage_support",
            Self::ViewReports => "view_reports",
        }
    }

    /// Label for checkboxes.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ManageCustomers => "Manage customers",
            Self::ManageMerchants => "Manage merchants",
            Self::ManageRiders => "Manage riders",
            Self::ManageOrders => "Manage orders",
            Self::ManagePromotions => "Manage promotions",
            Self::ManageBanners => "Manage banners",
            Self::ManageCategories => "Manage categories",
            Self::ManageRecipes => "Manage recipes",
            Self::ManageUsers => "Manage admin users",
            Self::ManageSupport => "Handle support tickets",
            Self::ViewReports => "View reports",
        }
    }

    /// Look up a permission by its flag name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.as_str() == name)
    }
}

/// Boolean permission flags carried on an admin user record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[allow(clippy::struct_excessive_bools)]
pub struct Permissions {
    pub manage_customers: bool,
    pub manage_merchants: bool,
    pub manage_riders: bool,
    pub manage_orders: bool,
    pub manage_promotions: bool,
    pub manage_banners: bool,
    pub manage_categories: bool,
    pub manage_recipes: bool,
    pub manage_users: bool,
    pub manage_support: bool,
    pub view_reports: bool,
}

impl Permissions {
    /// Every flag set.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            manage_customers: true,
            manage_merchants: true,
            manage_riders: true,
            manage_orders: true,
            manage_promotions: true,
            manage_banners: true,
            manage_categories: true,
            manage_recipes: true,
            manage_users: true,
            manage_support: true,
            view_reports: true,
        }
    }

    /// Default flags for a newly created admin with `role`.
    #[must_use]
    pub const fn for_role(role: AdminRole) -> Self {
        match role {
            AdminRole::SuperAdmin => Self::all(),
            AdminRole::Admin => Self {
                manage_users: false,
                ..Self::all()
            },
            AdminRole::Support => Self {
                manage_customers: true,
                manage_orders: true,
                manage_support: true,
                ..Self::none()
            },
        }
    }

    /// No flag set.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            manage_customers: false,
            manage_merchants: false,
            manage_riders: false,
            manage_orders: false,
            manage_promotions: false,
            manage_banners: false,
            manage_categories: false,
            manage_recipes: false,
            manage_users: false,
            manage_support: false,
            view_reports: false,
        }
    }

    /// The flag backing `permission`.
    #[must_use]
    pub const fn has(&self, permission: Permission) -> bool {
        match permission {
            Permission::ManageCustomers => self.manage_customers,
            Permission::ManageMerchants => self.manage_merchants,
            Permission::ManageRiders => self.manage_riders,
            Permission::ManageOrders => self.manage_orders,
            Permission::ManagePromotions => self.manage_promotions,
            Permission::ManageBanners => self.manage_banners,
            Permission::ManageCategories => self.manage_categories,
            Permission::ManageRecipes => self.manage_recipes,
            Permission::ManageUsers => self.manage_users,
            Permission::ManageSupport => self.manage_support,
            Permission::ViewReports => self.view_reports,
        }
    }

    /// Set or clear the flag backing `permission`.
    pub const fn set(&mut self, permission: Permission, value: bool) {
        match permission {
            Permission::ManageCustomers => self.manage_customers = value,
            Permission::ManageMerchants => self.manage_merchants = value,
            Permission::ManageRiders => self.manage_riders = value,
            Permission::ManageOrders => self.manage_orders = value,
            Permission::ManagePromotions => self.manage_promotions = value,
            Permission::ManageBanners => self.manage_banners = value,
            Permission::ManageCategories => self.manage_categories = value,
            Permission::ManageRecipes => self.manage_recipes = value,
            Permission::ManageUsers => self.manage_users = value,
            Permission::ManageSupport => self.manage_support = value,
            Permission::ViewReports => self.view_reports = value,
        }
    }

    /// Permissions currently granted.
    #[must_use]
    pub fn granted(&self) -> Vec<Permission> {
        Permission::ALL
            .iter()
            .copied()
            .filter(|p| self.has(*p))
            .collect()
    }
}

/// Check a permission by flag name. Unknown names are denied.
#[must_use]
pub fn has_permission(permissions: &Permissions, name: &str) -> bool {
    Permission::from_name(name).is_some_and(|p| permissions.has(p))
}

/// True when at least one of `required` is granted.
#[must_use]
pub fn has_any(permissions: &Permissions, required: &[Permission]) -> bool {
    required.iter().any(|p| permissions.has(*p))
}

/// True when every one of `required` is granted.
#[must_use]
pub fn has_all(permissions: &Permissions, required: &[Permission]) -> bool {
    required.iter().all(|p| permissions.has(*p))
}

/// Route prefixes and the permission needed to open them.
pub const ROUTE_PERMISSIONS: &[(&str, Permission)] = &[
    ("/customers", Permission::ManageCustomers),
    ("/merchants", Permission::ManageMerchants),
    ("/riders", Permission::ManageRiders),
    ("/orders", Permission::ManageOrders),
    ("/promotions", Permission::ManagePromotions),
    ("/banners", Permission::ManageBanners),
    ("/categories", Permission::ManageCategories),
    ("/subcategories", Permission::ManageCategories),
    ("/recipes", Permission::ManageRecipes),
    ("/users", Permission::ManageUsers),
    ("/support", Permission::ManageSupport),
];

/// The permission required for `path`, or `None` when the route is open.
///
/// A table entry matches the path itself and anything nested below it, so
/// `/orders` covers `/orders/ord_1/edit` but not `/orders-archive`.
#[must_use]
pub fn route_permission(path: &str) -> Option<Permission> {
    ROUTE_PERMISSIONS.iter().find_map(|(prefix, permission)| {
        let rest = path.strip_prefix(prefix)?;
        (rest.is_empty() || rest.starts_with('/')).then_some(*permission)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_permission_maps_name_to_flag() {
        let perms = Permissions {
            manage_orders: true,
            ..Permissions::none()
        };
        assert!(has_permission(&perms, "manage_orders"));
        assert!(!has_permission(&perms, "manage_riders"));
        assert!(!has_permission(&perms, "launch_rockets"));
    }

    #[test]
    fn test_any_and_all() {
        let perms = Permissions::for_role(AdminRole::Support);
        let both = [Permission::ManageCustomers, Permission::ManageUsers];

        assert!(has_any(&perms, &both));
        assert!(!has_all(&perms, &both));
        assert!(has_all(&perms, &[Permission::ManageOrders, Permission::ManageSupport]));
    }

    #[test]
    fn test_empty_combinators() {
        let perms = Permissions::none();
        assert!(!has_any(&perms, &[]));
        assert!(has_all(&perms, &[]));
    }

    #[test]
    fn test_role_presets() {
        assert_eq!(Permissions::for_role(AdminRole::SuperAdmin), Permissions::all());

        let admin = Permissions::for_role(AdminRole::Admin);
        assert!(!admin.manage_users);
        assert!(admin.manage_promotions);

        let support = Permissions::for_role(AdminRole::Support);
        assert_eq!(
            support.granted(),
            vec![
                Permission::ManageCustomers,
                Permission::ManageOrders,
                Permission::ManageSupport
            ]
        );
    }

    #[test]
    fn test_set_round_trips_through_has() {
        for permission in Permission::ALL {
            let mut perms = Permissions::none();
            perms.set(*permission, true);
            assert!(perms.has(*permission));
            assert_eq!(perms.granted(), vec![*permission]);
            assert_eq!(Permission::from_name(permission.as_str()), Some(*permission));
        }
    }

    #[test]
    fn test_route_permission_lookup() {
        assert_eq!(route_permission("/orders"), Some(Permission::ManageOrders));
        assert_eq!(route_permission("/orders/ord_1/edit"), Some(Permission::ManageOrders));
        assert_eq!(route_permission("/subcategories/new"), Some(Permission::ManageCategories));
        assert_eq!(route_permission("/users/adm_1"), Some(Permission::ManageUsers));
    }

    #[test]
    fn test_route_permission_default_allow() {
        assert_eq!(route_permission("/"), None);
        assert_eq!(route_permission("/auth/login"), None);
        assert_eq!(route_permission("/orders-archive"), None);
    }

    #[test]
    fn test_permissions_deserialize_missing_flags_as_false() {
        let perms: Permissions =
            serde_json::from_str(r#"{"manageOrders": true}"#).expect("valid json");
        assert!(perms.manage_orders);
        assert!(!perms.manage_users);
    }
}
