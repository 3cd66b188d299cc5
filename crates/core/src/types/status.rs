//! Status and classification enums for marketplace entities.
//!
//! Every enum is generated by `define_status!`, which gives it the wire
//! spelling used by the API (`snake_case`), a human label for tables, the list
//! of all variants for select inputs, and case-insensitive parsing from form
//! values.

use serde::{Deserialize, Serialize};

/// Error returned when a string does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    /// Enum being parsed (e.g. "order status").
    pub kind: &'static str,
    /// Rejected input.
    pub value: String,
}

/// Common surface of every status enum, used to build select inputs and
/// table filters generically.
pub trait Choice: Copy + Eq + core::str::FromStr<Err = UnknownVariant> + 'static {
    /// Every variant, in display order.
    const CHOICES: &'static [Self];

    /// Wire value.
    fn value(self) -> &'static str;

    /// Human readable label.
    fn text(self) -> &'static str;
}

macro_rules! define_status {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal) {
            $($(#[$vmeta:meta])* $variant:ident => ($wire:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in display order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Wire value used by the API and in form fields.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }

            /// Human readable label.
            #[must_use]
            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl Choice for $name {
            const CHOICES: &'static [Self] = Self::ALL;

            fn value(self) -> &'static str {
                self.as_str()
            }

            fn text(self) -> &'static str {
                self.label()
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(self.label())
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| UnknownVariant {
                        kind: $kind,
                        value: s.to_owned(),
                    })
            }
        }
    };
}

define_status! {
    /// Customer account status.
    CustomerStatus ("customer status") {
        Active => ("active", "Active"),
        Inactive => ("inactive", "Inactive"),
        Blocked => ("blocked", "Blocked"),
    }
}

define_status! {
    /// Merchant onboarding / trading status.
    MerchantStatus ("merchant status") {
        Pending => ("pending", "Pending review"),
        Approved => ("approved", "Approved"),
        Suspended => ("suspended", "Suspended"),
        Rejected => ("rejected", "Rejected"),
    }
}

define_status! {
    /// Rider availability.
    RiderStatus ("rider status") {
        Available => ("available", "Available"),
        OnDelivery => ("on_delivery", "On delivery"),
        Offline => ("offline", "Offline"),
        Suspended => ("suspended", "Suspended"),
    }
}

define_status! {
    /// Vehicle used by a rider.
    VehicleType ("vehicle type") {
        Bicycle => ("bicycle", "Bicycle"),
        Scooter => ("scooter", "Scooter"),
        Motorcycle => ("motorcycle", "Motorcycle"),
        Car => ("car", "Car"),
    }
}

define_status! {
    /// Order lifecycle status.
    OrderStatus ("order status") {
        Pending => ("pending", "Pending"),
        Confirmed => ("confirmed", "Confirmed"),
        Preparing => ("preparing", "Preparing"),
        ReadyForPickup => ("ready_for_pickup", "Ready for pickup"),
        PickedUp => ("picked_up", "Picked up"),
        Delivered => ("delivered", "Delivered"),
        Cancelled => ("cancelled", "Cancelled"),
    }
}

impl OrderStatus {
    /// Whether the order can no longer change status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// The next step in the delivery lifecycle, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Confirmed),
            Self::Confirmed => Some(Self::Preparing),
            Self::Preparing => Some(Self::ReadyForPickup),
            Self::ReadyForPickup => Some(Self::PickedUp),
            Self::PickedUp => Some(Self::Delivered),
            Self::Delivered | Self::Cancelled => None,
        }
    }

    /// Whether an order in this status may move to `target`.
    ///
    /// Keeping the same status is always allowed. Otherwise orders advance one
    /// step at a time, and any non-terminal order may be cancelled.
    #[must_use]
    pub fn can_transition_to(self, target: Self) -> bool {
        if self == target {
            return true;
        }
        if self.is_terminal() {
            return false;
        }
        target == Self::Cancelled || self.next() == Some(target)
    }
}

define_status! {
    /// How an order is paid.
    PaymentMethod ("payment method") {
        Card => ("card", "Card"),
        Cash => ("cash", "Cash on delivery"),
        Wallet => ("wallet", "Wallet"),
    }
}

define_status! {
    /// Promotion status as stored by the API.
    PromotionStatus ("promotion status") {
        Active => ("active", "Active"),
        Scheduled => ("scheduled", "Scheduled"),
        Expired => ("expired", "Expired"),
        Disabled => ("disabled", "Disabled"),
    }
}

define_status! {
    /// How a promotion's discount value is applied.
    DiscountType ("discount type") {
        Percentage => ("percentage", "Percentage"),
        Fixed => ("fixed", "Fixed amount"),
    }
}

define_status! {
    /// Simple on/off status shared by banners, categories, subcategories and admin users.
    ActiveStatus ("status") {
        Active => ("active", "Active"),
        Inactive => ("inactive", "Inactive"),
    }
}

define_status! {
    /// Recipe publication status.
    RecipeStatus ("recipe status") {
        Draft => ("draft", "Draft"),
        Published => ("published", "Published"),
    }
}

define_status! {
    /// Admin role used for permission presets.
    AdminRole ("admin role") {
        SuperAdmin => ("super_admin", "Super admin"),
        Admin => ("admin", "Admin"),
        Support => ("support", "Support"),
    }
}

define_status! {
    /// Support ticket status.
    TicketStatus ("ticket status") {
        Open => ("open", "Open"),
        InProgress => ("in_progress", "In progress"),
        Resolved => ("resolved", "Resolved"),
        Closed => ("closed", "Closed"),
    }
}

define_status! {
    /// Support ticket priority.
    TicketPriority ("ticket priority") {
        Low => ("low", "Low"),
        Medium => ("medium", "Medium"),
        High => ("high", "High"),
        Urgent => ("urgent", "Urgent"),
    }
}

define_status! {
    /// Who raised a support ticket.
    RequesterType ("requester type") {
        Customer => ("customer", "Customer"),
        Merchant => ("merchant", "Merchant"),
        Rider => ("rider", "Rider"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format_is_snake_case() {
        let json = serde_json::to_string(&OrderStatus::ReadyForPickup).unwrap();
        assert_eq!(json, "\"ready_for_pickup\"");

        let parsed: RiderStatus = serde_json::from_str("\"on_delivery\"").unwrap();
        assert_eq!(parsed, RiderStatus::OnDelivery);
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!("SUPER_ADMIN".parse::<AdminRole>(), Ok(AdminRole::SuperAdmin));
        assert_eq!(" blocked ".parse::<CustomerStatus>(), Ok(CustomerStatus::Blocked));
    }

    #[test]
    fn test_from_str_unknown() {
        let err = "teleport".parse::<VehicleType>().unwrap_err();
        assert_eq!(err.to_string(), "unknown vehicle type: teleport");
    }

    #[test]
    fn test_display_uses_label() {
        assert_eq!(PaymentMethod::Cash.to_string(), "Cash on delivery");
        assert_eq!(TicketStatus::InProgress.to_string(), "In progress");
    }

    #[test]
    fn test_all_lists_every_variant() {
        assert_eq!(OrderStatus::ALL.len(), 7);
        assert_eq!(ActiveStatus::ALL, &[ActiveStatus::Active, ActiveStatus::Inactive]);
    }

    #[test]
    fn test_order_transitions_follow_lifecycle() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Confirmed));
        assert!(OrderStatus::PickedUp.can_transition_to(OrderStatus::Delivered));
        assert!(OrderStatus::Preparing.can_transition_to(OrderStatus::Preparing));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Delivered));
        assert!(!OrderStatus::Confirmed.can_transition_to(OrderStatus::Pending));
    }

    #[test]
    fn test_order_cancellation() {
        assert!(OrderStatus::ReadyForPickup.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Pending));
    }

    #[test]
    fn test_choice_matches_inherent_methods() {
        fn values<T: Choice>() -> Vec<&'static str> {
            T::CHOICES.iter().map(|c| c.value()).collect()
        }
        assert_eq!(values::<RecipeStatus>(), vec!["draft", "published"]);
        assert_eq!(TicketPriority::Urgent.text(), "Urgent");
    }
}
