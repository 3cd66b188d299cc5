//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Colour tone for a status badge.
///
/// Usage in templates: `<span class="badge badge-{{ key|badge_tone }}">`
#[askama::filter_fn]
pub fn badge_tone(status: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(tone(&status.to_string()))
}

/// Map a status wire value to `success`, `info`, `warning`, `danger` or `neutral`.
#[must_use]
pub fn tone(status: &str) -> &'static str {
    match status {
        "active" | "approved" | "available" | "delivered" | "published" | "resolved" => "success",
        "confirmed" | "preparing" | "ready_for_pickup" | "picked_up" | "on_delivery"
        | "in_progress" | "scheduled" => "info",
        "pending" | "open" | "draft" | "high" | "urgent" => "warning",
        "blocked" | "suspended" | "rejected" | "cancelled" | "expired" | "disabled" => "danger",
        _ => "neutral",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone() {
        assert_eq!(tone("delivered"), "success");
        assert_eq!(tone("picked_up"), "info");
        assert_eq!(tone("pending"), "warning");
        assert_eq!(tone("blocked"), "danger");
        assert_eq!(tone("inactive"), "neutral");
    }
}
