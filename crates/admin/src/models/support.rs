//! Support tickets raised by customers, merchants and riders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dashdesk_core::{
    AdminUserId, RequesterType, SupportTicketId, TicketPriority, TicketStatus, Validate,
    ValidationErrors, Validator,
};

use crate::marketplace::{EntityStore, MockData, Resource};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportTicket {
    pub id: SupportTicketId,
    pub subject: String,
    pub description: String,
    pub requester_type: RequesterType,
    /// Id of the customer, merchant or rider, depending on `requester_type`.
    pub requester_id: String,
    pub priority: TicketPriority,
    #[serde(default)]
    pub assigned_to: Option<AdminUserId>,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SupportTicket {
    /// Whether the ticket still needs attention.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self.status, TicketStatus::Open | TicketStatus::InProgress)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportTicketInput {
    pub subject: String,
    pub description: String,
    pub requester_type: RequesterType,
    pub requester_id: String,
    pub priority: TicketPriority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<AdminUserId>,
    pub status: TicketStatus,
}

impl Validate for SupportTicketInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .required("subject", &self.subject)
            .min_len("subject", &self.subject, 5)
            .max_len("subject", &self.subject, 150)
            .required("description", &self.description)
            .min_len("description", &self.description, 10)
            .required("requester_id", &self.requester_id)
            .finish()
    }
}

impl Resource for SupportTicket {
    type Id = SupportTicketId;
    type Input = SupportTicketInput;

    const NAME: &'static str = "support ticket";
    const ID_PREFIX: &'static str = "tkt";
    const LIST_PATH: &'static str = "/support/tickets";
    const CREATE_PATH: &'static str = "/support/tickets";
    const ITEM_PREFIX: &'static str = "/support/tickets";

    fn id(&self) -> &SupportTicketId {
        &self.id
    }

    fn status_key(&self) -> &'static str {
        self.status.as_str()
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.subject.as_str(),
            self.description.as_str(),
            self.requester_id.as_str(),
        ]
    }

    fn from_input(id: SupportTicketId, input: SupportTicketInput, now: DateTime<Utc>) -> Self {
        Self {
            id,
            subject: input.subject.trim().to_string(),
            description: input.description.trim().to_string(),
            requester_type: input.requester_type,
            requester_id: input.requester_id.trim().to_string(),
            priority: input.priority,
            assigned_to: input.assigned_to,
            status: input.status,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_input(&mut self, input: SupportTicketInput, now: DateTime<Utc>) {
        self.subject = input.subject.trim().to_string();
        self.description = input.description.trim().to_string();
        self.requester_type = input.requester_type;
        self.requester_id = input.requester_id.trim().to_string();
        self.priority = input.priority;
        self.assigned_to = input.assigned_to;
        self.status = input.status;
        self.updated_at = now;
    }

    fn store(data: &MockData) -> &EntityStore<Self> {
        &data.tickets
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_rules() {
        let errors = SupportTicketInput {
            subject: "Late".into(),
            description: "Cold food".into(),
            requester_type: RequesterType::Customer,
            requester_id: "cus_1".into(),
            priority: TicketPriority::High,
            assigned_to: None,
            status: TicketStatus::Open,
        }
        .validate()
        .unwrap_err();

        assert_eq!(errors.first("subject"), Some("Subject must be at least 5 characters"));
        assert_eq!(
            errors.first("description"),
            Some("Description must be at least 10 characters")
        );
    }

    #[test]
    fn test_is_open() {
        let ticket = SupportTicket::from_input(
            SupportTicketId::new("tkt_1"),
            SupportTicketInput {
                subject: "Rider never arrived".into(),
                description: "Order ORD-1 was marked picked up an hour ago.".into(),
                requester_type: RequesterType::Customer,
                requester_id: "cus_1".into(),
                priority: TicketPriority::Urgent,
                assigned_to: None,
                status: TicketStatus::InProgress,
            },
            Utc::now(),
        );
        assert!(ticket.is_open());
    }
}
