//! Support ticket pages.

use dashdesk_core::{AdminUserId, RequesterType, TicketPriority, TicketStatus, ValidationErrors};

use crate::components::{Cell, DataTableConfig, FormField, FormParser, FormValues, TableColumn};
use crate::models::{SupportTicket, SupportTicketInput};

use super::resources::{AdminPage, Detail};

impl SupportTicket {
    fn requester(&self) -> String {
        format!("{} {}", self.requester_type.label(), self.requester_id)
    }
}

impl AdminPage for SupportTicket {
    const SLUG: &'static str = "support";
    const TITLE: &'static str = "Support tickets";
    const LABEL: &'static str = "Ticket";

    fn table() -> DataTableConfig {
        DataTableConfig::new("support")
            .column(TableColumn::new("subject", "Subject"))
            .column(TableColumn::new("requester", "Requester"))
            .column(TableColumn::new("priority", "Priority"))
            .column(TableColumn::new("assigned_to", "Assignee"))
            .column(TableColumn::new("status", "Status"))
            .column(TableColumn::new("created_at", "Opened"))
            .status_filter::<TicketStatus>("Status")
            .search_placeholder("Search subject, description or requester...")
            .empty_state("No tickets found", Some("Nothing waiting on the support queue."))
    }

    fn row(&self) -> Vec<Cell> {
        vec![
            Cell::text(&self.subject),
            Cell::text(self.requester()),
            Cell::status(self.priority),
            Cell::optional(self.assigned_to.as_ref().map(AdminUserId::as_str)),
            Cell::status(self.status),
            Cell::date(&self.created_at),
        ]
    }

    fn heading(&self) -> String {
        self.subject.clone()
    }

    fn details(&self) -> Vec<Detail> {
        vec![
            Detail::text("ID", self.id.as_str()),
            Detail::new("Status", Cell::status(self.status)),
            Detail::new("Priority", Cell::status(self.priority)),
            Detail::text("Requester", self.requester()),
            Detail::new(
                "Assigned to",
                Cell::optional(self.assigned_to.as_ref().map(AdminUserId::as_str)),
            ),
            Detail::text("Description", &self.description),
            Detail::new("Opened", Cell::date(&self.created_at)),
            Detail::new("Last updated", Cell::date(&self.updated_at)),
        ]
    }

    fn default_values() -> FormValues {
        FormValues::new()
            .with("requester_type", RequesterType::Customer.as_str())
            .with("priority", TicketPriority::Medium.as_str())
            .with("status", TicketStatus::Open.as_str())
    }

    fn form_values(&self) -> FormValues {
        FormValues::new()
            .with("subject", &self.subject)
            .with("description", &self.description)
            .with("requester_type", self.requester_type.as_str())
            .with("requester_id", &self.requester_id)
            .with("priority", self.priority.as_str())
            .with(
                "assigned_to",
                self.assigned_to.as_ref().map(AdminUserId::as_str).unwrap_or_default(),
            )
            .with("status", self.status.as_str())
    }

    fn form_fields(values: &FormValues, _editing: bool) -> Vec<FormField> {
        vec![
            FormField::text("subject", "Subject", values).required(),
            FormField::textarea("description", "Description", values).required(),
            FormField::choice::<RequesterType>("requester_type", "Requester type", values),
            FormField::text("requester_id", "Requester ID", values)
                .required()
                .help("Customer, merchant or rider id, e.g. cus_1001."),
            FormField::choice::<TicketPriority>("priority", "Priority", values),
            FormField::text("assigned_to", "Assigned to", values).help("Admin user id."),
            FormField::choice::<TicketStatus>("status", "Status", values),
        ]
    }

    fn parse_form(values: &FormValues) -> Result<SupportTicketInput, ValidationErrors> {
        let mut form = FormParser::new(values);
        let input = SupportTicketInput {
            subject: form.text("subject"),
            description: form.text("description"),
            requester_type: form.choice("requester_type", RequesterType::Customer),
            requester_id: form.text("requester_id"),
            priority: form.choice("priority", TicketPriority::Medium),
            assigned_to: form.optional("assigned_to").map(AdminUserId::new),
            status: form.choice("status", TicketStatus::Open),
        };
        form.finish(input)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use dashdesk_core::SupportTicketId;

    use super::*;
    use crate::marketplace::Resource;

    #[test]
    fn test_parse_form_and_row() {
        let values = SupportTicket::default_values()
            .with("subject", "Rider never arrived")
            .with("description", "Order ord_5003 has been stuck for an hour.")
            .with("requester_id", "cus_1002")
            .with("priority", "urgent")
            .with("assigned_to", "adm_0003");
        let input = SupportTicket::parse_form(&values).unwrap();
        assert_eq!(input.priority, TicketPriority::Urgent);

        let ticket = SupportTicket::from_input(SupportTicketId::new("tkt_9"), input, Utc::now());
        let row = ticket.row();
        assert_eq!(row.len(), SupportTicket::table().columns.len());
        assert_eq!(row[1].text, "Customer cus_1002");
        assert_eq!(row[2].badge, Some("urgent"));
        assert_eq!(row[3].text, "adm_0003");
    }

    #[test]
    fn test_unknown_priority() {
        let values = SupportTicket::default_values().with("priority", "whenever");
        let errors = SupportTicket::parse_form(&values).unwrap_err();
        assert_eq!(errors.first("priority"), Some("Choose a valid priority"));
        assert!(errors.has("subject"));
    }
}
