//! Delivery riders.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use dashdesk_core::{RiderId, RiderStatus, Validate, ValidationErrors, Validator, VehicleType};

use super::non_blank;
use crate::marketplace::{EntityStore, MockData, Resource};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rider {
    pub id: RiderId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub vehicle_type: VehicleType,
    #[serde(default)]
    pub license_plate: Option<String>,
    #[serde(default)]
    pub rating: Option<Decimal>,
    #[serde(default)]
    pub completed_deliveries: u32,
    pub status: RiderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiderInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub vehicle_type: VehicleType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_plate: Option<String>,
    pub status: RiderStatus,
}

impl Validate for RiderInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let plate = self.license_plate.as_deref().unwrap_or_default();
        Validator::new()
            .required("name", &self.name)
            .min_len("name", &self.name, 2)
            .required("email", &self.email)
            .email("email", &self.email)
            .required("phone", &self.phone)
            .phone("phone", &self.phone)
            .check(
                "license_plate",
                self.vehicle_type == VehicleType::Bicycle || !plate.trim().is_empty(),
                "License plate is required for motorised vehicles",
            )
            .max_len("license_plate", plate, 15)
            .finish()
    }
}

impl Resource for Rider {
    type Id = RiderId;
    type Input = RiderInput;

    const NAME: &'static str = "rider";
    const ID_PREFIX: &'static str = "rid";
    const LIST_PATH: &'static str = "/rider/list";
    const CREATE_PATH: &'static str = "/rider";
    const ITEM_PREFIX: &'static str = "/rider";

    fn id(&self) -> &RiderId {
        &self.id
    }

    fn status_key(&self) -> &'static str {
        self.status.as_str()
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.email.as_str(), self.phone.as_str()];
        if let Some(plate) = &self.license_plate {
            fields.push(plate);
        }
        fields
    }

    fn from_input(id: RiderId, input: RiderInput, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: input.name.trim().to_string(),
            email: input.email.trim().to_string(),
            phone: input.phone.trim().to_string(),
            vehicle_type: input.vehicle_type,
            license_plate: non_blank(input.license_plate),
            rating: None,
            completed_deliveries: 0,
            status: input.status,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_input(&mut self, input: RiderInput, now: DateTime<Utc>) {
        self.name = input.name.trim().to_string();
        self.email = input.email.trim().to_string();
        self.phone = input.phone.trim().to_string();
        self.vehicle_type = input.vehicle_type;
        self.license_plate = non_blank(input.license_plate);
        self.status = input.status;
        self.updated_at = now;
    }

    fn store(data: &MockData) -> &EntityStore<Self> {
        &data.riders
    }
}
