//! Medical card of a child. At most one card exists per child.

use crate::model::validation::{optional_positive, ValidationError};
use crate::model::{ChildId, RecordId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Editable medical card fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MedicalCard {
    pub blood_type: Option<String>,
    pub allergies: Option<String>,
    pub chronic_diseases: Option<String>,
    pub vaccinations: Option<String>,
    /// Centimetres.
    pub height: Option<f64>,
    /// Kilograms.
    pub weight: Option<f64>,
    pub doctor_notes: Option<String>,
    pub emergency_contact: Option<String>,
    pub last_checkup: Option<NaiveDate>,
}

impl MedicalCard {
    pub fn validate(&self) -> Result<(), ValidationError> {
        optional_positive("height", self.height)?;
        optional_positive("weight", self.weight)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalRecord {
    pub record_id: RecordId,
    pub child_id: ChildId,
    #[serde(flatten)]
    pub card: MedicalCard,
    pub created_at: i64,
    pub updated_at: i64,
}
