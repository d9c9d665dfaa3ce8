//! Medical card persistence, one card per child.

use crate::model::medical::{MedicalCard, MedicalRecord};
use crate::model::ChildId;
use crate::repo::codec::{clean_text, date_to_db, get_optional_date, row_exists, NOW_MS_SQL};
use crate::repo::error::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

pub trait MedicalRepository {
    fn get_medical_record(&self, child_id: ChildId) -> RepoResult<Option<MedicalRecord>>;
    /// Creates the child's card or replaces every field of the existing one.
    fn save_medical_record(
        &self,
        child_id: ChildId,
        card: &MedicalCard,
    ) -> RepoResult<MedicalRecord>;
}

pub struct SqliteMedicalRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMedicalRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl MedicalRepository for SqliteMedicalRepository<'_> {
    fn get_medical_record(&self, child_id: ChildId) -> RepoResult<Option<MedicalRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT * FROM medical_records WHERE child_id = ?1;")?;

        let mut rows = stmt.query([child_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_medical_row(row)?));
        }
        Ok(None)
    }

    fn save_medical_record(
        &self,
        child_id: ChildId,
        card: &MedicalCard,
    ) -> RepoResult<MedicalRecord> {
        card.validate()?;
        if !row_exists(self.conn, "children", "child_id", child_id)? {
            return Err(RepoError::NotFound {
                entity: "child",
                id: child_id,
            });
        }

        self.conn.execute(
            &format!(
                "INSERT INTO medical_records (
                    child_id,
                    blood_type,
                    allergies,
                    chronic_diseases,
                    vaccinations,
                    height,
                    weight,
                    doctor_notes,
                    emergency_contact,
                    last_checkup
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                ON CONFLICT (child_id) DO UPDATE SET
                    blood_type = excluded.blood_type,
                    allergies = excluded.allergies,
                    chronic_diseases = excluded.chronic_diseases,
                    vaccinations = excluded.vaccinations,
                    height = excluded.height,
                    weight = excluded.weight,
                    doctor_notes = excluded.doctor_notes,
                    emergency_contact = excluded.emergency_contact,
                    last_checkup = excluded.last_checkup,
                    updated_at = {NOW_MS_SQL};"
            ),
            params![
                child_id,
                clean_text(card.blood_type.as_deref()),
                clean_text(card.allergies.as_deref()),
                clean_text(card.chronic_diseases.as_deref()),
                clean_text(card.vaccinations.as_deref()),
                card.height,
                card.weight,
                clean_text(card.doctor_notes.as_deref()),
                clean_text(card.emergency_contact.as_deref()),
                card.last_checkup.map(date_to_db),
            ],
        )?;

        self.get_medical_record(child_id)?.ok_or_else(|| {
            RepoError::InvalidData(format!(
                "medical record for child {child_id} missing after save"
            ))
        })
    }
}

fn parse_medical_row(row: &Row<'_>) -> RepoResult<MedicalRecord> {
    Ok(MedicalRecord {
        record_id: row.get("record_id")?,
        child_id: row.get("child_id")?,
        card: MedicalCard {
            blood_type: row.get("blood_type")?,
            allergies: row.get("allergies")?,
            chronic_diseases: row.get("chronic_diseases")?,
            vaccinations: row.get("vaccinations")?,
            height: row.get("height")?,
            weight: row.get("weight")?,
            doctor_notes: row.get("doctor_notes")?,
            emergency_contact: row.get("emergency_contact")?,
            last_checkup: get_optional_date(row, "last_checkup")?,
        },
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
