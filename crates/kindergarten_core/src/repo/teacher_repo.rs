//! Teacher registry contracts and SQLite implementation.

use crate::model::person::{PersonName, Teacher, TeacherProfile};
use crate::model::TeacherId;
use crate::repo::codec::{clean_text, date_to_db, get_optional_date, like_pattern};
use crate::repo::error::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

pub(crate) const TEACHER_COLUMNS: &str = "t.teacher_id AS teacher_id,
    t.last_name AS last_name,
    t.first_name AS first_name,
    t.middle_name AS middle_name,
    t.phone AS phone,
    t.email AS email,
    t.birth_date AS birth_date,
    t.address AS address,
    t.education AS education,
    t.experience AS experience,
    t.created_at AS created_at";

/// Repository interface for the teachers table.
pub trait TeacherRepository {
    fn create_teacher(&self, profile: &TeacherProfile) -> RepoResult<TeacherId>;
    fn update_teacher(&self, id: TeacherId, profile: &TeacherProfile) -> RepoResult<()>;
    fn get_teacher(&self, id: TeacherId) -> RepoResult<Option<Teacher>>;
    /// All teachers ordered by last and first name.
    fn list_teachers(&self) -> RepoResult<Vec<Teacher>>;
    /// Substring match on name parts, phone and email; blank term lists all.
    fn search_teachers(&self, term: &str) -> RepoResult<Vec<Teacher>>;
    /// Deletes the teacher and its group links. Groups led by the teacher
    /// keep existing without a primary teacher.
    fn delete_teacher(&self, id: TeacherId) -> RepoResult<()>;
}

pub struct SqliteTeacherRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTeacherRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_teachers(&self, filter: &str, pattern: Option<String>) -> RepoResult<Vec<Teacher>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TEACHER_COLUMNS}
             FROM teachers t
             {filter}
             ORDER BY t.last_name ASC, t.first_name ASC, t.teacher_id ASC;"
        ))?;

        let mut rows = match pattern {
            Some(pattern) => stmt.query([pattern])?,
            None => stmt.query([])?,
        };
        let mut teachers = Vec::new();
        while let Some(row) = rows.next()? {
            teachers.push(parse_teacher_row(row)?);
        }
        Ok(teachers)
    }
}

impl TeacherRepository for SqliteTeacherRepository<'_> {
    fn create_teacher(&self, profile: &TeacherProfile) -> RepoResult<TeacherId> {
        profile.validate()?;

        self.conn.execute(
            "INSERT INTO teachers (
                last_name,
                first_name,
                middle_name,
                phone,
                email,
                birth_date,
                address,
                education,
                experience
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                profile.name.last_name.trim(),
                profile.name.first_name.trim(),
                clean_text(profile.name.middle_name.as_deref()),
                clean_text(profile.phone.as_deref()),
                clean_text(profile.email.as_deref()),
                profile.birth_date.map(date_to_db),
                clean_text(profile.address.as_deref()),
                clean_text(profile.education.as_deref()),
                profile.experience,
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_teacher(&self, id: TeacherId, profile: &TeacherProfile) -> RepoResult<()> {
        profile.validate()?;

        let changed = self.conn.execute(
            "UPDATE teachers
             SET
                last_name = ?1,
                first_name = ?2,
                middle_name = ?3,
                phone = ?4,
                email = ?5,
                birth_date = ?6,
                address = ?7,
                education = ?8,
                experience = ?9
             WHERE teacher_id = ?10;",
            params![
                profile.name.last_name.trim(),
                profile.name.first_name.trim(),
                clean_text(profile.name.middle_name.as_deref()),
                clean_text(profile.phone.as_deref()),
                clean_text(profile.email.as_deref()),
                profile.birth_date.map(date_to_db),
                clean_text(profile.address.as_deref()),
                clean_text(profile.education.as_deref()),
                profile.experience,
                id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "teacher",
                id,
            });
        }
        Ok(())
    }

    fn get_teacher(&self, id: TeacherId) -> RepoResult<Option<Teacher>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TEACHER_COLUMNS} FROM teachers t WHERE t.teacher_id = ?1;"
        ))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_teacher_row(row)?));
        }
        Ok(None)
    }

    fn list_teachers(&self) -> RepoResult<Vec<Teacher>> {
        self.query_teachers("", None)
    }

    fn search_teachers(&self, term: &str) -> RepoResult<Vec<Teacher>> {
        match clean_text(Some(term)) {
            None => self.list_teachers(),
            Some(term) => self.query_teachers(
                "WHERE t.last_name LIKE ?1 ESCAPE '\\'
                    OR t.first_name LIKE ?1 ESCAPE '\\'
                    OR t.middle_name LIKE ?1 ESCAPE '\\'
                    OR t.phone LIKE ?1 ESCAPE '\\'
                    OR t.email LIKE ?1 ESCAPE '\\'",
                Some(like_pattern(term)),
            ),
        }
    }

    fn delete_teacher(&self, id: TeacherId) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM group_teachers WHERE teacher_id = ?1;", [id])?;
        tx.execute(
            "UPDATE groups SET teacher_id = NULL WHERE teacher_id = ?1;",
            [id],
        )?;
        let changed = tx.execute("DELETE FROM teachers WHERE teacher_id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "teacher",
                id,
            });
        }
        tx.commit()?;
        Ok(())
    }
}

pub(crate) fn parse_teacher_row(row: &Row<'_>) -> RepoResult<Teacher> {
    Ok(Teacher {
        teacher_id: row.get("teacher_id")?,
        profile: TeacherProfile {
            name: PersonName {
                last_name: row.get("last_name")?,
                first_name: row.get("first_name")?,
                middle_name: row.get("middle_name")?,
            },
            phone: row.get("phone")?,
            email: row.get("email")?,
            birth_date: get_optional_date(row, "birth_date")?,
            address: row.get("address")?,
            education: row.get("education")?,
            experience: row.get("experience")?,
        },
        created_at: row.get("created_at")?,
    })
}
