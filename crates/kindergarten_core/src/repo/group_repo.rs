//! Group registry and group/teacher assignments.
//!
//! # Invariants
//! - A group's primary teacher is always also present in `group_teachers`.
//! - Deleting a group detaches its children (they stay enrolled without a
//!   group) and drops its teacher links in one transaction.

use crate::model::group::{AgeCategory, Group, NewGroup};
use crate::model::person::Teacher;
use crate::model::{GroupId, TeacherId};
use crate::repo::codec::row_exists;
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::teacher_repo::{parse_teacher_row, TEACHER_COLUMNS};
use log::info;
use rusqlite::{params, Connection, Row};

const GROUP_SELECT_SQL: &str = "SELECT
    group_id,
    group_name,
    age_category,
    teacher_id,
    created_at
FROM groups";

/// Repository interface for groups and their teachers.
pub trait GroupRepository {
    fn create_group(&self, group: &NewGroup) -> RepoResult<GroupId>;
    fn update_group(&self, group: &Group) -> RepoResult<()>;
    fn get_group(&self, id: GroupId) -> RepoResult<Option<Group>>;
    /// All groups ordered by name.
    fn list_groups(&self) -> RepoResult<Vec<Group>>;
    fn delete_group(&self, id: GroupId) -> RepoResult<()>;
    /// Links a teacher to a group. Linking twice is a no-op.
    fn assign_teacher(&self, group_id: GroupId, teacher_id: TeacherId) -> RepoResult<()>;
    /// Unlinks a teacher; clears the primary teacher when it was this one.
    fn unassign_teacher(&self, group_id: GroupId, teacher_id: TeacherId) -> RepoResult<()>;
    fn list_group_teachers(&self, group_id: GroupId) -> RepoResult<Vec<Teacher>>;
}

pub struct SqliteGroupRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteGroupRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn ensure_teacher(&self, teacher_id: Option<TeacherId>) -> RepoResult<()> {
        match teacher_id {
            Some(id) if !row_exists(self.conn, "teachers", "teacher_id", id)? => {
                Err(RepoError::NotFound {
                    entity: "teacher",
                    id,
                })
            }
            _ => Ok(()),
        }
    }

    fn ensure_group(&self, group_id: GroupId) -> RepoResult<()> {
        if !row_exists(self.conn, "groups", "group_id", group_id)? {
            return Err(RepoError::NotFound {
                entity: "group",
                id: group_id,
            });
        }
        Ok(())
    }

    fn link_teacher(conn: &Connection, group_id: GroupId, teacher_id: TeacherId) -> RepoResult<()> {
        conn.execute(
            "INSERT OR IGNORE INTO group_teachers (group_id, teacher_id) VALUES (?1, ?2);",
            params![group_id, teacher_id],
        )?;
        Ok(())
    }
}

impl GroupRepository for SqliteGroupRepository<'_> {
    fn create_group(&self, group: &NewGroup) -> RepoResult<GroupId> {
        group.validate()?;
        self.ensure_teacher(group.teacher_id)?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO groups (group_name, age_category, teacher_id) VALUES (?1, ?2, ?3);",
            params![
                group.group_name.trim(),
                group.age_category.as_str(),
                group.teacher_id
            ],
        )?;
        let group_id = tx.last_insert_rowid();
        if let Some(teacher_id) = group.teacher_id {
            Self::link_teacher(&tx, group_id, teacher_id)?;
        }
        tx.commit()?;

        Ok(group_id)
    }

    fn update_group(&self, group: &Group) -> RepoResult<()> {
        group.validate()?;
        self.ensure_teacher(group.teacher_id)?;

        let tx = self.conn.unchecked_transaction()?;
        let changed = tx.execute(
            "UPDATE groups
             SET
                group_name = ?1,
                age_category = ?2,
                teacher_id = ?3
             WHERE group_id = ?4;",
            params![
                group.group_name.trim(),
                group.age_category.as_str(),
                group.teacher_id,
                group.group_id,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "group",
                id: group.group_id,
            });
        }
        if let Some(teacher_id) = group.teacher_id {
            Self::link_teacher(&tx, group.group_id, teacher_id)?;
        }
        tx.commit()?;

        Ok(())
    }

    fn get_group(&self, id: GroupId) -> RepoResult<Option<Group>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{GROUP_SELECT_SQL} WHERE group_id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_group_row(row)?));
        }
        Ok(None)
    }

    fn list_groups(&self) -> RepoResult<Vec<Group>> {
        let mut stmt = self.conn.prepare(&format!(
            "{GROUP_SELECT_SQL} ORDER BY group_name ASC, group_id ASC;"
        ))?;

        let mut rows = stmt.query([])?;
        let mut groups = Vec::new();
        while let Some(row) = rows.next()? {
            groups.push(parse_group_row(row)?);
        }
        Ok(groups)
    }

    fn delete_group(&self, id: GroupId) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        let detached = tx.execute(
            "UPDATE children SET group_id = NULL WHERE group_id = ?1;",
            [id],
        )?;
        tx.execute("DELETE FROM group_teachers WHERE group_id = ?1;", [id])?;
        let changed = tx.execute("DELETE FROM groups WHERE group_id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "group",
                id,
            });
        }
        tx.commit()?;

        info!(
            "event=group_delete module=registry status=ok group_id={} detached_children={}",
            id, detached
        );
        Ok(())
    }

    fn assign_teacher(&self, group_id: GroupId, teacher_id: TeacherId) -> RepoResult<()> {
        self.ensure_group(group_id)?;
        self.ensure_teacher(Some(teacher_id))?;
        Self::link_teacher(self.conn, group_id, teacher_id)
    }

    fn unassign_teacher(&self, group_id: GroupId, teacher_id: TeacherId) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "DELETE FROM group_teachers WHERE group_id = ?1 AND teacher_id = ?2;",
            params![group_id, teacher_id],
        )?;
        tx.execute(
            "UPDATE groups SET teacher_id = NULL WHERE group_id = ?1 AND teacher_id = ?2;",
            params![group_id, teacher_id],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn list_group_teachers(&self, group_id: GroupId) -> RepoResult<Vec<Teacher>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TEACHER_COLUMNS}
             FROM group_teachers gt
             INNER JOIN teachers t ON t.teacher_id = gt.teacher_id
             WHERE gt.group_id = ?1
             ORDER BY t.last_name ASC, t.first_name ASC, t.teacher_id ASC;"
        ))?;

        let mut rows = stmt.query([group_id])?;
        let mut teachers = Vec::new();
        while let Some(row) = rows.next()? {
            teachers.push(parse_teacher_row(row)?);
        }
        Ok(teachers)
    }
}

fn parse_group_row(row: &Row<'_>) -> RepoResult<Group> {
    let category_text: String = row.get("age_category")?;
    let age_category = category_text.parse::<AgeCategory>().map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid age category `{category_text}` in groups.age_category"
        ))
    })?;

    Ok(Group {
        group_id: row.get("group_id")?,
        group_name: row.get("group_name")?,
        age_category,
        teacher_id: row.get("teacher_id")?,
        created_at: row.get("created_at")?,
    })
}
