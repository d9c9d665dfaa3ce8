//! Parent registry and parent/child links.
//!
//! # Invariants
//! - A `(parent_id, child_id)` pair is linked at most once; relinking
//!   replaces the relationship label.
//! - Deleting a parent removes its links first.

use crate::model::child::Child;
use crate::model::person::{Guardianship, Parent, ParentProfile, PersonName};
use crate::model::{ChildId, ParentId};
use crate::repo::child_repo::parse_child_row;
use crate::repo::codec::{clean_text, like_pattern, row_exists};
use crate::repo::error::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row};
use serde::Serialize;

/// Child seen from a parent, with the parent's relationship label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkedChild {
    pub child: Child,
    pub relationship: String,
}

/// Parent seen from a child, with the relationship label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkedParent {
    pub parent: Parent,
    pub relationship: String,
}

/// Repository interface for parents and guardianship links.
pub trait ParentRepository {
    fn create_parent(&self, profile: &ParentProfile) -> RepoResult<ParentId>;
    fn update_parent(&self, id: ParentId, profile: &ParentProfile) -> RepoResult<()>;
    fn get_parent(&self, id: ParentId) -> RepoResult<Option<Parent>>;
    fn list_parents(&self) -> RepoResult<Vec<Parent>>;
    /// Substring match on name parts, phone and email; blank term lists all.
    fn search_parents(&self, term: &str) -> RepoResult<Vec<Parent>>;
    fn delete_parent(&self, id: ParentId) -> RepoResult<()>;
    fn link_child(&self, link: &Guardianship) -> RepoResult<()>;
    fn unlink_child(&self, parent_id: ParentId, child_id: ChildId) -> RepoResult<()>;
    fn list_children_of(&self, parent_id: ParentId) -> RepoResult<Vec<LinkedChild>>;
    fn list_parents_of(&self, child_id: ChildId) -> RepoResult<Vec<LinkedParent>>;
}

pub struct SqliteParentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteParentRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_parents(&self, filter: &str, pattern: Option<String>) -> RepoResult<Vec<Parent>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT p.*
             FROM parents p
             {filter}
             ORDER BY p.last_name ASC, p.first_name ASC, p.parent_id ASC;"
        ))?;

        let mut rows = match pattern {
            Some(pattern) => stmt.query([pattern])?,
            None => stmt.query([])?,
        };
        let mut parents = Vec::new();
        while let Some(row) = rows.next()? {
            parents.push(parse_parent_row(row)?);
        }
        Ok(parents)
    }
}

impl ParentRepository for SqliteParentRepository<'_> {
    fn create_parent(&self, profile: &ParentProfile) -> RepoResult<ParentId> {
        profile.validate()?;

        self.conn.execute(
            "INSERT INTO parents (
                last_name,
                first_name,
                middle_name,
                phone,
                email,
                address
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                profile.name.last_name.trim(),
                profile.name.first_name.trim(),
                clean_text(profile.name.middle_name.as_deref()),
                clean_text(profile.phone.as_deref()),
                clean_text(profile.email.as_deref()),
                clean_text(profile.address.as_deref()),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_parent(&self, id: ParentId, profile: &ParentProfile) -> RepoResult<()> {
        profile.validate()?;

        let changed = self.conn.execute(
            "UPDATE parents
             SET
                last_name = ?1,
                first_name = ?2,
                middle_name = ?3,
                phone = ?4,
                email = ?5,
                address = ?6
             WHERE parent_id = ?7;",
            params![
                profile.name.last_name.trim(),
                profile.name.first_name.trim(),
                clean_text(profile.name.middle_name.as_deref()),
                clean_text(profile.phone.as_deref()),
                clean_text(profile.email.as_deref()),
                clean_text(profile.address.as_deref()),
                id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "parent",
                id,
            });
        }
        Ok(())
    }

    fn get_parent(&self, id: ParentId) -> RepoResult<Option<Parent>> {
        let mut stmt = self
            .conn
            .prepare("SELECT p.* FROM parents p WHERE p.parent_id = ?1;")?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_parent_row(row)?));
        }
        Ok(None)
    }

    fn list_parents(&self) -> RepoResult<Vec<Parent>> {
        self.query_parents("", None)
    }

    fn search_parents(&self, term: &str) -> RepoResult<Vec<Parent>> {
        match clean_text(Some(term)) {
            None => self.list_parents(),
            Some(term) => self.query_parents(
                "WHERE p.last_name LIKE ?1 ESCAPE '\\'
                    OR p.first_name LIKE ?1 ESCAPE '\\'
                    OR p.middle_name LIKE ?1 ESCAPE '\\'
                    OR p.phone LIKE ?1 ESCAPE '\\'
                    OR p.email LIKE ?1 ESCAPE '\\'",
                Some(like_pattern(term)),
            ),
        }
    }

    fn delete_parent(&self, id: ParentId) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM parent_child WHERE parent_id = ?1;", [id])?;
        let changed = tx.execute("DELETE FROM parents WHERE parent_id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "parent",
                id,
            });
        }
        tx.commit()?;
        Ok(())
    }

    fn link_child(&self, link: &Guardianship) -> RepoResult<()> {
        link.validate()?;
        if !row_exists(self.conn, "parents", "parent_id", link.parent_id)? {
            return Err(RepoError::NotFound {
                entity: "parent",
                id: link.parent_id,
            });
        }
        if !row_exists(self.conn, "children", "child_id", link.child_id)? {
            return Err(RepoError::NotFound {
                entity: "child",
                id: link.child_id,
            });
        }

        self.conn.execute(
            "INSERT INTO parent_child (parent_id, child_id, relationship)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (parent_id, child_id) DO UPDATE SET
                relationship = excluded.relationship;",
            params![link.parent_id, link.child_id, link.relationship.trim()],
        )?;
        Ok(())
    }

    fn unlink_child(&self, parent_id: ParentId, child_id: ChildId) -> RepoResult<()> {
        self.conn.execute(
            "DELETE FROM parent_child WHERE parent_id = ?1 AND child_id = ?2;",
            params![parent_id, child_id],
        )?;
        Ok(())
    }

    fn list_children_of(&self, parent_id: ParentId) -> RepoResult<Vec<LinkedChild>> {
        let mut stmt = self.conn.prepare(
            "SELECT c.*, pc.relationship AS relationship
             FROM parent_child pc
             INNER JOIN children c ON c.child_id = pc.child_id
             WHERE pc.parent_id = ?1
             ORDER BY c.last_name ASC, c.first_name ASC, c.child_id ASC;",
        )?;

        let mut rows = stmt.query([parent_id])?;
        let mut children = Vec::new();
        while let Some(row) = rows.next()? {
            children.push(LinkedChild {
                child: parse_child_row(row)?,
                relationship: row.get("relationship")?,
            });
        }
        Ok(children)
    }

    fn list_parents_of(&self, child_id: ChildId) -> RepoResult<Vec<LinkedParent>> {
        let mut stmt = self.conn.prepare(
            "SELECT p.*, pc.relationship AS relationship
             FROM parent_child pc
             INNER JOIN parents p ON p.parent_id = pc.parent_id
             WHERE pc.child_id = ?1
             ORDER BY p.last_name ASC, p.first_name ASC, p.parent_id ASC;",
        )?;

        let mut rows = stmt.query([child_id])?;
        let mut parents = Vec::new();
        while let Some(row) = rows.next()? {
            parents.push(LinkedParent {
                parent: parse_parent_row(row)?,
                relationship: row.get("relationship")?,
            });
        }
        Ok(parents)
    }
}

fn parse_parent_row(row: &Row<'_>) -> RepoResult<Parent> {
    Ok(Parent {
        parent_id: row.get("parent_id")?,
        profile: ParentProfile {
            name: PersonName {
                last_name: row.get("last_name")?,
                first_name: row.get("first_name")?,
                middle_name: row.get("middle_name")?,
            },
            phone: row.get("phone")?,
            email: row.get("email")?,
            address: row.get("address")?,
        },
        created_at: row.get("created_at")?,
    })
}
