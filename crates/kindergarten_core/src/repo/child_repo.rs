//! Child registry contracts and SQLite implementation.
//!
//! # Invariants
//! - Lists are ordered by `last_name, first_name, child_id`.
//! - Moving a child between groups (or out of any group) never touches its
//!   attendance history.
//! - Deleting a child removes its guardian links, medical card and attendance
//!   rows in the same transaction, then the child row.

use crate::model::child::{Child, Gender, NewChild};
use crate::model::{ChildId, GroupId};
use crate::repo::codec::{clean_text, date_to_db, get_date, like_pattern, row_exists};
use crate::repo::error::{RepoError, RepoResult};
use log::info;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const CHILD_SELECT_SQL: &str = "SELECT
    child_id,
    last_name,
    first_name,
    middle_name,
    birth_date,
    gender,
    group_id,
    enrollment_date,
    locker_symbol,
    created_at
FROM children";

/// Group membership filter for child listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GroupFilter {
    #[default]
    Any,
    Only(GroupId),
    Unassigned,
}

/// Query options for listing children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChildListQuery {
    pub group: GroupFilter,
    /// Case-insensitive substring match on last or first name. Blank means
    /// no filter.
    pub search: Option<String>,
}

/// Repository interface for the children table.
pub trait ChildRepository {
    fn create_child(&self, child: &NewChild) -> RepoResult<ChildId>;
    fn update_child(&self, child: &Child) -> RepoResult<()>;
    fn get_child(&self, id: ChildId) -> RepoResult<Option<Child>>;
    fn list_children(&self, query: &ChildListQuery) -> RepoResult<Vec<Child>>;
    fn delete_child(&self, id: ChildId) -> RepoResult<()>;
    /// Moves one child to `group_id`, or detaches it when `None`.
    fn transfer_child(&self, id: ChildId, group_id: Option<GroupId>) -> RepoResult<()>;
    /// Moves several children at once; returns how many rows changed.
    fn bulk_transfer(&self, ids: &[ChildId], group_id: Option<GroupId>) -> RepoResult<usize>;
    /// Locker symbols already taken in a group, optionally ignoring one child.
    fn used_locker_symbols(
        &self,
        group_id: GroupId,
        exclude: Option<ChildId>,
    ) -> RepoResult<Vec<String>>;

    /// Children currently assigned to `group_id`.
    fn list_children_by_group(&self, group_id: GroupId) -> RepoResult<Vec<Child>> {
        self.list_children(&ChildListQuery {
            group: GroupFilter::Only(group_id),
            search: None,
        })
    }

    /// Children not assigned to any group.
    fn list_children_without_group(&self) -> RepoResult<Vec<Child>> {
        self.list_children(&ChildListQuery {
            group: GroupFilter::Unassigned,
            search: None,
        })
    }
}

/// SQLite-backed children repository.
pub struct SqliteChildRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteChildRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn ensure_group(&self, group_id: Option<GroupId>) -> RepoResult<()> {
        match group_id {
            Some(id) if !row_exists(self.conn, "groups", "group_id", id)? => {
                Err(RepoError::NotFound { entity: "group", id })
            }
            _ => Ok(()),
        }
    }
}

impl ChildRepository for SqliteChildRepository<'_> {
    fn create_child(&self, child: &NewChild) -> RepoResult<ChildId> {
        child.validate()?;
        self.ensure_group(child.group_id)?;

        self.conn.execute(
            "INSERT INTO children (
                last_name,
                first_name,
                middle_name,
                birth_date,
                gender,
                group_id,
                enrollment_date,
                locker_symbol
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                child.last_name.trim(),
                child.first_name.trim(),
                clean_text(child.middle_name.as_deref()),
                date_to_db(child.birth_date),
                child.gender.as_code(),
                child.group_id,
                date_to_db(child.enrollment_date),
                clean_text(child.locker_symbol.as_deref()),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_child(&self, child: &Child) -> RepoResult<()> {
        child.validate()?;
        self.ensure_group(child.group_id)?;

        let changed = self.conn.execute(
            "UPDATE children
             SET
                last_name = ?1,
                first_name = ?2,
                middle_name = ?3,
                birth_date = ?4,
                gender = ?5,
                group_id = ?6,
                enrollment_date = ?7,
                locker_symbol = ?8
             WHERE child_id = ?9;",
            params![
                child.last_name.trim(),
                child.first_name.trim(),
                clean_text(child.middle_name.as_deref()),
                date_to_db(child.birth_date),
                child.gender.as_code(),
                child.group_id,
                date_to_db(child.enrollment_date),
                clean_text(child.locker_symbol.as_deref()),
                child.child_id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "child",
                id: child.child_id,
            });
        }

        Ok(())
    }

    fn get_child(&self, id: ChildId) -> RepoResult<Option<Child>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CHILD_SELECT_SQL} WHERE child_id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_child_row(row)?));
        }

        Ok(None)
    }

    fn list_children(&self, query: &ChildListQuery) -> RepoResult<Vec<Child>> {
        let mut sql = format!("{CHILD_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        match query.group {
            GroupFilter::Any => {}
            GroupFilter::Only(group_id) => {
                sql.push_str(" AND group_id = ?");
                bind_values.push(Value::Integer(group_id));
            }
            GroupFilter::Unassigned => sql.push_str(" AND group_id IS NULL"),
        }

        if let Some(term) = clean_text(query.search.as_deref()) {
            sql.push_str(" AND (last_name LIKE ? ESCAPE '\\' OR first_name LIKE ? ESCAPE '\\')");
            let pattern = like_pattern(term);
            bind_values.push(Value::Text(pattern.clone()));
            bind_values.push(Value::Text(pattern));
        }

        sql.push_str(" ORDER BY last_name ASC, first_name ASC, child_id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut children = Vec::new();
        while let Some(row) = rows.next()? {
            children.push(parse_child_row(row)?);
        }

        Ok(children)
    }

    fn delete_child(&self, id: ChildId) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM parent_child WHERE child_id = ?1;", [id])?;
        tx.execute("DELETE FROM medical_records WHERE child_id = ?1;", [id])?;
        let attendance_rows =
            tx.execute("DELETE FROM attendance_records WHERE child_id = ?1;", [id])?;
        let changed = tx.execute("DELETE FROM children WHERE child_id = ?1;", [id])?;

        if changed == 0 {
            // Dropping `tx` rolls back.
            return Err(RepoError::NotFound {
                entity: "child",
                id,
            });
        }

        tx.commit()?;
        info!(
            "event=child_delete module=registry status=ok child_id={} attendance_rows={}",
            id, attendance_rows
        );
        Ok(())
    }

    fn transfer_child(&self, id: ChildId, group_id: Option<GroupId>) -> RepoResult<()> {
        self.ensure_group(group_id)?;

        let changed = self.conn.execute(
            "UPDATE children SET group_id = ?1 WHERE child_id = ?2;",
            params![group_id, id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "child",
                id,
            });
        }

        Ok(())
    }

    fn bulk_transfer(&self, ids: &[ChildId], group_id: Option<GroupId>) -> RepoResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        self.ensure_group(group_id)?;

        let placeholders = vec!["?"; ids.len()].join(", ");
        let mut bind_values: Vec<Value> = Vec::with_capacity(ids.len() + 1);
        bind_values.push(group_id.map_or(Value::Null, Value::Integer));
        bind_values.extend(ids.iter().map(|id| Value::Integer(*id)));

        let changed = self.conn.execute(
            &format!("UPDATE children SET group_id = ? WHERE child_id IN ({placeholders});"),
            params_from_iter(bind_values),
        )?;

        Ok(changed)
    }

    fn used_locker_symbols(
        &self,
        group_id: GroupId,
        exclude: Option<ChildId>,
    ) -> RepoResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT locker_symbol
             FROM children
             WHERE group_id = ?1
               AND locker_symbol IS NOT NULL
               AND (?2 IS NULL OR child_id <> ?2)
             ORDER BY locker_symbol ASC;",
        )?;

        let mut rows = stmt.query(params![group_id, exclude])?;
        let mut symbols = Vec::new();
        while let Some(row) = rows.next()? {
            symbols.push(row.get(0)?);
        }

        Ok(symbols)
    }
}

pub(crate) fn parse_child_row(row: &Row<'_>) -> RepoResult<Child> {
    let gender_text: String = row.get("gender")?;
    let gender = gender_text.parse::<Gender>().map_err(|_| {
        RepoError::InvalidData(format!("invalid gender `{gender_text}` in children.gender"))
    })?;

    Ok(Child {
        child_id: row.get("child_id")?,
        last_name: row.get("last_name")?,
        first_name: row.get("first_name")?,
        middle_name: row.get("middle_name")?,
        birth_date: get_date(row, "birth_date")?,
        gender,
        group_id: row.get("group_id")?,
        enrollment_date: get_date(row, "enrollment_date")?,
        locker_symbol: row.get("locker_symbol")?,
        created_at: row.get("created_at")?,
    })
}
