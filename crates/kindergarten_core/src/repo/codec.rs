//! Column encoding helpers shared by SQLite repositories.

use crate::repo::error::{RepoError, RepoResult};
use chrono::NaiveDate;
use rusqlite::{Connection, Row};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) const NOW_MS_SQL: &str = "(strftime('%s', 'now') * 1000)";

pub(crate) fn date_to_db(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn parse_date(value: &str, column: &str) -> RepoResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| RepoError::InvalidData(format!("invalid date `{value}` in {column}")))
}

pub(crate) fn get_date(row: &Row<'_>, column: &str) -> RepoResult<NaiveDate> {
    let value: String = row.get(column)?;
    parse_date(&value, column)
}

pub(crate) fn get_optional_date(row: &Row<'_>, column: &str) -> RepoResult<Option<NaiveDate>> {
    match row.get::<_, Option<String>>(column)? {
        Some(value) => Ok(Some(parse_date(&value, column)?)),
        None => Ok(None),
    }
}

/// Builds a case-insensitive `LIKE` pattern with `\` as escape character.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.trim().chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Returns whether `table` has a row with `id_column = id`.
pub(crate) fn row_exists(
    conn: &Connection,
    table: &'static str,
    id_column: &'static str,
    id: i64,
) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE {id_column} = ?1);"),
        [id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

/// Normalizes optional free text: trims and maps blank to `None`.
pub(crate) fn clean_text(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
