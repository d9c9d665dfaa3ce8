//! Domain model for the kindergarten registry.
//!
//! # Responsibility
//! - Define canonical records for children, groups, staff, guardians,
//!   attendance and medical cards.
//! - Own field-level validation shared by every write path.
//!
//! # Invariants
//! - Entities are identified by SQLite row ids, never reused.
//! - Calendar dates are `NaiveDate`; timestamps are epoch milliseconds.

pub mod attendance;
pub mod child;
pub mod group;
pub mod medical;
pub mod person;
pub mod validation;

pub type ChildId = i64;
pub type GroupId = i64;
pub type TeacherId = i64;
pub type ParentId = i64;
pub type RecordId = i64;
