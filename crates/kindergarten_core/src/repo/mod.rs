//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define data access contracts per table.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Write paths call the model `validate()` before SQL mutations.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.
//! - Lookups by id return `Option`; absence is not an error.

pub mod attendance_repo;
pub mod child_repo;
mod codec;
pub mod error;
pub mod group_repo;
pub mod medical_repo;
pub mod parent_repo;
pub mod teacher_repo;
