//! # agro-core — Foundational Types for the Producer Registry
//!
//! This crate is the leaf of the workspace DAG. It defines the primitives
//! every other crate builds on: identifiers, national tax IDs, area
//! figures, the three entity records, and the validation error taxonomy.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `ProducerId`, `PropertyId`,
//!    `CropSeasonId`, `Cpf`, `Cnpj`, `Hectares`, no bare strings or floats
//!    cross a crate boundary where a validated type exists.
//!
//! 2. **Identification XOR by construction.** A stored [`Producer`] carries a
//!    single [`TaxId`], so "both CPF and CNPJ" and "neither" are
//!    unrepresentable once input has been validated.
//!
//! 3. **Literal user-facing messages.** Every [`ValidationError`] variant
//!    renders the exact message consumers assert on, plus a stable
//!    machine-readable rule code.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `agro-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod area;
pub mod error;
pub mod identity;
pub mod model;
pub mod tax_id;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use area::{to_hundredths, AreaField, Hectares, MAX_AREA_HECTARES};
pub use error::ValidationError;
pub use identity::{CropSeasonId, PropertyId, ProducerId, Resource};
pub use model::{
    CropSeason, CropSeasonDraft, Producer, ProducerDraft, Property, PropertyDraft,
};
pub use tax_id::{is_valid_cnpj, is_valid_cpf, Cnpj, Cpf, TaxId};
pub use temporal::Timestamp;
