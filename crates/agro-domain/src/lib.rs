//! # agro-domain — Registry Domain Layer
//!
//! Orchestrates validation, ownership resolution, persistence and auditing
//! for the three-level entity tree Producer → Property → CropSeason.
//!
//! ## Architecture
//!
//! - **Repositories** (`repository.rs`): async, object-safe persistence
//!   ports. The domain never depends on a concrete store.
//!
//! - **Invariants** (`invariants.rs`): area-sum, planted-capacity and
//!   date-order checks. Area checks emit one VALIDATION record each.
//!
//! - **Ownership** (`ownership.rs`): owner-scoped lookups that resolve
//!   foreign records as NotFound, plus the CPF XOR CNPJ identification
//!   check.
//!
//! - **Services** (`service/`): one service per entity. Each mutation
//!   emits exactly one CRUD record on success or one BUSINESS_ERROR record
//!   on failure.
//!
//! - **Memory adapter** (`memory.rs`): a `parking_lot`-backed store
//!   implementing all three repositories.
//!
//! ## Crate Policy
//!
//! - Ordering inside an operation is fixed: ownership resolution, field
//!   rules, invariants, write, audit.
//! - Audit emission never fails an operation.
//! - The planted-area aggregate check takes no lock across requests.

pub mod context;
pub mod error;
pub mod invariants;
pub mod memory;
pub mod ownership;
pub mod repository;
pub mod service;

pub use context::RequestContext;
pub use error::{DomainError, RepositoryError, UniqueField};
pub use invariants::{check_areas, check_planted_capacity, validate_date_order, AreaInvariantChecker};
pub use memory::MemoryStore;
pub use ownership::{validate_identification, OwnershipResolver};
pub use repository::{CropSeasonRepository, PropertyRepository, ProducerRepository};
pub use service::{CropSeasonService, PropertyService, ProducerService, ServiceSettings};
