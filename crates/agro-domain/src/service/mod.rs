//! # Domain Services
//!
//! One service per entity. Every public operation is wrapped in an
//! [`Operation`] that times it and emits its outcome record:
//!
//! - success: one CRUD record (or DATA_ACCESS for sensitive lists), plus a
//!   PERFORMANCE record when the call was slow or is a list;
//! - failure: one BUSINESS_ERROR record whose details carry `duration`.

mod crop_season;
mod producer;
mod property;

use std::time::{Duration, Instant};

use agro_audit::{AuditTrail, BusinessErrorEvent, CrudAction, CrudEvent, PerformanceEvent};
use agro_core::Resource;
use serde_json::{json, Value};

use crate::context::RequestContext;
use crate::error::DomainError;

pub use crop_season::CropSeasonService;
pub use producer::ProducerService;
pub use property::PropertyService;

/// Tunables shared by all services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceSettings {
    /// Mutations slower than this emit a PERFORMANCE record.
    pub slow_operation: Duration,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            slow_operation: Duration::from_millis(1000),
        }
    }
}

impl ServiceSettings {
    pub fn with_slow_operation_ms(ms: u64) -> Self {
        Self {
            slow_operation: Duration::from_millis(ms),
        }
    }
}

// ---------------------------------------------------------------------------
// Operation
// ---------------------------------------------------------------------------

/// Timing and outcome recording for one service call.
pub(crate) struct Operation<'a> {
    audit: &'a AuditTrail,
    settings: &'a ServiceSettings,
    ctx: &'a RequestContext,
    action: CrudAction,
    resource: Resource,
    started: Instant,
}

impl<'a> Operation<'a> {
    pub(crate) fn start(
        audit: &'a AuditTrail,
        settings: &'a ServiceSettings,
        ctx: &'a RequestContext,
        action: CrudAction,
        resource: Resource,
    ) -> Self {
        Self {
            audit,
            settings,
            ctx,
            action,
            resource,
            started: Instant::now(),
        }
    }

    pub(crate) fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    pub(crate) fn ctx(&self) -> &RequestContext {
        self.ctx
    }

    pub(crate) fn audit(&self) -> &AuditTrail {
        self.audit
    }

    /// Emit a PERFORMANCE record for `operation` unconditionally.
    pub(crate) fn performance(&self, operation: &str, details: Option<Value>) {
        let mut event =
            PerformanceEvent::new(operation, self.elapsed_ms()).with_resource(self.resource.as_str());
        if let Some(details) = details {
            event = event.with_details(details);
        }
        self.audit.log_performance(event);
    }

    fn crud(&self, resource_id: Option<String>, details: Option<Value>) {
        let mut event = CrudEvent::new(self.ctx.actor(), self.action, self.resource.as_str())
            .with_ip(self.ctx.ip.clone());
        if let Some(id) = resource_id {
            event = event.with_resource_id(id);
        }
        if let Some(details) = details {
            event = event.with_details(details);
        }
        self.audit.log_crud(event);
    }

    fn fail(&self, err: &DomainError) {
        tracing::warn!(
            action = self.action.as_str(),
            resource = self.resource.as_str(),
            code = err.code(),
            "operation failed"
        );
        self.audit.log_business_error(
            BusinessErrorEvent::new(self.action.as_str(), self.resource.as_str(), err.to_string())
                .with_user_id(self.ctx.actor())
                .with_ip(self.ctx.ip.clone())
                .with_details(json!({
                    "code": err.code(),
                    "duration": self.elapsed_ms(),
                })),
        );
    }

    /// Record the outcome of a single-record call: one CRUD record on
    /// success (described by `describe`), one BUSINESS_ERROR on failure.
    pub(crate) fn finish<T>(
        self,
        result: Result<T, DomainError>,
        describe: impl FnOnce(&T) -> (Option<String>, Option<Value>),
    ) -> Result<T, DomainError> {
        match &result {
            Ok(value) => {
                let (resource_id, details) = describe(value);
                self.crud(resource_id, details);
                if self.started.elapsed() > self.settings.slow_operation {
                    let operation = format!("{}_{}", self.action.as_str(), self.resource.as_str());
                    self.performance(&operation, None);
                }
            }
            Err(err) => self.fail(err),
        }
        result
    }

    /// Record the outcome of a list call. `on_success` emits the
    /// category-specific record; a PERFORMANCE record named `operation`
    /// always follows a success.
    pub(crate) fn finish_list<T>(
        self,
        operation: &str,
        result: Result<Vec<T>, DomainError>,
        on_success: impl FnOnce(&Self, usize),
    ) -> Result<Vec<T>, DomainError> {
        match &result {
            Ok(items) => {
                on_success(&self, items.len());
                self.performance(operation, Some(json!({ "count": items.len() })));
            }
            Err(err) => self.fail(err),
        }
        result
    }

    /// Emit a CRUD record from inside a list callback.
    pub(crate) fn crud_with(&self, details: Value) {
        self.crud(None, Some(details));
    }
}
