use async_trait::async_trait;

use super::domain::{Appointment, AppointmentFilter, AppointmentPatch, NewAppointment};
use crate::errors::ServiceError;

/// Trait abstraction for appointment storage.
/// Implementations can be file-backed, database-backed, or remote KV.
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Filtered listing ordered by `hora`. Repairs legacy records as a side effect.
    async fn list(&self, filter: &AppointmentFilter) -> Result<Vec<Appointment>, ServiceError>;
    async fn create(&self, input: NewAppointment) -> Result<Appointment, ServiceError>;
    async fn update(&self, id: &str, patch: AppointmentPatch) -> Result<Appointment, ServiceError>;
    /// Returns whether a record with `id` existed.
    async fn delete(&self, id: &str) -> Result<bool, ServiceError>;
}
