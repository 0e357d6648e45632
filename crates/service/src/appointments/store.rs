use std::{path::PathBuf, sync::Arc};

use async_trait::async_trait;
use configs::SalonConfig;
use tracing::{debug, info, warn};

use super::domain::{Appointment, AppointmentFilter, AppointmentPatch, NewAppointment, StoredAppointment};
use super::repository::AppointmentRepository;
use crate::errors::ServiceError;
use crate::storage::json_file_store::JsonFileStore;

/// File store for appointments: the whole collection lives in one JSON array
/// and every mutation rewrites it.
pub struct AppointmentStore {
    store: JsonFileStore<StoredAppointment>,
    salon: SalonConfig,
}

impl AppointmentStore {
    /// Open the data file, creating an empty collection if it does not exist.
    pub async fn new<P: Into<PathBuf>>(path: P, salon: SalonConfig) -> Result<Arc<Self>, ServiceError> {
        let store = JsonFileStore::new(path).await?;
        Ok(Arc::new(Self { store, salon }))
    }

    /// Repair legacy records (missing id, estado or peluquero) and persist the
    /// collection if anything changed. Returns the repaired collection.
    pub async fn heal(&self) -> Result<Vec<StoredAppointment>, ServiceError> {
        let default_stylist = self.salon.default_stylist();
        self.store
            .update(|items| {
                let repaired = items.iter_mut().map(|c| c.heal(default_stylist)).filter(|&changed| changed).count();
                if repaired > 0 {
                    info!(event = "appointments_healed", repaired, "repaired legacy appointment records");
                }
                Ok((items.clone(), repaired > 0))
            })
            .await
    }

    pub async fn list(&self, filter: &AppointmentFilter) -> Result<Vec<Appointment>, ServiceError> {
        let mut items: Vec<StoredAppointment> = self.heal().await?.into_iter().filter(|c| filter.matches(c)).collect();
        items.sort_by(|a, b| a.sort_key().cmp(b.sort_key()));
        debug!(count = items.len(), fecha = ?filter.fecha, peluquero = ?filter.peluquero, "list appointments");
        let default_stylist = self.salon.default_stylist();
        Ok(items.iter().map(|c| c.to_appointment(default_stylist)).collect())
    }

    pub async fn create(&self, input: NewAppointment) -> Result<Appointment, ServiceError> {
        input.validate(&self.salon)?;
        let salon = &self.salon;
        self.store
            .update(|items| {
                let peluquero = input.resolved_peluquero(salon);
                if items.iter().any(|c| c.occupies(&input.fecha, &input.hora, peluquero)) {
                    warn!(event = "slot_conflict", fecha = %input.fecha, hora = %input.hora, %peluquero, "slot occupied");
                    return Err(ServiceError::Conflict("slot occupied".into()));
                }
                let rec = input.into_record(salon);
                let created = rec.to_appointment(salon.default_stylist());
                items.push(rec);
                info!(
                    event = "appointment_created",
                    id = %created.id,
                    fecha = %created.fecha,
                    hora = %created.hora,
                    peluquero = %created.peluquero,
                    "created appointment"
                );
                Ok((created, true))
            })
            .await
    }

    pub async fn update(&self, id: &str, patch: AppointmentPatch) -> Result<Appointment, ServiceError> {
        patch.validate(&self.salon)?;
        let default_stylist = self.salon.default_stylist();
        self.store
            .update(|items| {
                let rec = items
                    .iter_mut()
                    .find(|c| c.id.as_deref() == Some(id))
                    .ok_or_else(|| ServiceError::not_found("appointment"))?;
                let dirty = !patch.is_empty();
                patch.apply(rec);
                info!(event = "appointment_updated", %id, "updated appointment");
                Ok((rec.to_appointment(default_stylist), dirty))
            })
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<bool, ServiceError> {
        self.store
            .update(|items| {
                let before = items.len();
                items.retain(|c| c.id.as_deref() != Some(id));
                let existed = items.len() != before;
                if existed {
                    info!(event = "appointment_deleted", %id, "deleted appointment");
                }
                Ok((existed, existed))
            })
            .await
    }
}

#[async_trait]
impl AppointmentRepository for AppointmentStore {
    async fn list(&self, filter: &AppointmentFilter) -> Result<Vec<Appointment>, ServiceError> { self.list(filter).await }
    async fn create(&self, input: NewAppointment) -> Result<Appointment, ServiceError> { self.create(input).await }
    async fn update(&self, id: &str, patch: AppointmentPatch) -> Result<Appointment, ServiceError> { self.update(id, patch).await }
    async fn delete(&self, id: &str) -> Result<bool, ServiceError> { self.delete(id).await }
}
