//! Hairdresser appointment bookings.
//!
//! - `domain`: wire and storage types plus field validation
//! - `phone`: phone number normalization
//! - `repository`: storage-agnostic trait used by the HTTP layer
//! - `store`: JSON file implementation of the repository

pub mod domain;
pub mod phone;
pub mod repository;
pub mod store;

pub use domain::{Appointment, AppointmentFilter, AppointmentPatch, Estado, NewAppointment, StoredAppointment};
pub use phone::normalize_phone;
pub use repository::AppointmentRepository;
pub use store::AppointmentStore;
