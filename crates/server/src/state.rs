use std::sync::Arc;

use configs::SalonConfig;
use service::appointments::AppointmentRepository;

/// Shared handler state: the booking repository and the salon configuration
/// loaded at startup.
#[derive(Clone)]
pub struct ServerState {
    pub appointments: Arc<dyn AppointmentRepository>,
    pub salon: Arc<SalonConfig>,
}
