use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub enum EstadoDoc { Pendiente, Pagado }

#[derive(ToSchema)]
pub struct AppointmentDoc {
    pub id: String,
    pub nombre: String,
    pub telefono: String,
    /// YYYY-MM-DD
    pub fecha: String,
    /// HH:MM
    pub hora: String,
    pub peluquero: String,
    pub estado: EstadoDoc,
}

#[derive(ToSchema)]
pub struct NewAppointmentDoc {
    pub nombre: String,
    /// At least 3 characters; stored as digits with the 34 prefix
    pub telefono: String,
    /// YYYY-MM-DD
    pub fecha: String,
    /// HH:MM
    pub hora: String,
    /// Defaults to the first configured stylist
    pub peluquero: Option<String>,
}

#[derive(ToSchema)]
pub struct AppointmentPatchDoc {
    pub nombre: Option<String>,
    pub telefono: Option<String>,
    pub fecha: Option<String>,
    pub hora: Option<String>,
    pub peluquero: Option<String>,
    pub estado: Option<EstadoDoc>,
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Calendario Profesional"),
    paths(
        crate::routes::health,
        crate::routes::salon::get_config,
        crate::routes::salon::get_stylists,
        crate::routes::appointments::list_appointments,
        crate::routes::appointments::create_appointment,
        crate::routes::appointments::update_appointment,
        crate::routes::appointments::delete_appointment,
    ),
    components(
        schemas(
            HealthResponse,
            EstadoDoc,
            AppointmentDoc,
            NewAppointmentDoc,
            AppointmentPatchDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "salon"),
        (name = "appointments")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_booking_paths() {
        let doc = ApiDoc::openapi();
        for path in ["/api/appointments", "/api/appointments/{id}", "/api/stylists", "/api/config", "/health"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
