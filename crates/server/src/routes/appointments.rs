use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use service::appointments::{Appointment, AppointmentFilter, AppointmentPatch, NewAppointment};
use tracing::info;

use crate::errors::JsonApiError;
use crate::state::ServerState;

/// 列出预约，按 hora 升序
#[utoipa::path(
    get, path = "/api/appointments", tag = "appointments",
    params(
        ("fecha" = Option<String>, Query, description = "Exact date filter, YYYY-MM-DD"),
        ("peluquero" = Option<String>, Query, description = "Exact stylist filter")
    ),
    responses((status = 200, description = "Appointments ordered by hora"))
)]
pub async fn list_appointments(
    State(state): State<ServerState>,
    Query(filter): Query<AppointmentFilter>,
) -> Result<Json<Vec<Appointment>>, JsonApiError> {
    let list = state.appointments.list(&filter).await?;
    info!(count = list.len(), "list appointments");
    Ok(Json(list))
}

/// 创建预约
#[utoipa::path(
    post, path = "/api/appointments", tag = "appointments",
    request_body = crate::openapi::NewAppointmentDoc,
    responses(
        (status = 201, description = "Created"),
        (status = 409, description = "Slot occupied"),
        (status = 422, description = "Validation Error")
    )
)]
pub async fn create_appointment(
    State(state): State<ServerState>,
    payload: Result<Json<NewAppointment>, JsonRejection>,
) -> Result<(StatusCode, Json<Appointment>), JsonApiError> {
    let Json(input) = payload?;
    let created = state.appointments.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// 部分更新预约：只应用请求中出现的字段
#[utoipa::path(
    patch, path = "/api/appointments/{id}", tag = "appointments",
    params(("id" = String, Path, description = "Appointment id")),
    request_body = crate::openapi::AppointmentPatchDoc,
    responses(
        (status = 200, description = "Updated"),
        (status = 404, description = "Not Found"),
        (status = 422, description = "Validation Error")
    )
)]
pub async fn update_appointment(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<AppointmentPatch>, JsonRejection>,
) -> Result<Json<Appointment>, JsonApiError> {
    let Json(patch) = payload?;
    let updated = state.appointments.update(&id, patch).await?;
    Ok(Json(updated))
}

/// 删除预约
#[utoipa::path(
    delete, path = "/api/appointments/{id}", tag = "appointments",
    params(("id" = String, Path, description = "Appointment id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_appointment(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, JsonApiError> {
    if state.appointments.delete(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some("appointment not found".into())))
    }
}
