use once_cell::sync::OnceCell;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use configs::SalonConfig;

use super::phone::normalize_phone;
use crate::errors::ServiceError;

static DATE_RE: OnceCell<Regex> = OnceCell::new();
static TIME_RE: OnceCell<Regex> = OnceCell::new();

/// Records without a time sort as if booked at midnight.
pub const DEFAULT_HORA: &str = "00:00";

/// Shortest phone input accepted on create, in characters.
pub const MIN_TELEFONO_LEN: usize = 3;

/// Booking lifecycle flag.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Estado {
    #[default]
    Pendiente,
    Pagado,
}

/// An appointment as returned by the API. Every field is always present.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Appointment {
    pub id: String,
    pub nombre: String,
    pub telefono: String,
    pub fecha: String,
    pub hora: String,
    pub peluquero: String,
    pub estado: Estado,
}

/// An appointment as it sits in the data file.
///
/// Older files may lack `id`, `hora`, `peluquero` or `estado`; those stay
/// absent on disk until the listing pass repairs them. Unknown keys survive
/// a rewrite untouched.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct StoredAppointment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub telefono: String,
    #[serde(default)]
    pub fecha: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hora: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peluquero: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estado: Option<Estado>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StoredAppointment {
    /// Fill in whatever a legacy record is missing. Returns whether anything changed.
    pub fn heal(&mut self, default_stylist: &str) -> bool {
        let mut changed = false;
        if self.estado.is_none() {
            self.estado = Some(Estado::Pendiente);
            changed = true;
        }
        if self.id.is_none() {
            self.id = Some(new_id());
            changed = true;
        }
        if self.peluquero.as_deref().map_or(true, str::is_empty) {
            self.peluquero = Some(default_stylist.to_string());
            changed = true;
        }
        changed
    }

    pub fn sort_key(&self) -> &str {
        self.hora.as_deref().unwrap_or(DEFAULT_HORA)
    }

    pub fn occupies(&self, fecha: &str, hora: &str, peluquero: &str) -> bool {
        self.fecha == fecha && self.hora.as_deref() == Some(hora) && self.peluquero.as_deref() == Some(peluquero)
    }

    /// API view; absent fields take their documented defaults.
    pub fn to_appointment(&self, default_stylist: &str) -> Appointment {
        Appointment {
            id: self.id.clone().unwrap_or_default(),
            nombre: self.nombre.clone(),
            telefono: self.telefono.clone(),
            fecha: self.fecha.clone(),
            hora: self.hora.clone().unwrap_or_default(),
            peluquero: self
                .peluquero
                .clone()
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| default_stylist.to_string()),
            estado: self.estado.unwrap_or_default(),
        }
    }
}

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Create payload.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NewAppointment {
    pub nombre: String,
    pub telefono: String,
    pub fecha: String,
    pub hora: String,
    #[serde(default)]
    pub peluquero: Option<String>,
}

impl NewAppointment {
    pub fn validate(&self, salon: &SalonConfig) -> Result<(), ServiceError> {
        validate_nombre(&self.nombre)?;
        if self.telefono.chars().count() < MIN_TELEFONO_LEN {
            return Err(ServiceError::Validation(format!(
                "telefono must be at least {MIN_TELEFONO_LEN} characters"
            )));
        }
        validate_fecha(&self.fecha)?;
        validate_hora(&self.hora)?;
        if let Some(p) = self.peluquero.as_deref().filter(|p| !p.is_empty()) {
            validate_peluquero(p, salon)?;
        }
        Ok(())
    }

    /// Stylist the booking lands on once the default is applied.
    pub fn resolved_peluquero<'a>(&'a self, salon: &'a SalonConfig) -> &'a str {
        match self.peluquero.as_deref() {
            Some(p) if !p.is_empty() => p,
            _ => salon.default_stylist(),
        }
    }

    /// Build the stored record with a fresh id, pending status and normalized phone.
    pub fn into_record(self, salon: &SalonConfig) -> StoredAppointment {
        let peluquero = self.resolved_peluquero(salon).to_string();
        StoredAppointment {
            id: Some(new_id()),
            nombre: self.nombre,
            telefono: normalize_phone(&self.telefono),
            fecha: self.fecha,
            hora: Some(self.hora),
            peluquero: Some(peluquero),
            estado: Some(Estado::Pendiente),
            extra: Map::new(),
        }
    }
}

/// Partial update payload: only fields that are present get applied.
/// `id` is not part of it and cannot change.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct AppointmentPatch {
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default)]
    pub telefono: Option<String>,
    #[serde(default)]
    pub fecha: Option<String>,
    #[serde(default)]
    pub hora: Option<String>,
    #[serde(default)]
    pub peluquero: Option<String>,
    #[serde(default)]
    pub estado: Option<Estado>,
}

impl AppointmentPatch {
    pub fn validate(&self, salon: &SalonConfig) -> Result<(), ServiceError> {
        if let Some(n) = &self.nombre {
            validate_nombre(n)?;
        }
        if let Some(f) = &self.fecha {
            validate_fecha(f)?;
        }
        if let Some(h) = &self.hora {
            validate_hora(h)?;
        }
        if let Some(p) = &self.peluquero {
            validate_peluquero(p, salon)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn apply(self, rec: &mut StoredAppointment) {
        if let Some(n) = self.nombre {
            rec.nombre = n;
        }
        if let Some(t) = self.telefono {
            rec.telefono = normalize_phone(&t);
        }
        if let Some(f) = self.fecha {
            rec.fecha = f;
        }
        if let Some(h) = self.hora {
            rec.hora = Some(h);
        }
        if let Some(p) = self.peluquero {
            rec.peluquero = Some(p);
        }
        if let Some(e) = self.estado {
            rec.estado = Some(e);
        }
    }
}

/// Query filters for listing; empty strings count as absent.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AppointmentFilter {
    #[serde(default)]
    pub fecha: Option<String>,
    #[serde(default)]
    pub peluquero: Option<String>,
}

impl AppointmentFilter {
    pub fn matches(&self, rec: &StoredAppointment) -> bool {
        let fecha_ok = match self.fecha.as_deref() {
            Some(f) if !f.is_empty() => rec.fecha == f,
            _ => true,
        };
        let peluquero_ok = match self.peluquero.as_deref() {
            Some(p) if !p.is_empty() => rec.peluquero.as_deref() == Some(p),
            _ => true,
        };
        fecha_ok && peluquero_ok
    }
}

fn validate_nombre(nombre: &str) -> Result<(), ServiceError> {
    if nombre.is_empty() {
        return Err(ServiceError::Validation("nombre must not be empty".into()));
    }
    Ok(())
}

pub fn validate_fecha(fecha: &str) -> Result<(), ServiceError> {
    let re = DATE_RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date regex"));
    if !re.is_match(fecha) {
        return Err(ServiceError::Validation(format!("fecha must match YYYY-MM-DD, got {fecha:?}")));
    }
    Ok(())
}

pub fn validate_hora(hora: &str) -> Result<(), ServiceError> {
    let re = TIME_RE.get_or_init(|| Regex::new(r"^\d{2}:\d{2}$").expect("valid time regex"));
    if !re.is_match(hora) {
        return Err(ServiceError::Validation(format!("hora must match HH:MM, got {hora:?}")));
    }
    Ok(())
}

fn validate_peluquero(peluquero: &str, salon: &SalonConfig) -> Result<(), ServiceError> {
    if !salon.is_stylist(peluquero) {
        return Err(ServiceError::Validation(format!("unknown peluquero {peluquero:?}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn salon() -> SalonConfig {
        SalonConfig::with_stylists(["Diego", "Jose Luís"]).expect("salon config")
    }

    fn input() -> NewAppointment {
        NewAppointment {
            nombre: "Lucía".into(),
            telefono: "611 222 333".into(),
            fecha: "2024-05-10".into(),
            hora: "10:00".into(),
            peluquero: None,
        }
    }

    #[test]
    fn create_validation_rules() {
        let salon = salon();
        assert!(input().validate(&salon).is_ok());

        let cases = [
            NewAppointment { nombre: "".into(), ..input() },
            NewAppointment { telefono: "61".into(), ..input() },
            NewAppointment { fecha: "10/05/2024".into(), ..input() },
            NewAppointment { fecha: "2024-5-10".into(), ..input() },
            NewAppointment { hora: "9:00".into(), ..input() },
            NewAppointment { hora: "10:00:00".into(), ..input() },
            NewAppointment { peluquero: Some("Ana".into()), ..input() },
        ];
        for bad in cases {
            assert!(matches!(bad.validate(&salon), Err(ServiceError::Validation(_))), "{bad:?}");
        }

        let empty_stylist = NewAppointment { peluquero: Some(String::new()), ..input() };
        assert!(empty_stylist.validate(&salon).is_ok());
    }

    #[test]
    fn into_record_applies_defaults() {
        let salon = salon();
        let rec = input().into_record(&salon);
        assert_eq!(rec.peluquero.as_deref(), Some("Diego"));
        assert_eq!(rec.estado, Some(Estado::Pendiente));
        assert_eq!(rec.telefono, "34611222333");
        assert!(rec.id.as_deref().is_some_and(|id| !id.is_empty()));

        let other = NewAppointment { peluquero: Some("Jose Luís".into()), ..input() }.into_record(&salon);
        assert_eq!(other.peluquero.as_deref(), Some("Jose Luís"));
        assert_ne!(rec.id, other.id);
    }

    #[test]
    fn heal_fills_legacy_fields_once() -> Result<(), anyhow::Error> {
        let mut rec: StoredAppointment = serde_json::from_value(json!({
            "nombre": "Ana", "telefono": "34600", "fecha": "2024-05-10", "hora": "09:00", "peluquero": ""
        }))?;
        assert!(rec.heal("Diego"));
        assert_eq!(rec.estado, Some(Estado::Pendiente));
        assert_eq!(rec.peluquero.as_deref(), Some("Diego"));
        assert!(rec.id.is_some());
        assert!(!rec.heal("Diego"));
        Ok(())
    }

    #[test]
    fn stored_record_keeps_unknown_and_absent_keys() -> Result<(), anyhow::Error> {
        let raw = json!({ "nombre": "Ana", "telefono": "34600", "fecha": "2024-05-10", "notas": "tinte" });
        let rec: StoredAppointment = serde_json::from_value(raw.clone())?;
        assert_eq!(rec.sort_key(), DEFAULT_HORA);
        assert_eq!(serde_json::to_value(&rec)?, raw);
        Ok(())
    }

    #[test]
    fn estado_rejects_unknown_values() {
        assert!(serde_json::from_value::<Estado>(json!("Pagado")).is_ok());
        assert!(serde_json::from_value::<Estado>(json!("Cancelado")).is_err());
    }

    #[test]
    fn patch_applies_only_present_fields() -> Result<(), anyhow::Error> {
        let salon = salon();
        let mut rec = input().into_record(&salon);
        let before = rec.clone();

        let patch: AppointmentPatch = serde_json::from_value(json!({
            "telefono": "+34 699 000 111", "estado": "Pagado", "id": "ignored"
        }))?;
        patch.validate(&salon)?;
        patch.apply(&mut rec);

        assert_eq!(rec.telefono, "34699000111");
        assert_eq!(rec.estado, Some(Estado::Pagado));
        assert_eq!(rec.id, before.id);
        assert_eq!(rec.nombre, before.nombre);
        assert_eq!(rec.hora, before.hora);
        Ok(())
    }

    #[test]
    fn patch_validation_rules() {
        let salon = salon();
        let bad = [
            AppointmentPatch { fecha: Some("mañana".into()), ..Default::default() },
            AppointmentPatch { hora: Some("25".into()), ..Default::default() },
            AppointmentPatch { peluquero: Some("Ana".into()), ..Default::default() },
            AppointmentPatch { nombre: Some(String::new()), ..Default::default() },
        ];
        for p in bad {
            assert!(matches!(p.validate(&salon), Err(ServiceError::Validation(_))), "{p:?}");
        }
        assert!(AppointmentPatch::default().is_empty());
    }

    #[test]
    fn filter_ignores_empty_values() {
        let salon = salon();
        let rec = input().into_record(&salon);
        assert!(AppointmentFilter::default().matches(&rec));
        assert!(AppointmentFilter { fecha: Some(String::new()), peluquero: Some(String::new()) }.matches(&rec));
        assert!(AppointmentFilter { fecha: Some("2024-05-10".into()), peluquero: Some("Diego".into()) }.matches(&rec));
        assert!(!AppointmentFilter { fecha: Some("2024-05-10".into()), peluquero: Some("Jose Luís".into()) }.matches(&rec));
        assert!(!AppointmentFilter { fecha: Some("2024-05-11".into()), peluquero: None }.matches(&rec));
    }
}
