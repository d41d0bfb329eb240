use crate::errors::WorkflowError;
use crate::step::{StepContext, StepForm};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use wizard::{DraftStore, ValidationErrors};

/// Segundo paso: rango de fechas y estado de presupuesto del itinerario.
pub struct DatosStep;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatosPayload {
  pub fecha_inicio: NaiveDate,
  pub fecha_fin: NaiveDate,
  /// Id del estado de presupuesto (catálogo del backend original).
  pub estado_presupuesto_id: u32,
}

impl DatosPayload {
  pub fn recover_from(payload: &JsonValue) -> Result<Self, WorkflowError> {
    let p: DatosPayload = serde_json::from_value(payload.clone())?;
    Ok(p)
  }
}

impl StepForm for DatosStep {
  fn name(&self) -> &str {
    "datos"
  }

  fn titulo(&self) -> &str {
    "Datos del itinerario"
  }

  fn validate(&self, _ctx: &StepContext, _store: &DraftStore, input: &JsonValue) -> Result<(), WorkflowError> {
    let datos: DatosPayload = serde_json::from_value(input.clone())?;
    let mut errores = ValidationErrors::new();
    if datos.fecha_fin <= datos.fecha_inicio {
      errores.add("fecha_fin",
                  format!("La fecha de fin ({}) debe ser posterior a la de inicio ({})",
                          datos.fecha_fin,
                          datos.fecha_inicio));
    }
    errores.into_result().map_err(WorkflowError::Wizard)
  }

  fn slice(&self, _ctx: &StepContext, _store: &DraftStore, input: &JsonValue) -> Result<JsonValue, WorkflowError> {
    // La normalización es la identidad: el input ya viene tipado
    let datos: DatosPayload = serde_json::from_value(input.clone())?;
    Ok(serde_json::to_value(datos)?)
  }
}
