use crate::errors::WorkflowError;
use crate::flows::itinerario_flow::{steps::ProgramasPayload, PASO_PROGRAMAS};
use crate::step::{StepContext, StepForm};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;
use wizard::{DraftStore, ValidationErrors};

/// Quinto paso: recojos asignados a los programas agendados. La lista puede
/// quedar vacía (no todo programa necesita transporte de la agencia).
pub struct TransporteStep;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TransporteInput {
  recojos: Vec<RecojoSeleccion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RecojoSeleccion {
  /// Posición de la entrada en el slice de programas.
  programa_idx: usize,
  transporte_id: Uuid,
  punto_recojo: String,
  hora_recojo: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecojoEntrada {
  pub programa_idx: usize,
  pub programa_nombre: String,
  pub transporte_id: Uuid,
  pub empresa: String,
  pub punto_recojo: String,
  pub hora_recojo: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportePayload {
  pub recojos: Vec<RecojoEntrada>,
}

impl TransportePayload {
  pub fn recover_from(payload: &JsonValue) -> Result<Self, WorkflowError> {
    let p: TransportePayload = serde_json::from_value(payload.clone())?;
    Ok(p)
  }
}

impl StepForm for TransporteStep {
  fn name(&self) -> &str {
    "transporte"
  }

  fn titulo(&self) -> &str {
    "Transporte"
  }

  fn validate(&self, ctx: &StepContext, store: &DraftStore, input: &JsonValue) -> Result<(), WorkflowError> {
    let parsed: TransporteInput = serde_json::from_value(input.clone())?;
    let programas: ProgramasPayload =
      ctx.get_typed_slice(store, PASO_PROGRAMAS)?
         .ok_or_else(|| WorkflowError::Validation("Complete primero los programas del itinerario".to_string()))?;

    let mut errores = ValidationErrors::new();
    for (i, recojo) in parsed.recojos.iter().enumerate() {
      if recojo.programa_idx >= programas.entradas.len() {
        errores.add(format!("recojos[{}].programa_idx", i),
                    format!("El recojo referencia un programa inexistente (#{})", recojo.programa_idx + 1));
      }
      if ctx.domain_repo.get_transporte(&recojo.transporte_id)?.is_none() {
        errores.add(format!("recojos[{}].transporte_id", i),
                    format!("El transporte {} no existe", recojo.transporte_id));
      }
      if recojo.punto_recojo.trim().is_empty() {
        errores.add(format!("recojos[{}].punto_recojo", i), "El punto de recojo es obligatorio");
      }
    }
    errores.into_result().map_err(WorkflowError::Wizard)
  }

  fn slice(&self, ctx: &StepContext, store: &DraftStore, input: &JsonValue) -> Result<JsonValue, WorkflowError> {
    let parsed: TransporteInput = serde_json::from_value(input.clone())?;
    let programas: ProgramasPayload =
      ctx.get_typed_slice(store, PASO_PROGRAMAS)?
         .ok_or_else(|| WorkflowError::Validation("Complete primero los programas del itinerario".to_string()))?;

    let mut recojos = Vec::with_capacity(parsed.recojos.len());
    for sel in parsed.recojos {
      let transporte =
        ctx.domain_repo
           .get_transporte(&sel.transporte_id)?
           .ok_or_else(|| viaje_domain::DomainError::NoEncontrado(format!("Transporte {}", sel.transporte_id)))?;
      let programa_nombre = programas.entradas
                                     .get(sel.programa_idx)
                                     .map(|e| e.nombre.clone())
                                     .unwrap_or_else(|| "No especificado".to_string());
      recojos.push(RecojoEntrada { programa_idx: sel.programa_idx,
                                   programa_nombre,
                                   transporte_id: sel.transporte_id,
                                   empresa: transporte.empresa().to_string(),
                                   punto_recojo: sel.punto_recojo.trim().to_string(),
                                   hora_recojo: sel.hora_recojo });
    }
    Ok(serde_json::to_value(TransportePayload { recojos })?)
  }
}
