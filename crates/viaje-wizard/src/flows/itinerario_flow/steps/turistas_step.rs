use crate::errors::WorkflowError;
use crate::step::{StepContext, StepForm};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;
use wizard::{DraftStore, ValidationErrors};

/// Tercer paso: selección de los turistas del grupo.
pub struct TuristasStep;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TuristasInput {
  turista_ids: Vec<Uuid>,
}

/// Entrada normalizada: id más los datos que el resumen muestra.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuristaEntrada {
  pub turista_id: Uuid,
  pub nombre_completo: String,
  pub documento: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuristasPayload {
  pub turistas: Vec<TuristaEntrada>,
}

impl TuristasPayload {
  pub fn recover_from(payload: &JsonValue) -> Result<Self, WorkflowError> {
    let p: TuristasPayload = serde_json::from_value(payload.clone())?;
    Ok(p)
  }
}

impl StepForm for TuristasStep {
  fn name(&self) -> &str {
    "turistas"
  }

  fn titulo(&self) -> &str {
    "Turistas"
  }

  fn validate(&self, ctx: &StepContext, _store: &DraftStore, input: &JsonValue) -> Result<(), WorkflowError> {
    let parsed: TuristasInput = serde_json::from_value(input.clone())?;
    let mut errores = ValidationErrors::new();
    if parsed.turista_ids.is_empty() {
      errores.add("turista_ids", "Seleccione al menos un turista");
    }
    for (i, id) in parsed.turista_ids.iter().enumerate() {
      if parsed.turista_ids[..i].contains(id) {
        errores.add(format!("turista_ids[{}]", i), "Turista repetido en la selección");
        continue;
      }
      match ctx.domain_repo.get_turista(id)? {
        None => errores.add(format!("turista_ids[{}]", i), format!("El turista {} no existe", id)),
        Some(t) if !t.es_activo() => {
          errores.add(format!("turista_ids[{}]", i),
                      format!("El turista '{}' está inactivo", t.nombre_completo()));
        }
        Some(_) => {}
      }
    }
    errores.into_result().map_err(WorkflowError::Wizard)
  }

  fn slice(&self, ctx: &StepContext, _store: &DraftStore, input: &JsonValue) -> Result<JsonValue, WorkflowError> {
    let parsed: TuristasInput = serde_json::from_value(input.clone())?;
    let mut turistas = Vec::with_capacity(parsed.turista_ids.len());
    for id in parsed.turista_ids {
      let t = ctx.domain_repo
                 .get_turista(&id)?
                 .ok_or_else(|| viaje_domain::DomainError::NoEncontrado(format!("Turista {}", id)))?;
      turistas.push(TuristaEntrada { turista_id: id,
                                     nombre_completo: t.nombre_completo(),
                                     documento: t.documento().to_string() });
    }
    Ok(serde_json::to_value(TuristasPayload { turistas })?)
  }
}
