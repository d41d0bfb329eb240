use crate::errors::WorkflowError;
use crate::step::{StepContext, StepForm};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;
use wizard::{DraftStore, ValidationErrors};

/// Primer paso: selección del grupo del itinerario. El usuario elige un
/// grupo existente o describe uno nuevo; en el segundo caso el grupo NO se
/// crea aquí sino recién en el envío final (política de commit diferido).
pub struct GrupoStep;

/// Input crudo del formulario.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "modo", rename_all = "snake_case")]
pub enum GrupoInput {
  Existente { grupo_id: Uuid },
  Nuevo { nombre: String, descripcion: Option<String> },
}

/// Slice normalizado: en el caso existente se embebe el nombre resuelto para
/// que el resumen no dependa del repositorio.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "modo", rename_all = "snake_case")]
pub enum GrupoPayload {
  Existente { grupo_id: Uuid, nombre: String },
  Nuevo { nombre: String, descripcion: Option<String> },
}

impl GrupoPayload {
  /// Reconstruye el DTO tipado desde el payload del borrador.
  pub fn recover_from(payload: &JsonValue) -> Result<Self, WorkflowError> {
    let p: GrupoPayload = serde_json::from_value(payload.clone())?;
    Ok(p)
  }

  /// Nombre del grupo, venga de donde venga.
  pub fn nombre(&self) -> &str {
    match self {
      GrupoPayload::Existente { nombre, .. } => nombre,
      GrupoPayload::Nuevo { nombre, .. } => nombre,
    }
  }
}

impl StepForm for GrupoStep {
  fn name(&self) -> &str {
    "grupo"
  }

  fn titulo(&self) -> &str {
    "Grupo"
  }

  fn validate(&self, ctx: &StepContext, _store: &DraftStore, input: &JsonValue) -> Result<(), WorkflowError> {
    let parsed: GrupoInput = serde_json::from_value(input.clone())?;
    let mut errores = ValidationErrors::new();
    match parsed {
      GrupoInput::Existente { grupo_id } => {
        if ctx.domain_repo.get_grupo(&grupo_id)?.is_none() {
          errores.add("grupo_id", format!("El grupo {} no existe", grupo_id));
        }
      }
      GrupoInput::Nuevo { nombre, .. } => {
        if nombre.trim().chars().count() < 3 {
          errores.add("nombre", "El nombre del grupo debe tener al menos 3 caracteres");
        }
      }
    }
    errores.into_result().map_err(WorkflowError::Wizard)
  }

  fn slice(&self, ctx: &StepContext, _store: &DraftStore, input: &JsonValue) -> Result<JsonValue, WorkflowError> {
    let parsed: GrupoInput = serde_json::from_value(input.clone())?;
    let payload = match parsed {
      GrupoInput::Existente { grupo_id } => {
        let grupo = ctx.domain_repo
                       .get_grupo(&grupo_id)?
                       .ok_or_else(|| viaje_domain::DomainError::NoEncontrado(format!("Grupo {}", grupo_id)))?;
        GrupoPayload::Existente { grupo_id, nombre: grupo.nombre().to_string() }
      }
      GrupoInput::Nuevo { nombre, descripcion } => {
        GrupoPayload::Nuevo { nombre: nombre.trim().to_string(),
                              descripcion: descripcion.map(|d| d.trim().to_string()).filter(|d| !d.is_empty()) }
      }
    };
    Ok(serde_json::to_value(payload)?)
  }
}
