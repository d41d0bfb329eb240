use crate::errors::WorkflowError;
use crate::flows::itinerario_flow::{steps::ProgramasPayload, PASO_PROGRAMAS};
use crate::step::{StepContext, StepForm};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use wizard::{DraftStore, ValidationErrors};

/// Paso condicional: logística de tren y guía para los programas Machu
/// Picchu. Solo se presenta cuando el slice de programas tiene al menos una
/// entrada marcada como machu.
pub struct MachuStep;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MachuInput {
  detalles: Vec<DetalleSeleccion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DetalleSeleccion {
  /// Posición de la entrada machu en el slice de programas.
  programa_idx: usize,
  tren_empresa: String,
  tren_numero: Option<String>,
  hora_tren: NaiveTime,
  guia_nombre: String,
  guia_telefono: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetalleMachuEntrada {
  pub programa_idx: usize,
  pub programa_nombre: String,
  pub tren_empresa: String,
  pub tren_numero: Option<String>,
  pub hora_tren: NaiveTime,
  pub guia_nombre: String,
  pub guia_telefono: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachuPayload {
  pub detalles: Vec<DetalleMachuEntrada>,
}

impl MachuPayload {
  pub fn recover_from(payload: &JsonValue) -> Result<Self, WorkflowError> {
    let p: MachuPayload = serde_json::from_value(payload.clone())?;
    Ok(p)
  }
}

impl StepForm for MachuStep {
  fn name(&self) -> &str {
    "machu"
  }

  fn titulo(&self) -> &str {
    "Machu Picchu"
  }

  fn validate(&self, ctx: &StepContext, store: &DraftStore, input: &JsonValue) -> Result<(), WorkflowError> {
    let parsed: MachuInput = serde_json::from_value(input.clone())?;
    let programas: ProgramasPayload =
      ctx.get_typed_slice(store, PASO_PROGRAMAS)?
         .ok_or_else(|| WorkflowError::Validation("Complete primero los programas del itinerario".to_string()))?;

    let mut errores = ValidationErrors::new();
    if parsed.detalles.is_empty() {
      errores.add("detalles", "Registre el detalle de tren y guía para el programa Machu Picchu");
    }
    for (i, det) in parsed.detalles.iter().enumerate() {
      match programas.entradas.get(det.programa_idx) {
        None => {
          errores.add(format!("detalles[{}].programa_idx", i),
                      format!("El detalle referencia un programa inexistente (#{})", det.programa_idx + 1));
        }
        Some(entrada) if !entrada.es_machu => {
          errores.add(format!("detalles[{}].programa_idx", i),
                      format!("El programa '{}' no es de tipo Machu Picchu", entrada.nombre));
        }
        Some(_) => {}
      }
      if det.tren_empresa.trim().is_empty() {
        errores.add(format!("detalles[{}].tren_empresa", i), "La empresa de tren es obligatoria");
      }
      if det.guia_nombre.trim().chars().count() < 3 {
        errores.add(format!("detalles[{}].guia_nombre", i), "El nombre del guía debe tener al menos 3 caracteres");
      }
      if let Some(tel) = det.guia_telefono.as_deref() {
        if viaje_domain::validacion::telefono_valido(tel).is_err() {
          errores.add(format!("detalles[{}].guia_telefono", i), format!("Teléfono inválido: '{}'", tel));
        }
      }
    }
    errores.into_result().map_err(WorkflowError::Wizard)
  }

  fn slice(&self, ctx: &StepContext, store: &DraftStore, input: &JsonValue) -> Result<JsonValue, WorkflowError> {
    let parsed: MachuInput = serde_json::from_value(input.clone())?;
    let programas: ProgramasPayload =
      ctx.get_typed_slice(store, PASO_PROGRAMAS)?
         .ok_or_else(|| WorkflowError::Validation("Complete primero los programas del itinerario".to_string()))?;

    let mut detalles = Vec::with_capacity(parsed.detalles.len());
    for det in parsed.detalles {
      let programa_nombre = programas.entradas
                                     .get(det.programa_idx)
                                     .map(|e| e.nombre.clone())
                                     .unwrap_or_else(|| "No especificado".to_string());
      detalles.push(DetalleMachuEntrada { programa_idx: det.programa_idx,
                                          programa_nombre,
                                          tren_empresa: det.tren_empresa.trim().to_string(),
                                          tren_numero: det.tren_numero
                                                          .map(|n| n.trim().to_string())
                                                          .filter(|n| !n.is_empty()),
                                          hora_tren: det.hora_tren,
                                          guia_nombre: det.guia_nombre.trim().to_string(),
                                          guia_telefono: det.guia_telefono.map(|t| t.trim().to_string()) });
    }
    Ok(serde_json::to_value(MachuPayload { detalles })?)
  }
}
