use crate::errors::WorkflowError;
use crate::flows::itinerario_flow::{steps::DatosPayload, PASO_DATOS};
use crate::step::{StepContext, StepForm};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;
use wizard::{DraftStore, ValidationErrors};

/// Cuarto paso: agenda de programas sobre fechas y horarios concretos.
///
/// De este slice depende la forma del asistente: si alguna entrada queda
/// marcada como machu, el paso Machu Picchu se inserta antes del resumen.
pub struct ProgramasStep;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProgramasInput {
  programas: Vec<ProgramaSeleccion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProgramaSeleccion {
  programa_id: Uuid,
  fecha: NaiveDate,
  hora_inicio: NaiveTime,
  hora_fin: NaiveTime,
}

/// Entrada normalizada: la plantilla queda resuelta (nombre, tipo, costo,
/// bandera machu) para que el predicado del grafo y el resumen trabajen solo
/// con el borrador. Los pasos de transporte y machu referencian la entrada
/// por su posición (`idx`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramaEntrada {
  pub programa_id: Uuid,
  pub nombre: String,
  pub tipo: String,
  pub costo: f64,
  pub es_machu: bool,
  pub fecha: NaiveDate,
  pub hora_inicio: NaiveTime,
  pub hora_fin: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramasPayload {
  pub entradas: Vec<ProgramaEntrada>,
}

impl ProgramasPayload {
  pub fn recover_from(payload: &JsonValue) -> Result<Self, WorkflowError> {
    let p: ProgramasPayload = serde_json::from_value(payload.clone())?;
    Ok(p)
  }

  pub fn tiene_machu(&self) -> bool {
    self.entradas.iter().any(|e| e.es_machu)
  }

  pub fn costo_total(&self) -> f64 {
    self.entradas.iter().map(|e| e.costo).sum()
  }
}

impl StepForm for ProgramasStep {
  fn name(&self) -> &str {
    "programas"
  }

  fn titulo(&self) -> &str {
    "Programas"
  }

  fn validate(&self, ctx: &StepContext, store: &DraftStore, input: &JsonValue) -> Result<(), WorkflowError> {
    let parsed: ProgramasInput = serde_json::from_value(input.clone())?;
    let datos: DatosPayload =
      ctx.get_typed_slice(store, PASO_DATOS)?
         .ok_or_else(|| WorkflowError::Validation("Complete primero los datos del itinerario".to_string()))?;

    let mut errores = ValidationErrors::new();
    if parsed.programas.is_empty() {
      errores.add("programas", "Agregue al menos un programa");
    }
    for (i, sel) in parsed.programas.iter().enumerate() {
      if ctx.domain_repo.get_programa(&sel.programa_id)?.is_none() {
        errores.add(format!("programas[{}].programa_id", i), format!("El programa {} no existe", sel.programa_id));
        continue;
      }
      if sel.hora_fin <= sel.hora_inicio {
        errores.add(format!("programas[{}].hora_fin", i),
                    format!("La hora de fin ({}) debe ser posterior a la de inicio ({})", sel.hora_fin, sel.hora_inicio));
      }
      if sel.fecha < datos.fecha_inicio || sel.fecha > datos.fecha_fin {
        errores.add(format!("programas[{}].fecha", i),
                    format!("La fecha {} cae fuera del itinerario ({} a {})",
                            sel.fecha,
                            datos.fecha_inicio,
                            datos.fecha_fin));
      }
      // conflicto de agenda contra las entradas anteriores del mismo día
      for (j, previo) in parsed.programas[..i].iter().enumerate() {
        let solapan = sel.fecha == previo.fecha && sel.hora_inicio < previo.hora_fin && previo.hora_inicio < sel.hora_fin;
        if solapan {
          errores.add(format!("programas[{}]", i),
                      format!("El horario {}-{} del {} se solapa con la actividad #{}",
                              sel.hora_inicio,
                              sel.hora_fin,
                              sel.fecha,
                              j + 1));
        }
      }
    }
    errores.into_result().map_err(WorkflowError::Wizard)
  }

  fn slice(&self, ctx: &StepContext, _store: &DraftStore, input: &JsonValue) -> Result<JsonValue, WorkflowError> {
    let parsed: ProgramasInput = serde_json::from_value(input.clone())?;
    let mut entradas = Vec::with_capacity(parsed.programas.len());
    for sel in parsed.programas {
      let plantilla = ctx.domain_repo
                         .get_programa(&sel.programa_id)?
                         .ok_or_else(|| viaje_domain::DomainError::NoEncontrado(format!("Programa {}", sel.programa_id)))?;
      entradas.push(ProgramaEntrada { programa_id: sel.programa_id,
                                      nombre: plantilla.nombre().to_string(),
                                      tipo: plantilla.tipo().to_string(),
                                      costo: plantilla.costo(),
                                      es_machu: plantilla.es_machu(),
                                      fecha: sel.fecha,
                                      hora_inicio: sel.hora_inicio,
                                      hora_fin: sel.hora_fin });
    }
    Ok(serde_json::to_value(ProgramasPayload { entradas })?)
  }
}
