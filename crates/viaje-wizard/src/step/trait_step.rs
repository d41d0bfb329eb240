use crate::errors::WorkflowError;
use crate::step::StepContext;
use serde_json::Value as JsonValue;
use wizard::DraftStore;

/// Trait que representa el formulario de un paso del asistente.
///
/// El contrato es flujo unidireccional puro: el controlador entrega el input
/// crudo del formulario, `validate` lo chequea campo a campo (acumulando un
/// mapa de errores) y `slice` devuelve el payload normalizado que se mezcla
/// en el borrador. `slice` no tiene efectos: dos llamadas con el mismo input
/// producen el mismo valor.
pub trait StepForm: Send + Sync {
  /// Id del paso (coincide con el id del `StepDef` en el grafo).
  fn name(&self) -> &str;

  /// Título para mostrar en la cabecera del asistente.
  fn titulo(&self) -> &str;

  /// Validación del input crudo. Usa el contexto para chequear contra los
  /// datos de referencia (grupos, programas, transportes) y el borrador para
  /// reglas que cruzan pasos (por ejemplo el rango de fechas del itinerario).
  /// Retorna `WizardError::Validacion` envuelto, con un error por campo.
  fn validate(&self, _ctx: &StepContext, _store: &DraftStore, _input: &JsonValue) -> Result<(), WorkflowError> {
    Ok(())
  }

  /// Normaliza el input ya validado al payload que se acumula en el
  /// borrador. Puede resolver datos de referencia (nombres, costos) para que
  /// los pasos posteriores y el resumen no dependan del repositorio.
  fn slice(&self, ctx: &StepContext, store: &DraftStore, input: &JsonValue) -> Result<JsonValue, WorkflowError>;
}
