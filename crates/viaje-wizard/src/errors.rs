use thiserror::Error;

// Errores del asistente de itinerarios.
//
// Este enum centraliza los errores que pueden ocurrir al recorrer el
// asistente: errores del motor genérico (`WizardError`), errores del dominio
// turístico (`DomainError`), validaciones propias y errores de
// serialización.
#[derive(Error, Debug)]
pub enum WorkflowError {
  /// Errores originados por el motor de asistentes (transiciones, modo
  /// lectura, validación de formularios).
  #[error("Error de asistente: {0}")]
  Wizard(#[from] wizard::WizardError),

  /// Errores originados por las entidades o el repositorio del dominio.
  #[error("Error de dominio: {0}")]
  Domain(#[from] viaje_domain::DomainError),

  /// Errores de serialización/deserialización JSON.
  #[error("Error de serialización: {0}")]
  Serialization(#[from] serde_json::Error),

  /// Errores de validación propios del flujo (por ejemplo enviar desde un
  /// paso que no es el resumen).
  #[error("Error de validación: {0}")]
  Validation(String),

  /// Error genérico: captura otros tipos de errores no tipados.
  #[error("Otro error: {0}")]
  Other(String),
}
