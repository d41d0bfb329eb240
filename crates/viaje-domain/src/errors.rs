// errors.rs
use thiserror::Error;

/// Errores del dominio turístico.
///
/// - `Validacion`: un campo o una regla de negocio no se cumple.
/// - `Conflicto`: la operación choca con el estado actual (p. ej. horarios
///   solapados o un borrado bloqueado).
/// - `NoEncontrado`: la entidad referenciada no existe.
/// - `Serializacion`: fallo al (de)serializar JSON.
#[derive(Debug, Error, Clone)]
pub enum DomainError {
  #[error("Error de validación: {0}")]
  Validacion(String),
  #[error("Conflicto: {0}")]
  Conflicto(String),
  #[error("No encontrado: {0}")]
  NoEncontrado(String),
  #[error("Error de serialización: {0}")]
  Serializacion(String),
}

impl From<serde_json::Error> for DomainError {
  fn from(e: serde_json::Error) -> Self {
    Self::Serializacion(e.to_string())
  }
}
