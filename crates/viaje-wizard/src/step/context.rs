use crate::errors::WorkflowError;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use viaje_domain::DomainRepository;
use wizard::DraftStore;

/// Contexto pasado a los formularios de paso: acceso al repositorio de
/// referencia y lectura tipada de slices previos del borrador.
///
/// Los formularios no escriben en el repositorio (el envío es diferido: todo
/// se persiste recién en `ItinerarioFlow::submit`); el contexto existe para
/// validar contra los datos de referencia y resolver nombres/costos al
/// normalizar.
#[derive(Clone)]
pub struct StepContext {
  /// Repositorio del dominio turístico (grupos, turistas, programas, etc.).
  pub domain_repo: Arc<dyn DomainRepository>,
}

impl StepContext {
  pub fn new(domain_repo: Arc<dyn DomainRepository>) -> Self {
    Self { domain_repo }
  }

  /// Obtiene el payload acumulado para `step_name` y lo deserializa en T.
  /// Retorna Ok(None) si el paso todavía no dejó datos.
  pub fn get_typed_slice<T: DeserializeOwned>(&self, store: &DraftStore, step_name: &str) -> Result<Option<T>, WorkflowError> {
    match store.get(step_name) {
      None => Ok(None),
      Some(payload) => {
        let t: T = serde_json::from_value(payload.clone())?;
        Ok(Some(t))
      }
    }
  }
}
