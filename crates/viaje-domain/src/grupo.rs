// grupo.rs
use crate::validacion;
use crate::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Grupo de turistas asociado a un itinerario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grupo {
  id: Uuid,
  nombre: String,
  descripcion: Option<String>,
  creado_en: DateTime<Utc>,
}

impl Grupo {
  pub fn new(nombre: &str, descripcion: Option<String>) -> Result<Self, DomainError> {
    validacion::requerido("nombre", nombre)?;
    validacion::longitud_minima("nombre", nombre, 3)?;
    Ok(Self { id: Uuid::new_v4(),
              nombre: nombre.trim().to_string(),
              descripcion: descripcion.map(|d| d.trim().to_string()).filter(|d| !d.is_empty()),
              creado_en: Utc::now() })
  }

  /// Copia con nuevo nombre, validado. El id se conserva para que
  /// `update_grupo` reemplace el registro original.
  pub fn renombrar(&self, nombre: &str) -> Result<Self, DomainError> {
    validacion::requerido("nombre", nombre)?;
    validacion::longitud_minima("nombre", nombre, 3)?;
    let mut g = self.clone();
    g.nombre = nombre.trim().to_string();
    Ok(g)
  }

  pub fn id(&self) -> Uuid {
    self.id
  }

  pub fn nombre(&self) -> &str {
    &self.nombre
  }

  pub fn descripcion(&self) -> Option<&str> {
    self.descripcion.as_deref()
  }

  pub fn creado_en(&self) -> DateTime<Utc> {
    self.creado_en
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn nombre_corto_rechazado() {
    assert!(Grupo::new("ab", None).is_err());
    assert!(Grupo::new("  ", None).is_err());
    assert!(Grupo::new("Los Andes", Some("Salida octubre".into())).is_ok());
  }

  #[test]
  fn descripcion_vacia_se_normaliza_a_none() {
    let g = Grupo::new("Los Andes", Some("   ".into())).unwrap();
    assert!(g.descripcion().is_none());
  }

  #[test]
  fn renombrar_valida_y_conserva_el_id() {
    let g = Grupo::new("Los Andes", None).unwrap();
    assert!(g.renombrar("ab").is_err());
    let r = g.renombrar("Los Andes Sur").unwrap();
    assert_eq!(r.id(), g.id());
    assert_eq!(r.nombre(), "Los Andes Sur");
  }
}
