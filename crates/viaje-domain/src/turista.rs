// turista.rs
use crate::validacion;
use crate::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Estado de un turista dentro del sistema. Un turista inactivo no debe
/// incluirse en nuevos itinerarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EstadoTurista {
  Activo,
  Inactivo,
}

impl fmt::Display for EstadoTurista {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      EstadoTurista::Activo => write!(f, "activo"),
      EstadoTurista::Inactivo => write!(f, "inactivo"),
    }
  }
}

/// Turista registrado: datos de contacto y documento de identidad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turista {
  id: Uuid,
  nombre: String,
  apellido: String,
  documento: String,
  email: String,
  telefono: String,
  pais: String,
  estado: EstadoTurista,
}

impl Turista {
  pub fn new(nombre: &str,
             apellido: &str,
             documento: &str,
             email: &str,
             telefono: &str,
             pais: &str)
             -> Result<Self, DomainError> {
    validacion::longitud_minima("nombre", nombre, 2)?;
    validacion::longitud_minima("apellido", apellido, 2)?;
    validacion::documento_valido(documento)?;
    validacion::email_valido(email)?;
    validacion::telefono_valido(telefono)?;
    validacion::requerido("pais", pais)?;
    Ok(Self { id: Uuid::new_v4(),
              nombre: nombre.trim().to_string(),
              apellido: apellido.trim().to_string(),
              documento: documento.trim().to_uppercase(),
              email: email.trim().to_string(),
              telefono: telefono.trim().to_string(),
              pais: pais.trim().to_string(),
              estado: EstadoTurista::Activo })
  }

  pub fn id(&self) -> Uuid {
    self.id
  }

  pub fn nombre(&self) -> &str {
    &self.nombre
  }

  pub fn apellido(&self) -> &str {
    &self.apellido
  }

  /// Nombre completo para listados y el resumen.
  pub fn nombre_completo(&self) -> String {
    format!("{} {}", self.nombre, self.apellido)
  }

  pub fn documento(&self) -> &str {
    &self.documento
  }

  pub fn email(&self) -> &str {
    &self.email
  }

  pub fn telefono(&self) -> &str {
    &self.telefono
  }

  pub fn pais(&self) -> &str {
    &self.pais
  }

  pub fn estado(&self) -> EstadoTurista {
    self.estado
  }

  pub fn es_activo(&self) -> bool {
    self.estado == EstadoTurista::Activo
  }

  /// Copia con el estado cambiado (el id se conserva: es la misma persona).
  pub fn con_estado(&self, estado: EstadoTurista) -> Self {
    let mut t = self.clone();
    t.estado = estado;
    t
  }

  /// Copia con los datos de contacto actualizados, validados igual que en la
  /// creación.
  pub fn actualizar_contacto(&self, email: &str, telefono: &str) -> Result<Self, DomainError> {
    validacion::email_valido(email)?;
    validacion::telefono_valido(telefono)?;
    let mut t = self.clone();
    t.email = email.trim().to_string();
    t.telefono = telefono.trim().to_string();
    Ok(t)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn turista() -> Turista {
    Turista::new("Ana", "Quispe", "71234567", "ana@example.com", "+51987654321", "Perú").unwrap()
  }

  #[test]
  fn creacion_valida_campos() {
    assert!(Turista::new("A", "Quispe", "71234567", "ana@example.com", "+51987654321", "Perú").is_err());
    assert!(Turista::new("Ana", "Quispe", "71", "ana@example.com", "+51987654321", "Perú").is_err());
    assert!(Turista::new("Ana", "Quispe", "71234567", "ana-example", "+51987654321", "Perú").is_err());
    assert!(Turista::new("Ana", "Quispe", "71234567", "ana@example.com", "abc", "Perú").is_err());
  }

  #[test]
  fn documento_se_normaliza_a_mayusculas() {
    let t = Turista::new("Ana", "Quispe", "ab123456", "ana@example.com", "987654321", "Perú").unwrap();
    assert_eq!(t.documento(), "AB123456");
  }

  #[test]
  fn contacto_actualizado_se_valida_como_en_la_creacion() {
    let t = turista();
    assert!(t.actualizar_contacto("sin-arroba", "+51911222333").is_err());
    assert!(t.actualizar_contacto("ana@example.com", "abc").is_err());
    let ok = t.actualizar_contacto("nuevo@example.com", "+51911222333").unwrap();
    assert_eq!(ok.id(), t.id());
    assert_eq!(ok.email(), "nuevo@example.com");
  }

  #[test]
  fn cambio_de_estado_conserva_id() {
    let t = turista();
    let inactivo = t.con_estado(EstadoTurista::Inactivo);
    assert_eq!(t.id(), inactivo.id());
    assert!(!inactivo.es_activo());
  }
}
