// validacion.rs
//
// Reglas de validación de campos compartidas por las entidades: requeridos,
// longitudes mínimas y formatos por regex (documento, teléfono, email).
use crate::DomainError;
use once_cell::sync::Lazy;
use regex::Regex;

static RE_DOCUMENTO: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z0-9]{6,12}$").unwrap());
static RE_TELEFONO: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?[0-9]{6,15}$").unwrap());
static RE_EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$").unwrap());

/// Verifica que el campo no esté vacío (tras recortar espacios).
pub fn requerido(campo: &str, valor: &str) -> Result<(), DomainError> {
  if valor.trim().is_empty() {
    return Err(DomainError::Validacion(format!("El campo '{}' es obligatorio", campo)));
  }
  Ok(())
}

/// Verifica una longitud mínima sobre el valor recortado.
pub fn longitud_minima(campo: &str, valor: &str, minimo: usize) -> Result<(), DomainError> {
  if valor.trim().chars().count() < minimo {
    return Err(DomainError::Validacion(format!("El campo '{}' debe tener al menos {} caracteres", campo, minimo)));
  }
  Ok(())
}

/// Número de documento: 6 a 12 caracteres alfanuméricos en mayúscula.
pub fn documento_valido(valor: &str) -> Result<(), DomainError> {
  if !RE_DOCUMENTO.is_match(valor.trim()) {
    return Err(DomainError::Validacion(format!("Número de documento inválido: '{}'", valor)));
  }
  Ok(())
}

/// Teléfono: dígitos con prefijo internacional opcional.
pub fn telefono_valido(valor: &str) -> Result<(), DomainError> {
  if !RE_TELEFONO.is_match(valor.trim()) {
    return Err(DomainError::Validacion(format!("Teléfono inválido: '{}'", valor)));
  }
  Ok(())
}

/// Email con formato usuario@dominio.tld.
pub fn email_valido(valor: &str) -> Result<(), DomainError> {
  if !RE_EMAIL.is_match(valor.trim()) {
    return Err(DomainError::Validacion(format!("Email inválido: '{}'", valor)));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn documento_acepta_dni_y_pasaporte() {
    assert!(documento_valido("71234567").is_ok());
    assert!(documento_valido("AB123456").is_ok());
    assert!(documento_valido("123").is_err());
    assert!(documento_valido("abc12345").is_err());
  }

  #[test]
  fn telefono_con_prefijo_opcional() {
    assert!(telefono_valido("+51987654321").is_ok());
    assert!(telefono_valido("987654321").is_ok());
    assert!(telefono_valido("98-76").is_err());
  }

  #[test]
  fn email_basico() {
    assert!(email_valido("ana@example.com").is_ok());
    assert!(email_valido("ana@@example").is_err());
  }
}
