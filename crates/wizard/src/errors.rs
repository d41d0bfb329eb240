// Archivo: errors.rs
// Propósito: definir los errores del motor de asistentes y el alias Result<T>
// usado por las APIs del crate.
use std::fmt;
use thiserror::Error;

/// Mapa ordenado campo -> mensaje producido por la validación de un paso.
/// El orden de inserción se conserva para que los errores se muestren en el
/// mismo orden que los campos del formulario.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ValidationErrors {
    errores: indexmap::IndexMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra un error para un campo. Un segundo error sobre el mismo campo
    /// reemplaza al primero.
    pub fn add(&mut self, campo: impl Into<String>, mensaje: impl Into<String>) {
        self.errores.insert(campo.into(), mensaje.into());
    }

    pub fn get(&self, campo: &str) -> Option<&str> {
        self.errores.get(campo).map(|s| s.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.errores.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errores.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errores.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Convierte en `Err(WizardError::Validacion)` si hay errores acumulados.
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(WizardError::Validacion(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut primero = true;
        for (campo, mensaje) in self.errores.iter() {
            if !primero {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", campo, mensaje)?;
            primero = false;
        }
        Ok(())
    }
}

/// Errores del motor de asistentes.
///
/// - `NoEncontrado`: paso o slice inexistente.
/// - `Validacion`: el formulario del paso actual no pasó sus chequeos.
/// - `Transicion`: movimiento ilegal (retroceder desde el primer paso,
///   avanzar desde el último).
/// - `SoloLectura`: intento de mutar el borrador en modo lectura.
/// - `Serializacion`: fallo al (de)serializar un payload.
#[derive(Error, Debug)]
pub enum WizardError {
    #[error("No encontrado: {0}")]
    NoEncontrado(String),
    #[error("Errores de validación: {0}")]
    Validacion(ValidationErrors),
    #[error("Transición inválida: {0}")]
    Transicion(String),
    #[error("Modo solo lectura: {0}")]
    SoloLectura(String),
    #[error("Error de serialización: {0}")]
    Serializacion(#[from] serde_json::Error),
}

/// Alias de resultado usado por las APIs del crate.
pub type Result<T> = std::result::Result<T, WizardError>;
