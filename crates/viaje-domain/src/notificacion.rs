// notificacion.rs
use crate::validacion;
use crate::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Notificación dirigida a un turista en el portal (cambios de itinerario,
/// recordatorios de recojo, etc.). Se marca como leída o se descarta; una
/// notificación descartada deja de listarse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notificacion {
  id: Uuid,
  turista_id: Uuid,
  titulo: String,
  mensaje: String,
  leida: bool,
  descartada: bool,
  creada_en: DateTime<Utc>,
}

impl Notificacion {
  pub fn new(turista_id: Uuid, titulo: &str, mensaje: &str) -> Result<Self, DomainError> {
    validacion::requerido("titulo", titulo)?;
    validacion::requerido("mensaje", mensaje)?;
    Ok(Self { id: Uuid::new_v4(),
              turista_id,
              titulo: titulo.trim().to_string(),
              mensaje: mensaje.trim().to_string(),
              leida: false,
              descartada: false,
              creada_en: Utc::now() })
  }

  pub fn id(&self) -> Uuid {
    self.id
  }

  pub fn turista_id(&self) -> Uuid {
    self.turista_id
  }

  pub fn titulo(&self) -> &str {
    &self.titulo
  }

  pub fn mensaje(&self) -> &str {
    &self.mensaje
  }

  pub fn leida(&self) -> bool {
    self.leida
  }

  pub fn descartada(&self) -> bool {
    self.descartada
  }

  pub fn creada_en(&self) -> DateTime<Utc> {
    self.creada_en
  }

  pub fn marcar_leida(&mut self) {
    self.leida = true;
  }

  pub fn descartar(&mut self) {
    self.descartada = true;
  }
}
