// detalle_machu.rs
use crate::validacion;
use crate::DomainError;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Logística de tren y guía asociada a un programa de tipo Machu Picchu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetalleMachu {
  id: Uuid,
  programa_id: Uuid,
  tren_empresa: String,
  tren_numero: Option<String>,
  hora_tren: NaiveTime,
  guia_nombre: String,
  guia_telefono: Option<String>,
}

impl DetalleMachu {
  pub fn new(programa_id: Uuid,
             tren_empresa: &str,
             tren_numero: Option<String>,
             hora_tren: NaiveTime,
             guia_nombre: &str,
             guia_telefono: Option<String>)
             -> Result<Self, DomainError> {
    validacion::requerido("tren_empresa", tren_empresa)?;
    validacion::longitud_minima("guia_nombre", guia_nombre, 3)?;
    if let Some(tel) = guia_telefono.as_deref() {
      validacion::telefono_valido(tel)?;
    }
    Ok(Self { id: Uuid::new_v4(),
              programa_id,
              tren_empresa: tren_empresa.trim().to_string(),
              tren_numero: tren_numero.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
              hora_tren,
              guia_nombre: guia_nombre.trim().to_string(),
              guia_telefono: guia_telefono.map(|t| t.trim().to_string()) })
  }

  pub fn id(&self) -> Uuid {
    self.id
  }

  /// Id del `ProgramaAgendado` (machu) al que pertenece este detalle.
  pub fn programa_id(&self) -> Uuid {
    self.programa_id
  }

  pub fn tren_empresa(&self) -> &str {
    &self.tren_empresa
  }

  pub fn tren_numero(&self) -> Option<&str> {
    self.tren_numero.as_deref()
  }

  pub fn hora_tren(&self) -> NaiveTime {
    self.hora_tren
  }

  pub fn guia_nombre(&self) -> &str {
    &self.guia_nombre
  }

  pub fn guia_telefono(&self) -> Option<&str> {
    self.guia_telefono.as_deref()
  }
}
