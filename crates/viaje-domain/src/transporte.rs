// transporte.rs
use crate::validacion;
use crate::DomainError;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TipoTransporte {
  Bus,
  Van,
  Tren,
  Auto,
}

impl fmt::Display for TipoTransporte {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TipoTransporte::Bus => write!(f, "bus"),
      TipoTransporte::Van => write!(f, "van"),
      TipoTransporte::Tren => write!(f, "tren"),
      TipoTransporte::Auto => write!(f, "auto"),
    }
  }
}

impl FromStr for TipoTransporte {
  type Err = DomainError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "bus" => Ok(TipoTransporte::Bus),
      "van" => Ok(TipoTransporte::Van),
      "tren" => Ok(TipoTransporte::Tren),
      "auto" => Ok(TipoTransporte::Auto),
      otro => Err(DomainError::Validacion(format!("Tipo de transporte desconocido: '{}'", otro))),
    }
  }
}

/// Unidad de transporte disponible (dato de referencia).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transporte {
  id: Uuid,
  empresa: String,
  tipo: TipoTransporte,
  capacidad: u32,
}

impl Transporte {
  pub fn new(empresa: &str, tipo: TipoTransporte, capacidad: u32) -> Result<Self, DomainError> {
    validacion::requerido("empresa", empresa)?;
    if capacidad == 0 {
      return Err(DomainError::Validacion("La capacidad debe ser mayor que cero".to_string()));
    }
    Ok(Self { id: Uuid::new_v4(), empresa: empresa.trim().to_string(), tipo, capacidad })
  }

  pub fn id(&self) -> Uuid {
    self.id
  }

  pub fn empresa(&self) -> &str {
    &self.empresa
  }

  pub fn tipo(&self) -> TipoTransporte {
    self.tipo
  }

  pub fn capacidad(&self) -> u32 {
    self.capacidad
  }
}

/// Recojo asignado a un programa agendado del itinerario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsignacionTransporte {
  id: Uuid,
  programa_id: Uuid,
  transporte: Transporte,
  punto_recojo: String,
  hora_recojo: NaiveTime,
}

impl AsignacionTransporte {
  pub fn new(programa_id: Uuid, transporte: Transporte, punto_recojo: &str, hora_recojo: NaiveTime) -> Result<Self, DomainError> {
    validacion::requerido("punto_recojo", punto_recojo)?;
    Ok(Self { id: Uuid::new_v4(),
              programa_id,
              transporte,
              punto_recojo: punto_recojo.trim().to_string(),
              hora_recojo })
  }

  pub fn id(&self) -> Uuid {
    self.id
  }

  /// Id del `ProgramaAgendado` al que sirve este recojo.
  pub fn programa_id(&self) -> Uuid {
    self.programa_id
  }

  pub fn transporte(&self) -> &Transporte {
    &self.transporte
  }

  pub fn punto_recojo(&self) -> &str {
    &self.punto_recojo
  }

  pub fn hora_recojo(&self) -> NaiveTime {
    self.hora_recojo
  }
}
