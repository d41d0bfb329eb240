// programa.rs
//
// Un `Programa` es una plantilla de actividad (tour, actividad libre o visita
// a Machu Picchu). Un `ProgramaAgendado` es esa plantilla instanciada sobre
// una fecha y ventana horaria concretas dentro de un itinerario.
use crate::validacion;
use crate::DomainError;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TipoPrograma {
  Tour,
  Actividad,
  MachuPicchu,
}

impl fmt::Display for TipoPrograma {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TipoPrograma::Tour => write!(f, "tour"),
      TipoPrograma::Actividad => write!(f, "actividad"),
      TipoPrograma::MachuPicchu => write!(f, "machupicchu"),
    }
  }
}

impl FromStr for TipoPrograma {
  type Err = DomainError;

  /// Acepta las variantes con y sin espacios ("machu picchu", "machupicchu").
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let normalizado: String = s.trim().to_lowercase().chars().filter(|c| !c.is_whitespace()).collect();
    match normalizado.as_str() {
      "tour" => Ok(TipoPrograma::Tour),
      "actividad" => Ok(TipoPrograma::Actividad),
      "machupicchu" | "machu" => Ok(TipoPrograma::MachuPicchu),
      otro => Err(DomainError::Validacion(format!("Tipo de programa desconocido: '{}'", otro))),
    }
  }
}

/// Plantilla de actividad ofrecida por la agencia.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Programa {
  id: Uuid,
  nombre: String,
  tipo: TipoPrograma,
  descripcion: Option<String>,
  costo: f64,
}

impl Programa {
  pub fn new(nombre: &str, tipo: TipoPrograma, descripcion: Option<String>, costo: f64) -> Result<Self, DomainError> {
    validacion::requerido("nombre", nombre)?;
    validacion::longitud_minima("nombre", nombre, 3)?;
    if !costo.is_finite() || costo < 0.0 {
      return Err(DomainError::Validacion(format!("Costo inválido: {}", costo)));
    }
    Ok(Self { id: Uuid::new_v4(), nombre: nombre.trim().to_string(), tipo, descripcion, costo })
  }

  pub fn id(&self) -> Uuid {
    self.id
  }

  pub fn nombre(&self) -> &str {
    &self.nombre
  }

  pub fn tipo(&self) -> TipoPrograma {
    self.tipo
  }

  pub fn descripcion(&self) -> Option<&str> {
    self.descripcion.as_deref()
  }

  pub fn costo(&self) -> f64 {
    self.costo
  }

  /// Un programa cuenta como "Machu Picchu" por su tipo o porque su nombre
  /// contiene el patrón "machu". De esto depende qué pasos presenta el
  /// asistente de itinerarios.
  pub fn es_machu(&self) -> bool {
    self.tipo == TipoPrograma::MachuPicchu || self.nombre.to_lowercase().contains("machu")
  }
}

/// Instancia de un programa sobre una fecha y ventana horaria concretas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramaAgendado {
  id: Uuid,
  programa: Programa,
  fecha: NaiveDate,
  hora_inicio: NaiveTime,
  hora_fin: NaiveTime,
}

impl ProgramaAgendado {
  pub fn new(programa: Programa, fecha: NaiveDate, hora_inicio: NaiveTime, hora_fin: NaiveTime) -> Result<Self, DomainError> {
    if hora_fin <= hora_inicio {
      return Err(DomainError::Validacion(format!("La hora de fin ({}) debe ser posterior a la de inicio ({})",
                                                 hora_fin, hora_inicio)));
    }
    Ok(Self { id: Uuid::new_v4(), programa, fecha, hora_inicio, hora_fin })
  }

  pub fn id(&self) -> Uuid {
    self.id
  }

  pub fn programa(&self) -> &Programa {
    &self.programa
  }

  pub fn fecha(&self) -> NaiveDate {
    self.fecha
  }

  pub fn hora_inicio(&self) -> NaiveTime {
    self.hora_inicio
  }

  pub fn hora_fin(&self) -> NaiveTime {
    self.hora_fin
  }

  pub fn es_machu(&self) -> bool {
    self.programa.es_machu()
  }

  /// Solape de ventanas semiabiertas `[inicio, fin)` sobre la misma fecha.
  /// Dos actividades que se tocan en el borde (una termina 13:00, la otra
  /// empieza 13:00) no se solapan.
  pub fn se_solapa(&self, otro: &ProgramaAgendado) -> bool {
    self.fecha == otro.fecha && self.hora_inicio < otro.hora_fin && otro.hora_inicio < self.hora_fin
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn programa(nombre: &str, tipo: TipoPrograma) -> Programa {
    Programa::new(nombre, tipo, None, 100.0).unwrap()
  }

  fn agendado(nombre: &str, tipo: TipoPrograma, fecha: &str, ini: &str, fin: &str) -> ProgramaAgendado {
    ProgramaAgendado::new(programa(nombre, tipo),
                          fecha.parse().unwrap(),
                          ini.parse().unwrap(),
                          fin.parse().unwrap()).unwrap()
  }

  #[test]
  fn tipo_desde_texto() {
    assert_eq!("Machu Picchu".parse::<TipoPrograma>().unwrap(), TipoPrograma::MachuPicchu);
    assert_eq!("tour".parse::<TipoPrograma>().unwrap(), TipoPrograma::Tour);
    assert!("trek".parse::<TipoPrograma>().is_err());
  }

  #[test]
  fn es_machu_por_tipo_o_nombre() {
    assert!(programa("Ciudadela", TipoPrograma::MachuPicchu).es_machu());
    assert!(programa("Tour Machu Picchu amanecer", TipoPrograma::Tour).es_machu());
    assert!(!programa("City tour Cusco", TipoPrograma::Tour).es_machu());
  }

  #[test]
  fn ventana_horaria_invertida_rechazada() {
    let p = programa("City tour", TipoPrograma::Tour);
    let r = ProgramaAgendado::new(p, "2025-11-02".parse().unwrap(), "13:00".parse().unwrap(), "09:00".parse().unwrap());
    assert!(r.is_err());
  }

  #[test]
  fn solape_semiabierto() {
    let a = agendado("A", TipoPrograma::Tour, "2025-11-02", "09:00:00", "13:00:00");
    let b = agendado("B", TipoPrograma::Tour, "2025-11-02", "12:00:00", "15:00:00");
    let c = agendado("C", TipoPrograma::Tour, "2025-11-02", "13:00:00", "15:00:00");
    let d = agendado("D", TipoPrograma::Tour, "2025-11-03", "09:00:00", "13:00:00");
    assert!(a.se_solapa(&b));
    assert!(b.se_solapa(&a));
    assert!(!a.se_solapa(&c), "tocar el borde no es solape");
    assert!(!a.se_solapa(&d), "fechas distintas no se solapan");
  }
}
