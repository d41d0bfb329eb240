// itinerario.rs
//
// Agregado central: un itinerario reúne grupo, rango de fechas, turistas,
// programas agendados, recojos y detalles Machu Picchu. Las reglas que el
// sistema original dejaba a medias (solape de horarios, referencias colgantes)
// se verifican aquí en el momento de armar o mutar el agregado.
use crate::{AsignacionTransporte, DetalleMachu, DomainError, Grupo, ProgramaAgendado, Turista};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Itinerario {
  id: Uuid,
  grupo: Grupo,
  fecha_inicio: NaiveDate,
  fecha_fin: NaiveDate,
  estado_presupuesto_id: u32,
  turistas: Vec<Turista>,
  programas: Vec<ProgramaAgendado>,
  transportes: Vec<AsignacionTransporte>,
  detalles_machu: Vec<DetalleMachu>,
}

impl Itinerario {
  /// Crea un itinerario vacío sobre un grupo y un rango de fechas. La fecha
  /// de fin debe ser estrictamente posterior a la de inicio.
  pub fn new(grupo: Grupo, fecha_inicio: NaiveDate, fecha_fin: NaiveDate, estado_presupuesto_id: u32) -> Result<Self, DomainError> {
    if fecha_fin <= fecha_inicio {
      return Err(DomainError::Validacion(format!("La fecha de fin ({}) debe ser posterior a la de inicio ({})",
                                                 fecha_fin, fecha_inicio)));
    }
    Ok(Self { id: Uuid::new_v4(),
              grupo,
              fecha_inicio,
              fecha_fin,
              estado_presupuesto_id,
              turistas: Vec::new(),
              programas: Vec::new(),
              transportes: Vec::new(),
              detalles_machu: Vec::new() })
  }

  pub fn id(&self) -> Uuid {
    self.id
  }

  /// Reconstrucción en modo edición: conserva el id ya persistido en lugar
  /// del generado por `new`.
  pub fn con_id(mut self, id: Uuid) -> Self {
    self.id = id;
    self
  }

  pub fn grupo(&self) -> &Grupo {
    &self.grupo
  }

  pub fn fecha_inicio(&self) -> NaiveDate {
    self.fecha_inicio
  }

  pub fn fecha_fin(&self) -> NaiveDate {
    self.fecha_fin
  }

  pub fn estado_presupuesto_id(&self) -> u32 {
    self.estado_presupuesto_id
  }

  pub fn turistas(&self) -> &[Turista] {
    &self.turistas
  }

  pub fn programas(&self) -> &[ProgramaAgendado] {
    &self.programas
  }

  pub fn transportes(&self) -> &[AsignacionTransporte] {
    &self.transportes
  }

  pub fn detalles_machu(&self) -> &[DetalleMachu] {
    &self.detalles_machu
  }

  /// Agrega un turista. Duplicados (mismo id) y turistas inactivos se
  /// rechazan.
  pub fn agregar_turista(&mut self, turista: Turista) -> Result<(), DomainError> {
    if !turista.es_activo() {
      return Err(DomainError::Validacion(format!("El turista '{}' está inactivo", turista.nombre_completo())));
    }
    if self.turistas.iter().any(|t| t.id() == turista.id()) {
      return Err(DomainError::Validacion(format!("El turista '{}' ya está en el itinerario", turista.nombre_completo())));
    }
    self.turistas.push(turista);
    Ok(())
  }

  /// Agrega un programa agendado. Se rechaza sin mutar la lista cuando la
  /// fecha cae fuera del rango del itinerario o cuando la ventana horaria se
  /// solapa con otra actividad del mismo día.
  pub fn agregar_programa(&mut self, agendado: ProgramaAgendado) -> Result<(), DomainError> {
    if agendado.fecha() < self.fecha_inicio || agendado.fecha() > self.fecha_fin {
      return Err(DomainError::Validacion(format!("La fecha del programa ({}) cae fuera del itinerario ({} a {})",
                                                 agendado.fecha(),
                                                 self.fecha_inicio,
                                                 self.fecha_fin)));
    }
    if let Some(existente) = self.programas.iter().find(|p| p.se_solapa(&agendado)) {
      return Err(DomainError::Conflicto(format!("El horario {}-{} del {} se solapa con '{}' ({}-{})",
                                                agendado.hora_inicio(),
                                                agendado.hora_fin(),
                                                agendado.fecha(),
                                                existente.programa().nombre(),
                                                existente.hora_inicio(),
                                                existente.hora_fin())));
    }
    self.programas.push(agendado);
    Ok(())
  }

  /// Agrega un recojo. El programa referenciado debe existir en la lista
  /// actual de programas.
  pub fn agregar_transporte(&mut self, asignacion: AsignacionTransporte) -> Result<(), DomainError> {
    if !self.programas.iter().any(|p| p.id() == asignacion.programa_id()) {
      return Err(DomainError::Validacion(format!("El recojo referencia un programa inexistente: {}",
                                                 asignacion.programa_id())));
    }
    self.transportes.push(asignacion);
    Ok(())
  }

  /// Agrega un detalle Machu Picchu. El programa referenciado debe existir y
  /// estar marcado como machu.
  pub fn agregar_detalle_machu(&mut self, detalle: DetalleMachu) -> Result<(), DomainError> {
    match self.programas.iter().find(|p| p.id() == detalle.programa_id()) {
      None => Err(DomainError::Validacion(format!("El detalle Machu Picchu referencia un programa inexistente: {}",
                                                  detalle.programa_id()))),
      Some(p) if !p.es_machu() => {
        Err(DomainError::Validacion(format!("El programa '{}' no es de tipo Machu Picchu", p.programa().nombre())))
      }
      Some(_) => {
        self.detalles_machu.push(detalle);
        Ok(())
      }
    }
  }

  /// Suma de costos de los programas agendados.
  pub fn costo_total(&self) -> f64 {
    self.programas.iter().map(|p| p.programa().costo()).sum()
  }

  /// Algún programa del itinerario es de tipo Machu Picchu.
  pub fn tiene_machu(&self) -> bool {
    self.programas.iter().any(|p| p.es_machu())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{Programa, TipoPrograma, TipoTransporte, Transporte};

  fn base() -> Itinerario {
    let grupo = Grupo::new("Los Andes", None).unwrap();
    Itinerario::new(grupo, "2025-11-01".parse().unwrap(), "2025-11-10".parse().unwrap(), 1).unwrap()
  }

  fn agendar(it: &mut Itinerario, nombre: &str, fecha: &str, ini: &str, fin: &str) -> Result<(), DomainError> {
    let p = Programa::new(nombre, TipoPrograma::Tour, None, 150.0).unwrap();
    let a = ProgramaAgendado::new(p, fecha.parse().unwrap(), ini.parse().unwrap(), fin.parse().unwrap()).unwrap();
    it.agregar_programa(a)
  }

  #[test]
  fn rango_de_fechas_invertido_rechazado() {
    let grupo = Grupo::new("Los Andes", None).unwrap();
    let r = Itinerario::new(grupo, "2025-11-10".parse().unwrap(), "2025-11-01".parse().unwrap(), 1);
    assert!(r.is_err());
  }

  #[test]
  fn solape_rechazado_sin_mutar_la_lista() {
    let mut it = base();
    agendar(&mut it, "City tour", "2025-11-02", "09:00:00", "13:00:00").unwrap();
    let r = agendar(&mut it, "Valle Sagrado", "2025-11-02", "12:00:00", "16:00:00");
    assert!(matches!(r, Err(DomainError::Conflicto(_))));
    assert_eq!(it.programas().len(), 1);
  }

  #[test]
  fn fecha_fuera_de_rango_rechazada() {
    let mut it = base();
    let r = agendar(&mut it, "City tour", "2025-12-01", "09:00:00", "13:00:00");
    assert!(r.is_err());
    assert!(it.programas().is_empty());
  }

  #[test]
  fn transporte_con_programa_colgante_rechazado() {
    let mut it = base();
    let t = Transporte::new("Turismo Andino", TipoTransporte::Van, 12).unwrap();
    let asig = AsignacionTransporte::new(Uuid::new_v4(), t, "Plaza de Armas", "08:00:00".parse().unwrap()).unwrap();
    assert!(it.agregar_transporte(asig).is_err());
  }

  #[test]
  fn detalle_machu_solo_sobre_programa_machu() {
    let mut it = base();
    agendar(&mut it, "City tour", "2025-11-02", "09:00:00", "13:00:00").unwrap();
    let pid = it.programas()[0].id();
    let d = DetalleMachu::new(pid, "PeruRail", None, "06:10:00".parse().unwrap(), "José Huamán", None).unwrap();
    assert!(it.agregar_detalle_machu(d).is_err());
  }

  #[test]
  fn costo_total_suma_programas() {
    let mut it = base();
    agendar(&mut it, "City tour", "2025-11-02", "09:00:00", "13:00:00").unwrap();
    agendar(&mut it, "Valle Sagrado", "2025-11-03", "09:00:00", "13:00:00").unwrap();
    assert!((it.costo_total() - 300.0).abs() < f64::EPSILON);
  }
}
