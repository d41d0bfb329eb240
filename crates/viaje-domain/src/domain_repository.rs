// domain_repository.rs
use crate::{DomainError, EstadoTurista, Grupo, Itinerario, Notificacion, Programa, Transporte, Turista};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Contrato de persistencia del dominio turístico. En producción lo cubriría
/// la API REST/SQL; aquí se inyecta (en memoria para pruebas y demos) y los
/// pasos del asistente lo consumen como dato de referencia.
pub trait DomainRepository: Send + Sync {
  // --- grupos ---
  /// Guarda un grupo y devuelve su `Uuid`.
  fn save_grupo(&self, grupo: Grupo) -> Result<Uuid, DomainError>;
  fn get_grupo(&self, id: &Uuid) -> Result<Option<Grupo>, DomainError>;
  fn list_grupos(&self) -> Result<Vec<Grupo>, DomainError>;
  /// Reemplaza un grupo existente; error si no existe.
  fn update_grupo(&self, grupo: Grupo) -> Result<(), DomainError>;

  // --- turistas ---
  fn save_turista(&self, turista: Turista) -> Result<Uuid, DomainError>;
  fn get_turista(&self, id: &Uuid) -> Result<Option<Turista>, DomainError>;
  fn list_turistas(&self) -> Result<Vec<Turista>, DomainError>;
  /// Cambia el estado (activo/inactivo) de un turista existente.
  fn set_estado_turista(&self, id: &Uuid, estado: EstadoTurista) -> Result<(), DomainError>;
  /// Elimina un turista. Bloqueado con `Conflicto` si aparece en algún
  /// itinerario.
  fn delete_turista(&self, id: &Uuid) -> Result<(), DomainError>;

  // --- programas y transportes (datos de referencia) ---
  fn save_programa(&self, programa: Programa) -> Result<Uuid, DomainError>;
  fn get_programa(&self, id: &Uuid) -> Result<Option<Programa>, DomainError>;
  fn list_programas(&self) -> Result<Vec<Programa>, DomainError>;
  fn save_transporte(&self, transporte: Transporte) -> Result<Uuid, DomainError>;
  fn get_transporte(&self, id: &Uuid) -> Result<Option<Transporte>, DomainError>;
  fn list_transportes(&self) -> Result<Vec<Transporte>, DomainError>;

  // --- itinerarios ---
  /// Guarda un itinerario completo. `command_id` permite idempotencia: un
  /// reintento con el mismo command_id no crea un segundo itinerario y
  /// devuelve el id ya persistido.
  fn save_itinerario(&self, itinerario: Itinerario, command_id: Option<Uuid>) -> Result<Uuid, DomainError>;
  fn get_itinerario(&self, id: &Uuid) -> Result<Option<Itinerario>, DomainError>;
  fn list_itinerarios(&self) -> Result<Vec<Itinerario>, DomainError>;
  /// Reemplaza un itinerario existente; error si no existe.
  fn update_itinerario(&self, itinerario: Itinerario) -> Result<(), DomainError>;
  /// Elimina un itinerario. Bloqueado con `Conflicto` mientras tenga
  /// turistas asociados.
  fn delete_itinerario(&self, id: &Uuid) -> Result<(), DomainError>;

  // --- notificaciones del portal de turistas ---
  fn save_notificacion(&self, notificacion: Notificacion) -> Result<Uuid, DomainError>;
  /// Lista las notificaciones no descartadas de un turista, más recientes
  /// primero.
  fn list_notificaciones(&self, turista_id: &Uuid) -> Result<Vec<Notificacion>, DomainError>;
  fn marcar_leida(&self, id: &Uuid) -> Result<(), DomainError>;
  fn descartar_notificacion(&self, id: &Uuid) -> Result<(), DomainError>;
}

/// Implementación en memoria para tests, demos y wiring rápido.
pub struct InMemoryDomainRepository {
  grupos: Arc<Mutex<HashMap<Uuid, Grupo>>>,
  turistas: Arc<Mutex<HashMap<Uuid, Turista>>>,
  programas: Arc<Mutex<HashMap<Uuid, Programa>>>,
  transportes: Arc<Mutex<HashMap<Uuid, Transporte>>>,
  itinerarios: Arc<Mutex<HashMap<Uuid, Itinerario>>>,
  notificaciones: Arc<Mutex<HashMap<Uuid, Notificacion>>>,
  /// Cache de idempotencia para `save_itinerario` (command_id -> id creado).
  comandos: Arc<Mutex<HashMap<Uuid, Uuid>>>,
}

impl InMemoryDomainRepository {
  pub fn new() -> Self {
    Self { grupos: Arc::new(Mutex::new(HashMap::new())),
           turistas: Arc::new(Mutex::new(HashMap::new())),
           programas: Arc::new(Mutex::new(HashMap::new())),
           transportes: Arc::new(Mutex::new(HashMap::new())),
           itinerarios: Arc::new(Mutex::new(HashMap::new())),
           notificaciones: Arc::new(Mutex::new(HashMap::new())),
           comandos: Arc::new(Mutex::new(HashMap::new())) }
  }

  // Helper para mapear mutex envenenados a DomainError
  fn lock_map<'a, T>(&'a self, m: &'a Mutex<T>, name: &str) -> Result<std::sync::MutexGuard<'a, T>, DomainError> {
    m.lock()
     .map_err(|e| DomainError::Serializacion(format!("Mutex '{}' envenenado: {}", name, e)))
  }
}

impl Default for InMemoryDomainRepository {
  fn default() -> Self {
    Self::new()
  }
}

impl DomainRepository for InMemoryDomainRepository {
  fn save_grupo(&self, grupo: Grupo) -> Result<Uuid, DomainError> {
    let id = grupo.id();
    let mut grupos = self.lock_map(&self.grupos, "grupos")?;
    grupos.insert(id, grupo);
    tracing::debug!(%id, "grupo guardado");
    Ok(id)
  }

  fn get_grupo(&self, id: &Uuid) -> Result<Option<Grupo>, DomainError> {
    let grupos = self.lock_map(&self.grupos, "grupos")?;
    Ok(grupos.get(id).cloned())
  }

  fn list_grupos(&self) -> Result<Vec<Grupo>, DomainError> {
    let grupos = self.lock_map(&self.grupos, "grupos")?;
    let mut out: Vec<Grupo> = grupos.values().cloned().collect();
    out.sort_by(|a, b| a.nombre().cmp(b.nombre()));
    Ok(out)
  }

  fn update_grupo(&self, grupo: Grupo) -> Result<(), DomainError> {
    let mut grupos = self.lock_map(&self.grupos, "grupos")?;
    if !grupos.contains_key(&grupo.id()) {
      return Err(DomainError::NoEncontrado(format!("Grupo {}", grupo.id())));
    }
    grupos.insert(grupo.id(), grupo);
    Ok(())
  }

  fn save_turista(&self, turista: Turista) -> Result<Uuid, DomainError> {
    let id = turista.id();
    let mut turistas = self.lock_map(&self.turistas, "turistas")?;
    if turistas.values().any(|t| t.id() != id && t.documento() == turista.documento()) {
      return Err(DomainError::Conflicto(format!("Ya existe un turista con documento {}", turista.documento())));
    }
    turistas.insert(id, turista);
    Ok(id)
  }

  fn get_turista(&self, id: &Uuid) -> Result<Option<Turista>, DomainError> {
    let turistas = self.lock_map(&self.turistas, "turistas")?;
    Ok(turistas.get(id).cloned())
  }

  fn list_turistas(&self) -> Result<Vec<Turista>, DomainError> {
    let turistas = self.lock_map(&self.turistas, "turistas")?;
    let mut out: Vec<Turista> = turistas.values().cloned().collect();
    out.sort_by(|a, b| a.apellido().cmp(b.apellido()));
    Ok(out)
  }

  fn set_estado_turista(&self, id: &Uuid, estado: EstadoTurista) -> Result<(), DomainError> {
    let mut turistas = self.lock_map(&self.turistas, "turistas")?;
    match turistas.get(id) {
      None => Err(DomainError::NoEncontrado(format!("Turista {}", id))),
      Some(t) => {
        let actualizado = t.con_estado(estado);
        turistas.insert(*id, actualizado);
        Ok(())
      }
    }
  }

  fn delete_turista(&self, id: &Uuid) -> Result<(), DomainError> {
    let itinerarios = self.lock_map(&self.itinerarios, "itinerarios")?;
    if itinerarios.values().any(|it| it.turistas().iter().any(|t| t.id() == *id)) {
      return Err(DomainError::Conflicto(format!("El turista {} pertenece a un itinerario", id)));
    }
    drop(itinerarios);
    let mut turistas = self.lock_map(&self.turistas, "turistas")?;
    if turistas.remove(id).is_none() {
      return Err(DomainError::NoEncontrado(format!("Turista {}", id)));
    }
    Ok(())
  }

  fn save_programa(&self, programa: Programa) -> Result<Uuid, DomainError> {
    let id = programa.id();
    let mut programas = self.lock_map(&self.programas, "programas")?;
    programas.insert(id, programa);
    Ok(id)
  }

  fn get_programa(&self, id: &Uuid) -> Result<Option<Programa>, DomainError> {
    let programas = self.lock_map(&self.programas, "programas")?;
    Ok(programas.get(id).cloned())
  }

  fn list_programas(&self) -> Result<Vec<Programa>, DomainError> {
    let programas = self.lock_map(&self.programas, "programas")?;
    let mut out: Vec<Programa> = programas.values().cloned().collect();
    out.sort_by(|a, b| a.nombre().cmp(b.nombre()));
    Ok(out)
  }

  fn save_transporte(&self, transporte: Transporte) -> Result<Uuid, DomainError> {
    let id = transporte.id();
    let mut transportes = self.lock_map(&self.transportes, "transportes")?;
    transportes.insert(id, transporte);
    Ok(id)
  }

  fn get_transporte(&self, id: &Uuid) -> Result<Option<Transporte>, DomainError> {
    let transportes = self.lock_map(&self.transportes, "transportes")?;
    Ok(transportes.get(id).cloned())
  }

  fn list_transportes(&self) -> Result<Vec<Transporte>, DomainError> {
    let transportes = self.lock_map(&self.transportes, "transportes")?;
    let mut out: Vec<Transporte> = transportes.values().cloned().collect();
    out.sort_by(|a, b| a.empresa().cmp(b.empresa()));
    Ok(out)
  }

  fn save_itinerario(&self, itinerario: Itinerario, command_id: Option<Uuid>) -> Result<Uuid, DomainError> {
    let mut comandos = self.lock_map(&self.comandos, "comandos")?;
    if let Some(cid) = command_id {
      if let Some(existente) = comandos.get(&cid) {
        tracing::info!(%cid, "envío duplicado ignorado por idempotencia");
        return Ok(*existente);
      }
    }
    let id = itinerario.id();
    let mut itinerarios = self.lock_map(&self.itinerarios, "itinerarios")?;
    itinerarios.insert(id, itinerario);
    if let Some(cid) = command_id {
      comandos.insert(cid, id);
    }
    tracing::info!(%id, "itinerario guardado");
    Ok(id)
  }

  fn get_itinerario(&self, id: &Uuid) -> Result<Option<Itinerario>, DomainError> {
    let itinerarios = self.lock_map(&self.itinerarios, "itinerarios")?;
    Ok(itinerarios.get(id).cloned())
  }

  fn list_itinerarios(&self) -> Result<Vec<Itinerario>, DomainError> {
    let itinerarios = self.lock_map(&self.itinerarios, "itinerarios")?;
    let mut out: Vec<Itinerario> = itinerarios.values().cloned().collect();
    out.sort_by_key(|a| a.fecha_inicio());
    Ok(out)
  }

  fn update_itinerario(&self, itinerario: Itinerario) -> Result<(), DomainError> {
    let mut itinerarios = self.lock_map(&self.itinerarios, "itinerarios")?;
    if !itinerarios.contains_key(&itinerario.id()) {
      return Err(DomainError::NoEncontrado(format!("Itinerario {}", itinerario.id())));
    }
    itinerarios.insert(itinerario.id(), itinerario);
    Ok(())
  }

  fn delete_itinerario(&self, id: &Uuid) -> Result<(), DomainError> {
    let mut itinerarios = self.lock_map(&self.itinerarios, "itinerarios")?;
    match itinerarios.get(id) {
      None => Err(DomainError::NoEncontrado(format!("Itinerario {}", id))),
      Some(it) if !it.turistas().is_empty() => {
        Err(DomainError::Conflicto(format!("El itinerario {} tiene {} turista(s) asociados", id, it.turistas().len())))
      }
      Some(_) => {
        itinerarios.remove(id);
        tracing::info!(%id, "itinerario eliminado");
        Ok(())
      }
    }
  }

  fn save_notificacion(&self, notificacion: Notificacion) -> Result<Uuid, DomainError> {
    let id = notificacion.id();
    let mut notificaciones = self.lock_map(&self.notificaciones, "notificaciones")?;
    notificaciones.insert(id, notificacion);
    Ok(id)
  }

  fn list_notificaciones(&self, turista_id: &Uuid) -> Result<Vec<Notificacion>, DomainError> {
    let notificaciones = self.lock_map(&self.notificaciones, "notificaciones")?;
    let mut out: Vec<Notificacion> = notificaciones.values()
                                                   .filter(|n| n.turista_id() == *turista_id && !n.descartada())
                                                   .cloned()
                                                   .collect();
    out.sort_by(|a, b| b.creada_en().cmp(&a.creada_en()));
    Ok(out)
  }

  fn marcar_leida(&self, id: &Uuid) -> Result<(), DomainError> {
    let mut notificaciones = self.lock_map(&self.notificaciones, "notificaciones")?;
    match notificaciones.get_mut(id) {
      None => Err(DomainError::NoEncontrado(format!("Notificación {}", id))),
      Some(n) => {
        n.marcar_leida();
        Ok(())
      }
    }
  }

  fn descartar_notificacion(&self, id: &Uuid) -> Result<(), DomainError> {
    let mut notificaciones = self.lock_map(&self.notificaciones, "notificaciones")?;
    match notificaciones.get_mut(id) {
      None => Err(DomainError::NoEncontrado(format!("Notificación {}", id))),
      Some(n) => {
        n.descartar();
        Ok(())
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{TipoPrograma, TipoTransporte};

  fn repo_con_itinerario(con_turista: bool) -> (InMemoryDomainRepository, Uuid) {
    let repo = InMemoryDomainRepository::new();
    let grupo = Grupo::new("Los Andes", None).unwrap();
    let mut it = Itinerario::new(grupo, "2025-11-01".parse().unwrap(), "2025-11-10".parse().unwrap(), 1).unwrap();
    if con_turista {
      let t = Turista::new("Ana", "Quispe", "71234567", "ana@example.com", "987654321", "Perú").unwrap();
      repo.save_turista(t.clone()).unwrap();
      it.agregar_turista(t).unwrap();
    }
    let id = repo.save_itinerario(it, None).unwrap();
    (repo, id)
  }

  #[test]
  fn delete_itinerario_bloqueado_con_turistas() {
    let (repo, id) = repo_con_itinerario(true);
    let r = repo.delete_itinerario(&id);
    assert!(matches!(r, Err(DomainError::Conflicto(_))));
    assert!(repo.get_itinerario(&id).unwrap().is_some());
  }

  #[test]
  fn delete_itinerario_sin_turistas() {
    let (repo, id) = repo_con_itinerario(false);
    repo.delete_itinerario(&id).unwrap();
    assert!(repo.get_itinerario(&id).unwrap().is_none());
  }

  #[test]
  fn save_itinerario_es_idempotente_por_command_id() {
    let repo = InMemoryDomainRepository::new();
    let cid = Uuid::new_v4();
    let grupo = Grupo::new("Los Andes", None).unwrap();
    let it1 = Itinerario::new(grupo.clone(), "2025-11-01".parse().unwrap(), "2025-11-10".parse().unwrap(), 1).unwrap();
    let it2 = Itinerario::new(grupo, "2025-11-01".parse().unwrap(), "2025-11-10".parse().unwrap(), 1).unwrap();
    let a = repo.save_itinerario(it1, Some(cid)).unwrap();
    let b = repo.save_itinerario(it2, Some(cid)).unwrap();
    assert_eq!(a, b);
    assert_eq!(repo.list_itinerarios().unwrap().len(), 1);
  }

  #[test]
  fn delete_turista_bloqueado_si_esta_en_itinerario() {
    let (repo, _id) = repo_con_itinerario(true);
    let tid = repo.list_turistas().unwrap()[0].id();
    assert!(matches!(repo.delete_turista(&tid), Err(DomainError::Conflicto(_))));
  }

  #[test]
  fn documento_duplicado_rechazado() {
    let repo = InMemoryDomainRepository::new();
    let a = Turista::new("Ana", "Quispe", "71234567", "ana@example.com", "987654321", "Perú").unwrap();
    let b = Turista::new("Luis", "Mamani", "71234567", "luis@example.com", "987654322", "Perú").unwrap();
    repo.save_turista(a).unwrap();
    assert!(matches!(repo.save_turista(b), Err(DomainError::Conflicto(_))));
  }

  #[test]
  fn notificaciones_descartadas_no_se_listan() {
    let repo = InMemoryDomainRepository::new();
    let tid = Uuid::new_v4();
    let n1 = Notificacion::new(tid, "Recojo", "07:30").unwrap();
    let n2 = Notificacion::new(tid, "Tren", "06:10").unwrap();
    let id1 = repo.save_notificacion(n1).unwrap();
    repo.save_notificacion(n2).unwrap();
    repo.descartar_notificacion(&id1).unwrap();
    let vivas = repo.list_notificaciones(&tid).unwrap();
    assert_eq!(vivas.len(), 1);
    assert_eq!(vivas[0].titulo(), "Tren");
  }

  #[test]
  fn set_estado_turista_actualiza() {
    let repo = InMemoryDomainRepository::new();
    let t = Turista::new("Ana", "Quispe", "71234567", "ana@example.com", "987654321", "Perú").unwrap();
    let id = repo.save_turista(t).unwrap();
    repo.set_estado_turista(&id, EstadoTurista::Inactivo).unwrap();
    assert!(!repo.get_turista(&id).unwrap().unwrap().es_activo());
  }

  #[test]
  fn update_grupo_reemplaza_el_registro_existente() {
    let repo = InMemoryDomainRepository::new();
    let g = Grupo::new("Los Andes", None).unwrap();
    let id = repo.save_grupo(g.clone()).unwrap();
    let renombrado = g.renombrar("Los Andes Sur").unwrap();
    repo.update_grupo(renombrado).unwrap();
    assert_eq!(repo.get_grupo(&id).unwrap().unwrap().nombre(), "Los Andes Sur");
    assert_eq!(repo.list_grupos().unwrap().len(), 1);
  }

  #[test]
  fn update_grupo_requiere_registro_previo() {
    let repo = InMemoryDomainRepository::new();
    let fantasma = Grupo::new("Fantasma", None).unwrap();
    assert!(matches!(repo.update_grupo(fantasma), Err(DomainError::NoEncontrado(_))));
  }

  #[test]
  fn contacto_actualizado_se_guarda_con_el_mismo_id() {
    let repo = InMemoryDomainRepository::new();
    let t = Turista::new("Ana", "Quispe", "71234567", "ana@example.com", "987654321", "Perú").unwrap();
    let id = repo.save_turista(t.clone()).unwrap();
    let con_contacto = t.actualizar_contacto("nuevo@example.com", "+51911222333").unwrap();
    assert_eq!(repo.save_turista(con_contacto).unwrap(), id);
    let guardado = repo.get_turista(&id).unwrap().unwrap();
    assert_eq!(guardado.email(), "nuevo@example.com");
    assert_eq!(repo.list_turistas().unwrap().len(), 1);
  }

  #[test]
  fn programas_y_transportes_de_referencia() {
    let repo = InMemoryDomainRepository::new();
    let p = Programa::new("City tour Cusco", TipoPrograma::Tour, None, 80.0).unwrap();
    let t = Transporte::new("Turismo Andino", TipoTransporte::Bus, 40).unwrap();
    let pid = repo.save_programa(p).unwrap();
    let tid = repo.save_transporte(t).unwrap();
    assert!(repo.get_programa(&pid).unwrap().is_some());
    assert!(repo.get_transporte(&tid).unwrap().is_some());
    assert_eq!(repo.list_programas().unwrap().len(), 1);
    assert_eq!(repo.list_transportes().unwrap().len(), 1);
  }
}
