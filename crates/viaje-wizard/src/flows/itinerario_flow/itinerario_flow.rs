// itinerario_flow.rs
//
// Controlador del asistente de itinerarios: arma el grafo de pasos, delega
// la validación en los formularios y acumula el borrador en el motor
// genérico. El envío es diferido: nada se escribe en el repositorio hasta
// `submit`, que compone el `Itinerario` completo y lo persiste de una vez.
use crate::errors::WorkflowError;
use crate::flows::itinerario_flow::steps::{DatosPayload, DatosStep, DetalleMachuEntrada, GrupoPayload, GrupoStep,
                                           MachuPayload, MachuStep, ProgramaEntrada, ProgramasPayload, ProgramasStep,
                                           RecojoEntrada, TransportePayload, TransporteStep, TuristaEntrada,
                                           TuristasPayload, TuristasStep};
use crate::flows::itinerario_flow::{PASO_DATOS, PASO_GRUPO, PASO_MACHU, PASO_PROGRAMAS, PASO_RESUMEN, PASO_TRANSPORTE,
                                    PASO_TURISTAS};
use crate::resumen::Resumen;
use crate::step::{StepContext, StepForm};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use uuid::Uuid;
use viaje_domain::{AsignacionTransporte, DetalleMachu, DomainError, DomainRepository, Grupo, Itinerario,
                   ProgramaAgendado};
use wizard::{DraftStore, StepDef, StepGraph, WizardEngine};

/// Predicado del paso Machu Picchu: verdadero cuando el slice de programas
/// tiene al menos una entrada marcada como machu. Se reevalúa en cada
/// transición, así que editar los programas inserta o retira el paso.
pub fn hay_programa_machu(store: &DraftStore) -> bool {
  store.get(PASO_PROGRAMAS)
       .and_then(|p| serde_json::from_value::<ProgramasPayload>(p.clone()).ok())
       .map(|p| p.tiene_machu())
       .unwrap_or(false)
}

/// Grafo declarativo del asistente: la única fuente de verdad para
/// "siguiente" y "anterior".
pub fn grafo_itinerario() -> Result<StepGraph, WorkflowError> {
  let graph = StepGraph::new(vec![StepDef::siempre(PASO_GRUPO, "Grupo"),
                                  StepDef::siempre(PASO_DATOS, "Datos del itinerario"),
                                  StepDef::siempre(PASO_TURISTAS, "Turistas"),
                                  StepDef::siempre(PASO_PROGRAMAS, "Programas"),
                                  StepDef::siempre(PASO_TRANSPORTE, "Transporte"),
                                  StepDef::condicional(PASO_MACHU, "Machu Picchu", hay_programa_machu),
                                  StepDef::siempre(PASO_RESUMEN, "Resumen")])?;
  Ok(graph)
}

/// Controlador del asistente de creación/edición de itinerarios.
pub struct ItinerarioFlow {
  id: Uuid,
  engine: WizardEngine,
  ctx: StepContext,
  forms: Vec<Box<dyn StepForm>>,
  /// true cuando el asistente edita un itinerario ya persistido.
  modo_edicion: bool,
  itinerario_id: Option<Uuid>,
  /// Guardia contra envíos reentrantes (doble click en "enviar").
  enviando: bool,
  /// Huella del borrador tal como se cargó/persistió por última vez.
  huella_guardada: String,
}

impl ItinerarioFlow {
  fn forms() -> Vec<Box<dyn StepForm>> {
    vec![Box::new(GrupoStep),
         Box::new(DatosStep),
         Box::new(TuristasStep),
         Box::new(ProgramasStep),
         Box::new(TransporteStep),
         Box::new(MachuStep)]
  }

  /// Asistente de creación: borrador vacío, primer paso, modo edición.
  pub fn new(domain_repo: Arc<dyn DomainRepository>) -> Result<Self, WorkflowError> {
    let engine = WizardEngine::new(grafo_itinerario()?);
    let huella_guardada = engine.fingerprint();
    Ok(Self { id: Uuid::new_v4(),
              engine,
              ctx: StepContext::new(domain_repo),
              forms: Self::forms(),
              modo_edicion: false,
              itinerario_id: None,
              enviando: false,
              huella_guardada })
  }

  /// Asistente de edición: hidrata el borrador una única vez desde el
  /// itinerario persistido y arranca en modo solo lectura; `set_editable`
  /// alterna a edición sin cambiar de paso.
  pub fn editar(itinerario: &Itinerario, domain_repo: Arc<dyn DomainRepository>) -> Result<Self, WorkflowError> {
    let mut flujo = Self::new(domain_repo)?;
    flujo.modo_edicion = true;
    flujo.itinerario_id = Some(itinerario.id());
    flujo.engine.hydrate(Self::slices_desde(itinerario)?);
    flujo.engine.set_editable(false);
    flujo.huella_guardada = flujo.engine.fingerprint();
    Ok(flujo)
  }

  /// Convierte un itinerario persistido en los slices del borrador. Las
  /// referencias colgantes (recojos o detalles sobre programas ya retirados)
  /// se omiten con una advertencia.
  fn slices_desde(it: &Itinerario) -> Result<Vec<(String, JsonValue)>, WorkflowError> {
    let mut slices = Vec::new();

    let grupo = GrupoPayload::Existente { grupo_id: it.grupo().id(), nombre: it.grupo().nombre().to_string() };
    slices.push((PASO_GRUPO.to_string(), serde_json::to_value(grupo)?));

    let datos = DatosPayload { fecha_inicio: it.fecha_inicio(),
                               fecha_fin: it.fecha_fin(),
                               estado_presupuesto_id: it.estado_presupuesto_id() };
    slices.push((PASO_DATOS.to_string(), serde_json::to_value(datos)?));

    let turistas = TuristasPayload { turistas: it.turistas()
                                                 .iter()
                                                 .map(|t| TuristaEntrada { turista_id: t.id(),
                                                                           nombre_completo: t.nombre_completo(),
                                                                           documento: t.documento().to_string() })
                                                 .collect() };
    slices.push((PASO_TURISTAS.to_string(), serde_json::to_value(turistas)?));

    let entradas: Vec<ProgramaEntrada> =
      it.programas()
        .iter()
        .map(|p| ProgramaEntrada { programa_id: p.programa().id(),
                                   nombre: p.programa().nombre().to_string(),
                                   tipo: p.programa().tipo().to_string(),
                                   costo: p.programa().costo(),
                                   es_machu: p.es_machu(),
                                   fecha: p.fecha(),
                                   hora_inicio: p.hora_inicio(),
                                   hora_fin: p.hora_fin() })
        .collect();
    slices.push((PASO_PROGRAMAS.to_string(), serde_json::to_value(ProgramasPayload { entradas })?));

    let idx_de = |programa_id: Uuid| it.programas().iter().position(|p| p.id() == programa_id);

    let mut recojos = Vec::new();
    for asig in it.transportes() {
      match idx_de(asig.programa_id()) {
        Some(idx) => recojos.push(RecojoEntrada { programa_idx: idx,
                                                  programa_nombre: it.programas()[idx].programa().nombre().to_string(),
                                                  transporte_id: asig.transporte().id(),
                                                  empresa: asig.transporte().empresa().to_string(),
                                                  punto_recojo: asig.punto_recojo().to_string(),
                                                  hora_recojo: asig.hora_recojo() }),
        None => tracing::warn!(recojo = %asig.id(), "recojo omitido: referencia un programa retirado"),
      }
    }
    slices.push((PASO_TRANSPORTE.to_string(), serde_json::to_value(TransportePayload { recojos })?));

    let mut detalles = Vec::new();
    for det in it.detalles_machu() {
      match idx_de(det.programa_id()) {
        Some(idx) => detalles.push(DetalleMachuEntrada { programa_idx: idx,
                                                         programa_nombre: it.programas()[idx].programa()
                                                                                             .nombre()
                                                                                             .to_string(),
                                                         tren_empresa: det.tren_empresa().to_string(),
                                                         tren_numero: det.tren_numero().map(|n| n.to_string()),
                                                         hora_tren: det.hora_tren(),
                                                         guia_nombre: det.guia_nombre().to_string(),
                                                         guia_telefono: det.guia_telefono().map(|t| t.to_string()) }),
        None => tracing::warn!(detalle = %det.id(), "detalle machu omitido: referencia un programa retirado"),
      }
    }
    if !detalles.is_empty() {
      slices.push((PASO_MACHU.to_string(), serde_json::to_value(MachuPayload { detalles })?));
    }

    Ok(slices)
  }

  pub fn id(&self) -> Uuid {
    self.id
  }

  pub fn modo_edicion(&self) -> bool {
    self.modo_edicion
  }

  pub fn paso_actual(&self) -> &StepDef {
    self.engine.current_step()
  }

  /// Posición 1-based del paso actual y total de pasos activos.
  pub fn progreso(&self) -> (usize, usize) {
    self.engine.progress()
  }

  pub fn pasos_activos(&self) -> Vec<&'static str> {
    self.engine.active_steps()
  }

  pub fn step_count(&self) -> usize {
    self.engine.step_count()
  }

  pub fn es_editable(&self) -> bool {
    self.engine.is_editable()
  }

  /// Alterna edición/solo lectura sin cambiar de paso.
  pub fn set_editable(&mut self, editable: bool) {
    self.engine.set_editable(editable);
  }

  /// El borrador difiere de lo último cargado o persistido.
  pub fn cambios_sin_guardar(&self) -> bool {
    self.engine.fingerprint() != self.huella_guardada
  }

  /// Payload acumulado de un paso, si existe (repuebla el formulario al
  /// navegar hacia atrás).
  pub fn slice(&self, step_id: &str) -> Option<&JsonValue> {
    self.engine.slice(step_id)
  }

  pub fn store(&self) -> &DraftStore {
    self.engine.store()
  }

  /// Avanza: valida el formulario del paso actual, mezcla su slice
  /// normalizado y mueve el índice. Una validación fallida bloquea el avance
  /// y devuelve el mapa de errores por campo.
  pub fn next(&mut self, input: &JsonValue) -> Result<&StepDef, WorkflowError> {
    let actual = self.engine.current_step().id;
    if actual == PASO_RESUMEN {
      return Err(WorkflowError::Validation("Desde el resumen solo se puede enviar o retroceder".to_string()));
    }
    let form = self.forms
                   .iter()
                   .find(|f| f.name() == actual)
                   .ok_or_else(|| WorkflowError::Other(format!("paso sin formulario: '{}'", actual)))?;
    form.validate(&self.ctx, self.engine.store(), input)?;
    let slice = form.slice(&self.ctx, self.engine.store(), input)?;
    let paso = self.engine.next(Some(slice))?;
    Ok(paso)
  }

  /// Avanza sin tocar el borrador (navegación en modo solo lectura).
  pub fn next_sin_cambios(&mut self) -> Result<&StepDef, WorkflowError> {
    let paso = self.engine.next(None)?;
    Ok(paso)
  }

  /// Retrocede, guardando sin validar las ediciones a medias del paso que se
  /// abandona.
  pub fn back(&mut self, in_progress: Option<JsonValue>) -> Result<&StepDef, WorkflowError> {
    let paso = self.engine.back(in_progress)?;
    Ok(paso)
  }

  /// Resumen de solo lectura del borrador acumulado.
  pub fn resumen(&self) -> Result<Resumen, WorkflowError> {
    Resumen::desde_borrador(self.engine.store())
  }

  /// Envío final: compone el `Itinerario` completo desde el borrador y lo
  /// persiste de una sola vez. En éxito el borrador se vacía; en fallo queda
  /// intacto para reintentar. `command_id` da idempotencia a nivel de
  /// repositorio frente a reintentos del mismo envío.
  pub fn submit(&mut self, command_id: Option<Uuid>) -> Result<Uuid, WorkflowError> {
    if self.enviando {
      return Err(WorkflowError::Validation("Ya hay un envío en curso".to_string()));
    }
    if self.engine.current_step().id != PASO_RESUMEN {
      return Err(WorkflowError::Validation("El envío se realiza desde el paso de resumen".to_string()));
    }
    if !self.engine.is_editable() {
      return Err(WorkflowError::Validation("El asistente está en modo solo lectura".to_string()));
    }
    self.enviando = true;
    let resultado = self.enviar(command_id);
    self.enviando = false;
    match resultado {
      Ok(id) => {
        tracing::info!(itinerario = %id, "envío exitoso, borrador reiniciado");
        self.engine.reset();
        self.huella_guardada = self.engine.fingerprint();
        Ok(id)
      }
      Err(e) => {
        tracing::warn!(error = %e, "envío fallido, el borrador queda intacto");
        Err(e)
      }
    }
  }

  fn enviar(&self, command_id: Option<Uuid>) -> Result<Uuid, WorkflowError> {
    let (itinerario, grupo_nuevo) = self.construir_itinerario()?;
    // Commit diferido: el grupo nuevo recién se crea aquí, después de que
    // todo el armado validó. Un asistente abandonado no deja nada escrito.
    if let Some(grupo) = grupo_nuevo {
      self.ctx.domain_repo.save_grupo(grupo)?;
    }
    if self.modo_edicion {
      let id = itinerario.id();
      self.ctx.domain_repo.update_itinerario(itinerario)?;
      Ok(id)
    } else {
      let id = self.ctx.domain_repo.save_itinerario(itinerario, command_id)?;
      Ok(id)
    }
  }

  /// Compone el agregado completo desde los slices. Devuelve además el grupo
  /// nuevo todavía no persistido, si el paso de grupo lo describió.
  fn construir_itinerario(&self) -> Result<(Itinerario, Option<Grupo>), WorkflowError> {
    let store = self.engine.store();
    let falta = |paso: &str| WorkflowError::Validation(format!("Falta completar el paso '{}'", paso));

    let grupo_payload = GrupoPayload::recover_from(store.get(PASO_GRUPO).ok_or_else(|| falta(PASO_GRUPO))?)?;
    let datos = DatosPayload::recover_from(store.get(PASO_DATOS).ok_or_else(|| falta(PASO_DATOS))?)?;
    let turistas = TuristasPayload::recover_from(store.get(PASO_TURISTAS).ok_or_else(|| falta(PASO_TURISTAS))?)?;
    let programas = ProgramasPayload::recover_from(store.get(PASO_PROGRAMAS).ok_or_else(|| falta(PASO_PROGRAMAS))?)?;
    let transporte = store.get(PASO_TRANSPORTE).map(|p| TransportePayload::recover_from(p)).transpose()?;
    let machu = store.get(PASO_MACHU).map(|p| MachuPayload::recover_from(p)).transpose()?;

    let (grupo, grupo_nuevo) = match grupo_payload {
      GrupoPayload::Existente { grupo_id, .. } => {
        let g = self.ctx
                    .domain_repo
                    .get_grupo(&grupo_id)?
                    .ok_or_else(|| DomainError::NoEncontrado(format!("Grupo {}", grupo_id)))?;
        (g, None)
      }
      GrupoPayload::Nuevo { nombre, descripcion } => {
        let g = Grupo::new(&nombre, descripcion)?;
        (g.clone(), Some(g))
      }
    };

    let mut itinerario = Itinerario::new(grupo, datos.fecha_inicio, datos.fecha_fin, datos.estado_presupuesto_id)?;
    if let Some(id) = self.itinerario_id {
      itinerario = itinerario.con_id(id);
    }

    for entrada in &turistas.turistas {
      let t = self.ctx
                  .domain_repo
                  .get_turista(&entrada.turista_id)?
                  .ok_or_else(|| DomainError::NoEncontrado(format!("Turista {}", entrada.turista_id)))?;
      itinerario.agregar_turista(t)?;
    }

    // ids reales de los programas agendados, por posición de entrada
    let mut ids_por_idx = Vec::with_capacity(programas.entradas.len());
    for entrada in &programas.entradas {
      let plantilla = self.ctx
                          .domain_repo
                          .get_programa(&entrada.programa_id)?
                          .ok_or_else(|| DomainError::NoEncontrado(format!("Programa {}", entrada.programa_id)))?;
      let agendado = ProgramaAgendado::new(plantilla, entrada.fecha, entrada.hora_inicio, entrada.hora_fin)?;
      ids_por_idx.push(agendado.id());
      itinerario.agregar_programa(agendado)?;
    }

    if let Some(transporte) = transporte {
      for recojo in &transporte.recojos {
        let unidad = self.ctx
                         .domain_repo
                         .get_transporte(&recojo.transporte_id)?
                         .ok_or_else(|| DomainError::NoEncontrado(format!("Transporte {}", recojo.transporte_id)))?;
        let programa_id = ids_por_idx.get(recojo.programa_idx)
                                     .copied()
                                     .ok_or_else(|| {
                                       WorkflowError::Validation(format!("El recojo referencia un programa \
                                                                          inexistente (#{})",
                                                                         recojo.programa_idx + 1))
                                     })?;
        let asignacion = AsignacionTransporte::new(programa_id, unidad, &recojo.punto_recojo, recojo.hora_recojo)?;
        itinerario.agregar_transporte(asignacion)?;
      }
    }

    if let Some(machu) = machu {
      for det in &machu.detalles {
        let programa_id = ids_por_idx.get(det.programa_idx)
                                     .copied()
                                     .ok_or_else(|| {
                                       WorkflowError::Validation(format!("El detalle machu referencia un programa \
                                                                          inexistente (#{})",
                                                                         det.programa_idx + 1))
                                     })?;
        let detalle = DetalleMachu::new(programa_id,
                                        &det.tren_empresa,
                                        det.tren_numero.clone(),
                                        det.hora_tren,
                                        &det.guia_nombre,
                                        det.guia_telefono.clone())?;
        itinerario.agregar_detalle_machu(detalle)?;
      }
    }

    Ok((itinerario, grupo_nuevo))
  }
}
