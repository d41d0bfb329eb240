// Archivo: engine.rs
// Propósito: implementar la estructura del `WizardEngine`.
//
// El motor es deliberadamente pequeño: mantiene el paso actual, el borrador
// acumulado y aplica la regla de transición del grafo. La validación de los
// formularios corre fuera de este crate; el motor recibe payloads ya
// validados en `next` y payloads sin validar en `back` (edición a medias del
// paso que se abandona).
use crate::draft::DraftStore;
use crate::errors::{Result, WizardError};
use crate::graph::{StepDef, StepGraph};
use serde_json::Value as JsonValue;

/// Motor del asistente: índice de paso + borrador + modo edición.
///
/// Invariantes que mantiene:
/// - `current` siempre nombra un paso del grafo.
/// - Tras cada mutación del borrador se podan los slices de pasos
///   condicionales que dejaron de estar activos, de modo que el borrador
///   nunca retiene datos de un paso que el asistente ya no presenta.
/// - En modo lectura la navegación es libre pero toda mutación del borrador
///   se rechaza con `SoloLectura`.
pub struct WizardEngine {
    graph: StepGraph,
    store: DraftStore,
    current: String,
    editable: bool,
}

impl WizardEngine {
    /// Crea un motor posicionado en el primer paso, con borrador vacío y en
    /// modo edición.
    pub fn new(graph: StepGraph) -> Self {
        let current = graph.first().id.to_string();
        Self { graph, store: DraftStore::new(), current, editable: true }
    }

    /// Paso actual.
    pub fn current_step(&self) -> &StepDef {
        // `current` siempre es un id válido del grafo
        self.graph.get(&self.current).expect("paso actual válido")
    }

    pub fn store(&self) -> &DraftStore {
        &self.store
    }

    /// Payload ya acumulado para un paso, si existe.
    pub fn slice(&self, step_id: &str) -> Option<&JsonValue> {
        self.store.get(step_id)
    }

    /// Ids de los pasos activos para el borrador actual, en orden.
    pub fn active_steps(&self) -> Vec<&'static str> {
        self.graph.active(&self.store).iter().map(|s| s.id).collect()
    }

    /// Cantidad de pasos activos.
    pub fn step_count(&self) -> usize {
        self.graph.step_count(&self.store)
    }

    /// Posición 1-based del paso actual y total de pasos activos.
    pub fn progress(&self) -> (usize, usize) {
        let total = self.step_count();
        let pos = self.graph.position(&self.current, &self.store).unwrap_or(1);
        (pos, total)
    }

    pub fn is_first(&self) -> bool {
        matches!(self.graph.prev_before(&self.current, &self.store), Ok(None))
    }

    pub fn is_last(&self) -> bool {
        matches!(self.graph.next_after(&self.current, &self.store), Ok(None))
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    /// Cambia entre edición y solo lectura sin mover el paso actual.
    pub fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
    }

    /// Avanza al siguiente paso activo.
    ///
    /// `payload`: el slice ya validado del paso actual, o `None` para navegar
    /// sin tocar el borrador (modo lectura). Los predicados se reevalúan
    /// después de la mezcla, así que completar un paso puede insertar o
    /// retirar pasos condicionales más adelante en la secuencia.
    pub fn next(&mut self, payload: Option<JsonValue>) -> Result<&StepDef> {
        // El último paso del grafo es incondicional, así que aquí `None`
        // depende solo de la posición: comprobarlo antes de mezclar evita
        // mutar el borrador en el camino de error.
        if self.graph.next_after(&self.current, &self.store)?.is_none() {
            return Err(WizardError::Transicion(format!("'{}' es el último paso", self.current)));
        }
        if let Some(p) = payload {
            self.merge(&self.current.clone(), p)?;
        }
        let siguiente = self.graph
                            .next_after(&self.current, &self.store)?
                            .ok_or_else(|| WizardError::Transicion(format!("'{}' es el último paso", self.current)))?;
        tracing::debug!(desde = %self.current, hacia = %siguiente.id, "avance de paso");
        self.current = siguiente.id.to_string();
        Ok(self.current_step())
    }

    /// Retrocede al paso activo anterior.
    ///
    /// `in_progress`: ediciones a medias del paso que se abandona; se guardan
    /// sin validar para que el formulario se repueble al volver.
    pub fn back(&mut self, in_progress: Option<JsonValue>) -> Result<&StepDef> {
        // Misma comprobación previa que en `next`: el primer paso también es
        // incondicional.
        if self.graph.prev_before(&self.current, &self.store)?.is_none() {
            return Err(WizardError::Transicion(format!("'{}' es el primer paso", self.current)));
        }
        if let Some(p) = in_progress {
            self.merge(&self.current.clone(), p)?;
        }
        let anterior = self.graph
                           .prev_before(&self.current, &self.store)?
                           .ok_or_else(|| WizardError::Transicion(format!("'{}' es el primer paso", self.current)))?;
        tracing::debug!(desde = %self.current, hacia = %anterior.id, "retroceso de paso");
        self.current = anterior.id.to_string();
        Ok(self.current_step())
    }

    /// Salta directamente a un paso activo (navegación en modo edición).
    pub fn goto(&mut self, step_id: &str) -> Result<&StepDef> {
        let def = self.graph.get(step_id)?;
        if !def.activo(&self.store) {
            return Err(WizardError::Transicion(format!("el paso '{}' no está activo para este borrador", step_id)));
        }
        self.current = def.id.to_string();
        Ok(self.current_step())
    }

    /// Carga el borrador completo de una sola vez (modo edición) y deja el
    /// motor en el primer paso.
    pub fn hydrate<I>(&mut self, slices: I)
        where I: IntoIterator<Item = (String, JsonValue)>
    {
        self.store.hydrate(slices);
        self.prune();
        self.current = self.graph.first().id.to_string();
    }

    /// Vacía el borrador y vuelve al primer paso (tras un envío exitoso o al
    /// abandonar el asistente).
    pub fn reset(&mut self) {
        self.store.clear();
        self.current = self.graph.first().id.to_string();
    }

    /// Huella del borrador para detección de cambios sin guardar.
    pub fn fingerprint(&self) -> String {
        self.store.fingerprint()
    }

    fn merge(&mut self, step_id: &str, payload: JsonValue) -> Result<()> {
        if !self.editable {
            return Err(WizardError::SoloLectura(format!("no se puede modificar el paso '{}'", step_id)));
        }
        self.store.put(step_id, payload);
        self.prune();
        Ok(())
    }

    /// Retira del borrador los slices de pasos condicionales que dejaron de
    /// estar activos tras la última mezcla.
    fn prune(&mut self) {
        let inactivos: Vec<&'static str> = self.graph.inactivos(&self.store).iter().map(|s| s.id).collect();
        for id in inactivos {
            if self.store.remove(id) {
                tracing::debug!(paso = id, "slice podado: el paso dejó de estar activo");
            }
        }
    }
}
