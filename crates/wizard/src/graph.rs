// Archivo: graph.rs
// Propósito: la lista declarativa de pasos. Cada paso lleva un predicado
// opcional sobre el borrador; la secuencia activa se recalcula en cada
// transición, de modo que "siguiente" y "anterior" comparten una única regla
// en lugar de ramas if/else duplicadas.
use crate::draft::DraftStore;
use crate::errors::{Result, WizardError};

/// Predicado de presencia de un paso, evaluado sobre el borrador actual.
pub type StepPredicate = fn(&DraftStore) -> bool;

/// Definición de un paso del asistente.
#[derive(Clone)]
pub struct StepDef {
    pub id: &'static str,
    pub titulo: &'static str,
    predicate: Option<StepPredicate>,
}

impl StepDef {
    /// Paso incondicional: siempre presente.
    pub fn siempre(id: &'static str, titulo: &'static str) -> Self {
        Self { id, titulo, predicate: None }
    }

    /// Paso condicional: presente solo cuando el predicado es verdadero para
    /// el borrador actual.
    pub fn condicional(id: &'static str, titulo: &'static str, predicate: StepPredicate) -> Self {
        Self { id, titulo, predicate: Some(predicate) }
    }

    pub fn es_condicional(&self) -> bool {
        self.predicate.is_some()
    }

    /// Evalúa la presencia del paso para el borrador dado.
    pub fn activo(&self, store: &DraftStore) -> bool {
        match self.predicate {
            None => true,
            Some(pred) => pred(store),
        }
    }
}

impl std::fmt::Debug for StepDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepDef")
         .field("id", &self.id)
         .field("titulo", &self.titulo)
         .field("condicional", &self.es_condicional())
         .finish()
    }
}

/// Grafo (lista ordenada) de pasos del asistente.
pub struct StepGraph {
    steps: Vec<StepDef>,
}

impl StepGraph {
    /// Construye el grafo. Reglas estructurales:
    /// - al menos dos pasos,
    /// - ids únicos,
    /// - el primer y el último paso deben ser incondicionales (el asistente
    ///   siempre tiene un punto de entrada y un paso final de resumen).
    pub fn new(steps: Vec<StepDef>) -> Result<Self> {
        if steps.len() < 2 {
            return Err(WizardError::Transicion("un asistente necesita al menos dos pasos".to_string()));
        }
        for (i, s) in steps.iter().enumerate() {
            if steps.iter().skip(i + 1).any(|o| o.id == s.id) {
                return Err(WizardError::Transicion(format!("id de paso duplicado: '{}'", s.id)));
            }
        }
        if steps.first().map(|s| s.es_condicional()).unwrap_or(true) {
            return Err(WizardError::Transicion("el primer paso no puede ser condicional".to_string()));
        }
        if steps.last().map(|s| s.es_condicional()).unwrap_or(true) {
            return Err(WizardError::Transicion("el último paso no puede ser condicional".to_string()));
        }
        Ok(Self { steps })
    }

    /// Definición de un paso por id, activo o no.
    pub fn get(&self, id: &str) -> Result<&StepDef> {
        self.steps
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| WizardError::NoEncontrado(format!("paso '{}'", id)))
    }

    /// Primer paso del asistente (incondicional por construcción).
    pub fn first(&self) -> &StepDef {
        &self.steps[0]
    }

    /// Pasos activos para el borrador actual, en orden.
    pub fn active(&self, store: &DraftStore) -> Vec<&StepDef> {
        self.steps.iter().filter(|s| s.activo(store)).collect()
    }

    /// Cantidad de pasos activos para el borrador actual.
    pub fn step_count(&self, store: &DraftStore) -> usize {
        self.active(store).len()
    }

    /// Posición 1-based de un paso dentro de la secuencia activa.
    pub fn position(&self, id: &str, store: &DraftStore) -> Option<usize> {
        self.active(store).iter().position(|s| s.id == id).map(|i| i + 1)
    }

    /// Siguiente paso activo después de `id`. `None` si `id` es el último.
    pub fn next_after(&self, id: &str, store: &DraftStore) -> Result<Option<&StepDef>> {
        let idx = self.index_of(id)?;
        Ok(self.steps[idx + 1..].iter().find(|s| s.activo(store)))
    }

    /// Paso activo anterior a `id`. `None` si `id` es el primero.
    pub fn prev_before(&self, id: &str, store: &DraftStore) -> Result<Option<&StepDef>> {
        let idx = self.index_of(id)?;
        Ok(self.steps[..idx].iter().rev().find(|s| s.activo(store)))
    }

    /// Pasos condicionales actualmente inactivos (candidatos a poda de
    /// slices).
    pub fn inactivos(&self, store: &DraftStore) -> Vec<&StepDef> {
        self.steps
            .iter()
            .filter(|s| s.es_condicional() && !s.activo(store))
            .collect()
    }

    fn index_of(&self, id: &str) -> Result<usize> {
        self.steps
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| WizardError::NoEncontrado(format!("paso '{}'", id)))
    }
}
