//! Crate `wizard`: motor genérico de asistentes multi-paso
//!
//! Este crate define el borrador acumulado (`DraftStore`), el grafo
//! declarativo de pasos (`StepGraph`, `StepDef`) y el motor de transiciones
//! (`WizardEngine`). Es agnóstico del dominio: los slices son JSON y los
//! DTOs tipados viven en el crate concreto que arma cada asistente.
//!
//! Diseño resumido:
//! - Secuencia variable: cada paso puede llevar un predicado sobre el
//!   borrador; la lista activa se recalcula en cada transición, así que
//!   "siguiente" y "anterior" comparten una sola regla.
//! - Borrador solo en memoria: se crea vacío, se mezcla slice a slice y se
//!   vacía tras el envío final; `hydrate` lo carga una única vez en modo
//!   edición.
//! - Poda: al dejar de estar activo un paso condicional, su slice se retira
//!   para que el borrador nunca arrastre datos de pasos ausentes.
//!
//! Ejemplo rápido:
//! ```rust
//! use wizard::{StepDef, StepGraph, WizardEngine};
//! let graph = StepGraph::new(vec![StepDef::siempre("datos", "Datos"),
//!                                 StepDef::siempre("resumen", "Resumen")]).unwrap();
//! let engine = WizardEngine::new(graph);
//! assert_eq!(engine.current_step().id, "datos");
//! ```
pub mod draft;
pub mod engine;
pub mod errors;
pub mod graph;

pub use draft::*;
pub use engine::*;
pub use errors::*;
pub use graph::*;
