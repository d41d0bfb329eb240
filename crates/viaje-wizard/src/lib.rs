//! Flujo de itinerarios turísticos sobre el motor genérico de asistentes
//! (`wizard`).
//!
//! El crate define los formularios tipados de cada paso (grupo, datos,
//! turistas, programas, transporte y el paso condicional Machu Picchu), el
//! controlador `ItinerarioFlow` que los orquesta y el resumen de solo
//! lectura del borrador. La persistencia entra por el trait
//! `DomainRepository` de `viaje-domain` y solo se toca en el envío final.
//!
//! ```no_run
//! use std::sync::Arc;
//! use viaje_wizard::ItinerarioFlow;
//! use viaje_domain::InMemoryDomainRepository;
//!
//! let repo = Arc::new(InMemoryDomainRepository::new());
//! let mut flujo = ItinerarioFlow::new(repo).unwrap();
//! let (pos, total) = flujo.progreso();
//! assert_eq!((pos, total), (1, 6));
//! ```
pub mod errors;
pub mod flows;
pub mod resumen;
pub mod step;

pub use errors::WorkflowError;
pub use flows::itinerario_flow::{grafo_itinerario, hay_programa_machu, ItinerarioFlow, PASO_DATOS, PASO_GRUPO,
                                 PASO_MACHU, PASO_PROGRAMAS, PASO_RESUMEN, PASO_TRANSPORTE, PASO_TURISTAS};
pub use resumen::Resumen;
pub use step::{StepContext, StepForm};
