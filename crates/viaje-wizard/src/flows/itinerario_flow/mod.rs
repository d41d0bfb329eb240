pub mod itinerario_flow;
pub mod steps;

pub use itinerario_flow::{grafo_itinerario, hay_programa_machu, ItinerarioFlow};

/// Ids de los pasos del asistente de itinerarios. Coinciden con los ids del
/// grafo y con las claves de slice en el borrador.
pub const PASO_GRUPO: &str = "grupo";
pub const PASO_DATOS: &str = "datos";
pub const PASO_TURISTAS: &str = "turistas";
pub const PASO_PROGRAMAS: &str = "programas";
pub const PASO_TRANSPORTE: &str = "transporte";
pub const PASO_MACHU: &str = "machu";
pub const PASO_RESUMEN: &str = "resumen";
