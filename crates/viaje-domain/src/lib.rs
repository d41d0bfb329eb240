mod detalle_machu;
mod domain_repository;
mod domain_stubs;
mod errors;
mod grupo;
mod itinerario;
mod notificacion;
mod programa;
mod transporte;
mod turista;
pub mod validacion;

pub use detalle_machu::DetalleMachu;
pub use domain_repository::{DomainRepository, InMemoryDomainRepository};
pub use domain_stubs::DomainStubs;
pub use errors::DomainError;
pub use grupo::Grupo;
pub use itinerario::Itinerario;
pub use notificacion::Notificacion;
pub use programa::{Programa, ProgramaAgendado, TipoPrograma};
pub use transporte::{AsignacionTransporte, TipoTransporte, Transporte};
pub use turista::{EstadoTurista, Turista};
