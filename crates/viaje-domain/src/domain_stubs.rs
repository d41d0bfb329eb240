// domain_stubs.rs
use crate::domain_repository::{DomainRepository, InMemoryDomainRepository};
use crate::{Grupo, Programa, TipoPrograma, TipoTransporte, Transporte, Turista};

pub struct DomainStubs;

impl DomainStubs {
  /// Crea un repositorio en memoria pre-poblado con datos de referencia de
  /// ejemplo: un grupo, dos turistas, tres programas (uno Machu Picchu) y
  /// dos transportes. Lo usan la demo CLI y las pruebas de integración.
  pub fn sample_repo() -> InMemoryDomainRepository {
    let repo = InMemoryDomainRepository::new();

    let grupo = Grupo::new("Los Andes", Some("Salida noviembre".into())).unwrap();
    repo.save_grupo(grupo).unwrap();

    let t1 = Turista::new("Ana", "Quispe", "71234567", "ana@example.com", "+51987654321", "Perú").unwrap();
    let t2 = Turista::new("Luis", "Mamani", "AB123456", "luis@example.com", "+51912345678", "Bolivia").unwrap();
    repo.save_turista(t1).unwrap();
    repo.save_turista(t2).unwrap();

    let p1 = Programa::new("City tour Cusco", TipoPrograma::Tour, Some("Medio día".into()), 80.0).unwrap();
    let p2 = Programa::new("Valle Sagrado", TipoPrograma::Tour, Some("Día completo".into()), 150.0).unwrap();
    let p3 = Programa::new("Machu Picchu clásico", TipoPrograma::MachuPicchu, Some("Tren + ciudadela".into()), 450.0).unwrap();
    repo.save_programa(p1).unwrap();
    repo.save_programa(p2).unwrap();
    repo.save_programa(p3).unwrap();

    let tr1 = Transporte::new("Turismo Andino", TipoTransporte::Bus, 40).unwrap();
    let tr2 = Transporte::new("Qorianka Tours", TipoTransporte::Van, 12).unwrap();
    repo.save_transporte(tr1).unwrap();
    repo.save_transporte(tr2).unwrap();

    repo
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn sample_repo_siembra_todos_los_datos() {
    let repo = DomainStubs::sample_repo();
    assert_eq!(repo.list_grupos().unwrap().len(), 1);
    assert_eq!(repo.list_turistas().unwrap().len(), 2);
    assert_eq!(repo.list_transportes().unwrap().len(), 2);
    let programas = repo.list_programas().unwrap();
    assert_eq!(programas.len(), 3);
    assert!(programas.iter().any(|p| p.tipo() == TipoPrograma::MachuPicchu));
  }
}
