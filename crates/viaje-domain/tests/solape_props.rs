// Propiedades del predicado de solape de programas agendados.
use chrono::{NaiveDate, NaiveTime};
use proptest::prelude::*;
use viaje_domain::{Programa, ProgramaAgendado, TipoPrograma};

fn agendado(fecha: NaiveDate, inicio_min: u32, fin_min: u32) -> ProgramaAgendado {
  let p = Programa::new("City tour", TipoPrograma::Tour, None, 50.0).unwrap();
  let ini = NaiveTime::from_num_seconds_from_midnight_opt(inicio_min * 60, 0).unwrap();
  let fin = NaiveTime::from_num_seconds_from_midnight_opt(fin_min * 60, 0).unwrap();
  ProgramaAgendado::new(p, fecha, ini, fin).unwrap()
}

fn ventana() -> impl Strategy<Value = (u32, u32)> {
  (0u32..1380).prop_flat_map(|ini| (Just(ini), (ini + 1)..=(ini + 60).min(1439)))
}

proptest! {
  #[test]
  fn el_solape_es_simetrico((a_ini, a_fin) in ventana(), (b_ini, b_fin) in ventana()) {
    let fecha: NaiveDate = "2025-11-02".parse().unwrap();
    let a = agendado(fecha, a_ini, a_fin);
    let b = agendado(fecha, b_ini, b_fin);
    prop_assert_eq!(a.se_solapa(&b), b.se_solapa(&a));
  }

  #[test]
  fn un_programa_se_solapa_consigo_mismo((ini, fin) in ventana()) {
    let fecha: NaiveDate = "2025-11-02".parse().unwrap();
    let a = agendado(fecha, ini, fin);
    let b = agendado(fecha, ini, fin);
    prop_assert!(a.se_solapa(&b));
  }

  #[test]
  fn fechas_distintas_nunca_se_solapan((ini, fin) in ventana()) {
    let a = agendado("2025-11-02".parse().unwrap(), ini, fin);
    let b = agendado("2025-11-03".parse().unwrap(), ini, fin);
    prop_assert!(!a.se_solapa(&b));
  }

  #[test]
  fn intervalos_consecutivos_no_se_solapan((ini, fin) in ventana()) {
    // [ini, fin) y [fin, fin+30) comparten solo el borde
    prop_assume!(fin + 30 <= 1439);
    let fecha: NaiveDate = "2025-11-02".parse().unwrap();
    let a = agendado(fecha, ini, fin);
    let b = agendado(fecha, fin, fin + 30);
    prop_assert!(!a.se_solapa(&b));
  }
}
