// Pruebas de integración del asistente de itinerarios: recorridos completos
// con el repositorio en memoria pre-poblado.
use serde_json::{json, Value as JsonValue};
use std::sync::Arc;
use uuid::Uuid;
use viaje_domain::{DomainRepository, DomainStubs, InMemoryDomainRepository};
use viaje_wizard::{ItinerarioFlow, WorkflowError, PASO_GRUPO, PASO_MACHU, PASO_PROGRAMAS};
use wizard::WizardError;

fn repo() -> Arc<InMemoryDomainRepository> {
  Arc::new(DomainStubs::sample_repo())
}

fn programa_id(repo: &InMemoryDomainRepository, nombre: &str) -> Uuid {
  repo.list_programas()
      .unwrap()
      .iter()
      .find(|p| p.nombre().contains(nombre))
      .map(|p| p.id())
      .unwrap()
}

fn entrada_grupo(repo: &InMemoryDomainRepository) -> JsonValue {
  let gid = repo.list_grupos().unwrap()[0].id();
  json!({"modo": "existente", "grupo_id": gid})
}

fn entrada_datos() -> JsonValue {
  json!({"fecha_inicio": "2025-11-01", "fecha_fin": "2025-11-10", "estado_presupuesto_id": 1})
}

fn entrada_turistas(repo: &InMemoryDomainRepository) -> JsonValue {
  let ids: Vec<Uuid> = repo.list_turistas().unwrap().iter().map(|t| t.id()).collect();
  json!({"turista_ids": ids})
}

fn entrada_programas(repo: &InMemoryDomainRepository, con_machu: bool) -> JsonValue {
  let mut programas = vec![json!({"programa_id": programa_id(repo, "City tour"),
                                  "fecha": "2025-11-02",
                                  "hora_inicio": "09:00:00",
                                  "hora_fin": "13:00:00"})];
  if con_machu {
    programas.push(json!({"programa_id": programa_id(repo, "Machu"),
                          "fecha": "2025-11-03",
                          "hora_inicio": "06:00:00",
                          "hora_fin": "18:00:00"}));
  }
  json!({"programas": programas})
}

fn entrada_machu(programa_idx: usize) -> JsonValue {
  json!({"detalles": [{"programa_idx": programa_idx,
                       "tren_empresa": "PeruRail",
                       "tren_numero": "EX-504",
                       "hora_tren": "06:10:00",
                       "guia_nombre": "José Huamán",
                       "guia_telefono": "+51911222333"}]})
}

/// Recorre grupo, datos, turistas y programas; deja el asistente en el paso
/// de transporte.
fn hasta_transporte(flujo: &mut ItinerarioFlow, repo: &InMemoryDomainRepository, con_machu: bool) {
  flujo.next(&entrada_grupo(repo)).unwrap();
  flujo.next(&entrada_datos()).unwrap();
  flujo.next(&entrada_turistas(repo)).unwrap();
  let paso = flujo.next(&entrada_programas(repo, con_machu)).unwrap();
  assert_eq!(paso.id, "transporte");
}

#[test]
fn recorrido_sin_machu_llega_al_resumen_en_seis_pasos() {
  let repo = repo();
  let mut flujo = ItinerarioFlow::new(repo.clone()).unwrap();
  hasta_transporte(&mut flujo, &repo, false);
  assert_eq!(flujo.step_count(), 6);

  let paso = flujo.next(&json!({"recojos": []})).unwrap();
  assert_eq!(paso.id, "resumen");
  assert_eq!(flujo.progreso(), (6, 6));

  let resumen = flujo.resumen().unwrap();
  assert_eq!(resumen.total_turistas, 2);
  assert_eq!(resumen.total_programas, 1);
  assert!((resumen.costo_total - 80.0).abs() < f64::EPSILON);
  assert!(resumen.lineas.iter().any(|l| l == "Programas Seleccionados (1)"));
}

#[test]
fn programa_machu_inserta_el_paso_condicional() {
  let repo = repo();
  let mut flujo = ItinerarioFlow::new(repo.clone()).unwrap();
  hasta_transporte(&mut flujo, &repo, true);
  assert_eq!(flujo.step_count(), 7);
  assert!(flujo.pasos_activos().contains(&"machu"));

  let paso = flujo.next(&json!({"recojos": []})).unwrap();
  assert_eq!(paso.id, "machu");

  // el programa machu quedó en la segunda posición del slice
  let paso = flujo.next(&entrada_machu(1)).unwrap();
  assert_eq!(paso.id, "resumen");
  assert_eq!(flujo.progreso(), (7, 7));

  let resumen = flujo.resumen().unwrap();
  assert_eq!(resumen.total_detalles_machu, 1);
  assert!((resumen.costo_total - 530.0).abs() < f64::EPSILON);
}

#[test]
fn solape_de_horarios_bloquea_el_avance_sin_tocar_el_borrador() {
  let repo = repo();
  let mut flujo = ItinerarioFlow::new(repo.clone()).unwrap();
  flujo.next(&entrada_grupo(&repo)).unwrap();
  flujo.next(&entrada_datos()).unwrap();
  flujo.next(&entrada_turistas(&repo)).unwrap();

  let solapados = json!({"programas": [
    {"programa_id": programa_id(&repo, "City tour"),
     "fecha": "2025-11-02", "hora_inicio": "09:00:00", "hora_fin": "13:00:00"},
    {"programa_id": programa_id(&repo, "Valle"),
     "fecha": "2025-11-02", "hora_inicio": "12:00:00", "hora_fin": "16:00:00"},
  ]});
  let r = flujo.next(&solapados);
  assert!(matches!(r, Err(WorkflowError::Wizard(WizardError::Validacion(_)))));
  assert_eq!(flujo.paso_actual().id, "programas");
  assert!(flujo.slice(PASO_PROGRAMAS).is_none());
}

#[test]
fn intervalos_consecutivos_no_se_solapan() {
  let repo = repo();
  let mut flujo = ItinerarioFlow::new(repo.clone()).unwrap();
  flujo.next(&entrada_grupo(&repo)).unwrap();
  flujo.next(&entrada_datos()).unwrap();
  flujo.next(&entrada_turistas(&repo)).unwrap();

  // [09-13) y [13-16): el fin exclusivo permite encadenar actividades
  let consecutivos = json!({"programas": [
    {"programa_id": programa_id(&repo, "City tour"),
     "fecha": "2025-11-02", "hora_inicio": "09:00:00", "hora_fin": "13:00:00"},
    {"programa_id": programa_id(&repo, "Valle"),
     "fecha": "2025-11-02", "hora_inicio": "13:00:00", "hora_fin": "16:00:00"},
  ]});
  let paso = flujo.next(&consecutivos).unwrap();
  assert_eq!(paso.id, "transporte");
}

#[test]
fn atras_conserva_los_slices_para_repoblar() {
  let repo = repo();
  let mut flujo = ItinerarioFlow::new(repo.clone()).unwrap();
  flujo.next(&entrada_grupo(&repo)).unwrap();
  flujo.next(&entrada_datos()).unwrap();

  let paso = flujo.back(None).unwrap();
  assert_eq!(paso.id, "datos");
  assert!(flujo.slice("datos").is_some());
  assert!(flujo.slice(PASO_GRUPO).is_some());
}

#[test]
fn quitar_el_programa_machu_poda_el_paso_y_su_slice() {
  let repo = repo();
  let mut flujo = ItinerarioFlow::new(repo.clone()).unwrap();
  hasta_transporte(&mut flujo, &repo, true);
  flujo.next(&json!({"recojos": []})).unwrap();
  flujo.next(&entrada_machu(1)).unwrap();
  assert!(flujo.slice(PASO_MACHU).is_some());

  // vuelve hasta programas y repite la selección sin el programa machu
  flujo.back(None).unwrap();
  flujo.back(None).unwrap();
  let paso = flujo.back(None).unwrap();
  assert_eq!(paso.id, "programas");
  flujo.next(&entrada_programas(&repo, false)).unwrap();

  assert_eq!(flujo.step_count(), 6);
  assert!(flujo.slice(PASO_MACHU).is_none());
}

#[test]
fn nada_se_persiste_antes_del_envio() {
  let repo = repo();
  let mut flujo = ItinerarioFlow::new(repo.clone()).unwrap();
  flujo.next(&json!({"modo": "nuevo", "nombre": "Salida diciembre", "descripcion": null})).unwrap();
  flujo.next(&entrada_datos()).unwrap();
  flujo.next(&entrada_turistas(&repo)).unwrap();
  flujo.next(&entrada_programas(&repo, false)).unwrap();
  flujo.next(&json!({"recojos": []})).unwrap();

  // el grupo nuevo todavía no existe en el repositorio
  assert_eq!(repo.list_grupos().unwrap().len(), 1);
  assert!(repo.list_itinerarios().unwrap().is_empty());

  let id = flujo.submit(None).unwrap();
  assert_eq!(repo.list_grupos().unwrap().len(), 2);
  let guardado = repo.get_itinerario(&id).unwrap().unwrap();
  assert_eq!(guardado.grupo().nombre(), "Salida diciembre");
  assert_eq!(guardado.turistas().len(), 2);

  // tras el envío el asistente vuelve al inicio con borrador vacío
  assert_eq!(flujo.progreso(), (1, 6));
  assert!(!flujo.cambios_sin_guardar());
}

#[test]
fn submit_fuera_del_resumen_rechazado() {
  let repo = repo();
  let mut flujo = ItinerarioFlow::new(repo.clone()).unwrap();
  assert!(matches!(flujo.submit(None), Err(WorkflowError::Validation(_))));
  assert!(repo.list_itinerarios().unwrap().is_empty());
}

#[test]
fn envio_con_transporte_y_recojo() {
  let repo = repo();
  let mut flujo = ItinerarioFlow::new(repo.clone()).unwrap();
  hasta_transporte(&mut flujo, &repo, false);

  let tid = repo.list_transportes().unwrap()[0].id();
  let recojos = json!({"recojos": [{"programa_idx": 0,
                                    "transporte_id": tid,
                                    "punto_recojo": "Plaza de Armas",
                                    "hora_recojo": "08:30:00"}]});
  flujo.next(&recojos).unwrap();

  let id = flujo.submit(None).unwrap();
  let guardado = repo.get_itinerario(&id).unwrap().unwrap();
  assert_eq!(guardado.transportes().len(), 1);
  assert_eq!(guardado.transportes()[0].punto_recojo(), "Plaza de Armas");
  // la asignación apunta al programa agendado recién creado
  assert_eq!(guardado.transportes()[0].programa_id(), guardado.programas()[0].id());
}

#[test]
fn envio_idempotente_por_command_id() {
  let repo = repo();
  let cid = Uuid::new_v4();

  let mut primero = ItinerarioFlow::new(repo.clone()).unwrap();
  hasta_transporte(&mut primero, &repo, false);
  primero.next(&json!({"recojos": []})).unwrap();
  let a = primero.submit(Some(cid)).unwrap();

  // reintento del mismo comando desde otro asistente
  let mut segundo = ItinerarioFlow::new(repo.clone()).unwrap();
  hasta_transporte(&mut segundo, &repo, false);
  segundo.next(&json!({"recojos": []})).unwrap();
  let b = segundo.submit(Some(cid)).unwrap();

  assert_eq!(a, b);
  assert_eq!(repo.list_itinerarios().unwrap().len(), 1);
}

#[test]
fn edicion_arranca_en_solo_lectura_y_conserva_el_id() {
  let repo = repo();
  let mut creador = ItinerarioFlow::new(repo.clone()).unwrap();
  hasta_transporte(&mut creador, &repo, false);
  creador.next(&json!({"recojos": []})).unwrap();
  let id = creador.submit(None).unwrap();

  let guardado = repo.get_itinerario(&id).unwrap().unwrap();
  let mut editor = ItinerarioFlow::editar(&guardado, repo.clone()).unwrap();
  assert!(editor.modo_edicion());
  assert!(!editor.es_editable());
  assert!(!editor.cambios_sin_guardar());

  // en solo lectura el borrador no se puede tocar...
  let r = editor.next(&entrada_grupo(&repo));
  assert!(matches!(r, Err(WorkflowError::Wizard(WizardError::SoloLectura(_)))));

  // ...pero la navegación es libre
  while editor.paso_actual().id != "resumen" {
    editor.next_sin_cambios().unwrap();
  }

  editor.set_editable(true);
  let actualizado = editor.submit(None).unwrap();
  assert_eq!(actualizado, id);
  assert_eq!(repo.list_itinerarios().unwrap().len(), 1);
}

#[test]
fn errores_de_validacion_por_campo() {
  let repo = repo();
  let mut flujo = ItinerarioFlow::new(repo.clone()).unwrap();

  let r = flujo.next(&json!({"modo": "nuevo", "nombre": "AB", "descripcion": null}));
  match r {
    Err(WorkflowError::Wizard(WizardError::Validacion(errores))) => {
      assert!(errores.get("nombre").is_some());
    }
    otro => panic!("se esperaba un error de validación, se obtuvo {:?}", otro.map(|p| p.id)),
  }
  assert_eq!(flujo.paso_actual().id, "grupo");
}

#[test]
fn cambios_sin_guardar_refleja_el_borrador() {
  let repo = repo();
  let mut flujo = ItinerarioFlow::new(repo.clone()).unwrap();
  assert!(!flujo.cambios_sin_guardar());
  flujo.next(&entrada_grupo(&repo)).unwrap();
  assert!(flujo.cambios_sin_guardar());
}
