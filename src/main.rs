use serde_json::{json, Value as JsonValue};
use std::error::Error;
use std::io::{self, Write};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use viaje_domain::{DomainRepository, DomainStubs, InMemoryDomainRepository};
use viaje_wizard::ItinerarioFlow;

/// Pequeño menú interactivo para recorrer el asistente de itinerarios sobre
/// el repositorio en memoria pre-poblado.
///
/// Opciones soportadas:
/// 1) Ver datos de referencia (grupos, turistas, programas, transportes)
/// 2) Crear itinerario con el asistente paso a paso
/// 3) Ver itinerarios creados
/// 4) Salir
fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let repo = Arc::new(DomainStubs::sample_repo());
    tracing::info!("repositorio de ejemplo cargado");

    loop {
        println!("\n== TravelDesk ==");
        println!("1) Ver datos de referencia");
        println!("2) Crear itinerario (asistente paso a paso)");
        println!("3) Ver itinerarios");
        println!("4) Salir");
        print!("Elige una opción: ");
        io::stdout().flush().ok();

        let mut choice = String::new();
        io::stdin().read_line(&mut choice)?;
        match choice.trim() {
            "1" => ver_referencia(&repo),
            "2" => {
                if let Err(e) = asistente(repo.clone()) {
                    eprintln!("El asistente terminó con error: {}", e);
                }
            }
            "3" => match repo.list_itinerarios() {
                Ok(its) if its.is_empty() => println!("Todavía no hay itinerarios."),
                Ok(its) => {
                    for it in its {
                        println!("{} | {} | {} a {} | {} turista(s) | S/ {:.2}",
                                 it.id(),
                                 it.grupo().nombre(),
                                 it.fecha_inicio(),
                                 it.fecha_fin(),
                                 it.turistas().len(),
                                 it.costo_total());
                    }
                }
                Err(e) => eprintln!("Error listando itinerarios: {}", e),
            },
            "4" => {
                println!("Saliendo...");
                break;
            }
            other => println!("Opción inválida: {}", other),
        }
    }

    Ok(())
}

fn ver_referencia(repo: &InMemoryDomainRepository) {
    if let Ok(grupos) = repo.list_grupos() {
        println!("\nGrupos:");
        for (i, g) in grupos.iter().enumerate() {
            println!("  {}) {} ({})", i + 1, g.nombre(), g.id());
        }
    }
    if let Ok(turistas) = repo.list_turistas() {
        println!("Turistas:");
        for (i, t) in turistas.iter().enumerate() {
            println!("  {}) {} - doc {}", i + 1, t.nombre_completo(), t.documento());
        }
    }
    if let Ok(programas) = repo.list_programas() {
        println!("Programas:");
        for (i, p) in programas.iter().enumerate() {
            println!("  {}) {} [{}] S/ {:.2}", i + 1, p.nombre(), p.tipo(), p.costo());
        }
    }
    if let Ok(transportes) = repo.list_transportes() {
        println!("Transportes:");
        for (i, t) in transportes.iter().enumerate() {
            println!("  {}) {} ({}, cap. {})", i + 1, t.empresa(), t.tipo(), t.capacidad());
        }
    }
}

/// Recorre el asistente completo en la consola. Cada paso pide sus datos,
/// arma el input JSON y avanza; si la validación falla se repite el mismo
/// paso mostrando los errores por campo.
fn asistente(repo: Arc<InMemoryDomainRepository>) -> Result<(), Box<dyn Error>> {
    let mut flujo = ItinerarioFlow::new(repo.clone())?;

    loop {
        let paso = flujo.paso_actual();
        let (pos, total) = flujo.progreso();
        println!("\n--- Paso {}/{}: {} ---", pos, total, paso.titulo);

        let input = match paso.id {
            "grupo" => input_grupo(&repo)?,
            "datos" => input_datos()?,
            "turistas" => input_turistas(&repo)?,
            "programas" => input_programas(&repo)?,
            "transporte" => input_transporte(&repo, &flujo)?,
            "machu" => input_machu(&flujo)?,
            "resumen" => {
                let resumen = flujo.resumen()?;
                for linea in &resumen.lineas {
                    println!("{}", linea);
                }
                let r = prompt("Enviar itinerario? ('yes' para confirmar, 'a' para volver atrás): ")?;
                match r.trim().to_lowercase().as_str() {
                    "yes" => {
                        let id = flujo.submit(None)?;
                        println!("Itinerario creado: {}", id);
                        return Ok(());
                    }
                    "a" => {
                        flujo.back(None)?;
                        continue;
                    }
                    _ => {
                        println!("Asistente cancelado; no se guardó nada.");
                        return Ok(());
                    }
                }
            }
            otro => {
                eprintln!("Paso desconocido: {}", otro);
                return Ok(());
            }
        };

        match flujo.next(&input) {
            Ok(_) => {}
            Err(e) => println!("Corrija e intente de nuevo:\n{}", e),
        }
    }
}

fn input_grupo(repo: &InMemoryDomainRepository) -> Result<JsonValue, Box<dyn Error>> {
    let grupos = repo.list_grupos()?;
    for (i, g) in grupos.iter().enumerate() {
        println!("  {}) {}", i + 1, g.nombre());
    }
    let r = prompt("Número de grupo existente, o 'n' para crear uno nuevo: ")?;
    if r.trim().eq_ignore_ascii_case("n") {
        let nombre = prompt("Nombre del grupo: ")?;
        let descripcion = prompt("Descripción (enter para omitir): ")?;
        let desc = if descripcion.trim().is_empty() { None } else { Some(descripcion.trim().to_string()) };
        Ok(json!({"modo": "nuevo", "nombre": nombre.trim(), "descripcion": desc}))
    } else {
        let idx: usize = r.trim().parse().unwrap_or(0);
        match grupos.get(idx.wrapping_sub(1)) {
            Some(g) => Ok(json!({"modo": "existente", "grupo_id": g.id()})),
            None => Ok(json!({"modo": "existente", "grupo_id": uuid::Uuid::nil()})),
        }
    }
}

fn input_datos() -> Result<JsonValue, Box<dyn Error>> {
    let inicio = prompt("Fecha de inicio (YYYY-MM-DD): ")?;
    let fin = prompt("Fecha de fin (YYYY-MM-DD): ")?;
    Ok(json!({"fecha_inicio": inicio.trim(), "fecha_fin": fin.trim(), "estado_presupuesto_id": 1}))
}

fn input_turistas(repo: &InMemoryDomainRepository) -> Result<JsonValue, Box<dyn Error>> {
    let turistas = repo.list_turistas()?;
    for (i, t) in turistas.iter().enumerate() {
        println!("  {}) {}", i + 1, t.nombre_completo());
    }
    let r = prompt("Números de turistas separados por coma (ej: 1,2): ")?;
    let ids: Vec<_> = r.split(',')
                       .filter_map(|s| s.trim().parse::<usize>().ok())
                       .filter_map(|i| turistas.get(i.wrapping_sub(1)))
                       .map(|t| t.id())
                       .collect();
    Ok(json!({"turista_ids": ids}))
}

fn input_programas(repo: &InMemoryDomainRepository) -> Result<JsonValue, Box<dyn Error>> {
    let catalogo = repo.list_programas()?;
    let mut programas = Vec::new();
    loop {
        for (i, p) in catalogo.iter().enumerate() {
            println!("  {}) {} [{}] S/ {:.2}", i + 1, p.nombre(), p.tipo(), p.costo());
        }
        let r = prompt("Número de programa a agendar (enter para terminar): ")?;
        if r.trim().is_empty() {
            break;
        }
        let idx: usize = match r.trim().parse() {
            Ok(n) => n,
            Err(_) => {
                eprintln!("Número inválido");
                continue;
            }
        };
        let p = match catalogo.get(idx.wrapping_sub(1)) {
            Some(p) => p,
            None => {
                eprintln!("No existe el programa #{}", idx);
                continue;
            }
        };
        let fecha = prompt("Fecha (YYYY-MM-DD): ")?;
        let hora_inicio = prompt("Hora de inicio (HH:MM:SS): ")?;
        let hora_fin = prompt("Hora de fin (HH:MM:SS): ")?;
        programas.push(json!({"programa_id": p.id(),
                              "fecha": fecha.trim(),
                              "hora_inicio": hora_inicio.trim(),
                              "hora_fin": hora_fin.trim()}));
    }
    Ok(json!({"programas": programas}))
}

fn input_transporte(repo: &InMemoryDomainRepository, flujo: &ItinerarioFlow) -> Result<JsonValue, Box<dyn Error>> {
    mostrar_programas_agendados(flujo);
    let transportes = repo.list_transportes()?;
    let mut recojos = Vec::new();
    loop {
        let r = prompt("Número de programa a asignar recojo (enter para terminar): ")?;
        if r.trim().is_empty() {
            break;
        }
        let programa_idx: usize = match r.trim().parse::<usize>() {
            Ok(n) if n >= 1 => n - 1,
            _ => {
                eprintln!("Número inválido");
                continue;
            }
        };
        for (i, t) in transportes.iter().enumerate() {
            println!("  {}) {} ({})", i + 1, t.empresa(), t.tipo());
        }
        let ti = prompt("Número de transporte: ")?;
        let t = match ti.trim().parse::<usize>().ok().and_then(|i| transportes.get(i.wrapping_sub(1))) {
            Some(t) => t,
            None => {
                eprintln!("Transporte inválido");
                continue;
            }
        };
        let punto = prompt("Punto de recojo: ")?;
        let hora = prompt("Hora de recojo (HH:MM:SS): ")?;
        recojos.push(json!({"programa_idx": programa_idx,
                            "transporte_id": t.id(),
                            "punto_recojo": punto.trim(),
                            "hora_recojo": hora.trim()}));
    }
    Ok(json!({"recojos": recojos}))
}

fn input_machu(flujo: &ItinerarioFlow) -> Result<JsonValue, Box<dyn Error>> {
    mostrar_programas_agendados(flujo);
    let mut detalles = Vec::new();
    loop {
        let r = prompt("Número del programa Machu Picchu (enter para terminar): ")?;
        if r.trim().is_empty() {
            break;
        }
        let programa_idx: usize = match r.trim().parse::<usize>() {
            Ok(n) if n >= 1 => n - 1,
            _ => {
                eprintln!("Número inválido");
                continue;
            }
        };
        let empresa = prompt("Empresa de tren: ")?;
        let numero = prompt("Número de tren (enter para omitir): ")?;
        let hora = prompt("Hora del tren (HH:MM:SS): ")?;
        let guia = prompt("Nombre del guía: ")?;
        let telefono = prompt("Teléfono del guía (enter para omitir): ")?;
        let numero = if numero.trim().is_empty() { None } else { Some(numero.trim().to_string()) };
        let telefono = if telefono.trim().is_empty() { None } else { Some(telefono.trim().to_string()) };
        detalles.push(json!({"programa_idx": programa_idx,
                             "tren_empresa": empresa.trim(),
                             "tren_numero": numero,
                             "hora_tren": hora.trim(),
                             "guia_nombre": guia.trim(),
                             "guia_telefono": telefono}));
    }
    Ok(json!({"detalles": detalles}))
}

fn mostrar_programas_agendados(flujo: &ItinerarioFlow) {
    if let Some(payload) = flujo.slice("programas") {
        if let Some(entradas) = payload.get("entradas").and_then(|e| e.as_array()) {
            println!("Programas agendados:");
            for (i, e) in entradas.iter().enumerate() {
                let nombre = e.get("nombre").and_then(|n| n.as_str()).unwrap_or("?");
                let fecha = e.get("fecha").and_then(|f| f.as_str()).unwrap_or("?");
                println!("  {}) {} ({})", i + 1, nombre, fecha);
            }
        }
    }
}

fn prompt(msg: &str) -> io::Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s)
}
