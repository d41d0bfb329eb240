// resumen.rs
//
// Paso final de solo lectura: totales y líneas de texto armadas desde el
// borrador acumulado. No valida nada por sí mismo: confía en el borrador que
// armó el controlador. Las búsquedas de despliegue que no resuelven caen al
// comodín "No especificado".
use crate::errors::WorkflowError;
use crate::flows::itinerario_flow::steps::{DatosPayload, GrupoPayload, MachuPayload, ProgramasPayload, TransportePayload,
                                           TuristasPayload};
use crate::flows::itinerario_flow::{PASO_DATOS, PASO_GRUPO, PASO_MACHU, PASO_PROGRAMAS, PASO_TRANSPORTE, PASO_TURISTAS};
use serde::{Deserialize, Serialize};
use wizard::DraftStore;

const NO_ESPECIFICADO: &str = "No especificado";

/// Totales y render del resumen final del asistente.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resumen {
  pub total_turistas: usize,
  pub total_programas: usize,
  pub costo_total: f64,
  pub total_transportes: usize,
  pub total_detalles_machu: usize,
  pub lineas: Vec<String>,
}

impl Resumen {
  /// Arma el resumen desde el borrador. Los slices normalizados ya embeben
  /// nombres y costos, así que no hace falta el repositorio.
  pub fn desde_borrador(store: &DraftStore) -> Result<Self, WorkflowError> {
    let grupo = store.get(PASO_GRUPO).map(|p| GrupoPayload::recover_from(p)).transpose()?;
    let datos = store.get(PASO_DATOS).map(|p| DatosPayload::recover_from(p)).transpose()?;
    let turistas = store.get(PASO_TURISTAS).map(|p| TuristasPayload::recover_from(p)).transpose()?;
    let programas = store.get(PASO_PROGRAMAS).map(|p| ProgramasPayload::recover_from(p)).transpose()?;
    let transporte = store.get(PASO_TRANSPORTE).map(|p| TransportePayload::recover_from(p)).transpose()?;
    let machu = store.get(PASO_MACHU).map(|p| MachuPayload::recover_from(p)).transpose()?;

    let total_turistas = turistas.as_ref().map(|t| t.turistas.len()).unwrap_or(0);
    let total_programas = programas.as_ref().map(|p| p.entradas.len()).unwrap_or(0);
    let costo_total = programas.as_ref().map(|p| p.costo_total()).unwrap_or(0.0);
    let total_transportes = transporte.as_ref().map(|t| t.recojos.len()).unwrap_or(0);
    let total_detalles_machu = machu.as_ref().map(|m| m.detalles.len()).unwrap_or(0);

    let mut lineas = Vec::new();
    lineas.push(format!("Grupo: {}",
                        grupo.as_ref().map(|g| g.nombre().to_string()).unwrap_or_else(|| NO_ESPECIFICADO.into())));
    match &datos {
      Some(d) => lineas.push(format!("Fechas: {} a {}", d.fecha_inicio, d.fecha_fin)),
      None => lineas.push(format!("Fechas: {}", NO_ESPECIFICADO)),
    }

    lineas.push(format!("Turistas ({})", total_turistas));
    if let Some(t) = &turistas {
      for entrada in &t.turistas {
        lineas.push(format!("  - {} ({})", entrada.nombre_completo, entrada.documento));
      }
    }

    lineas.push(format!("Programas Seleccionados ({})", total_programas));
    if let Some(p) = &programas {
      for entrada in &p.entradas {
        lineas.push(format!("  - {} el {} de {} a {} (S/ {:.2})",
                            entrada.nombre,
                            entrada.fecha,
                            entrada.hora_inicio,
                            entrada.hora_fin,
                            entrada.costo));
      }
    }
    lineas.push(format!("Costo total: S/ {:.2}", costo_total));

    lineas.push(format!("Transportes ({})", total_transportes));
    if let Some(t) = &transporte {
      for recojo in &t.recojos {
        lineas.push(format!("  - {} desde {} a las {} para {}",
                            recojo.empresa,
                            recojo.punto_recojo,
                            recojo.hora_recojo,
                            recojo.programa_nombre));
      }
    }

    lineas.push(format!("Detalles Machu Picchu ({})", total_detalles_machu));
    if let Some(m) = &machu {
      for det in &m.detalles {
        lineas.push(format!("  - {} {} a las {}, guía {} ({})",
                            det.tren_empresa,
                            det.tren_numero.as_deref().unwrap_or(NO_ESPECIFICADO),
                            det.hora_tren,
                            det.guia_nombre,
                            det.programa_nombre));
      }
    }

    Ok(Self { total_turistas, total_programas, costo_total, total_transportes, total_detalles_machu, lineas })
  }
}
