// Archivo: draft.rs
// Propósito: el borrador acumulado del asistente. Cada paso completado deja
// un slice JSON bajo su id; el borrador vive solo en memoria y se vacía tras
// un envío exitoso o al abandonar el asistente.
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Slice persistido para un paso: el payload normalizado que entregó el
/// formulario más la marca de tiempo de la última escritura.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepSlice {
    pub payload: JsonValue,
    pub updated_at: DateTime<Utc>,
}

/// Almacén en memoria del borrador, ordenado por inserción.
///
/// La lectura es pura: `get` no muta nada, por lo que dos lecturas sin una
/// escritura intermedia devuelven exactamente el mismo valor.
#[derive(Debug, Clone, Default)]
pub struct DraftStore {
    slices: IndexMap<String, StepSlice>,
}

impl DraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    /// Escribe (o reemplaza) el slice de un paso.
    pub fn put(&mut self, step_id: &str, payload: JsonValue) {
        self.slices
            .insert(step_id.to_string(), StepSlice { payload, updated_at: Utc::now() });
    }

    /// Payload del paso, si el paso ya dejó datos.
    pub fn get(&self, step_id: &str) -> Option<&JsonValue> {
        self.slices.get(step_id).map(|s| &s.payload)
    }

    pub fn get_slice(&self, step_id: &str) -> Option<&StepSlice> {
        self.slices.get(step_id)
    }

    /// Elimina el slice de un paso (por ejemplo cuando el paso dejó de estar
    /// activo). Devuelve true si existía.
    pub fn remove(&mut self, step_id: &str) -> bool {
        self.slices.shift_remove(step_id).is_some()
    }

    /// Vacía el borrador completo.
    pub fn clear(&mut self) {
        self.slices.clear();
    }

    /// Carga de una sola vez todos los slices (hidratación en modo edición).
    pub fn hydrate<I>(&mut self, slices: I)
        where I: IntoIterator<Item = (String, JsonValue)>
    {
        self.clear();
        for (id, payload) in slices {
            self.put(&id, payload);
        }
    }

    /// Ids de los pasos con datos, en orden de inserción.
    pub fn step_ids(&self) -> impl Iterator<Item = &str> {
        self.slices.keys().map(|k| k.as_str())
    }

    /// Huella blake3 del contenido del borrador (ids + payloads). Sirve para
    /// detectar cambios sin guardar en modo edición; las marcas de tiempo no
    /// participan del hash.
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for (id, slice) in self.slices.iter() {
            hasher.update(id.as_bytes());
            hasher.update(b"\0");
            // serde_json::Value ordena las claves de objetos, así que la
            // serialización es canónica para el mismo contenido
            let bytes = serde_json::to_vec(&slice.payload).unwrap_or_default();
            hasher.update(&bytes);
            hasher.update(b"\0");
        }
        hasher.finalize().to_hex().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lectura_idempotente() {
        let mut store = DraftStore::new();
        store.put("datos", json!({"fecha_inicio": "2025-11-01"}));
        let a = store.get("datos").cloned();
        let b = store.get("datos").cloned();
        assert_eq!(a, b);
    }

    #[test]
    fn fingerprint_cambia_con_el_contenido() {
        let mut store = DraftStore::new();
        store.put("datos", json!({"x": 1}));
        let f1 = store.fingerprint();
        store.put("datos", json!({"x": 2}));
        let f2 = store.fingerprint();
        assert_ne!(f1, f2);
    }

    #[test]
    fn fingerprint_ignora_marcas_de_tiempo() {
        let mut a = DraftStore::new();
        let mut b = DraftStore::new();
        a.put("datos", json!({"x": 1}));
        b.put("datos", json!({"x": 1}));
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn hydrate_reemplaza_todo() {
        let mut store = DraftStore::new();
        store.put("viejo", json!(1));
        store.hydrate(vec![("grupo".to_string(), json!({"nombre": "Los Andes"}))]);
        assert!(store.get("viejo").is_none());
        assert!(store.get("grupo").is_some());
        assert_eq!(store.len(), 1);
    }
}
