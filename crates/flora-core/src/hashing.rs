//! Hash y canonicalización JSON para claves de cache.
//!
//! El JSON se canonicaliza (claves de objeto ordenadas) antes de hashear,
//! de modo que dos solicitudes lógicamente idénticas produzcan la misma
//! clave sin importar el orden de sus campos.

use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

pub fn a_json_canonico(valor: &Value) -> String {
    match valor {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => serde_json::to_string(s).unwrap(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(a_json_canonico).collect();
            format!("[{}]", items.join(","))
        }
        Value::Object(mapa) => {
            let mut ordenado = BTreeMap::new();
            for (k, v) in mapa {
                ordenado.insert(k, a_json_canonico(v));
            }
            let items: Vec<String> = ordenado
                .into_iter()
                .map(|(k, v)| format!("{}:{}", serde_json::to_string(&k).unwrap(), v))
                .collect();
            format!("{{{}}}", items.join(","))
        }
    }
}

/// Hashea un string y devuelve hex.
pub fn hash_str(entrada: &str) -> String {
    let mut h = Sha256::new();
    h.update(entrada.as_bytes());
    format!("{:x}", h.finalize())
}

pub fn hash_valor(valor: &Value) -> String {
    hash_str(&a_json_canonico(valor))
}
