//! Solicitud de predicción: los campos crudos de un registro de propagación.
//!
//! La solicitud normaliza sus entradas al construirse, igual que el pipeline
//! de entrenamiento normalizó las suyas:
//! - la especie pierde el prefijo de género si viene incluido
//!   (`"Cattleya maxima"` → `"maxima"`),
//! - el tipo de polinización se lleva a mayúsculas y se mapean variantes
//!   ortográficas conocidas,
//! - la ubicación colapsa separadores y renombra bandejas numéricas
//!   (`P-0` → `P-A`).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::DomainError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolicitudPrediccion {
    especie: Option<String>,
    genero: Option<String>,
    clima: Option<String>,
    ubicacion: Option<String>,
    tipo_polinizacion: Option<String>,
    cantidad: Option<i64>,
    disponible: Option<i64>,
    fecha_evento: Option<NaiveDate>,
    extras: BTreeMap<String, String>,
}

impl SolicitudPrediccion {
    /// Crea una solicitud. La especie (o el género como respaldo) es
    /// obligatoria; su ausencia es un fallo de validación, nunca una
    /// estimación degradada.
    pub fn nueva(especie: Option<&str>, genero: Option<&str>) -> Result<Self, DomainError> {
        let genero_limpio = genero.map(str::trim).filter(|g| !g.is_empty()).map(String::from);
        let especie_limpia = especie.map(str::trim).filter(|e| !e.is_empty());
        if especie_limpia.is_none() && genero_limpio.is_none() {
            return Err(DomainError::Validacion("se requiere especie o genero".to_string()));
        }
        let especie_final =
            especie_limpia.map(|e| normalizar_especie(e, genero_limpio.as_deref()));
        Ok(SolicitudPrediccion { especie: especie_final,
                                 genero: genero_limpio,
                                 clima: None,
                                 ubicacion: None,
                                 tipo_polinizacion: None,
                                 cantidad: None,
                                 disponible: None,
                                 fecha_evento: None,
                                 extras: BTreeMap::new() })
    }

    pub fn con_clima(mut self, clima: &str) -> Self {
        let limpio = clima.trim();
        if !limpio.is_empty() {
            self.clima = Some(limpio.to_string());
        }
        self
    }

    pub fn con_ubicacion(mut self, ubicacion: &str) -> Self {
        let limpia = normalizar_ubicacion(ubicacion);
        if !limpia.is_empty() {
            self.ubicacion = Some(limpia);
        }
        self
    }

    pub fn con_tipo_polinizacion(mut self, tipo: &str) -> Self {
        let limpio = normalizar_tipo(tipo);
        if !limpio.is_empty() {
            self.tipo_polinizacion = Some(limpio);
        }
        self
    }

    pub fn con_cantidad(mut self, cantidad: i64) -> Self {
        self.cantidad = Some(cantidad);
        self
    }

    pub fn con_disponible(mut self, disponible: i64) -> Self {
        self.disponible = Some(disponible);
        self
    }

    pub fn con_fecha_evento(mut self, fecha: NaiveDate) -> Self {
        self.fecha_evento = Some(fecha);
        self
    }

    /// Parámetro adicional arbitrario; participa en la clave de cache.
    pub fn con_extra(mut self, clave: &str, valor: &str) -> Self {
        self.extras.insert(clave.trim().to_string(), valor.trim().to_string());
        self
    }

    pub fn especie(&self) -> Option<&str> { self.especie.as_deref() }
    pub fn genero(&self) -> Option<&str> { self.genero.as_deref() }
    pub fn clima(&self) -> Option<&str> { self.clima.as_deref() }
    pub fn ubicacion(&self) -> Option<&str> { self.ubicacion.as_deref() }
    pub fn tipo_polinizacion(&self) -> Option<&str> { self.tipo_polinizacion.as_deref() }
    pub fn cantidad(&self) -> Option<i64> { self.cantidad }
    pub fn disponible(&self) -> Option<i64> { self.disponible }
    pub fn fecha_evento(&self) -> Option<NaiveDate> { self.fecha_evento }
    pub fn extras(&self) -> &BTreeMap<String, String> { &self.extras }

    /// Etiqueta representativa: la especie, o el género cuando no hay especie.
    pub fn etiqueta(&self) -> &str {
        self.especie.as_deref().or(self.genero.as_deref()).unwrap_or("")
    }

    /// Valor textual de un campo por su nombre de columna de entrenamiento.
    /// Los nombres no reconocidos se buscan entre los extras.
    pub fn campo(&self, nombre: &str) -> Option<String> {
        match nombre {
            "especie" => self.especie.clone(),
            "genero" => self.genero.clone(),
            "clima" => self.clima.clone(),
            "ubicacion" => self.ubicacion.clone(),
            "tipo" | "tipo_polinizacion" => self.tipo_polinizacion.clone(),
            "cantidad" => self.cantidad.map(|v| v.to_string()),
            "disponible" => self.disponible.map(|v| v.to_string()),
            "fecha_evento" | "fechapol" | "fecha_siembra" => {
                self.fecha_evento.map(|f| f.to_string())
            }
            otro => self.extras.get(otro).cloned(),
        }
    }
}

/// Quita el prefijo de género de la especie si viene incluido.
pub fn normalizar_especie(especie: &str, genero: Option<&str>) -> String {
    let especie_limpia = especie.trim();
    if let Some(genero_limpio) = genero.map(str::trim).filter(|g| !g.is_empty()) {
        let prefijo = especie_limpia.get(..genero_limpio.len());
        if prefijo.is_some_and(|p| p.eq_ignore_ascii_case(genero_limpio)) {
            let resto = especie_limpia[genero_limpio.len()..].trim();
            if !resto.is_empty() {
                return resto.to_string();
            }
        }
    }
    especie_limpia.to_string()
}

/// Tipo de polinización en mayúsculas, con mapeo de variantes ortográficas.
pub fn normalizar_tipo(tipo: &str) -> String {
    let mayusculas = tipo.trim().to_uppercase();
    match mayusculas.as_str() {
        "HIBRIDO" | "HÍBRIDO" => "HYBRID".to_string(),
        "SIBLING" => "SIBBLING".to_string(),
        _ => mayusculas,
    }
}

/// Ubicación al formato del entrenamiento: sin separadores ` - ` y con
/// bandejas `P-<dígito>` renombradas a `P-<letra>` (`P-0` → `P-A`).
pub fn normalizar_ubicacion(ubicacion: &str) -> String {
    let colapsada = ubicacion.trim().replace(" - ", " ");
    colapsada.split_whitespace()
             .map(|parte| {
                 let bytes = parte.as_bytes();
                 if bytes.len() == 3 && parte.starts_with("P-") && bytes[2].is_ascii_digit() {
                     format!("P-{}", (b'A' + (bytes[2] - b'0')) as char)
                 } else {
                     parte.to_string()
                 }
             })
             .collect::<Vec<_>>()
             .join(" ")
}
