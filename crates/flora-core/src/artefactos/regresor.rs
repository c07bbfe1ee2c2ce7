//! Regresor de árboles potenciados, serializado en JSON.
//!
//! El artefacto es opaco para el resto del núcleo: su única capacidad es
//! producir un estimado escalar de días a partir de un vector de features
//! (o un lote de ellos). La predicción es la suma del sesgo base más la
//! hoja alcanzada en cada árbol; un valor NaN sigue la rama por defecto
//! del split.

use serde::{Deserialize, Serialize};

use crate::errors::PrediccionError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tipo", rename_all = "snake_case")]
pub enum Nodo {
    Rama {
        caracteristica: usize,
        umbral: f64,
        izquierda: usize,
        derecha: usize,
        #[serde(default = "rama_por_defecto")]
        faltante_izquierda: bool,
    },
    Hoja {
        valor: f64,
    },
}

fn rama_por_defecto() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arbol {
    pub nodos: Vec<Nodo>,
}

impl Arbol {
    /// Recorre el árbol desde la raíz hasta una hoja. El recorrido está
    /// acotado por el número de nodos: un ciclo en la estructura es un
    /// artefacto malformado, no un bucle infinito.
    fn evaluar(&self, caracteristicas: &[f64]) -> Result<f64, PrediccionError> {
        let mut indice = 0usize;
        for _ in 0..=self.nodos.len() {
            match self.nodos.get(indice) {
                None => {
                    return Err(PrediccionError::Interno(format!(
                        "índice de nodo fuera de rango: {indice}"
                    )))
                }
                Some(Nodo::Hoja { valor }) => return Ok(*valor),
                Some(Nodo::Rama { caracteristica,
                                  umbral,
                                  izquierda,
                                  derecha,
                                  faltante_izquierda }) => {
                    let valor = caracteristicas.get(*caracteristica).copied().ok_or_else(|| {
                        PrediccionError::Interno(format!(
                            "feature {caracteristica} fuera del vector"
                        ))
                    })?;
                    let ir_izquierda =
                        if valor.is_nan() { *faltante_izquierda } else { valor < *umbral };
                    indice = if ir_izquierda { *izquierda } else { *derecha };
                }
            }
        }
        Err(PrediccionError::Interno("árbol con ciclo en sus nodos".to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegresorArtefacto {
    pub num_caracteristicas: usize,
    pub sesgo_base: f64,
    pub arboles: Vec<Arbol>,
}

impl RegresorArtefacto {
    /// Estimado crudo de días para un vector de features.
    pub fn predecir(&self, caracteristicas: &[f64]) -> Result<f64, PrediccionError> {
        if caracteristicas.len() != self.num_caracteristicas {
            return Err(PrediccionError::Interno(format!(
                "el regresor espera {} caracteristicas, llegaron {}",
                self.num_caracteristicas,
                caracteristicas.len()
            )));
        }
        let mut acumulado = self.sesgo_base;
        for arbol in &self.arboles {
            acumulado += arbol.evaluar(caracteristicas)?;
        }
        Ok(acumulado)
    }

    pub fn predecir_lote(&self, filas: &[Vec<f64>]) -> Result<Vec<f64>, PrediccionError> {
        filas.iter().map(|fila| self.predecir(fila)).collect()
    }

    pub fn esta_vacio(&self) -> bool {
        self.arboles.is_empty()
    }
}
