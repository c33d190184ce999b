use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cnf::cnf::unnegatable_name_error;
use crate::cnf::dimacs::read_dimacs_file;
use crate::cnf::Clause;
use crate::error::{ModelError, Result};

use super::counter::Counter;
use super::maxsat::MaxSat;
use super::StateModel;

/// `{"cost_function": {...}}` wrapper as written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelDocument {
    pub cost_function: ModelConfiguration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfiguration {
    #[serde(rename = "type")]
    pub kind: String,
    pub version: String,
    #[serde(default)]
    pub terms: Vec<Term>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Term {
    #[serde(rename = "c", default = "default_weight")]
    pub weight: f64,
    pub ids: Vec<i32>,
}

fn default_weight() -> f64 {
    1.0
}

impl Term {
    /// Terms name each variable at most once, like DIMACS clauses.
    pub fn to_clause(&self) -> Result<Clause> {
        let clause = Clause::from_dimacs(self.weight, &self.ids)?;
        clause.check_variable_names()?;
        Ok(clause)
    }
}

impl ModelConfiguration {
    pub fn from_clauses(clauses: &[Clause]) -> Result<Self> {
        let terms = clauses
            .iter()
            .map(|c| -> Result<Term> {
                let ids = c
                    .lits
                    .iter()
                    .map(|l| {
                        i32::try_from(l.to_dimacs()).map_err(|_| unnegatable_name_error(l.var))
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Term {
                    weight: c.weight,
                    ids,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            kind: "maxsat".to_string(),
            version: "1.0".to_string(),
            terms,
        })
    }

    pub fn clauses(&self) -> Result<Vec<Clause>> {
        self.terms.iter().map(Term::to_clause).collect()
    }
}

pub fn parse_model_json(s: &str) -> Result<ModelConfiguration> {
    let doc: ModelDocument = serde_json::from_str(s)
        .map_err(|e| ModelError::parsing(e.line(), e.column(), e.to_string()))?;
    Ok(doc.cost_function)
}

pub fn read_model_json(path: impl AsRef<Path>) -> Result<ModelConfiguration> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|e| ModelError::value(format!("failed to read {}: {}", path.display(), e)))?;
    parse_model_json(&text)
}

pub fn to_model_json(cfg: &ModelConfiguration) -> Result<String> {
    let doc = ModelDocument {
        cost_function: cfg.clone(),
    };
    serde_json::to_string_pretty(&doc).map_err(|e| ModelError::value(e.to_string()))
}

/// Loads and configures a model from a `.cnf`, `.wcnf` or `.json` file.
pub fn load_model<C: Counter>(path: impl AsRef<Path>) -> Result<MaxSat<C>> {
    let path = path.as_ref();
    match path.extension().and_then(|v| v.to_str()) {
        Some("cnf" | "wcnf") => MaxSat::from_clauses(&read_dimacs_file(path)?.clauses),
        Some("json") => {
            let mut model = MaxSat::new();
            model.configure_from(&read_model_json(path)?)?;
            Ok(model)
        }
        _ => Err(ModelError::value(format!(
            "Unsupported model file {}: expected .cnf, .wcnf or .json",
            path.display()
        ))),
    }
}

impl<C: Counter> MaxSat<C> {
    /// Configures from a JSON model description after checking that it is
    /// meant for this model type and version.
    pub fn configure_from(&mut self, cfg: &ModelConfiguration) -> Result<()> {
        if cfg.kind != self.identifier() {
            return Err(ModelError::value(format!(
                "Model type mismatch: expected '{}', got '{}'",
                self.identifier(),
                cfg.kind
            )));
        }
        if cfg.version != self.version() {
            return Err(ModelError::value(format!(
                "Unsupported {} version '{}', expected '{}'",
                cfg.kind,
                cfg.version,
                self.version()
            )));
        }
        if cfg.terms.is_empty() {
            return Err(ModelError::value("Model terms must not be empty."));
        }
        let clauses = cfg.clauses()?;
        self.configure(&clauses)
    }
}
