use std::collections::BTreeSet;

use crate::error::{ModelError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Lit {
    pub var: u32,
    pub sign: bool,
}

impl Lit {
    pub fn new(var: u32, sign: bool) -> Self {
        Self { var, sign }
    }

    pub fn neg(self) -> Self {
        Self {
            var: self.var,
            sign: !self.sign,
        }
    }

    /// `None` for 0, which has no negation.
    pub fn from_dimacs(x: i32) -> Option<Self> {
        if x == 0 {
            return None;
        }
        Some(Self::new(x.unsigned_abs(), x > 0))
    }

    pub fn to_dimacs(self) -> i64 {
        let v = self.var as i64;
        if self.sign { v } else { -v }
    }

    pub fn eval(self, value: bool) -> bool {
        if self.sign { value } else { !value }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub weight: f64,
    pub lits: Vec<Lit>,
}

impl Clause {
    pub fn new(weight: f64, lits: Vec<Lit>) -> Self {
        Self { weight, lits }
    }

    pub fn unit_weight(lits: Vec<Lit>) -> Self {
        Self::new(1.0, lits)
    }

    pub fn from_dimacs(weight: f64, ids: &[i32]) -> Result<Self> {
        let lits = ids
            .iter()
            .map(|&x| Lit::from_dimacs(x).ok_or_else(|| unnegatable_name_error(0)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(weight, lits))
    }

    pub fn is_tautology(&self) -> bool {
        let mut seen = BTreeSet::new();
        for &lit in &self.lits {
            if seen.contains(&lit.neg()) {
                return true;
            }
            seen.insert(lit);
        }
        false
    }

    /// Strict form expected from clause sources: nonempty, no variable named
    /// twice in any polarity.
    pub fn check_variable_names(&self) -> Result<()> {
        if self.lits.is_empty() {
            return Err(ModelError::value(
                "List of variables in a clause cannot be empty.",
            ));
        }
        let mut seen = BTreeSet::new();
        for &lit in &self.lits {
            if lit.var == 0 || lit.var > MAX_VARIABLE_NAME {
                return Err(unnegatable_name_error(lit.var));
            }
            if seen.contains(&lit) {
                return Err(ModelError::value(format!(
                    "Variable name {} appears multiple times in clause.",
                    lit.to_dimacs()
                )));
            }
            if seen.contains(&lit.neg()) {
                return Err(ModelError::value(format!(
                    "Variable name {} appears both positive and negative in clause.",
                    lit.var
                )));
            }
            seen.insert(lit);
        }
        Ok(())
    }

    pub fn is_satisfied_by(&self, value: impl Fn(u32) -> bool) -> bool {
        self.lits.iter().any(|&lit| lit.eval(value(lit.var)))
    }
}

/// Largest name whose positive and negative literals both fit in an `i32`.
pub const MAX_VARIABLE_NAME: u32 = i32::MAX as u32;

pub(crate) fn unnegatable_name_error(name: u32) -> ModelError {
    ModelError::value(format!(
        "MaxSat variables cannot have the name {name} since it cannot be negated to indicate 'not {name}'."
    ))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CnfFormat {
    Cnf,
    Wcnf,
}

impl CnfFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            CnfFormat::Cnf => "cnf",
            CnfFormat::Wcnf => "wcnf",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeightedCnf {
    pub format: CnfFormat,
    pub num_vars: u32,
    /// Hard-clause threshold from a `wcnf` problem line, if any.
    pub top: Option<f64>,
    pub clauses: Vec<Clause>,
}

impl WeightedCnf {
    pub fn new(format: CnfFormat) -> Self {
        Self {
            format,
            num_vars: 0,
            top: None,
            clauses: Vec::new(),
        }
    }

    pub fn add_clause(&mut self, clause: Clause) {
        for lit in &clause.lits {
            self.num_vars = self.num_vars.max(lit.var);
        }
        self.clauses.push(clause);
    }

    /// Distinct variable names, ascending.
    pub fn variables(&self) -> Vec<u32> {
        self.clauses
            .iter()
            .flat_map(|c| c.lits.iter().map(|l| l.var))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Weight of unsatisfied clauses, evaluated from scratch.
    pub fn unsatisfied_weight(&self, value: impl Fn(u32) -> bool) -> f64 {
        self.clauses
            .iter()
            .filter(|c| !c.is_satisfied_by(&value))
            .map(|c| c.weight)
            .sum()
    }
}
