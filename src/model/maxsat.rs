use std::collections::{BTreeMap, BTreeSet};
use std::marker::PhantomData;

use indexmap::IndexMap;
use rand::Rng;
use tracing::{debug, warn};

use crate::cnf::cnf::{MAX_VARIABLE_NAME, unnegatable_name_error};
use crate::cnf::Clause;
use crate::error::{ModelError, Result};

use super::bounds;
use super::counter::Counter;
use super::state::SatisfactionState;
use super::StateModel;

pub type MaxSat8 = MaxSat<u8>;
pub type MaxSat16 = MaxSat<u16>;
pub type MaxSat32 = MaxSat<u32>;

/// Weighted MAX-SAT: the cost of a state is the total weight of its
/// unsatisfied clauses.
///
/// Clauses are 1-indexed. `affected[v]` lists the clauses variable `v`
/// appears in, negated ids marking negated occurrences. Clauses containing
/// both `x` and `-x` are always true and not simulated; variables that only
/// occur in such clauses are free and render as true.
#[derive(Debug, Clone)]
pub struct MaxSat<C: Counter = u32> {
    configured: bool,
    enc: Encoding,
    _counter: PhantomData<fn() -> C>,
}

#[derive(Debug, Clone, Default)]
struct Encoding {
    weights: Vec<f64>,
    affected: Vec<Vec<i32>>,
    variable_names: Vec<u32>,
    free_variables: Vec<u32>,
    max_weight: f64,
    max_vars_in_clause: usize,
}

impl<C: Counter> Default for MaxSat<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Counter> MaxSat<C> {
    /// An unconfigured model; see [`MaxSat::configure`].
    pub fn new() -> Self {
        Self {
            configured: false,
            enc: Encoding {
                weights: vec![0.0],
                ..Encoding::default()
            },
            _counter: PhantomData,
        }
    }

    pub fn from_clauses(clauses: &[Clause]) -> Result<Self> {
        let mut model = Self::new();
        model.configure(clauses)?;
        Ok(model)
    }

    /// Builds the simulation encoding from `clauses`.
    ///
    /// On error the model keeps whatever configuration it had before.
    pub fn configure(&mut self, clauses: &[Clause]) -> Result<()> {
        let enc = build_encoding(clauses)?;
        if enc.max_vars_in_clause > C::MAX_WIDTH {
            return Err(ModelError::value(format!(
                "Clause with {} variables exceeds the counter capacity of {}",
                enc.max_vars_in_clause,
                C::MAX_WIDTH
            )));
        }
        if enc.affected.is_empty() {
            warn!(
                clauses = clauses.len(),
                free = enc.free_variables.len(),
                "maxsat model has no active clauses"
            );
        }
        debug!(
            clauses = clauses.len(),
            active = enc.weights.len() - 1,
            vars = enc.affected.len(),
            free = enc.free_variables.len(),
            max_weight = enc.max_weight,
            max_vars_in_clause = enc.max_vars_in_clause,
            "configured maxsat model"
        );
        self.enc = enc;
        self.configured = true;
        Ok(())
    }

    /// Moves the configuration into a model with a different counter width.
    pub fn into_counter<D: Counter>(self) -> Result<MaxSat<D>> {
        if !self.configured {
            return Err(not_configured());
        }
        if self.enc.max_vars_in_clause > D::MAX_WIDTH {
            return Err(ModelError::value(format!(
                "Clause with {} variables exceeds the counter capacity of {}",
                self.enc.max_vars_in_clause,
                D::MAX_WIDTH
            )));
        }
        Ok(MaxSat {
            configured: true,
            enc: self.enc,
            _counter: PhantomData,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }

    pub fn num_vars(&self) -> usize {
        self.enc.affected.len()
    }

    /// Original names of the simulated variables, indexed by dense id.
    pub fn variable_names(&self) -> &[u32] {
        &self.enc.variable_names
    }

    pub fn free_variables(&self) -> &[u32] {
        &self.enc.free_variables
    }

    pub fn affected(&self, var: usize) -> &[i32] {
        &self.enc.affected[var]
    }

    /// Weight of active clause `clause_id` (1-based).
    pub fn weight(&self, clause_id: usize) -> f64 {
        self.enc.weights[clause_id]
    }

    pub fn max_weight(&self) -> f64 {
        self.enc.max_weight
    }

    pub fn max_vars_in_clause(&self) -> usize {
        self.enc.max_vars_in_clause
    }

    /// Dense id of the variable originally called `name`, if it is simulated.
    pub fn var_id(&self, name: u32) -> Option<usize> {
        self.enc.variable_names.binary_search(&name).ok()
    }
}

fn not_configured() -> ModelError {
    ModelError::Configuration("maxsat model used before configure()".to_string())
}

fn build_encoding(clauses: &[Clause]) -> Result<Encoding> {
    let mut always_true = vec![false; clauses.len()];
    let mut used = BTreeSet::<u32>::new();
    let mut potentially_free = BTreeSet::<u32>::new();
    let mut active = 0usize;

    for (i, clause) in clauses.iter().enumerate() {
        if clause.lits.is_empty() {
            return Err(ModelError::value(
                "List of variables in a clause cannot be empty.",
            ));
        }
        if !(clause.weight.is_finite() && clause.weight > 0.0) {
            return Err(ModelError::value(format!(
                "Clause weight must be positive, got {}",
                clause.weight
            )));
        }
        if let Some(lit) = clause
            .lits
            .iter()
            .find(|l| l.var == 0 || l.var > MAX_VARIABLE_NAME)
        {
            return Err(unnegatable_name_error(lit.var));
        }
        if clause.is_tautology() {
            always_true[i] = true;
            potentially_free.extend(clause.lits.iter().map(|l| l.var));
        } else {
            active += 1;
            used.extend(clause.lits.iter().map(|l| l.var));
        }
    }
    if active > i32::MAX as usize {
        return Err(ModelError::value(format!(
            "Too many clauses to index: {active}"
        )));
    }

    let free_variables = potentially_free
        .difference(&used)
        .copied()
        .collect::<Vec<_>>();
    let variable_names = used.into_iter().collect::<Vec<_>>();

    let mut enc = Encoding {
        weights: vec![0.0],
        free_variables,
        ..Encoding::default()
    };
    if variable_names.is_empty() || active == 0 {
        return Ok(enc);
    }

    let name_to_id = variable_names
        .iter()
        .enumerate()
        .map(|(id, &name)| (name, id))
        .collect::<BTreeMap<_, _>>();

    enc.weights.reserve(active);
    enc.affected = vec![Vec::new(); variable_names.len()];
    enc.max_weight = f64::MIN;
    for (clause, _) in clauses
        .iter()
        .zip(&always_true)
        .filter(|&(_, &skip)| !skip)
    {
        let clause_id = enc.weights.len() as i32;
        enc.weights.push(clause.weight);
        enc.max_weight = enc.max_weight.max(clause.weight);

        let mut seen = BTreeSet::new();
        for lit in &clause.lits {
            let var_id = name_to_id[&lit.var];
            if !seen.insert(var_id) {
                continue;
            }
            enc.affected[var_id].push(if lit.sign { clause_id } else { -clause_id });
        }
        enc.max_vars_in_clause = enc.max_vars_in_clause.max(seen.len());
    }
    enc.variable_names = variable_names;
    Ok(enc)
}

impl<C: Counter> StateModel for MaxSat<C> {
    type State = SatisfactionState<C>;
    type Transition = usize;
    type Rendered = IndexMap<String, u8>;

    fn identifier(&self) -> &'static str {
        "maxsat"
    }

    fn version(&self) -> &'static str {
        "1.0"
    }

    /// All variables false; negated occurrences start out true.
    fn create_state(&self) -> Result<Self::State> {
        if !self.configured {
            return Err(not_configured());
        }
        let mut state =
            SatisfactionState::<C>::zeroed(self.enc.affected.len(), self.enc.weights.len());
        for clauses in &self.enc.affected {
            for &clause_id in clauses {
                if clause_id < 0 {
                    state.counters[clause_id.unsigned_abs() as usize].incr();
                }
            }
        }
        Ok(state)
    }

    fn create_state_from(&self, assignment: &[bool]) -> Result<Self::State> {
        let mut state = self.create_state()?;
        let n = self.enc.affected.len();
        if assignment.len() != n {
            return Err(ModelError::value(format!(
                "Wrong number of variables to initialize: got {} but the model has {} active variable{}",
                assignment.len(),
                n,
                if n != 1 { "s." } else { "." }
            )));
        }
        for (var, &value) in assignment.iter().enumerate() {
            if value {
                self.apply_transition(&var, &mut state);
            }
        }
        Ok(state)
    }

    fn random_state<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Self::State> {
        let mut state = self.create_state()?;
        for var in 0..self.enc.affected.len() {
            if rng.random_bool(0.5) {
                self.apply_transition(&var, &mut state);
            }
        }
        Ok(state)
    }

    /// Uniform over variables. An empty model always yields 0, which is not
    /// a valid transition.
    fn random_transition<R: Rng + ?Sized>(&self, _state: &Self::State, rng: &mut R) -> usize {
        let n = self.enc.affected.len();
        if n == 0 {
            return 0;
        }
        rng.random_range(0..n)
    }

    fn cost(&self, state: &Self::State) -> f64 {
        debug_assert_eq!(self.enc.weights.len(), state.counters.len());
        self.enc
            .weights
            .iter()
            .zip(&state.counters)
            .skip(1)
            .filter(|&(_, &count)| count == C::ZERO)
            .map(|(&w, _)| w)
            .sum()
    }

    fn cost_difference(&self, state: &Self::State, transition: &usize) -> f64 {
        let var = *transition;
        let weights = &self.enc.weights;
        let counters = &state.counters;
        let mut diff = 0.0;
        if state.assignment[var] {
            // true -> false
            for &clause_id in &self.enc.affected[var] {
                let c = clause_id.unsigned_abs() as usize;
                if clause_id > 0 {
                    // last true literal goes away
                    if counters[c] == C::ONE {
                        diff += weights[c];
                    }
                } else if counters[c] == C::ZERO {
                    // !var becomes the first true literal
                    diff -= weights[c];
                }
            }
        } else {
            // false -> true
            for &clause_id in &self.enc.affected[var] {
                let c = clause_id.unsigned_abs() as usize;
                if clause_id > 0 {
                    if counters[c] == C::ZERO {
                        diff -= weights[c];
                    }
                } else if counters[c] == C::ONE {
                    // !var was the only true literal
                    diff += weights[c];
                }
            }
        }
        diff
    }

    fn apply_transition(&self, transition: &usize, state: &mut Self::State) {
        let var = *transition;
        let value = state.assignment[var];
        for &clause_id in &self.enc.affected[var] {
            let counter = &mut state.counters[clause_id.unsigned_abs() as usize];
            // positive occurrence loses a true literal iff var was true
            if (clause_id > 0) == value {
                counter.decr();
            } else {
                counter.incr();
            }
        }
        state.assignment[var] = !value;
    }

    fn render_state(&self, state: &Self::State) -> Result<Self::Rendered> {
        let names = &self.enc.variable_names;
        if state.assignment.len() != names.len() {
            return Err(ModelError::index(format!(
                "Number of variables in the state does not correspond to the number of variables in the model: {}!={}",
                state.assignment.len(),
                names.len()
            )));
        }
        let mut rendered = IndexMap::with_capacity(names.len() + self.enc.free_variables.len());
        for (&name, &value) in names.iter().zip(&state.assignment) {
            rendered.insert(name.to_string(), u8::from(value));
        }
        for &name in &self.enc.free_variables {
            rendered.insert(name.to_string(), 1);
        }
        Ok(rendered)
    }

    fn is_empty(&self) -> bool {
        self.enc.variable_names.is_empty()
    }

    fn term_count(&self) -> usize {
        self.enc.weights.len() - 1
    }

    fn sweep_size(&self) -> usize {
        self.enc.affected.len()
    }

    fn state_memory_estimate(&self) -> usize {
        SatisfactionState::<C>::memory_estimate(self.enc.affected.len(), self.term_count())
    }

    fn state_only_memory_estimate(&self) -> usize {
        SatisfactionState::<C>::state_only_memory_estimate(self.enc.affected.len())
    }

    fn estimate_max_cost_diff(&self) -> f64 {
        bounds::max_cost_diff(&self.enc.affected, &self.enc.weights)
    }

    fn estimate_min_cost_diff(&self) -> f64 {
        bounds::min_cost_diff(&self.enc.affected, &self.enc.weights)
    }
}
