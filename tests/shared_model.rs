use maxsat_model::cnf::dimacs::parse_dimacs_str;
use maxsat_model::model::{MaxSat32, StateModel};
use maxsat_model::rng::trajectory_rng;
use rayon::prelude::*;

fn model() -> MaxSat32 {
    let cnf = parse_dimacs_str(
        "\
p wcnf 5 6
3 1 -2 0
2 2 3 0
5 -3 -4 5 0
1 -1 0
4 4 -5 0
2 1 2 3 4 5 0
",
    )
    .expect("parse");
    MaxSat32::from_clauses(&cnf.clauses).expect("configure")
}

// greedy descent from a random start, one trajectory per index
fn descend(model: &MaxSat32, seed: u64, index: u64) -> (Vec<bool>, f64) {
    let mut rng = trajectory_rng(seed, index);
    let mut state = model.random_state(&mut rng).expect("state");
    for _ in 0..50 * model.sweep_size() {
        let t = model.random_transition(&state, &mut rng);
        if model.cost_difference(&state, &t) <= 0.0 {
            model.apply_transition(&t, &mut state);
        }
    }
    let cost = model.cost(&state);
    (state.assignment().to_vec(), cost)
}

#[test]
fn trajectories_share_one_model() {
    let model = model();
    let parallel = (0..16u64)
        .into_par_iter()
        .map(|i| descend(&model, 7, i))
        .collect::<Vec<_>>();
    let serial = (0..16u64).map(|i| descend(&model, 7, i)).collect::<Vec<_>>();
    assert_eq!(parallel, serial);

    for (assignment, cost) in &parallel {
        let state = model.create_state_from(assignment).expect("state");
        assert_eq!(model.cost(&state), *cost);
    }
}

#[test]
fn same_seed_same_random_state() {
    let model = model();
    let a = model.random_state(&mut trajectory_rng(3, 0)).expect("state");
    let b = model.random_state(&mut trajectory_rng(3, 0)).expect("state");
    assert_eq!(a, b);
    let t = model.random_transition(&a, &mut trajectory_rng(3, 1));
    assert!(t < model.num_vars());
}
