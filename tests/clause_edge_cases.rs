use maxsat_model::cnf::Clause;
use maxsat_model::model::{MaxSat32, MaxSat8, StateModel};
use maxsat_model::ModelError;

fn model(terms: &[(f64, &[i32])]) -> MaxSat32 {
    let clauses = terms
        .iter()
        .map(|&(w, ids)| Clause::from_dimacs(w, ids).expect("clause"))
        .collect::<Vec<_>>();
    MaxSat32::from_clauses(&clauses).expect("configure")
}

#[test]
fn repeated_literals_count_once() {
    let model = model(&[(1.0, &[1, 1]), (2.0, &[-1, -1])]);
    assert_eq!(model.affected(0), &[1, -2]);

    let one_true = model.create_state_from(&[true]).expect("state");
    assert_eq!(model.cost(&one_true), 2.0);
    assert_eq!(model.cost_difference(&one_true, &0), -1.0);

    let one_false = model.create_state_from(&[false]).expect("state");
    assert_eq!(model.cost(&one_false), 1.0);
    assert_eq!(model.cost_difference(&one_false, &0), 1.0);
}

#[test]
fn always_true_clauses_are_ignored() {
    let model = model(&[(1.0, &[1]), (2.0, &[1, -1]), (4.0, &[-1, 1, -1])]);
    assert_eq!(model.term_count(), 1);

    let one_true = model.create_state_from(&[true]).expect("state");
    assert_eq!(model.cost(&one_true), 0.0);
    assert_eq!(model.cost_difference(&one_true, &0), 1.0);

    let one_false = model.create_state_from(&[false]).expect("state");
    assert_eq!(model.cost(&one_false), 1.0);
    assert_eq!(model.cost_difference(&one_false, &0), -1.0);
}

#[test]
fn free_variables_render_true() {
    let model = model(&[(1.0, &[1]), (2.0, &[1, -1, 4, 2, 3])]);
    assert_eq!(model.free_variables(), &[2, 3, 4]);

    let err = model
        .create_state_from(&[false, false, false, false])
        .expect_err("length mismatch");
    assert_eq!(
        err,
        ModelError::Value(
            "Wrong number of variables to initialize: got 4 but the model has 1 active variable."
                .to_string()
        )
    );

    let one_false = model.create_state_from(&[false]).expect("state");
    assert_eq!(model.cost(&one_false), 1.0);
    assert_eq!(model.cost_difference(&one_false, &0), -1.0);

    let rendered = model.render_state(&one_false).expect("render");
    let pairs = rendered
        .iter()
        .map(|(k, &v)| (k.as_str(), v))
        .collect::<Vec<_>>();
    assert_eq!(pairs, vec![("1", 0), ("2", 1), ("3", 1), ("4", 1)]);
}

#[test]
fn free_variables_are_not_in_memory_estimate() {
    let with_free = model(&[(1.0, &[1]), (2.0, &[5, -5, 9])]);
    let without = model(&[(1.0, &[1])]);
    assert_eq!(with_free.num_vars(), 1);
    assert_eq!(
        with_free.state_memory_estimate(),
        without.state_memory_estimate()
    );
}

#[test]
fn variable_in_active_clause_is_not_free() {
    let model = model(&[(3.0, &[2, -2]), (1.0, &[2, 7])]);
    assert!(model.free_variables().is_empty());
    assert_eq!(model.variable_names(), &[2, 7]);
    let state = model.create_state_from(&[true, false]).expect("state");
    let rendered = model.render_state(&state).expect("render");
    assert_eq!(rendered["2"], 1);
    assert_eq!(rendered["7"], 0);
}

#[test]
fn only_tautologies_give_empty_model() {
    let model = model(&[(1.0, &[1, -1]), (2.0, &[3, -3, 4])]);
    assert!(model.is_empty());
    assert_eq!(model.term_count(), 0);
    assert_eq!(model.sweep_size(), 0);

    let state = model.create_state().expect("state");
    assert_eq!(model.cost(&state), 0.0);
    assert_eq!(model.estimate_max_cost_diff(), 0.0);
    assert_eq!(model.estimate_min_cost_diff(), 0.0);

    let rendered = model.render_state(&state).expect("render");
    assert_eq!(rendered.len(), 3);
    assert!(rendered.values().all(|&v| v == 1));
}

#[test]
fn rejects_zero_name_and_empty_clause() {
    assert!(Clause::from_dimacs(1.0, &[1, 0]).is_err());

    let zero = vec![Clause::new(1.0, vec![maxsat_model::cnf::Lit::new(0, true)])];
    let err = MaxSat32::from_clauses(&zero).expect_err("zero name");
    assert!(matches!(err, ModelError::Value(ref m) if m.contains("name 0")));

    let empty = vec![
        Clause::from_dimacs(1.0, &[1, 2]).expect("clause"),
        Clause::unit_weight(Vec::new()),
    ];
    let err = MaxSat32::from_clauses(&empty).expect_err("empty clause");
    assert_eq!(
        err,
        ModelError::Value("List of variables in a clause cannot be empty.".to_string())
    );
}

#[test]
fn rejects_non_positive_weight() {
    let clauses = vec![Clause::from_dimacs(0.0, &[1]).expect("clause")];
    assert!(MaxSat32::from_clauses(&clauses).is_err());
    let clauses = vec![Clause::from_dimacs(f64::NAN, &[1]).expect("clause")];
    assert!(MaxSat32::from_clauses(&clauses).is_err());
}

#[test]
fn unconfigured_model_refuses_states() {
    let model = MaxSat32::new();
    assert!(matches!(
        model.create_state(),
        Err(ModelError::Configuration(_))
    ));
    assert!(model.is_empty());
    assert!(matches!(
        MaxSat32::new().into_counter::<u8>(),
        Err(ModelError::Configuration(_))
    ));
}

#[test]
fn render_rejects_foreign_state() {
    let small = model(&[(1.0, &[1])]);
    let big = model(&[(1.0, &[1, 2, 3])]);
    let state = big.create_state().expect("state");
    assert!(matches!(
        small.render_state(&state),
        Err(ModelError::Index(_))
    ));
}

#[test]
fn narrow_counters_behave_like_wide_ones() {
    let wide = model(&[(1.0, &[-1]), (4.0, &[1, 2]), (2.0, &[-2])]);
    let narrow: MaxSat8 = wide.clone().into_counter().expect("narrow");
    for bits in [[false, false], [true, false], [false, true], [true, true]] {
        let a = wide.create_state_from(&bits).expect("state");
        let b = narrow.create_state_from(&bits).expect("state");
        assert_eq!(wide.cost(&a), narrow.cost(&b));
        for v in 0..2 {
            assert_eq!(wide.cost_difference(&a, &v), narrow.cost_difference(&b, &v));
        }
    }
}

#[test]
fn names_must_have_a_negation() {
    let too_big = vec![Clause::new(1.0, vec![maxsat_model::cnf::Lit::new(1 << 31, true)])];
    let err = MaxSat32::from_clauses(&too_big).expect_err("unnegatable name");
    assert!(matches!(err, ModelError::Value(ref m) if m.contains("2147483648")));

    let largest = model(&[(1.0, &[i32::MAX, -1])]);
    assert_eq!(largest.variable_names(), &[1, i32::MAX as u32]);
}
