#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use ripple_core::OutputToInputMarkingMode;
use ripple_core::PropagationMode;
use ripple_core::Solver;
use ripple_core::SolverOptions;
use ripple_core::variables::VarId;
use ripple_core::variables::VarViewId;
use ripple_invariants::AllDifferentArgs;
use ripple_invariants::CountArgs;
use ripple_invariants::ElementVarArgs;
use ripple_invariants::EqualArgs;
use ripple_invariants::IntOffsetView;
use ripple_invariants::LessEqualArgs;
use ripple_invariants::LinearArgs;
use ripple_invariants::ScalarView;
use ripple_invariants::TimesArgs;

mod helpers;
use helpers::commit;
use helpers::init_logging;
use helpers::make_move;
use helpers::probe;

const NUM_SEARCH_VARS: usize = 6;
const DOMAIN: (i64, i64) = (0, 5);

struct Model {
    solver: Solver,
    search_vars: Vec<VarId>,
    outputs: Vec<VarViewId>,
}

fn initial_values() -> Vec<i64> {
    (0..NUM_SEARCH_VARS)
        .map(|i| i as i64 % (DOMAIN.1 + 1))
        .collect()
}

/// A layered model mixing every invariant of the catalogue, in which the product and the element
/// read defined variables; the same calls in the same order give the same handles for every set
/// of options.
fn build_model(options: SolverOptions, initial_values: &[i64]) -> Model {
    let mut solver = Solver::with_options(options);
    let x = initial_values
        .iter()
        .map(|&value| solver.make_int_var(value, DOMAIN.0, DOMAIN.1))
        .collect::<Vec<_>>();
    let define = |solver: &mut Solver| solver.make_int_var(0, 0, 0);

    let sum = define(&mut solver);
    let _ = solver
        .make_invariant(LinearArgs {
            coefficients: [1, 2, -1, 3].into(),
            inputs: [x[0], x[1], x[2], x[3]].map(VarViewId::from).into(),
            output: sum,
        })
        .expect("fresh output");

    let shifted = solver.make_view(x[4], IntOffsetView::new(-2));
    let product = define(&mut solver);
    let _ = solver
        .make_invariant(TimesArgs {
            a: shifted.into(),
            b: sum.into(),
            output: product,
        })
        .expect("fresh output");

    let count = define(&mut solver);
    let _ = solver
        .make_invariant(CountArgs {
            array: x.iter().map(|&var| var.into()).collect(),
            needle: x[1].into(),
            output: count,
        })
        .expect("fresh output");

    let selected = define(&mut solver);
    let _ = solver
        .make_invariant(ElementVarArgs {
            index: count.into(),
            array: [sum, product, x[2], x[5]].map(VarViewId::from).into(),
            output: selected,
            offset: 1,
        })
        .expect("fresh output");

    let all_different = define(&mut solver);
    let _ = solver
        .make_invariant(AllDifferentArgs {
            violation: all_different,
            array: x.iter().map(|&var| var.into()).collect(),
        })
        .expect("fresh output");

    let negated = solver.make_view(selected, ScalarView::negation());
    let less_equal = define(&mut solver);
    let _ = solver
        .make_invariant(LessEqualArgs {
            violation: less_equal,
            a: count.into(),
            b: negated.into(),
        })
        .expect("fresh output");

    let equal = define(&mut solver);
    let _ = solver
        .make_invariant(EqualArgs {
            violation: equal,
            a: product.into(),
            b: sum.into(),
        })
        .expect("fresh output");

    let objective = define(&mut solver);
    let _ = solver
        .make_invariant(LinearArgs::sum(
            [all_different, less_equal, equal, selected],
            objective,
        ))
        .expect("fresh output");

    solver.compute_bounds();
    solver.close().expect("the model is acyclic");

    let outputs = [
        sum,
        product,
        selected,
        count,
        all_different,
        less_equal,
        equal,
        objective,
    ]
    .map(VarViewId::from)
    .into_iter()
    .chain([negated.into(), shifted.into()])
    .collect();

    Model {
        solver,
        search_vars: x,
        outputs,
    }
}

fn all_options() -> Vec<SolverOptions> {
    let mut options = vec![SolverOptions::default()];
    for marking_mode in [
        OutputToInputMarkingMode::None,
        OutputToInputMarkingMode::OutputToInputStatic,
        OutputToInputMarkingMode::InputToOutputExploration,
    ] {
        options.push(SolverOptions {
            propagation_mode: PropagationMode::OutputToInput,
            marking_mode,
        });
    }
    options
}

#[test]
fn push_and_pull_agree_on_random_moves() {
    init_logging();
    let mut models = all_options()
        .into_iter()
        .map(|options| build_model(options, &initial_values()))
        .collect::<Vec<_>>();
    let mut rng = SmallRng::seed_from_u64(42);

    for _ in 0..200 {
        let num_changes = rng.gen_range(1..=3);
        let assignment = (0..num_changes)
            .map(|_| {
                (
                    rng.gen_range(0..NUM_SEARCH_VARS),
                    rng.gen_range(DOMAIN.0..=DOMAIN.1),
                )
            })
            .collect::<Vec<_>>();
        let should_commit = rng.gen_bool(0.3);

        let mut probed = Vec::new();
        let mut committed = Vec::new();
        for model in &mut models {
            let assignment = assignment
                .iter()
                .map(|&(i, value)| (model.search_vars[i], value))
                .collect::<Vec<_>>();
            make_move(&mut model.solver, &assignment);
            probed.push(probe(&mut model.solver, &model.outputs).expect("acyclic"));
            if should_commit {
                committed.push(commit(&mut model.solver, &model.outputs).expect("acyclic"));
            }
        }

        assert!(probed.windows(2).all(|pair| pair[0] == pair[1]), "{probed:?}");
        assert!(
            committed.windows(2).all(|pair| pair[0] == pair[1]),
            "{committed:?}"
        );

        if let Some(committed) = committed.first() {
            let values = models[0]
                .search_vars
                .iter()
                .map(|&var| models[0].solver.committed_value(var))
                .collect::<Vec<_>>();
            let fresh = build_model(SolverOptions::default(), &values);
            let from_scratch = fresh
                .outputs
                .iter()
                .map(|&var| fresh.solver.committed_value(var))
                .collect::<Vec<_>>();
            assert_eq!(committed, &from_scratch, "{values:?}");
        }
    }
}

#[test]
fn incremental_values_match_a_fresh_model() {
    init_logging();
    let mut rng = SmallRng::seed_from_u64(7);

    for options in all_options() {
        let mut model = build_model(options, &initial_values());

        for _ in 0..50 {
            let assignment = (0..NUM_SEARCH_VARS)
                .filter_map(|i| {
                    rng.gen_bool(0.4)
                        .then(|| (model.search_vars[i], rng.gen_range(DOMAIN.0..=DOMAIN.1)))
                })
                .collect::<Vec<_>>();
            make_move(&mut model.solver, &assignment);
            let incremental = commit(&mut model.solver, &model.outputs).expect("acyclic");

            // Closing a model built with the committed values computes every output from scratch
            let values = model
                .search_vars
                .iter()
                .map(|&var| model.solver.committed_value(var))
                .collect::<Vec<_>>();
            let fresh = build_model(options, &values);
            let from_scratch = fresh
                .outputs
                .iter()
                .map(|&var| fresh.solver.committed_value(var))
                .collect::<Vec<_>>();

            assert_eq!(incremental, from_scratch, "{options:?} {values:?}");
        }
    }
}
