use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use std::sync::Arc;

use netkit::{
    CategoricalAttribute, ChannelListener, Classification, EngineState, Estimate, GibbsSampling,
    Graph, InferenceEngine, InferenceError, InferenceEvent, InferenceMethod, InferenceOptions,
    IterativeClassification, ListenerError, NetKitError, NetworkClassifier, NodeId, NullInference,
    RelaxationLabeling, Snapshot, SnapshotError, SnapshotSink, WeightedVoteRelationalNeighbor,
};

fn attr() -> Arc<CategoricalAttribute> {
    Arc::new(CategoricalAttribute::new("label", ["a", "b"]))
}

fn nodes(n: usize) -> Vec<NodeId> {
    (0..n).map(NodeId::new).collect()
}

fn uniform_prior(n: usize) -> Estimate {
    Estimate::uniform(attr(), nodes(n))
}

/// Always predicts the same vector and counts calls.
struct Constant {
    scores: Vec<f64>,
    calls: usize,
}

impl Constant {
    fn new(scores: &[f64]) -> Self {
        Self {
            scores: scores.to_vec(),
            calls: 0,
        }
    }
}

impl NetworkClassifier for Constant {
    fn estimate(
        &mut self,
        _node: NodeId,
        _context: &Estimate,
        out: &mut [f64],
        _use_context_as_prior: bool,
    ) -> Result<bool, InferenceError> {
        self.calls += 1;
        out.copy_from_slice(&self.scores);
        Ok(true)
    }
}

/// Declines every node.
struct Silent;

impl NetworkClassifier for Silent {
    fn estimate(
        &mut self,
        _node: NodeId,
        _context: &Estimate,
        _out: &mut [f64],
        _use_context_as_prior: bool,
    ) -> Result<bool, InferenceError> {
        Ok(false)
    }
}

/// Fails on one node.
struct FailsOn(NodeId);

impl NetworkClassifier for FailsOn {
    fn estimate(
        &mut self,
        node: NodeId,
        _context: &Estimate,
        out: &mut [f64],
        _use_context_as_prior: bool,
    ) -> Result<bool, InferenceError> {
        if node == self.0 {
            return Err(InferenceError::Classifier {
                node,
                message: "feature lookup failed".to_string(),
            });
        }
        out.fill(0.5);
        Ok(true)
    }
}

fn engine(method: impl Into<InferenceMethod>, options: &InferenceOptions) -> InferenceEngine {
    InferenceEngine::configured(method, options).unwrap().with_seed(7)
}

#[test]
fn reset_copies_prior_row_for_every_unknown() {
    let mut prior = Estimate::new(attr());
    prior.set(NodeId::new(0), &[0.2, 0.8]).unwrap();
    prior.set(NodeId::new(1), &[0.6, 0.4]).unwrap();
    prior.set(NodeId::new(2), &[1.0, 0.0]).unwrap();

    for method in ["null", "ica", "relaxation", "gibbs"] {
        let mut engine = engine(InferenceMethod::from_name(method).unwrap(), &InferenceOptions::new());
        engine.set_prior(prior.clone());
        engine.reset(nodes(2)).unwrap();
        let working = engine.estimate().unwrap();
        for node in nodes(2) {
            assert_eq!(working.get(node), prior.get(node), "{method}: {node}");
        }
        assert_eq!(engine.state(), EngineState::Running);
    }
}

#[test]
fn reset_never_mutates_the_callers_prior() {
    let prior = uniform_prior(3);
    let mut engine = engine(RelaxationLabeling::new(), &InferenceOptions::new().with("numit", 5));
    engine.set_prior(prior.clone());
    engine.run(&mut Constant::new(&[0.9, 0.1]), nodes(3)).unwrap();
    assert_eq!(engine.prior(), Some(&prior));
}

#[test]
fn ica_quiesces_after_a_stable_sweep() {
    let mut engine = engine(IterativeClassification::new(), &InferenceOptions::new());
    engine.set_prior(uniform_prior(3));
    engine.reset(nodes(3)).unwrap();

    let mut classifier = Constant::new(&[0.7, 0.3]);
    assert!(engine.iterate(&mut classifier).unwrap());
    assert!(!engine.iterate(&mut classifier).unwrap());

    let working = engine.estimate().unwrap();
    for node in nodes(3) {
        assert_eq!(working.get(node), Some(&[0.7, 0.3][..]));
    }
}

#[test]
fn ica_run_stops_after_two_sweeps() {
    let mut engine = engine(IterativeClassification::new(), &InferenceOptions::new());
    engine.set_prior(uniform_prior(3));
    let mut classifier = Constant::new(&[0.7, 0.3]);
    engine.run(&mut classifier, nodes(3)).unwrap();

    let summary = engine.summary().unwrap();
    assert_eq!(summary.sweeps, 2);
    assert_eq!(summary.budget, 1000);
    assert!(summary.stopped_early);
    assert_eq!(classifier.calls, 6);
    assert_eq!(engine.state(), EngineState::Terminal);
}

#[test]
fn ica_declines_keep_the_prior() {
    let mut engine = engine(IterativeClassification::new(), &InferenceOptions::new());
    engine.set_prior(uniform_prior(2));
    engine.reset(nodes(2)).unwrap();
    // Nothing was labeled before, so declining changes nothing.
    assert!(!engine.iterate(&mut Silent).unwrap());
    assert_eq!(engine.estimate().unwrap().get(NodeId::new(0)), Some(&[0.5, 0.5][..]));
}

#[test]
fn ica_updates_are_visible_within_the_sweep() {
    // Path 0 - 1 - 2 with only 0 labeled: one sweep carries the label to 2.
    let mut graph = Graph::new();
    let ids: Vec<NodeId> = ["x", "y", "z"].into_iter().map(|n| graph.add_node(n)).collect();
    graph.add_edge(ids[0], ids[1], 1.0);
    graph.add_edge(ids[1], ids[2], 1.0);

    let mut known = Classification::new(attr());
    known.set(ids[0], Some(1));
    let prior = Estimate::from_classification(&known);

    let mut engine = engine(IterativeClassification::new(), &InferenceOptions::new());
    engine.set_prior(prior);
    engine.reset([ids[1], ids[2]]).unwrap();
    let mut wvrn = WeightedVoteRelationalNeighbor::new(Arc::new(graph));
    assert!(engine.iterate(&mut wvrn).unwrap());
    assert_eq!(engine.estimate().unwrap().argmax(ids[2]), Some(1));
}

#[test]
fn relaxation_applies_damping_law() {
    let mut engine = engine(
        RelaxationLabeling::new(),
        &InferenceOptions::parse("beta=0.5, decay=1.0, numit=3").unwrap(),
    );
    engine.set_prior(uniform_prior(1));
    engine.reset(nodes(1)).unwrap();

    let mut classifier = Constant::new(&[0.8, 0.2]);
    assert!(engine.iterate(&mut classifier).unwrap());
    let row = engine.estimate().unwrap().get(NodeId::new(0)).unwrap().to_vec();
    assert!((row[0] - 0.65).abs() < 1e-12);
    assert!((row[1] - 0.35).abs() < 1e-12);

    assert!(engine.iterate(&mut classifier).unwrap());
    let row = engine.estimate().unwrap().get(NodeId::new(0)).unwrap().to_vec();
    assert!((row[0] - 0.725).abs() < 1e-12);
}

#[test]
fn relaxation_always_runs_full_budget() {
    let mut engine = engine(RelaxationLabeling::new(), &InferenceOptions::new().with("numit", 4));
    engine.set_prior(uniform_prior(2));
    let mut classifier = Constant::new(&[1.0, 0.0]);
    engine.run(&mut classifier, nodes(2)).unwrap();
    let summary = engine.summary().unwrap();
    assert_eq!(summary.sweeps, 4);
    assert!(!summary.stopped_early);
    assert_eq!(classifier.calls, 8);
}

#[test]
fn relaxation_beta_decays_each_sweep() {
    let mut engine = engine(
        RelaxationLabeling::new(),
        &InferenceOptions::new().with("beta", 0.8).with("decay", 0.5),
    );
    engine.set_prior(uniform_prior(1));
    engine.reset(nodes(1)).unwrap();
    engine.iterate(&mut Constant::new(&[1.0, 0.0])).unwrap();
    engine.iterate(&mut Constant::new(&[1.0, 0.0])).unwrap();
    let InferenceMethod::Relaxation(relax) = engine.method() else {
        panic!("expected relaxation");
    };
    assert!((relax.beta() - 0.2).abs() < 1e-12);
}

#[test]
fn gibbs_marginal_of_deterministic_predictor() {
    for n in [1, 3, 10] {
        let options = InferenceOptions::new()
            .with("numchains", 1)
            .with("burnin", 0)
            .with("numit", n);
        let mut engine = engine(GibbsSampling::new(), &options);
        engine.set_prior(uniform_prior(1));
        let estimate = engine.run(&mut Constant::new(&[1.0, 0.0]), nodes(1)).unwrap();
        assert_eq!(estimate.get(NodeId::new(0)), Some(&[1.0, 0.0][..]));
    }
}

#[test]
fn gibbs_budget_defaults_for_non_positive_options() {
    let options = InferenceOptions::parse("burnin=0 numit=0 numchains=0").unwrap();
    let engine = engine(GibbsSampling::new(), &options);
    let InferenceMethod::Gibbs(gibbs) = engine.method() else {
        panic!("expected gibbs");
    };
    assert_eq!(gibbs.burn_in(), 200);
    assert_eq!(gibbs.num_samples(), 2000);
    assert_eq!(gibbs.num_chains(), 10);
    assert_eq!(engine.method().num_iterations(), 2200);
}

#[test]
fn gibbs_tallies_only_after_burn_in() {
    let options = InferenceOptions::new()
        .with("numchains", 2)
        .with("burnin", 2)
        .with("numit", 3);
    let mut engine = engine(GibbsSampling::new(), &options);
    engine.set_prior(uniform_prior(2));
    engine.reset(nodes(2)).unwrap();

    let mut classifier = Constant::new(&[0.0, 1.0]);
    for _ in 0..2 {
        assert!(engine.iterate(&mut classifier).unwrap());
        assert_eq!(engine.estimate().unwrap().get(NodeId::new(0)), Some(&[0.5, 0.5][..]));
    }
    assert!(engine.iterate(&mut classifier).unwrap());
    let InferenceMethod::Gibbs(gibbs) = engine.method() else {
        panic!("expected gibbs");
    };
    assert!(!gibbs.in_burn_in());
    // Two chains, one tallied sweep.
    assert_eq!(gibbs.counts()[0], vec![0.0, 2.0]);
    assert_eq!(engine.estimate().unwrap().get(NodeId::new(1)), Some(&[0.0, 1.0][..]));
    assert_eq!(classifier.calls, 12);
}

#[test]
fn gibbs_chains_are_permutations_of_the_unknown_set() {
    let options = InferenceOptions::new().with("numchains", 4);
    let mut engine = engine(GibbsSampling::new(), &options);
    engine.set_prior(uniform_prior(6));
    engine.reset(nodes(6)).unwrap();
    let InferenceMethod::Gibbs(gibbs) = engine.method() else {
        panic!("expected gibbs");
    };
    assert_eq!(gibbs.chains().len(), 4);
    for chain in gibbs.chains() {
        let mut sorted = chain.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..6).collect::<Vec<_>>());
    }
}

#[test]
fn gibbs_declines_keep_the_prior() {
    let options = InferenceOptions::new()
        .with("numchains", 1)
        .with("burnin", 1)
        .with("numit", 5);
    let mut engine = engine(GibbsSampling::new(), &options);
    engine.set_prior(uniform_prior(1));
    let estimate = engine.run(&mut Silent, nodes(1)).unwrap();
    assert_eq!(estimate.get(NodeId::new(0)), Some(&[0.5, 0.5][..]));

    let InferenceMethod::Gibbs(gibbs) = engine.method() else {
        panic!("expected gibbs");
    };
    assert_eq!(gibbs.counts()[0], vec![0.0, 0.0]);
}

/// Predicts class `a` and records the context row it was shown.
#[derive(Default)]
struct Recording {
    seen: Vec<Option<Vec<f64>>>,
}

impl NetworkClassifier for Recording {
    fn estimate(
        &mut self,
        node: NodeId,
        context: &Estimate,
        out: &mut [f64],
        _use_context_as_prior: bool,
    ) -> Result<bool, InferenceError> {
        self.seen.push(context.get(node).map(<[f64]>::to_vec));
        out.copy_from_slice(&[1.0, 0.0]);
        Ok(true)
    }
}

#[test]
fn gibbs_chains_share_one_running_scratch() {
    let options = InferenceOptions::new()
        .with("numchains", 2)
        .with("burnin", 1)
        .with("numit", 1);
    let mut engine = engine(GibbsSampling::new(), &options);
    engine.set_prior(uniform_prior(1));
    engine.reset(nodes(1)).unwrap();

    let mut classifier = Recording::default();
    engine.iterate(&mut classifier).unwrap();
    // The second chain sees the first chain's draw from the same sweep.
    assert_eq!(
        classifier.seen,
        vec![Some(vec![0.5, 0.5]), Some(vec![1.0, 0.0])]
    );
}

#[test]
fn seeded_runs_replay_exactly() {
    let options = InferenceOptions::new()
        .with("numchains", 3)
        .with("burnin", 2)
        .with("numit", 6);
    let run = |seed: u64| {
        let mut engine = InferenceEngine::configured(GibbsSampling::new(), &options).unwrap();
        engine.set_prior(uniform_prior(5));
        engine.reset_with_seed(nodes(5), seed).unwrap();
        let mut classifier = Constant::new(&[0.3, 0.7]);
        while engine.iterate(&mut classifier).unwrap() {
            if engine.run_state().unwrap().sweeps() == engine.method().num_iterations() {
                break;
            }
        }
        engine.estimate().unwrap().clone()
    };
    assert_eq!(run(42), run(42));
}

#[test]
fn null_inference_runs_once() {
    let mut engine = engine(NullInference::new(), &InferenceOptions::new());
    engine.set_prior(uniform_prior(2));
    engine.reset(nodes(2)).unwrap();
    let mut classifier = Constant::new(&[0.1, 0.9]);
    assert!(engine.iterate(&mut classifier).unwrap());
    assert!(!engine.iterate(&mut classifier).unwrap());
    assert_eq!(classifier.calls, 2);
    assert_eq!(engine.estimate().unwrap().get(NodeId::new(1)), Some(&[0.1, 0.9][..]));
}

#[test]
fn run_before_prior_is_a_precondition_error() {
    let mut engine = engine(IterativeClassification::new(), &InferenceOptions::new());
    let err = engine.run(&mut Silent, nodes(1)).unwrap_err();
    assert!(err.is_precondition());
    assert!(err.is_fatal());
}

#[test]
fn classifier_error_aborts_the_run() {
    let mut engine = engine(IterativeClassification::new(), &InferenceOptions::new());
    engine.set_prior(uniform_prior(3));
    let err = engine.run(&mut FailsOn(NodeId::new(1)), nodes(3)).unwrap_err();
    assert!(matches!(
        err,
        NetKitError::Inference(InferenceError::Classifier { node, .. }) if node == NodeId::new(1)
    ));
    assert_eq!(engine.state(), EngineState::Terminal);
    // A terminal engine can start over.
    engine.reset(nodes(1)).unwrap();
    assert_eq!(engine.state(), EngineState::Running);
}

#[test]
fn listeners_see_events_in_order() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut engine = engine(IterativeClassification::new(), &InferenceOptions::new());
    engine.set_prior(uniform_prior(2));
    for tag in ["first", "second"] {
        let seen = Rc::clone(&seen);
        engine.add_listener(move |event: &InferenceEvent| -> Result<(), ListenerError> {
            seen.borrow_mut().push(format!("{tag}:{}", event.kind()));
            Ok(())
        });
    }
    engine
        .run_classification(&mut Constant::new(&[0.4, 0.6]), nodes(2))
        .unwrap();

    let seen = seen.borrow();
    assert_eq!(
        seen.as_slice(),
        [
            "first:run_started",
            "second:run_started",
            "first:sweep_completed",
            "second:sweep_completed",
            "first:sweep_completed",
            "second:sweep_completed",
            "first:estimate_materialized",
            "second:estimate_materialized",
            "first:classification_materialized",
            "second:classification_materialized",
        ]
    );
}

#[test]
fn listener_error_propagates() {
    let mut engine = engine(RelaxationLabeling::new(), &InferenceOptions::new().with("numit", 5));
    engine.set_prior(uniform_prior(1));
    engine.add_listener(|event: &InferenceEvent| -> Result<(), ListenerError> {
        match event {
            InferenceEvent::SweepCompleted { iteration: 2, .. } => {
                Err(ListenerError::new("gate", "stop requested"))
            }
            _ => Ok(()),
        }
    });
    let err = engine.run(&mut Constant::new(&[0.5, 0.5]), nodes(1)).unwrap_err();
    assert!(matches!(err, NetKitError::Listener(_)));
    assert_eq!(engine.run_state().unwrap().sweeps(), 3);
}

#[test]
fn channel_listener_streams_events() {
    let (listener, stream) = ChannelListener::new(16);
    let mut engine = engine(IterativeClassification::new(), &InferenceOptions::new());
    engine.set_prior(uniform_prior(2));
    engine.add_listener(listener);
    engine.run(&mut Constant::new(&[0.9, 0.1]), nodes(2)).unwrap();

    let events = stream.drain();
    assert_eq!(events.len(), 4);
    let run_id = events[0].run_id();
    assert!(events.iter().all(|e| e.run_id() == run_id));
    match &events[3] {
        InferenceEvent::EstimateMaterialized {
            sweeps,
            stopped_early,
            estimate,
            ..
        } => {
            assert_eq!(*sweeps, 2);
            assert!(*stopped_early);
            assert_eq!(estimate.get(NodeId::new(0)), Some(&[0.9, 0.1][..]));
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert_eq!(stream.dropped(), 0);
}

struct BrokenSink {
    attempts: Rc<RefCell<usize>>,
}

impl SnapshotSink for BrokenSink {
    fn name(&self) -> &str {
        "broken"
    }

    fn write_snapshot(&mut self, _snapshot: &Snapshot<'_>) -> Result<(), SnapshotError> {
        *self.attempts.borrow_mut() += 1;
        Err(io::Error::new(io::ErrorKind::Other, "disk full").into())
    }
}

#[test]
fn snapshot_failures_do_not_abort_the_run() {
    let attempts = Rc::new(RefCell::new(0));
    let mut engine = engine(RelaxationLabeling::new(), &InferenceOptions::new().with("numit", 3));
    engine.set_prior(uniform_prior(2));
    engine.add_sink(BrokenSink {
        attempts: Rc::clone(&attempts),
    });
    engine.run(&mut Constant::new(&[0.2, 0.8]), nodes(2)).unwrap();
    assert_eq!(*attempts.borrow(), 3);
    assert_eq!(engine.state(), EngineState::Terminal);
}

#[derive(Clone, Default)]
struct Shared(Rc<RefCell<Vec<u8>>>);

impl Write for Shared {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn prediction_writer_emits_one_block_per_sweep() {
    let buffer = Shared::default();
    let mut engine = engine(IterativeClassification::new(), &InferenceOptions::new());
    engine.set_prior(uniform_prior(2));
    engine.add_sink(netkit::PredictionWriter::to_writer(buffer.clone()));
    engine.run(&mut Constant::new(&[0.25, 0.75]), nodes(2)).unwrap();

    let text = String::from_utf8(buffer.0.borrow().clone()).unwrap();
    let headers = text.lines().filter(|l| l.starts_with("# run")).count();
    assert_eq!(headers, 2);
    assert!(text.lines().any(|l| l.ends_with("\t?\t0.25\t0.75")));
}

#[test]
fn run_classification_and_accuracy() {
    let mut truth = Classification::new(attr());
    truth.set(NodeId::new(0), Some(1));
    truth.set(NodeId::new(1), Some(0));

    let mut engine = engine(NullInference::new(), &InferenceOptions::new());
    engine.set_prior(uniform_prior(2));
    engine.set_truth(truth.clone());
    let labels = engine
        .run_classification(&mut Constant::new(&[0.3, 0.7]), nodes(2))
        .unwrap();
    assert_eq!(labels.get(NodeId::new(0)), Some(1));
    assert_eq!(labels.get(NodeId::new(1)), Some(1));
    assert_eq!(labels.accuracy(&truth, nodes(2)), Some(0.5));
    assert_eq!(engine.summary().unwrap().accuracy, vec![0.5]);
}

#[test]
fn run_into_writes_only_unknown_rows() {
    let mut prior = uniform_prior(3);
    prior.set(NodeId::new(2), &[1.0, 0.0]).unwrap();
    let mut engine = engine(NullInference::new(), &InferenceOptions::new());
    engine.set_prior(prior);

    let mut out = Estimate::new(attr());
    out.set(NodeId::new(9), &[0.4, 0.6]).unwrap();
    engine
        .run_into(&mut Constant::new(&[0.0, 1.0]), nodes(2), &mut out)
        .unwrap();
    assert_eq!(out.get(NodeId::new(0)), Some(&[0.0, 1.0][..]));
    assert_eq!(out.get(NodeId::new(1)), Some(&[0.0, 1.0][..]));
    assert!(!out.contains(NodeId::new(2)));
    assert_eq!(out.get(NodeId::new(9)), Some(&[0.4, 0.6][..]));
}

#[test]
fn run_into_rejects_mismatched_class_count() {
    let mut engine = engine(NullInference::new(), &InferenceOptions::new());
    engine.set_prior(uniform_prior(1));
    let three = Arc::new(CategoricalAttribute::new("label", ["a", "b", "c"]));
    let mut out = Estimate::new(three);
    let err = engine
        .run_into(&mut Constant::new(&[0.5, 0.5]), nodes(1), &mut out)
        .unwrap_err();
    assert!(matches!(
        err,
        NetKitError::Inference(InferenceError::ClassCountMismatch { expected: 2, actual: 3 })
    ));
}

#[test]
fn training_accuracy_is_leave_one_out() {
    // Two cliques: {0,1,2} labeled a, {3,4} labeled b, joined by one light edge.
    let mut graph = Graph::new();
    let ids: Vec<NodeId> = (0..5).map(|i| graph.add_node(format!("n{i}"))).collect();
    graph.add_edge(ids[0], ids[1], 1.0);
    graph.add_edge(ids[0], ids[2], 1.0);
    graph.add_edge(ids[1], ids[2], 1.0);
    graph.add_edge(ids[3], ids[4], 1.0);
    graph.add_edge(ids[2], ids[3], 0.1);

    let mut known = Classification::new(attr());
    for &id in &ids[..3] {
        known.set(id, Some(0));
    }
    for &id in &ids[3..] {
        known.set(id, Some(1));
    }
    let context = Estimate::from_classification(&known);

    let mut wvrn = WeightedVoteRelationalNeighbor::new(Arc::new(graph));
    let acc = InferenceEngine::training_accuracy(&mut wvrn, &known, &context)
        .unwrap()
        .unwrap();
    assert!((acc - 1.0).abs() < f64::EPSILON);
    assert_eq!(context.len(), 5);
}

#[test]
fn training_accuracy_skips_declined_nodes() {
    let mut graph = Graph::new();
    let a = graph.add_node("a");
    let b = graph.add_node("b");
    let lonely = graph.add_node("lonely");
    graph.add_edge(a, b, 1.0);

    let mut known = Classification::new(attr());
    known.set(a, Some(1));
    known.set(b, Some(1));
    known.set(lonely, Some(0));
    let context = Estimate::from_classification(&known);

    let mut wvrn = WeightedVoteRelationalNeighbor::new(Arc::new(graph));
    let acc = InferenceEngine::training_accuracy(&mut wvrn, &known, &context).unwrap();
    assert_eq!(acc, Some(1.0));

    let mut only_lonely = Classification::new(attr());
    only_lonely.set(lonely, Some(0));
    let acc = InferenceEngine::training_accuracy(&mut wvrn, &only_lonely, &context).unwrap();
    assert_eq!(acc, None);
}

#[test]
fn wvrn_relaxation_separates_communities() {
    let mut graph = Graph::new();
    let ids: Vec<NodeId> = (0..6).map(|i| graph.add_node(format!("v{i}"))).collect();
    for (a, b) in [(0, 1), (1, 2), (0, 2), (3, 4), (4, 5), (3, 5), (2, 3)] {
        graph.add_edge(ids[a], ids[b], if (a, b) == (2, 3) { 0.2 } else { 1.0 });
    }
    let graph = Arc::new(graph);

    let mut known = Classification::new(attr());
    known.set(ids[0], Some(0));
    known.set(ids[5], Some(1));
    let mut prior = Estimate::from_classification(&known);
    let unknowns = [ids[1], ids[2], ids[3], ids[4]];
    for node in unknowns {
        prior.set(node, &[0.5, 0.5]).unwrap();
    }

    let mut engine = engine(
        RelaxationLabeling::new(),
        &InferenceOptions::new().with("numit", 20),
    );
    engine.set_prior(prior);
    let mut wvrn = WeightedVoteRelationalNeighbor::new(graph);
    let labels = engine.run_classification(&mut wvrn, unknowns).unwrap();
    assert_eq!(labels.get(ids[1]), Some(0));
    assert_eq!(labels.get(ids[2]), Some(0));
    assert_eq!(labels.get(ids[3]), Some(1));
    assert_eq!(labels.get(ids[4]), Some(1));
}
