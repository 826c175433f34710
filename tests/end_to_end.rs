//! End-to-end scenarios across graph preparation, training and evaluation.

use candle_core::{Device, Tensor};
use gae::core::{Edge, Error as CoreError};
use gae::nn::{score, Error, StopReason};
use gae::{split_edges, Graph, SplitConfig, TrainConfig, Trainer};
use std::fs;

fn ring(n: usize) -> Graph {
    let edges: Vec<Edge> = (0..n).map(|i| (i, (i + 1) % n)).collect();
    Graph::from_edges(n, &edges).unwrap()
}

#[test]
fn ring_of_ten_trains_two_epochs() {
    // floor(10 * 0.02) == 0, so the ring needs larger held-out fractions.
    let config = TrainConfig::default()
        .with_epochs(2)
        .with_hidden(4, 2)
        .with_fractions(0.1, 0.1)
        .with_seed(123);

    let mut trainer = Trainer::from_graph(&ring(10), config, &Device::Cpu).unwrap();
    let outcome = trainer.fit(|_| {}).unwrap();

    assert_eq!(outcome.history.len(), 2);
    assert_eq!(outcome.stop_reason, StopReason::EpochBudget);
    for report in &outcome.history {
        assert!((0.0..=1.0).contains(&report.val.roc_auc));
        assert!((0.0..=1.0).contains(&report.val.average_precision));
    }

    let z = trainer.embeddings().unwrap();
    assert_eq!(z.dims(), &[10, 2]);

    let test = trainer.test_metrics().unwrap();
    assert!((0.0..=1.0).contains(&test.roc_auc));
}

#[test]
fn empty_graph_is_insufficient() {
    let err = split_edges(&Graph::new(), &SplitConfig::default()).unwrap_err();
    assert!(matches!(err, CoreError::InsufficientEdges { edges: 0, .. }));

    let err = Trainer::from_graph(&Graph::new(), TrainConfig::default(), &Device::Cpu)
        .err()
        .unwrap();
    assert!(matches!(
        err,
        Error::Core(CoreError::InsufficientEdges { .. })
    ));
}

#[test]
fn evaluator_known_reconstruction() {
    // Z Zᵀ is 1 on {0,1} and {2,3} blocks, 0 across them.
    let z = Tensor::new(&[[1f32, 0.], [1., 0.], [0., 1.], [0., 1.]], &Device::Cpu).unwrap();

    let metrics = score(&[(0, 1), (2, 3)], &[(0, 2), (1, 3)], &z).unwrap();

    // σ(1) ≈ 0.731 for both positives beats σ(0) = 0.5 for both negatives.
    assert_eq!(metrics.roc_auc, 1.0);
    assert_eq!(metrics.average_precision, 1.0);
}

#[test]
fn evaluator_tied_scores_give_half() {
    let z = Tensor::new(&[[0f32], [0.], [0.], [0.]], &Device::Cpu).unwrap();
    let metrics = score(&[(0, 1)], &[(2, 3)], &z).unwrap();
    assert_eq!(metrics.roc_auc, 0.5);
}

#[test]
fn pipeline_from_edge_list_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ppi.txt");
    let content: String = (0..120)
        .map(|i| format!("Q{:03} Q{:03}\n", i, (i * 7 + 1) % 120))
        .collect();
    fs::write(&path, content).unwrap();

    let graph = gae::load(&path).unwrap();
    assert_eq!(graph.node_count(), 120);

    let config = TrainConfig::default().with_epochs(3).with_hidden(8, 4);
    let mut trainer = Trainer::from_graph(&graph, config, &Device::Cpu).unwrap();
    let outcome = trainer.fit(|_| {}).unwrap();
    assert_eq!(outcome.history.len(), 3);

    let split = trainer.split();
    let e = graph.edge_count();
    assert_eq!(split.val_pos.len(), e / 50);
    assert_eq!(split.test_neg.len(), e / 50);

    let dir_ckpt = dir.path().join("model.safetensors");
    trainer.encoder().save(&dir_ckpt).unwrap();
    let loaded = gae::nn::GcnEncoder::load(&dir_ckpt, 0.0, &Device::Cpu).unwrap();
    assert_eq!(loaded.input_dim(), 120);
    assert_eq!(loaded.embedding_dim(), 4);
}
