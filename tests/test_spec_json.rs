use ferrite_model::optim::{Adam, Sgd};
use ferrite_model::{
    Accuracy, ActivationFunction, LayerSpec, LossType, ModelSpec, NnError, OptimizerKind, OptimizerSpec,
    Regularization,
};

fn classifier_spec() -> ModelSpec {
    ModelSpec {
        name: "spiral".into(),
        layers: vec![
            LayerSpec::Dense {
                n_inputs: 2,
                n_neurons: 16,
                regularization: Regularization { weight_l2: 5e-4, bias_l2: 5e-4, ..Default::default() },
            },
            LayerSpec::Activation { function: ActivationFunction::ReLU },
            LayerSpec::Dropout { rate: 0.1 },
            LayerSpec::Dense { n_inputs: 16, n_neurons: 3, regularization: Regularization::default() },
            LayerSpec::Activation { function: ActivationFunction::Softmax },
        ],
        loss: LossType::CategoricalCrossentropy,
        optimizer: OptimizerSpec {
            kind: OptimizerKind::Adam(Adam::new(0.9, 0.999)),
            learning_rate: Some(0.02),
            decay: 5e-7,
        },
        accuracy: Accuracy::categorical(),
        seed: Some(7),
    }
}

#[test]
fn spec_survives_json() {
    let spec = classifier_spec();
    let json = serde_json::to_string(&spec).unwrap();
    let back: ModelSpec = serde_json::from_str(&json).unwrap();
    assert_eq!(back, spec);
}

#[test]
fn hand_written_json_uses_defaults() {
    let json = r#"{
        "name": "tiny",
        "layers": [
            { "type": "dense", "n_inputs": 3, "n_neurons": 1 },
            { "type": "activation", "function": "Sigmoid" }
        ],
        "loss": "binary_crossentropy",
        "optimizer": { "kind": { "type": "sgd" } },
        "accuracy": { "type": "categorical", "binary": true }
    }"#;
    let spec: ModelSpec = serde_json::from_str(json).unwrap();
    assert_eq!(spec.seed, None);
    assert_eq!(spec.optimizer.kind, OptimizerKind::Sgd(Sgd::default()));

    let model = spec.build().unwrap();
    let optimizer = model.optimizer().unwrap();
    assert_eq!(optimizer.learning_rate, 1.0);
    assert_eq!(optimizer.decay, 0.0);
    assert_eq!(model.trainable_layers().next().unwrap().regularization, Regularization::default());
}

#[test]
fn build_is_reproducible_with_a_seed() {
    let spec = classifier_spec();
    let a = spec.build().unwrap();
    let b = spec.build().unwrap();
    assert!(a.is_finalized());
    assert!(a.uses_fused_softmax_loss());
    assert_eq!(a.layers().len(), 5);

    let wa: Vec<_> = a.trainable_layers().map(|d| d.weights.clone()).collect();
    let wb: Vec<_> = b.trainable_layers().map(|d| d.weights.clone()).collect();
    assert_eq!(wa, wb);
    assert_eq!(wa[0].shape(), (2, 16));
    assert_eq!(wa[1].shape(), (16, 3));
}

#[test]
fn build_rejects_unchained_dense_widths() {
    let mut spec = classifier_spec();
    spec.layers[3] = LayerSpec::Dense { n_inputs: 8, n_neurons: 3, regularization: Regularization::default() };
    assert!(matches!(spec.build(), Err(NnError::ShapeMismatch { .. })));
}

#[test]
fn build_rejects_invalid_dropout_rate() {
    let mut spec = classifier_spec();
    spec.layers[2] = LayerSpec::Dropout { rate: 1.0 };
    assert!(matches!(spec.build(), Err(NnError::InvalidInput(_))));
}

#[test]
fn save_and_load_json_file() {
    let spec = classifier_spec();
    let path = std::env::temp_dir().join(format!("ferrite-model-spec-{}.json", std::process::id()));
    let path = path.to_str().unwrap();

    spec.save_json(path).unwrap();
    let loaded = ModelSpec::load_json(path).unwrap();
    std::fs::remove_file(path).unwrap();
    assert_eq!(loaded, spec);
}

#[test]
fn loading_a_missing_file_is_an_io_error() {
    let err = ModelSpec::load_json("/nonexistent/ferrite-model/spec.json").unwrap_err();
    assert!(matches!(err, NnError::Io(_)));
}
