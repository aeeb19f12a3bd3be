/// Three Gaussian blobs classified by a small ReLU network.
///
/// Architecture: 2 → 32 (ReLU) → dropout 0.1 → 3 (Softmax)
/// Loss:         categorical cross-entropy (fused with the softmax)
/// Optimizer:    Adam, lr = 0.02, decay = 5e-5
///
/// Run with:
///   RUST_LOG=info cargo run --example separable --release

use std::sync::mpsc;
use std::thread;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use tracing_subscriber::EnvFilter;

use ferrite_model::optim::Adam;
use ferrite_model::{
    Accuracy, ActivationFunction, LayerSpec, LossType, Matrix, ModelSpec, OptimizerKind, OptimizerSpec,
    EpochStats, Regularization, Targets, TrainConfig,
};

const CENTERS: [(f64, f64); 3] = [(-1.5, 0.0), (1.5, 0.5), (0.0, -1.8)];

fn blobs(per_class: usize, seed: u64) -> (Matrix, Targets) {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 0.5).expect("valid normal");
    let mut rows = Vec::with_capacity(per_class * CENTERS.len());
    let mut labels = Vec::with_capacity(per_class * CENTERS.len());
    for (class, &(cx, cy)) in CENTERS.iter().enumerate() {
        for _ in 0..per_class {
            rows.push(vec![cx + noise.sample(&mut rng), cy + noise.sample(&mut rng)]);
            labels.push(class);
        }
    }
    (Matrix::from_data(rows).expect("rectangular rows"), Targets::Sparse(labels))
}

fn main() -> ferrite_model::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let spec = ModelSpec {
        name: "blobs".into(),
        layers: vec![
            LayerSpec::Dense {
                n_inputs: 2,
                n_neurons: 32,
                regularization: Regularization { weight_l2: 5e-4, bias_l2: 5e-4, ..Default::default() },
            },
            LayerSpec::Activation { function: ActivationFunction::ReLU },
            LayerSpec::Dropout { rate: 0.1 },
            LayerSpec::Dense { n_inputs: 32, n_neurons: 3, regularization: Regularization::default() },
            LayerSpec::Activation { function: ActivationFunction::Softmax },
        ],
        loss: LossType::CategoricalCrossentropy,
        optimizer: OptimizerSpec {
            kind: OptimizerKind::Adam(Adam::new(0.9, 0.999)),
            learning_rate: Some(0.02),
            decay: 5e-5,
        },
        accuracy: Accuracy::categorical(),
        seed: Some(2024),
    };

    let (x, y) = blobs(100, 1);
    let (x_val, y_val) = blobs(30, 2);
    let mut model = spec.build()?;

    // Progress is printed from a separate thread, the way a UI would consume it.
    let (tx, rx) = mpsc::channel::<EpochStats>();
    let printer = thread::spawn(move || {
        for stats in rx {
            println!(
                "epoch {:>4}/{}  acc {:.3}  loss {:.4}  lr {:.6}",
                stats.epoch, stats.total_epochs, stats.accuracy, stats.loss, stats.learning_rate
            );
        }
    });

    let config = TrainConfig::new(1000, 100).with_progress(tx);
    let report = model.train(&x, &y, &config, Some((&x_val, &y_val)))?;
    drop(config);
    printer.join().expect("progress printer panicked");

    if let Some(validation) = report.validation {
        println!("validation: acc {:.3}  loss {:.4}", validation.accuracy, validation.loss);
    }
    Ok(())
}
