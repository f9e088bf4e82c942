use std::sync::mpsc;

use approx::assert_abs_diff_eq;
use fann::{
    accuracy, forward, loss, predict, train_loop, Layer, Matrix, Network, NetworkConfig,
    ReferenceModel, StopRule, TrainConfig,
};

const POINTS: [([f64; 2], usize); 8] = [
    ([-1.2, -0.9], 0),
    ([-0.8, -1.4], 0),
    ([-1.5, -0.3], 0),
    ([-0.4, -1.1], 0),
    ([1.1, 0.7], 1),
    ([0.6, 1.3], 1),
    ([1.4, 0.2], 1),
    ([0.3, 1.0], 1),
];

fn blobs() -> (Matrix, Vec<usize>) {
    let batch = Matrix::from_rows(POINTS.iter().map(|(x, _)| x.to_vec()).collect()).unwrap();
    let labels = POINTS.iter().map(|&(_, y)| y).collect();
    (batch, labels)
}

fn wavy(l: usize, n: usize, c: usize) -> f64 {
    ((7 * l + 3 * n + c) as f64 * 0.37).sin() * 0.5
}

fn temp_path(name: &str) -> String {
    std::env::temp_dir()
        .join(format!("fann-{}-{name}", std::process::id()))
        .to_string_lossy()
        .into_owned()
}

#[test]
fn worked_example() {
    let hidden = Layer::from_table(vec![vec![0.0, 1.0, -1.0]]).unwrap();
    let output = Layer::from_table(vec![vec![0.0, -1.0], vec![0.0, 1.0]]).unwrap();
    let net = Network::from_layers(2, vec![hidden, output]).unwrap();
    let batch = Matrix::from_rows(vec![vec![1.0, 1.0]]).unwrap();

    let (p_hat, cache) = forward(&net, &batch).unwrap();
    assert_eq!(cache.layers[0].post.get(0, 0), 0.5);
    assert_eq!(cache.layers[1].pre.row(0), &[-0.5, 0.5]);
    // squash([-0.5, 0.5]) is [0.269, 0.731]; the output layer squashes
    // logistic([-0.5, 0.5]) instead, which gives [0.439, 0.561].
    assert_abs_diff_eq!(p_hat.get(0, 0), 0.439_075, epsilon = 1e-6);
    assert!(p_hat.get(0, 1) > p_hat.get(0, 0));
    assert_abs_diff_eq!(p_hat.row(0).iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    assert_eq!(predict(&net, &batch).unwrap(), vec![1]);
}

#[test]
fn training_separates_the_blobs() {
    let (batch, labels) = blobs();
    let mut net = Network::initialize_with(&NetworkConfig::new(2, vec![4, 3, 2]), wavy).unwrap();
    let (tx, rx) = mpsc::channel();
    let config = TrainConfig::new(0.5).with_progress(tx);

    let report = train_loop(&mut net, &batch, &labels, &config, &mut StopRule::after(300)).unwrap();
    drop(config);

    assert_eq!(report.steps, 300);
    let losses: Vec<f64> = rx.iter().map(|s| s.loss).collect();
    assert_eq!(losses.len(), 300);
    assert!(losses.windows(2).all(|w| w[1] < w[0]));
    assert!(report.final_loss < losses[299]);

    let p_hat = net.forward(&batch).unwrap();
    assert_abs_diff_eq!(loss(&p_hat, &labels).unwrap(), report.final_loss);

    let predicted = predict(&net, &batch).unwrap();
    assert_eq!(accuracy(&predicted, &labels).unwrap(), 1.0);
}

#[test]
fn reference_import_round_trip() {
    let path = temp_path("reference.json");
    std::fs::write(
        &path,
        r#"{
            "coefs": [
                [[0.8, -1.1, 0.4, 0.0], [1.3, 0.2, -0.9, 0.6]],
                [[1.0, -0.5, 0.3], [-1.2, 0.7, 0.1], [0.4, 0.4, -1.5], [0.9, -0.2, 0.8]],
                [[2.1], [-1.7], [0.6]]
            ],
            "intercepts": [[0.1, -0.3, 0.0, 0.2], [0.05, -0.1, 0.3], [-0.2]]
        }"#,
    )
    .unwrap();
    let reference = ReferenceModel::load_json(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let net = reference.import_binary().unwrap();
    assert_eq!(net.layer_widths(), vec![4, 3, 2]);

    let (batch, _) = blobs();
    let expected = reference.predict_proba(&batch).unwrap();
    let (_, cache) = forward(&net, &batch).unwrap();
    let scores = cache.scores().unwrap();
    for n in 0..batch.rows {
        for k in 0..2 {
            assert_abs_diff_eq!(scores.get(n, k), expected.get(n, k), epsilon = 1e-12);
        }
    }
    assert_eq!(
        predict(&net, &batch).unwrap(),
        reference.predict(&batch).unwrap()
    );
}

#[test]
fn config_file_drives_initialization() {
    let path = temp_path("config.json");
    std::fs::write(
        &path,
        r#"{ "input_width": 2, "layer_widths": [4, 3, 2], "init": { "type": "uniform", "scale": 0.1 }, "seed": 1337 }"#,
    )
    .unwrap();
    let config = NetworkConfig::load_json(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let a = Network::initialize(&config).unwrap();
    let b = Network::initialize(&config).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.depth(), 3);
    assert!(a
        .layers()
        .iter()
        .flat_map(|l| l.weights().data.iter().flatten().chain(l.biases()))
        .all(|w| w.abs() <= 0.1));
}
