use std::{env, process};

use fann::{
    accuracy, predict, train_loop, FannError, Matrix, Network, NetworkConfig, StopRule,
    TrainConfig,
};
use log::info;

// Two blobs of pre-scaled points, one per category.
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

fn run(config_path: Option<&str>) -> Result<(), FannError> {
    let config = match config_path {
        Some(path) => NetworkConfig::load_json(path)?,
        None => NetworkConfig::new(2, vec![4, 3, 2]).with_seed(1337),
    };
    let mut network = Network::initialize(&config)?;

    let batch = Matrix::from_rows(POINTS.iter().map(|(x, _)| x.to_vec()).collect())?;
    let labels: Vec<usize> = POINTS.iter().map(|&(_, y)| y).collect();

    let mut stop = StopRule::after(2000).with_min_improvement(1e-7);
    let report = train_loop(&mut network, &batch, &labels, &TrainConfig::new(0.5), &mut stop)?;

    let predicted = predict(&network, &batch)?;
    let score = accuracy(&predicted, &labels)?;
    info!("predictions: {predicted:?}");

    println!(
        "steps: {}, loss: {:.4} -> {:.4}, accuracy: {:.2}%",
        report.steps,
        report.initial_loss,
        report.final_loss,
        score * 100.0
    );
    Ok(())
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() > 2 {
        eprintln!("Usage: {} [network-config.json]", args[0]);
        process::exit(1);
    }

    if let Err(e) = run(args.get(1).map(String::as_str)) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
