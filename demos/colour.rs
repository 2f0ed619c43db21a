//! Two-quadrant colour classification.
//!
//! Generates points in [-10, 10]² coloured "orange" when x·y >= 0 and
//! "blue" otherwise, with 5% of labels flipped. A tree is fitted on a
//! stratified half of the points, pruned against all of them and printed.
//!
//! Run with `cargo run --example colour`, or pass a CSV path with a `colour`
//! column to classify your own data.

use std::{env, process};

use entropy_tree::{
    Config, DataTable, DecisionTree, Result, Verbosity, rng_from_entropy, rng_from_seed,
    sample_dataset
};
use rand::Rng;

const N_POINTS: usize = 5000;

fn generate(n_points: usize) -> Result<DataTable> {
    let mut rng = rng_from_entropy();
    let mut table = DataTable::with_columns(["x", "y", "colour"]);
    for _ in 0..n_points {
        let x: f64 = rng.random_range(-10.0..10.0);
        let y: f64 = rng.random_range(-10.0..10.0);
        let flip = rng.random_range(0..100) < 5;
        let colour = if (x * y >= 0.0) != flip { "orange" } else { "blue" };
        table.push_record([format!("{x:.7}"), format!("{y:.7}"), colour.to_string()])?;
    }
    Ok(table)
}

fn run() -> Result<()> {
    let data = match env::args().nth(1) {
        Some(path) => {
            println!("Loading dataset from {path}...");
            DataTable::from_csv_path(path)?
        }
        None => generate(N_POINTS)?
    };
    let all = data.view();
    println!("Dataset info:\n{}", all.summary());

    let train = sample_dataset(&all, all.len() / 2, "colour", &mut rng_from_seed(42))?;
    let config = Config::builder()
        .class_column("colour")
        .significance(0.05)
        .verbosity(Verbosity::Info)
        .build()?;

    println!("Fitting on {} rows...", train.len());
    let mut tree = DecisionTree::fit(&train, &config)?;
    println!("Score before pruning: {:.2}", tree.score(&all)? * 100.0);

    let improvement = tree.prune(&all)?;
    println!("Pruning improvement: {improvement:.4}");
    println!("Score: {:.2}\nSize: {}\n", tree.score(&all)? * 100.0, tree.size());
    let class = tree
        .most_frequent_prediction(&all)
        .and_then(|id| data.schema().column_by_name("colour").ok()?.value_name(id));
    if let Some(class) = class {
        println!("Most frequent prediction: {class}\n");
    }
    print!("{}", tree.display(data.schema()));
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
