use clap::Parser;
use log::{error, info};
use std::path::PathBuf;

use voc2tiles::{process_dataset, Args};

fn main() {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let dirname = PathBuf::from(&args.input_dir);
    if !dirname.exists() {
        error!("The specified input_dir does not exist: {}", args.input_dir);
        std::process::exit(1);
    }

    info!("Starting the tiling process...");

    if let Err(e) = process_dataset(&args) {
        error!("Failed to process dataset: {}", e);
        std::process::exit(1);
    }
}
