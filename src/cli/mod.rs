//! CLI layer: argument parsing and the single `run` subcommand.

pub mod args;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;

use gradewatch::config::{Config, PipelineConfig, SensitivityProfile};
use gradewatch::pipeline;

use args::{ProfileArg, RunArgs};

pub fn run() {
    let args = RunArgs::parse();

    let log_level = match args.log_level.as_str() {
        "error" => tracing::Level::ERROR,
        "warn" => tracing::Level::WARN,
        "debug" => tracing::Level::DEBUG,
        "trace" => tracing::Level::TRACE,
        _ => tracing::Level::INFO,
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let sensitivity = match args.profile {
        ProfileArg::Smart => SensitivityProfile::smart(),
        ProfileArg::Balanced => SensitivityProfile::balanced(),
        ProfileArg::Strict => SensitivityProfile::strict(),
    };

    let config = PipelineConfig {
        root_dir: args.root,
        output_dir: args.output,
        template_path: args.template,
        config: Config {
            num_questions: args.questions,
            similarity_threshold: args.threshold,
            min_token_count: args.min_tokens,
            max_extraction_depth: args.max_depth,
            sensitivity,
            ..Config::default()
        },
    };

    let cancel = Arc::new(AtomicBool::new(false));
    let cancel_handler = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        tracing::warn!("cancellation requested, finishing the current stage");
        cancel_handler.store(true, Ordering::SeqCst);
    }) {
        tracing::warn!("failed to install Ctrl-C handler: {e}");
    }

    match pipeline::run(&config, &cancel) {
        Ok(output) => match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: failed to serialize report: {e}");
                std::process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
