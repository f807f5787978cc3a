// Copyright 2026 The Packsim Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use packsim_engine::SimulationConfig;
use packsim_engine::json::{Payload, Response, run_payload};

#[derive(Parser, Debug)]
#[command(name = "packsim")]
#[command(about = "Estimate per-cell occupancy probabilities for an inventory grid")]
struct Cli {
    /// JSON payload to read (default: stdin)
    path: Option<PathBuf>,

    /// Nominal number of Monte Carlo samples
    #[arg(long)]
    samples: Option<usize>,

    /// Number of independently seeded batches
    #[arg(long)]
    batches: Option<usize>,

    /// Run seed; derived from the clock when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Run batches on the current thread only
    #[arg(long)]
    sequential: bool,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON response
    #[arg(long)]
    pretty: bool,
}

impl Cli {
    /// Command-line flags layered over the defaults. A seed or sample count
    /// inside the payload still wins.
    fn config(&self) -> SimulationConfig {
        let mut config = SimulationConfig::default();
        if let Some(samples) = self.samples {
            config.samples = samples;
        }
        if let Some(batches) = self.batches {
            config.batches = batches;
        }
        config.seed = self.seed;
        config.parallel = !self.sequential;
        config
    }
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    let mut contents = String::new();
    match path {
        Some(path) => {
            File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?
                .read_to_string(&mut contents)
                .with_context(|| format!("failed to read {}", path.display()))?;
        }
        None => {
            io::stdin()
                .read_to_string(&mut contents)
                .context("failed to read payload from stdin")?;
        }
    }
    Ok(contents)
}

fn run(cli: &Cli) -> Result<Response> {
    let input = read_input(cli.path.as_ref())?;
    let response = match Payload::from_json(&input) {
        Ok(payload) => {
            debug!(items = payload.items.len(), "decoded payload");
            run_payload(&payload, cli.config())
        }
        Err(err) => Response::failure(&err),
    };
    Ok(response)
}

fn write_output(cli: &Cli, response: &Response) -> Result<()> {
    let json = if cli.pretty {
        serde_json::to_string_pretty(response)?
    } else {
        serde_json::to_string(response)?
    };

    match &cli.output {
        Some(path) => {
            let mut file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            writeln!(file, "{json}")?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }
    Ok(())
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let response = run(&cli)?;
    write_output(&cli, &response)?;

    if let Some(message) = &response.error {
        error!("{message}");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
