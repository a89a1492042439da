//! # uabridge CLI Entry Point
//!
//! The main executable for the uabridge tool. This file drives the application lifecycle:
//!
//! 1. **Initialization**: Parses command-line arguments using [`cli::Cli`] and installs the
//!    `tracing` subscriber (stderr, `warn` unless `RUST_LOG` or `--verbose` say otherwise).
//! 2. **Execution**: Delegates the conversion to `uabridge_core::codec`.
//! 3. **Presentation**: Formats and prints the resulting data or error to standard output/error.
mod cli;
mod formatter;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use formatter::{Conversion, FormattedString, TypeList};
use std::process;
use tracing_subscriber::EnvFilter;
use uabridge_core::codec;
use uabridge_core::types::{DataType, ValueRank};

fn main() {
    let args = Cli::parse();

    init_tracing(args.verbose);

    match args.command {
        Commands::Convert {
            data_type,
            value_rank,
            value,
        } => match convert(value, data_type, ValueRank::from(value_rank)) {
            Ok(conversion) => println!("{}", FormattedString::from(conversion)),
            Err(err) => {
                eprintln!("{}", FormattedString::from(err));
                process::exit(1);
            }
        },
        Commands::Types => {
            println!("{}", FormattedString::from(TypeList(DataType::ALL.to_vec())));
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn convert(
    value: serde_json::Value,
    data_type: DataType,
    value_rank: ValueRank,
) -> anyhow::Result<Conversion> {
    let variant = codec::from_json(&value, data_type, value_rank).with_context(|| {
        format!("{value} is not a valid {data_type} with value rank {value_rank}")
    })?;

    tracing::debug!(
        %data_type,
        array_type = ?variant.array_type(),
        elements = variant.values().len(),
        "Converted JSON value"
    );

    let json = codec::to_json(&variant).context("Failed to re-encode the variant as JSON")?;

    Ok(Conversion {
        variant,
        value_rank,
        json,
    })
}
