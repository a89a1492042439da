//! # CLI
//!
//! This module defines the command-line interface of `uabridge` using `clap`.
//!
//! It is responsible for parsing user input and performing validation (e.g., ensuring the data
//! type is a built-in one and the value is valid JSON).
use clap::{Parser, Subcommand};
use uabridge_core::types::DataType;

#[derive(Parser)]
#[command(name = "uabridge", version, about = "OPC UA Variant <-> JSON converter")]
pub struct Cli {
    /// Log at debug level, ignoring RUST_LOG
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a JSON value into a typed Variant and print its canonical JSON
    ///
    /// ## Examples:
    ///
    /// ```bash
    /// uabridge convert --data-type Int32 --value-rank 2 '[[1, 2], [3, 4]]'
    /// uabridge convert --data-type UInt64 '[1, 0]'
    /// ```
    Convert {
        /// Built-in data type: a name (Int32), an id (6) or a NodeId (ns=0;i=6)
        #[arg(short = 't', long, value_parser = parse_data_type)]
        data_type: DataType,

        /// Value rank: -3 scalar or 1D, -2 any, -1 scalar, 0 one or more dimensions, N exactly N
        #[arg(short = 'r', long, default_value_t = -1, allow_negative_numbers = true)]
        value_rank: i32,

        /// The JSON value to convert
        #[arg(value_parser = parse_json, allow_hyphen_values = true)]
        value: serde_json::Value,
    },

    /// List the built-in data types and their ids
    Types,
}

fn parse_data_type(value: &str) -> Result<DataType, String> {
    value.parse::<DataType>().map_err(|e| e.to_string())
}

fn parse_json(value: &str) -> Result<serde_json::Value, String> {
    serde_json::from_str(value).map_err(|e| format!("Invalid JSON: {e}"))
}
