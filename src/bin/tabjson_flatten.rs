//! tabjson-flatten: flatten ragged JSON documents into tidy JSONL rows
//!
//! Reads JSON documents, applies a pipeline of flattening steps in order,
//! and prints the resulting table as one JSON object per row.
//!
//! Usage:
//!   # One document from a file, spread two fields
//!   tabjson-flatten -i people.json 'spread:name=string:name' 'spread:age=number:age'
//!
//!   # Stream from stdin, stack an array and enter nested objects
//!   cat orders.json | tabjson-flatten gather_array enter_object:items gather_array number
//!
//!   # NDJSON input, classify every document
//!   tabjson-flatten -i events.jsonl --ndjson types lengths
//!
//! Step grammar (applied left to right):
//!   gather_array[:COL]   gather_keys[:COL]   enter_object:KEY
//!   types[:COL]          lengths[:COL]
//!   string[:COL]         number[:COL]        logical[:COL]
//!   spread:NAME=KIND:PATH   (KIND is string|number|logical; PATH is
//!                            dot-separated, all-digit segments are 1-based
//!                            array indices)

// Use MiMalloc allocator for better performance (recommended by simd-json)
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use tabjson::{PathSpec, PathStep, ScalarKind, TblJson};

#[derive(Parser, Debug)]
#[command(name = "tabjson-flatten")]
#[command(about = "Flatten ragged JSON documents into tidy JSONL rows", long_about = None)]
struct Args {
    /// Input file (use stdin if omitted)
    #[arg(long, short = 'i', value_name = "FILE")]
    input: Option<String>,

    /// Process newline-delimited JSON (one document per line).
    /// Without this flag a top-level array is treated as a document stream.
    #[arg(long)]
    ndjson: bool,

    /// Pipeline steps, applied left to right
    #[arg(value_name = "STEP")]
    steps: Vec<String>,
}

/// One parsed pipeline step
#[derive(Debug)]
enum Step {
    GatherArray(Option<String>),
    GatherKeys(Option<String>),
    EnterObject(String),
    Types(Option<String>),
    Lengths(Option<String>),
    AppendString(Option<String>),
    AppendNumber(Option<String>),
    AppendLogical(Option<String>),
    Spread { name: String, spec: PathSpec },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let steps = args
        .steps
        .iter()
        .map(|s| parse_step(s))
        .collect::<Result<Vec<_>>>()?;

    let reader: Box<dyn Read> = if let Some(file_path) = &args.input {
        Box::new(BufReader::new(
            File::open(file_path).with_context(|| format!("Failed to open {}", file_path))?,
        ))
    } else {
        Box::new(std::io::stdin())
    };

    let docs = read_documents(reader, args.ndjson)?;
    let mut tbl = TblJson::from_values(docs);
    for step in steps {
        tbl = apply_step(tbl, step)?;
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for row in tbl.into_table().to_json_rows() {
        let line = serde_json::to_string(&row).context("Failed to serialize row")?;
        writeln!(out, "{}", line)?;
    }

    Ok(())
}

/// Read documents from a reader. Tries SIMD-accelerated parsing on the
/// whole buffer first; deserializing through serde keeps object key order
/// intact. Falls back to serde_json on failure.
fn read_documents(reader: impl Read, ndjson: bool) -> Result<Vec<Value>> {
    let mut content = Vec::new();
    let mut buf_reader = BufReader::new(reader);
    buf_reader.read_to_end(&mut content)?;

    if ndjson {
        let content_str = String::from_utf8_lossy(&content);
        let mut docs = Vec::new();
        for (i, line) in content_str.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let value: Value = serde_json::from_str(line)
                .with_context(|| format!("Failed to parse JSON on line {}", i + 1))?;
            docs.push(value);
        }
        return Ok(docs);
    }

    // simd-json mutates its buffer, so parse a copy and keep the original
    // for the fallback
    let mut simd_buf = content.clone();
    let parsed: Value = match simd_json::serde::from_slice(&mut simd_buf) {
        Ok(value) => value,
        Err(_) => serde_json::from_slice(&content).context("Failed to parse JSON")?,
    };

    // A top-level array is a stream of documents; anything else is one
    Ok(match parsed {
        Value::Array(elements) => elements,
        value => vec![value],
    })
}

/// Parse one STEP argument
fn parse_step(step: &str) -> Result<Step> {
    let (verb, rest) = match step.split_once(':') {
        Some((verb, rest)) => (verb, Some(rest)),
        None => (step, None),
    };
    let column = rest.map(|s| s.to_string());

    match verb {
        "gather_array" => Ok(Step::GatherArray(column)),
        "gather_keys" => Ok(Step::GatherKeys(column)),
        "enter_object" => {
            let key = column.ok_or_else(|| anyhow!("enter_object requires a key: enter_object:KEY"))?;
            Ok(Step::EnterObject(key))
        }
        "types" => Ok(Step::Types(column)),
        "lengths" => Ok(Step::Lengths(column)),
        "string" => Ok(Step::AppendString(column)),
        "number" => Ok(Step::AppendNumber(column)),
        "logical" => Ok(Step::AppendLogical(column)),
        "spread" => {
            let rest = column
                .ok_or_else(|| anyhow!("spread requires an argument: spread:NAME=KIND:PATH"))?;
            let (name, spec) = parse_spread(&rest)?;
            Ok(Step::Spread { name, spec })
        }
        other => Err(anyhow!("Unknown step: {}", other)),
    }
}

/// Parse the NAME=KIND:PATH form of a spread step
fn parse_spread(arg: &str) -> Result<(String, PathSpec)> {
    let (name, rhs) = arg
        .split_once('=')
        .ok_or_else(|| anyhow!("spread argument must be NAME=KIND:PATH, got `{}`", arg))?;
    let (kind, path) = rhs
        .split_once(':')
        .ok_or_else(|| anyhow!("spread argument must be NAME=KIND:PATH, got `{}`", arg))?;

    let kind = match kind {
        "string" => ScalarKind::String,
        "number" => ScalarKind::Number,
        "logical" => ScalarKind::Logical,
        other => return Err(anyhow!("Unknown scalar kind: {}", other)),
    };

    let steps: Vec<PathStep> = path
        .split('.')
        .filter(|segment| !segment.is_empty())
        .map(|segment| match segment.parse::<usize>() {
            Ok(index) => PathStep::Index(index),
            Err(_) => PathStep::Key(segment.to_string()),
        })
        .collect();

    Ok((name.to_string(), PathSpec::new(kind, steps)))
}

/// Apply one step to the pipeline value
fn apply_step(tbl: TblJson, step: Step) -> Result<TblJson> {
    let tbl = match step {
        Step::GatherArray(None) => tbl.gather_array()?,
        Step::GatherArray(Some(col)) => tbl.gather_array_as(&col)?,
        Step::GatherKeys(None) => tbl.gather_keys()?,
        Step::GatherKeys(Some(col)) => tbl.gather_keys_as(&col)?,
        Step::EnterObject(key) => tbl.enter_object(&key),
        Step::Types(None) => tbl.json_types()?,
        Step::Types(Some(col)) => tbl.json_types_as(&col)?,
        Step::Lengths(None) => tbl.json_lengths()?,
        Step::Lengths(Some(col)) => tbl.json_lengths_as(&col)?,
        Step::AppendString(None) => tbl.append_values_string()?,
        Step::AppendString(Some(col)) => tbl.append_values_string_as(&col)?,
        Step::AppendNumber(None) => tbl.append_values_number()?,
        Step::AppendNumber(Some(col)) => tbl.append_values_number_as(&col)?,
        Step::AppendLogical(None) => tbl.append_values_logical()?,
        Step::AppendLogical(Some(col)) => tbl.append_values_logical_as(&col)?,
        Step::Spread { name, spec } => tbl.spread_values([(name, spec)])?,
    };
    Ok(tbl)
}
