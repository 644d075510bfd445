//! Reads a JSON array of field descriptors on stdin and prints the
//! serialized form.
//!
//! ```text
//! echo '[{"name":"a[b]","value":"1"},{"name":"a[c]","type":"checkbox"}]' \
//!     | RUST_LOG=form_serialize=trace cargo run --example serialize_json -- --empty
//! ```
//!
//! Flags: `--flat`, `--empty`, `--booleans`, `--disabled`.

use std::io::{self, Read};
use std::process::ExitCode;

use form_serialize::{Config, Field, Output};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let mut config = Config::new();
    for arg in std::env::args().skip(1) {
        config = match arg.as_str() {
            "--flat" => config.hash(false),
            "--empty" => config.empty(true),
            "--booleans" => config.booleans(true),
            "--disabled" => config.disabled(true),
            other => {
                eprintln!("unknown flag: {other}");
                eprintln!("Usage: serialize_json [--flat] [--empty] [--booleans] [--disabled]");
                return ExitCode::FAILURE;
            }
        };
    }

    let mut input = String::new();
    if let Err(err) = io::stdin().read_to_string(&mut input) {
        eprintln!("failed to read stdin: {err}");
        return ExitCode::FAILURE;
    }
    let fields: Vec<Field> = match serde_json::from_str(&input) {
        Ok(fields) => fields,
        Err(err) => {
            eprintln!("invalid field list: {err}");
            return ExitCode::FAILURE;
        }
    };

    match config.serialize(&fields) {
        Output::Flat(flat) => println!("{flat}"),
        Output::Structured(value) => match serde_json::to_string_pretty(&value) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("failed to print result: {err}");
                return ExitCode::FAILURE;
            }
        },
    }
    ExitCode::SUCCESS
}
