//! Reading and writing a struct through serde.
//!
//! Run with: cargo run --example simple

use plainfields::{from_str, to_string, to_string_with_options, BuilderOptions};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;

#[derive(Debug, Serialize, Deserialize)]
struct Service {
    name: String,
    port: u16,
    enabled: bool,
    tags: Vec<String>,
    limits: BTreeMap<String, u64>,
}

fn main() -> Result<(), Box<dyn Error>> {
    // Positional values fill fields in declaration order
    let input = "\"billing api\", 0x20FB, ^enabled, tags=prod;eu-west, limits=cpu:4;mem:0b1000";
    let service: Service = from_str(input)?;
    println!("Parsed:\n{:#?}\n", service);

    println!("Compact:\n{}\n", to_string(&service)?);
    println!(
        "Spaced:\n{}",
        to_string_with_options(&service, BuilderOptions::spaced())?
    );

    Ok(())
}
