//! Walking the event stream and the document tree, then building text.
//!
//! Run with: cargo run --example events

use plainfields::{parse, Builder, Document, Literal, ParserEvent};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let input = "john, 30, ^admin, role=\"site admin\", limits=cpu:2;mem:0x200";

    println!("Events:");
    for event in parse(input) {
        println!("  {}", event);
        if let ParserEvent::Error { position, message } = event {
            return Err(format!("{position}: {message}").into());
        }
    }

    let doc = Document::parse(input)?;
    println!("\nOrdered values:");
    for node in doc.ordered() {
        if let Some(value) = node.as_value() {
            println!("  {} ({})", value, value.kind());
        }
    }
    if let Some(limits) = doc.get("limits").and_then(|node| node.as_map()) {
        for (name, node) in limits {
            if let Some(value) = node.as_value() {
                println!("limits.{} = {}", name, value.to_uint()?);
            }
        }
    }

    // Writing goes through the builder; text is quoted only where needed
    let mut builder = Builder::new();
    builder
        .ordered("jane")?
        .labeled("role", "site owner")?
        .enable("admin")?
        .list("ratios", [Literal::try_from(0.5)?, Literal::try_from(1.25)?])?;
    println!("\nBuilt:\n{}", builder.build());

    // Non-finite floats have no text form
    if let Err(err) = Literal::try_from(f64::NAN) {
        println!("NaN rejected: {}", err);
    }

    Ok(())
}
