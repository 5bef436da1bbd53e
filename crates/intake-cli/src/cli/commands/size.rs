//! `intake size <value>` – show how a size setting is interpreted.

use anyhow::{Context, Result};
use intake_core::size::{format_bytes, parse_byte_size};

pub fn run_size(value: &str) -> Result<()> {
    let bytes = parse_byte_size(value).with_context(|| format!("cannot parse size {:?}", value))?;
    println!("{} bytes ({})", bytes, format_bytes(bytes));
    Ok(())
}
