use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use serde_json::Value;
use shared::domain::{NewParty, Party, PartyId};

pub fn load_seed_file(path: &Path) -> Result<Vec<Party>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read seed file '{}'", path.display()))?;
    parse_seed(&raw).with_context(|| format!("invalid seed file '{}'", path.display()))
}

/// Parses a JSON array of party objects. Entries without an `id` get a fresh one.
pub fn parse_seed(raw: &str) -> Result<Vec<Party>> {
    let entries: Vec<Value> = serde_json::from_str(raw).context("seed must be a JSON array")?;

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            seed_entry(entry).with_context(|| format!("seed entry #{index}"))
        })
        .collect()
}

fn seed_entry(entry: Value) -> Result<Party> {
    let Value::Object(mut fields) = entry else {
        bail!("expected a JSON object");
    };

    let id = match fields.remove("id") {
        None | Some(Value::Null) => PartyId::new_v4(),
        Some(Value::String(raw)) => raw
            .parse::<PartyId>()
            .with_context(|| format!("'{raw}' is not a valid party id"))?,
        Some(other) => bail!("party id must be a string, got {other}"),
    };
    let fields: NewParty = serde_json::from_value(Value::Object(fields))?;
    Ok(Party::from_new(id, fields))
}
