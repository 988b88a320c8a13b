//! Fields command - list importable slip fields and their header aliases

use anyhow::Result;
use colored::Colorize;
use serde_json::{json, Map, Value};

use crate::output;
use t4a_core::domain::{alias_table, AliasEntry, SlipField};

pub fn run(json: bool, nested: bool) -> Result<()> {
    if nested {
        let mut view = Map::new();
        for (key, entry) in alias_table() {
            let value = match entry {
                AliasEntry::Flat(aliases) => json!(aliases),
                AliasEntry::Grouped(members) => Value::Object(
                    members
                        .into_iter()
                        .map(|(member, aliases)| (member.to_string(), json!(aliases)))
                        .collect(),
                ),
            };
            view.insert(key.to_string(), value);
        }
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    if json {
        let fields: Vec<Value> = SlipField::ALL
            .iter()
            .map(|f| {
                json!({
                    "path": f.path(),
                    "title": f.title(),
                    "kind": format!("{:?}", f.kind()),
                    "required": f.rule().is_required(),
                    "pattern": f.rule().pattern,
                    "aliases": f.aliases(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&fields)?);
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Field", "Title", "Aliases"]);
    for field in SlipField::ALL {
        let aliases = if field.is_importable() {
            field.aliases().join(", ")
        } else {
            "(not importable)".dimmed().to_string()
        };
        table.add_row(vec![field.path().to_string(), field.title().to_string(), aliases]);
    }
    println!("{}", table);
    println!();
    output::info("Headers are compared ignoring case and the characters ':', '-' and '_'.");

    Ok(())
}
