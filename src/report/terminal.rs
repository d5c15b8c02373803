use std::path::Path;

use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::models::Expansion;
use crate::report::Summary;

/// Render a colored summary to stderr, keeping stdout free for records.
pub fn render(summary: &Summary, input: &Path, verbose: bool, quiet: bool) {
    let expanded_inputs = summary.fanned_out.len();

    if quiet {
        eprintln!(
            "Rows in: {}  Rows out: {}  Expanded: {}",
            summary.input_rows,
            summary.output_rows.to_string().green(),
            expanded_inputs.to_string().cyan(),
        );
        return;
    }

    eprintln!(
        "\n {} v{}",
        "address-expandr".bold(),
        env!("CARGO_PKG_VERSION")
    );
    eprintln!(" Input: {}\n", input.display());

    eprintln!(" ┌────────────────────────────────────────────────────┐");
    eprintln!(" │  {:<48} │", "SUMMARY".bold());
    eprintln!(
        " │  {:<48} │",
        format!("Rows read          : {:>6}", summary.input_rows)
    );
    eprintln!(
        " │  {:<48} │",
        format!("Rows written       : {:>6}", summary.output_rows)
    );
    eprintln!(
        " │  {:<48} │",
        format!(
            "{}  Expanded rows   : {:>6}",
            "→".cyan(),
            expanded_inputs
        )
    );
    eprintln!(" └────────────────────────────────────────────────────┘\n");

    eprintln!("{}", rule_table(summary));

    if verbose && expanded_inputs > 0 {
        eprintln!("\n {} Expanded addresses:\n", "[FAN-OUT]".cyan().bold());
        eprintln!("{}", fan_out_table(summary));
    }
    eprintln!();
}

fn rule_table(summary: &Summary) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Rule").add_attribute(Attribute::Bold),
            Cell::new("Rows in").add_attribute(Attribute::Bold),
            Cell::new("Rows out").add_attribute(Attribute::Bold),
        ]);

    for expansion in Expansion::ALL {
        let Some((rows_in, rows_out)) = summary.by_rule.get(&expansion) else {
            continue;
        };
        let color = match expansion {
            Expansion::Single => Color::DarkGrey,
            _ => Color::Cyan,
        };
        table.add_row(vec![
            Cell::new(expansion.to_string()).fg(color),
            Cell::new(rows_in).set_alignment(CellAlignment::Right),
            Cell::new(rows_out).set_alignment(CellAlignment::Right),
        ]);
    }

    table
}

fn fan_out_table(summary: &Summary) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Original").add_attribute(Attribute::Bold),
            Cell::new("Addresses").add_attribute(Attribute::Bold),
        ]);

    for entry in &summary.fanned_out {
        table.add_row(vec![
            Cell::new(&entry.original),
            Cell::new(entry.addresses.join("\n")),
        ]);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::FannedOut;

    fn summary() -> Summary {
        let mut summary = Summary::default();
        summary.input_rows = 2;
        summary.output_rows = 4;
        summary.by_rule.insert(Expansion::NumberRange, (1, 3));
        summary.by_rule.insert(Expansion::Single, (1, 1));
        summary.fanned_out.push(FannedOut {
            original: "Rudower Chaussee 2 - 4".to_string(),
            addresses: vec![
                "12489 Berlin Rudower Chaussee 2".to_string(),
                "12489 Berlin Rudower Chaussee 3".to_string(),
                "12489 Berlin Rudower Chaussee 4".to_string(),
            ],
        });
        summary
    }

    #[test]
    fn test_rule_table_lists_used_rules_only() {
        let rendered = rule_table(&summary()).to_string();
        assert!(rendered.contains("number range"));
        assert!(rendered.contains("single"));
        assert!(!rendered.contains("letter range"));
    }

    #[test]
    fn test_fan_out_table_lists_addresses() {
        let rendered = fan_out_table(&summary()).to_string();
        assert!(rendered.contains("Rudower Chaussee 2 - 4"));
        assert!(rendered.contains("12489 Berlin Rudower Chaussee 4"));
    }
}
