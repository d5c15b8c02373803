//! `address-expandr`: normalize scraped postal addresses in a list of records.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Load and validate config ([`load_config`]).
//! 3. Read records ([`records::read_records`]).
//! 4. Normalize and fan out each record ([`AddressNormalizer::normalize`]).
//! 5. Write the expanded records ([`records::write_records`]).
//! 6. Render the summary ([`report::terminal`]).

mod cli;

use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use address_expandr::config::load_config;
use address_expandr::logging::init_logging;
use address_expandr::records::{self, Fields, OutputFormat};
use address_expandr::report::{self, Summary};
use address_expandr::{AddressNormalizer, NormalizedRecord, RawRecord};
use cli::Cli;

/// Show the progress bar only for inputs at least this large.
const PROGRESS_THRESHOLD: usize = 500;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cwd = std::env::current_dir().context("Failed to determine working directory")?;
    let mut config = load_config(&cwd, cli.config.as_deref())?;
    if let Some(field) = &cli.address_field {
        config.records.address_field = field.clone();
    }
    let config = config.validated()?;

    let normalizer = AddressNormalizer::new(&config)?;

    if !cli.explain.is_empty() {
        return explain(std::io::stdout().lock(), &normalizer, &cli.explain);
    }

    let address_field = &config.records.address_field;
    let input = records::read_records(&cli.input, address_field)?;
    tracing::info!(rows = input.len(), input = %cli.input.display(), "read records");

    let (output, summary) = normalize_all(&normalizer, &input, cli.quiet);

    let format = OutputFormat::from(&cli.format);
    match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            records::write_records(BufWriter::new(file), &output, address_field, format)?;
            tracing::info!(rows = output.len(), output = %path.display(), "wrote records");
        }
        None => {
            let stdout = std::io::stdout();
            records::write_records(stdout.lock(), &output, address_field, format)?;
        }
    }

    report::terminal::render(&summary, &cli.input, cli.verbose, cli.quiet);

    Ok(())
}

fn normalize_all(
    normalizer: &AddressNormalizer,
    input: &[RawRecord<Fields>],
    quiet: bool,
) -> (Vec<NormalizedRecord<Fields>>, Summary) {
    let pb = (!quiet && input.len() >= PROGRESS_THRESHOLD).then(|| {
        let pb = ProgressBar::new(input.len() as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    });

    let mut output = Vec::with_capacity(input.len());
    let mut summary = Summary::default();

    for record in input {
        let expanded = normalizer.normalize(record);
        summary.record(record.address.as_deref(), &expanded);
        output.extend(expanded);
        if let Some(pb) = &pb {
            pb.inc(1);
        }
    }

    if let Some(pb) = pb {
        pb.finish_with_message("Done");
    }

    (output, summary)
}

fn explain<W: Write>(mut out: W, normalizer: &AddressNormalizer, addresses: &[String]) -> Result<()> {
    for raw in addresses {
        let cleaned = normalizer.clean(raw);
        let (expansion, expanded) = normalizer.expand(&cleaned);

        writeln!(out, "{} {}", "input:  ".bold(), raw)?;
        writeln!(out, "{} {}", "cleaned:".bold(), cleaned)?;
        writeln!(out, "{} {}", "rule:   ".bold(), expansion.to_string().cyan())?;
        for address in expanded {
            writeln!(out, "  {} {}", "→".cyan(), address)?;
        }
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_all_fans_out_and_counts() {
        let normalizer = AddressNormalizer::default();
        let input = records::parse_records(
            r#"[
                {"Name": "A", "Adresse": "Rudower Chaussee 2 - 4"},
                {"Name": "B", "Adresse": "12489 Berlin ZPV, Johann-Hittorf-Straße 8"},
                {"Name": "C"}
            ]"#,
            "Adresse",
        )
        .unwrap();

        let (output, summary) = normalize_all(&normalizer, &input, true);
        assert_eq!(output.len(), 5);
        assert_eq!(summary.input_rows, 3);
        assert_eq!(summary.output_rows, 5);
        assert!(output[..3].iter().all(|r| r.data["Name"] == "A"));
        assert_eq!(output[3].address, "12489 Berlin Johann-Hittorf-Straße 8");
        assert_eq!(output[4].address, "12489 Berlin");
    }

    #[test]
    fn test_explain_lists_every_expanded_address() {
        let mut out = Vec::new();
        explain(
            &mut out,
            &AddressNormalizer::default(),
            &["Rudower Chaussee 2 - 4".to_string()],
        )
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Rudower Chaussee 2 - 4"));
        for n in 2..=4 {
            assert!(text.contains(&format!("12489 Berlin Rudower Chaussee {n}")), "{text}");
        }
    }

    #[test]
    fn test_explain_reports_write_errors() {
        struct Closed;

        impl Write for Closed {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let result = explain(Closed, &AddressNormalizer::default(), &["Am Studio 14/16".to_string()]);
        assert!(result.is_err());
    }
}
