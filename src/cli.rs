use std::path::PathBuf;

use clap::Parser;

use address_expandr::records::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "address-expandr",
    about = "Normalize scraped postal addresses and expand house-number ranges",
    version
)]
pub struct Cli {
    /// Records to normalize (JSON array or JSON Lines); `-` reads stdin
    #[arg(default_value = "-")]
    pub input: PathBuf,

    /// Write normalized records here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Config file [default: ./.address-expandr/config.toml, fallback ~/.config/address-expandr/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Name of the address field in each record [default from config: Adresse]
    #[arg(long, value_name = "FIELD")]
    pub address_field: Option<String>,

    /// Output format
    #[arg(long, default_value = "json", value_name = "FORMAT")]
    pub format: FormatArg,

    /// Show how an address is cleaned and expanded, then exit (repeatable)
    #[arg(long, value_name = "ADDRESS")]
    pub explain: Vec<String>,

    /// List every expanded address in the summary and log progress
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print the summary line
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum FormatArg {
    Json,
    Jsonl,
}

impl From<&FormatArg> for OutputFormat {
    fn from(arg: &FormatArg) -> Self {
        match arg {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Jsonl => OutputFormat::JsonLines,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["address-expandr"]);
        assert_eq!(cli.input, PathBuf::from("-"));
        assert!(cli.output.is_none());
        assert_eq!(OutputFormat::from(&cli.format), OutputFormat::Json);
    }

    #[test]
    fn test_repeated_explain() {
        let cli = Cli::parse_from([
            "address-expandr",
            "--explain",
            "Am Studio 14/16",
            "--explain",
            "Volmerstraße 73 A-C",
            "--format",
            "jsonl",
        ]);
        assert_eq!(cli.explain.len(), 2);
        assert_eq!(OutputFormat::from(&cli.format), OutputFormat::JsonLines);
    }

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
