// 漢数字変換 CLI

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use egov_kansuji::{to_japanese_numeral, ArticleQuery, Converter, ConverterConfig};

#[derive(Parser)]
#[command(name = "egov-kansuji")]
#[command(about = "Converts kanji numerals in Japanese statutory text to Arabic numerals")]
struct Args {
    /// Rule configuration (JSON); defaults are used when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert the given text, or stdin line by line when no text is given
    Convert {
        text: Vec<String>,
        /// Print the detailed result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Render an integer as a kanji numeral
    Render { number: u64 },
    /// Print the heading label and search targets for a query such as "12 3"
    Targets { query: String },
    /// Find the article heading in a file, preferring lines that start with it
    Locate {
        query: String,
        #[arg(long)]
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => ConverterConfig::load(path)?,
        None => ConverterConfig::default(),
    };

    match args.command {
        Command::Convert { text, json } => {
            let converter = Converter::new(&config)?;
            let stdout = io::stdout();
            let mut out = stdout.lock();
            if text.is_empty() {
                for line in io::stdin().lock().lines() {
                    print_conversion(&converter, &line?, json, &mut out)?;
                }
            } else {
                print_conversion(&converter, &text.join(" "), json, &mut out)?;
            }
        }
        Command::Render { number } => {
            println!("{}", to_japanese_numeral(number));
        }
        Command::Targets { query } => {
            let query = parse_query(&query)?;
            println!("{}", query.label());
            for target in query.search_targets() {
                println!("{}", target);
            }
        }
        Command::Locate { query, file } => {
            let query = parse_query(&query)?;
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("ファイルを読めません: {}", file.display()))?;
            match query.locate_lines(content.lines()) {
                Some((line_idx, m)) => println!("{}:{}:{}", line_idx + 1, m.offset, m.target),
                None => {
                    tracing::info!("見出しが見つかりません: {:?}", query.search_targets());
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

fn parse_query(input: &str) -> Result<ArticleQuery> {
    ArticleQuery::parse(input)
        .ok_or_else(|| anyhow::anyhow!("条番号として解釈できません: {:?}", input))
}

fn print_conversion(
    converter: &Converter,
    text: &str,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    if json {
        let result = converter.convert_detailed(text);
        writeln!(out, "{}", serde_json::to_string(&result)?)?;
    } else {
        writeln!(out, "{}", converter.convert(text))?;
    }
    Ok(())
}
