use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, ValueEnum};

use tuplestream::query::executor::operators::{
    AggregateOperator, AggregateType, Comparison, CsvScanOperator, DistinctOperator, FilterOperator, Operator,
    ProjectedColumn, ProjectionOperator, SortOperator,
};
use tuplestream::{CsvScanConfig, ExecutionEngine};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Aligned table
    Table,
    /// One `column: value, ...` line per row, printed as rows arrive
    Lines,
}

/// Pipeline stages run in this order: scan, filter, project, sort,
/// distinct, aggregate. Stages without a flag are left out.
#[derive(Parser)]
#[command(author, version, about = "tsq - run pull-based queries over CSV files")]
struct Cli {
    /// CSV file to scan; the first record is the header
    file: PathBuf,

    /// Columns to read from the file (matched case-insensitively)
    #[arg(short, long, value_delimiter = ',', required = true)]
    columns: Vec<String>,

    /// Filter predicate, e.g. "movieid = 24" or "age > 30"
    #[arg(short = 'w', long = "where")]
    filter: Option<String>,

    /// Output columns; "col as name" renames
    #[arg(short, long, value_delimiter = ',')]
    project: Vec<String>,

    /// Sort by a column, or by all columns when given without a value
    #[arg(short, long, num_args = 0..=1, default_missing_value = "")]
    sort: Option<String>,

    /// Sort in descending order
    #[arg(long, requires = "sort")]
    desc: bool,

    /// Drop consecutive duplicate rows (combine with --sort for global dedup)
    #[arg(short, long)]
    distinct: bool,

    /// Average a column
    #[arg(long, conflicts_with = "agg")]
    avg: Option<String>,

    /// Aggregate a column, as FUNC:COLUMN with FUNC one of count, sum, avg, min, max
    #[arg(long)]
    agg: Option<String>,

    /// Field delimiter
    #[arg(long, default_value_t = ',')]
    delimiter: char,

    /// Trim whitespace around fields
    #[arg(long)]
    trim: bool,

    /// Stop after this many rows
    #[arg(long)]
    limit: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

fn parse_aggregate(text: &str) -> Result<(AggregateType, String)> {
    let (func, column) = text
        .split_once(':')
        .ok_or_else(|| anyhow!("expected FUNC:COLUMN, got '{}'", text))?;
    let agg_type = func.trim().parse::<AggregateType>()?;
    let column = column.trim();
    if column.is_empty() {
        bail!("aggregate '{}' names no column", text);
    }
    Ok((agg_type, column.to_string()))
}

// The record reader splits on raw bytes, so only ASCII maps to one byte
fn delimiter_byte(delimiter: char) -> Result<u8> {
    if !delimiter.is_ascii() {
        bail!("delimiter '{}' is not an ASCII character", delimiter);
    }
    Ok(delimiter as u8)
}

fn build_pipeline(cli: &Cli) -> Result<Box<dyn Operator>> {
    let delimiter = delimiter_byte(cli.delimiter)?;
    let config = CsvScanConfig::default().with_delimiter(delimiter).with_trim(cli.trim);

    let mut root: Box<dyn Operator> = Box::new(CsvScanOperator::with_config(&cli.file, cli.columns.clone(), config));

    if let Some(expr) = &cli.filter {
        let comparison = Comparison::parse(expr).with_context(|| format!("invalid --where '{}'", expr))?;
        root = Box::new(FilterOperator::new(root, comparison.into_predicate()));
    }

    if !cli.project.is_empty() {
        let columns = cli.project.iter().map(|c| ProjectedColumn::parse(c)).collect();
        root = Box::new(ProjectionOperator::with_columns(root, columns));
    }

    if let Some(column) = &cli.sort {
        let mut sort = if column.is_empty() {
            SortOperator::by_all_columns(root)
        } else {
            SortOperator::by_column(root, column.as_str())
        };
        if cli.desc {
            sort = sort.descending();
        }
        root = Box::new(sort);
    }

    if cli.distinct {
        root = Box::new(DistinctOperator::new(root));
    }

    if let Some(column) = &cli.avg {
        root = Box::new(AggregateOperator::average(root, column.as_str()));
    } else if let Some(text) = &cli.agg {
        let (agg_type, column) = parse_aggregate(text)?;
        root = Box::new(AggregateOperator::new(root, column, agg_type));
    }

    Ok(root)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut root = build_pipeline(&cli)?;
    let engine = match cli.limit {
        Some(limit) => ExecutionEngine::new().with_row_limit(limit),
        None => ExecutionEngine::new(),
    };

    match cli.format {
        OutputFormat::Table => {
            let result = engine
                .execute(root.as_mut())
                .with_context(|| format!("query over {} failed", cli.file.display()))?;
            if result.row_count() == 0 {
                println!("{}", result.empty_message());
            } else {
                print!("{}", result.to_string_table());
            }
        }
        OutputFormat::Lines => {
            engine
                .for_each_row(root.as_mut(), |row| println!("{}", row))
                .with_context(|| format!("query over {} failed", cli.file.display()))?;
        }
    }

    Ok(())
}
