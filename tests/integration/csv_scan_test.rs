use anyhow::Result;
use tempfile::tempdir;

use tuplestream::{
    AggregateOperator, Comparison, CsvScanConfig, CsvScanOperator, ExecutionEngine, FilterOperator, Operator,
    QueryError,
};

#[path = "../common/mod.rs"]
mod common;
use common::{RATINGS_CSV, drain, run, strings, write_csv};

#[test]
fn test_scan_reads_requested_columns() -> Result<()> {
    let file = write_csv(RATINGS_CSV)?;
    let mut scan = CsvScanOperator::new(file.path(), strings(&["rating", "MovieId"]));

    let rows = run(&mut scan)?;
    assert_eq!(rows.len(), 5);

    let first = &rows[0];
    assert_eq!(first.columns().collect::<Vec<_>>(), vec!["rating", "MovieId"]);
    assert_eq!(first.get("rating"), Some("4.0"));
    assert_eq!(first.get("MovieId"), Some("1222"));
    assert!(!first.contains("userid"));

    Ok(())
}

#[test]
fn test_missing_column_fails_before_any_row() -> Result<()> {
    let file = write_csv("name,age\nsamer,11.5\njohn,30\n")?;
    let mut scan = CsvScanOperator::new(file.path(), strings(&["height"]));

    match scan.open() {
        Err(QueryError::SchemaError(msg)) => assert!(msg.contains("height")),
        other => panic!("Expected SchemaError, got {:?}", other),
    }

    // The failed open left the operator unopened
    assert!(matches!(scan.next(), Err(QueryError::InvalidOperation(_))));

    Ok(())
}

#[test]
fn test_nonexistent_file() -> Result<()> {
    let dir = tempdir()?;
    let mut scan = CsvScanOperator::new(dir.path().join("missing.csv"), strings(&["name"]));

    assert!(matches!(scan.open(), Err(QueryError::ResourceError(_))));
    Ok(())
}

#[test]
fn test_header_only_file() -> Result<()> {
    let file = write_csv("name,age\n")?;
    let mut scan = CsvScanOperator::new(file.path(), strings(&["age"]));

    scan.open()?;
    assert!(scan.next()?.is_none());
    assert!(scan.next()?.is_none());
    scan.close()?;

    Ok(())
}

#[test]
fn test_tab_separated_with_trim() -> Result<()> {
    let file = write_csv("name\tage\n  samer \t 11.5\n")?;
    let config = CsvScanConfig::default().with_delimiter(b'\t').with_trim(true);
    let mut scan = CsvScanOperator::with_config(file.path(), strings(&["name", "age"]), config);

    let rows = run(&mut scan)?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("name"), Some("samer"));
    assert_eq!(rows[0].get("age"), Some("11.5"));

    Ok(())
}

#[test]
fn test_ratings_filter_then_average() -> Result<()> {
    let file = write_csv(RATINGS_CSV)?;

    let scan = CsvScanOperator::new(file.path(), strings(&["movieId", "rating"]));
    let filter = FilterOperator::new(Box::new(scan), Comparison::parse("movieId = 1222")?.into_predicate());
    let mut average = AggregateOperator::average(Box::new(filter), "rating");

    average.open()?;
    let rows = drain(&mut average)?;
    average.close()?;

    assert_eq!(rows.len(), 1);
    let value: f64 = rows[0].get("average").unwrap().parse()?;
    assert!((value - 12.5 / 3.0).abs() < 1e-9);

    Ok(())
}

#[test]
fn test_scan_through_engine_with_limit() -> Result<()> {
    let file = write_csv(RATINGS_CSV)?;
    let mut root: Box<dyn Operator> = Box::new(CsvScanOperator::new(file.path(), strings(&["userId"])));

    let result = ExecutionEngine::new().with_row_limit(2).execute(root.as_mut())?;
    assert_eq!(result.row_count(), 2);
    assert_eq!(result.columns(), &["userId"]);
    assert_eq!(result.rows()[1].get("userId"), Some("2"));

    // Closed early, so the scan reopens from the top
    let again = ExecutionEngine::new().execute(root.as_mut())?;
    assert_eq!(again.row_count(), 5);

    Ok(())
}
