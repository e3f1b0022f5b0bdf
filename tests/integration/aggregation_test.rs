use anyhow::Result;

use tuplestream::query::executor::operators::filter::column_equals;
use tuplestream::{
    AggregateOperator, AggregateType, CsvScanOperator, ExecutionEngine, FilterOperator, Operator, QueryError,
    Row, ValuesOperator,
};

#[path = "../common/mod.rs"]
mod common;
use common::{people, person, run, strings, write_csv};

fn aggregate(agg_type: AggregateType, rows: Vec<Row>) -> Result<Option<String>> {
    let mut op = AggregateOperator::new(Box::new(ValuesOperator::new(rows)), "age", agg_type);
    let output = run(&mut op)?;
    assert_eq!(output.len(), 1);
    Ok(output[0].get(agg_type.default_output_name()).map(str::to_string))
}

#[test]
fn test_average_of_distinct_people() -> Result<()> {
    // The people set without its duplicate row
    let mut rows = people();
    rows.pop();
    let rows = rows.into_iter().filter(|row| row.get("age") != Some("25")).collect();

    let mut average = AggregateOperator::average(Box::new(ValuesOperator::new(rows)), "age");
    let output = run(&mut average)?;
    assert_eq!(output, vec![Row::from_pairs([("average", "42.9")])]);

    Ok(())
}

#[test]
fn test_average_of_filtered_rows() -> Result<()> {
    let filter = FilterOperator::new(Box::new(ValuesOperator::new(people())), column_equals("name", "samer"));
    let mut average = AggregateOperator::average(Box::new(filter), "age");

    let output = run(&mut average)?;
    assert_eq!(output[0].get("average"), Some("16"));

    Ok(())
}

#[test]
fn test_aggregate_types() -> Result<()> {
    assert_eq!(aggregate(AggregateType::Count, people())?.as_deref(), Some("6"));
    assert_eq!(aggregate(AggregateType::Sum, people())?.as_deref(), Some("208.1"));
    assert_eq!(aggregate(AggregateType::Min, people())?.as_deref(), Some("11.5"));
    assert_eq!(aggregate(AggregateType::Max, people())?.as_deref(), Some("110.1"));
    Ok(())
}

#[test]
fn test_empty_input() -> Result<()> {
    assert_eq!(aggregate(AggregateType::Count, Vec::new())?.as_deref(), Some("0"));

    let mut average = AggregateOperator::average(Box::new(ValuesOperator::new(Vec::new())), "age");
    average.open()?;
    assert!(matches!(average.next(), Err(QueryError::EmptyInput(_))));
    average.close()?;

    Ok(())
}

#[test]
fn test_non_numeric_value_aborts_query() -> Result<()> {
    let rows = vec![person("samer", "11.5"), person("john", "thirty")];
    let mut root: Box<dyn Operator> =
        Box::new(AggregateOperator::average(Box::new(ValuesOperator::new(rows)), "age"));

    match ExecutionEngine::new().execute(root.as_mut()) {
        Err(QueryError::ParseError(msg)) => assert!(msg.contains("thirty")),
        other => panic!("Expected ParseError, got {:?}", other),
    }

    Ok(())
}

#[test]
fn test_stream_delivers_rows_before_failure() -> Result<()> {
    // The third data record is short, so the scan fails after two rows
    let file = write_csv("name,age\nsamer,11.5\njohn,30\nfred\n")?;
    let mut root: Box<dyn Operator> = Box::new(CsvScanOperator::new(file.path(), strings(&["name", "age"])));

    let mut delivered = Vec::new();
    let result = ExecutionEngine::new().for_each_row(root.as_mut(), |row| delivered.push(row));

    assert!(matches!(result, Err(QueryError::StreamError(_))));
    assert_eq!(delivered.len(), 2);
    assert_eq!(delivered[1].get("name"), Some("john"));

    Ok(())
}
