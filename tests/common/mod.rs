#![allow(dead_code)]

use std::io::Write;

use anyhow::Result;
use tempfile::NamedTempFile;
use tuplestream::{Operator, Row};

// Write CSV text to a temporary file that lives as long as the handle
pub fn write_csv(contents: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    Ok(file)
}

pub fn strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

pub fn person(name: &str, age: &str) -> Row {
    Row::from_pairs([("name", name), ("age", age)])
}

// The six-row data set used by the end-to-end tests
pub fn people() -> Vec<Row> {
    vec![
        person("samer", "11.5"),
        person("john", "30"),
        person("samer", "25"),
        person("fred", "20"),
        person("my grandmother", "110.1"),
        person("samer", "11.5"),
    ]
}

// Pull an opened operator to end of stream
pub fn drain(op: &mut dyn Operator) -> Result<Vec<Row>> {
    let mut rows = Vec::new();
    while let Some(row) = op.next()? {
        rows.push(row);
    }
    Ok(rows)
}

// Open, drain and close
pub fn run(op: &mut dyn Operator) -> Result<Vec<Row>> {
    op.open()?;
    let rows = drain(op)?;
    op.close()?;
    Ok(rows)
}

pub const MOVIES_CSV: &str = "\
movieId,title,genres
1,Toy Story (1995),Adventure|Animation|Children
2,Jumanji (1995),Adventure|Children|Fantasy
24,Powder (1995),Drama|Sci-Fi
25,\"Leaving Las Vegas, (1995)\",Drama|Romance
";

pub const RATINGS_CSV: &str = "\
userId,movieId,rating,timestamp
1,1222,4.0,964981247
2,31,2.5,1260759144
3,1222,5.0,1260759179
4,1222,3.5,1260759182
5,1029,3.0,1260759185
";
