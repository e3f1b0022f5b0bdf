use anyhow::Result;
use std::process::{Command, Output};

#[path = "../common/mod.rs"]
mod common;
use common::{MOVIES_CSV, RATINGS_CSV, write_csv};

fn tsq(args: &[&str]) -> Result<Output> {
    Ok(Command::new(env!("CARGO_BIN_EXE_tsq")).args(args).output()?)
}

/// Test that a filtered projection prints as a table
#[test]
fn test_cli_select_and_project() -> Result<()> {
    let file = write_csv(MOVIES_CSV)?;
    let path = file.path().to_string_lossy().into_owned();

    let output = tsq(&[path.as_str(), "-c", "movieid,title", "-w", "movieid = 24", "-p", "title"])?;
    assert!(output.status.success(), "tsq failed: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8(output.stdout)?;
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("title"));
    assert!(lines[2].contains("Powder (1995)"));
    assert!(!stdout.contains("Toy Story"));

    Ok(())
}

/// Test the line format with sorting and a row limit
#[test]
fn test_cli_sorted_lines() -> Result<()> {
    let file = write_csv(MOVIES_CSV)?;
    let path = file.path().to_string_lossy().into_owned();

    let output = tsq(&[path.as_str(), "-c", "title", "--sort", "title", "--desc", "--limit", "2", "--format", "lines"])?;
    assert!(output.status.success(), "tsq failed: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8(output.stdout)?;
    assert_eq!(
        stdout.lines().collect::<Vec<_>>(),
        vec!["title: Toy Story (1995)", "title: Powder (1995)"]
    );

    Ok(())
}

/// Test aggregation over a filtered scan
#[test]
fn test_cli_aggregate() -> Result<()> {
    let file = write_csv(RATINGS_CSV)?;
    let path = file.path().to_string_lossy().into_owned();

    let output = tsq(&[path.as_str(), "-c", "movieid,rating", "-w", "movieid != 1222", "--agg", "max:rating", "--format", "lines"])?;
    assert!(output.status.success(), "tsq failed: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(String::from_utf8(output.stdout)?.trim(), "max: 3");

    Ok(())
}

/// Test that an empty result prints the empty message
#[test]
fn test_cli_empty_result() -> Result<()> {
    let file = write_csv(MOVIES_CSV)?;
    let path = file.path().to_string_lossy().into_owned();

    let output = tsq(&[path.as_str(), "-c", "title", "-w", "title = Nothing"])?;
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout)?.trim(), "Empty result");

    Ok(())
}

/// Test that query errors fail the process with a message
#[test]
fn test_cli_missing_column_fails() -> Result<()> {
    let file = write_csv(MOVIES_CSV)?;
    let path = file.path().to_string_lossy().into_owned();

    let output = tsq(&[path.as_str(), "-c", "height"])?;
    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("height"), "unexpected stderr: {}", stderr);

    Ok(())
}
