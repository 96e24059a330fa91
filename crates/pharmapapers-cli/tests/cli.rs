//! Integration tests for the `get-papers-list` command line surface.
//!
//! Tests that would reach NCBI are ignored by default; the rest point the client at an
//! unroutable address or fail before any request is made.

use std::{fs, path::PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::{tempdir, TempDir};

// Helper function to create a clean command instance
fn get_papers_list() -> Command { Command::cargo_bin("get-papers-list").unwrap() }

// Helper writing a config file that points at a closed local port
fn unreachable_config() -> (TempDir, PathBuf) {
  let dir = tempdir().unwrap();
  let path = dir.path().join("config.toml");
  fs::write(&path, "base_url = \"http://127.0.0.1:9/\"\nrequest_pause_ms = 0\n").unwrap();
  (dir, path)
}

#[test]
fn test_help_lists_options() {
  get_papers_list()
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("--debug"))
    .stdout(predicate::str::contains("--file"))
    .stdout(predicate::str::contains("--max-results"));
}

#[test]
fn test_query_is_required() {
  get_papers_list().assert().failure().stderr(predicate::str::contains("<QUERY>"));
}

#[test]
fn test_max_results_must_be_a_number() {
  get_papers_list()
    .args(["cancer", "--max-results", "many"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_invalid_config_file_exits_with_error() {
  let dir = tempdir().unwrap();
  let path = dir.path().join("config.toml");
  fs::write(&path, "chunk_size = 0\n").unwrap();

  get_papers_list()
    .args(["cancer", "--config"])
    .arg(&path)
    .assert()
    .code(1)
    .stderr(predicate::str::contains("Error: chunk_size must be at least 1"));
}

#[test]
fn test_network_failure_exits_with_error() {
  let (_dir, config) = unreachable_config();

  get_papers_list()
    .args(["cancer", "--config"])
    .arg(&config)
    .assert()
    .code(1)
    .stdout(predicate::str::is_empty())
    .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_debug_flag_prints_error_details() {
  let (_dir, config) = unreachable_config();

  get_papers_list()
    .args(["cancer", "--debug", "--config"])
    .arg(&config)
    .assert()
    .code(1)
    .stderr(predicate::str::contains("Network("));
}

#[ignore = "requires network access to NCBI E-utilities"]
#[test]
fn test_live_query_to_file() {
  let dir = tempdir().unwrap();
  let output = dir.path().join("results.csv");

  get_papers_list()
    .args(["pembrolizumab AND merck[ad]", "--max-results", "20", "--file"])
    .arg(&output)
    .assert()
    .success()
    .stdout(predicate::str::contains("Results saved to").or(predicate::str::contains("No papers")));
}
