use assert_cmd::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SCHEMA: &str = r#"{
  "@context": ["http://www.w3.org/ns/csvw", {"@base": "https://data.example/", "ex": "https://vocab.example/"}],
  "url": "people.csv",
  "dialect": {"delimiter": ";"},
  "tableSchema": {
    "aboutUrl": "person/{id}",
    "null": "NA",
    "columns": [
      {"name": "id", "propertyUrl": "ex:id", "datatype": "integer"},
      {"name": "name", "propertyUrl": "ex:name"},
      {"name": "city", "propertyUrl": "ex:city", "valueUrl": "city/{city}"},
      {"virtual": true, "propertyUrl": "rdf:type", "valueUrl": "ex:Person", "value": "person"}
    ]
  }
}"#;

const CSV: &str = "id;name;city\n1;Ann;Utrecht\n2;NA;Leiden\n3;Cem;NA\n";

/// A `csvw` command running in `work_dir` with color disabled.
fn csvw_cmd(work_dir: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("csvw");
    cmd.current_dir(work_dir.path());
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("RUST_LOG");
    cmd
}

fn write_fixture(dir: &Path) {
    fs::write(dir.join("people.csv"), CSV).unwrap();
    fs::write(dir.join("people.csv-metadata.json"), SCHEMA).unwrap();
}

#[test]
fn help_flag() {
    cargo_bin_cmd!("csvw")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Convert CSV files to RDF"))
        .stdout(predicate::str::contains("convert"));
}

#[test]
fn verbose_quiet_conflict() {
    cargo_bin_cmd!("csvw")
        .args(["--verbose", "--quiet", "convert", "a.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn converts_next_to_input_as_nquads() {
    let tmp = TempDir::new().unwrap();
    write_fixture(tmp.path());

    csvw_cmd(&tmp)
        .args(["convert", "people.csv", "--workers", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Converted"));

    let out = fs::read_to_string(tmp.path().join("people.csv.nq")).unwrap();
    assert!(out.contains(
        "<https://data.example/person/1> <https://vocab.example/name> \"Ann\" <https://data.example/people.csv/nanopublication/"
    ));
    assert!(out.contains("<https://data.example/person/2> <https://vocab.example/city> <https://data.example/city/Leiden>"));
    // "NA" is null for every column
    assert!(!out.contains("\"NA\""));
    assert!(!out.contains("city/NA"));
    assert!(out.contains(
        "<https://data.example/person/3> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <https://vocab.example/Person>"
    ));
}

#[test]
fn parallel_and_sequential_write_the_same_statements() {
    let tmp = TempDir::new().unwrap();
    write_fixture(tmp.path());

    csvw_cmd(&tmp)
        .args(["-q", "convert", "people.csv", "-w", "1", "-o", "seq.nt", "-f", "nt"])
        .assert()
        .success();
    csvw_cmd(&tmp)
        .args(["-q", "convert", "people.csv", "-w", "3", "--chunk-size", "1", "-o", "par.nt", "-f", "nt"])
        .assert()
        .success();

    let data_lines = |name: &str| -> Vec<String> {
        fs::read_to_string(tmp.path().join(name))
            .unwrap()
            .lines()
            .filter(|l| l.starts_with("<https://data.example/person/"))
            .map(str::to_string)
            .collect()
    };
    let seq = data_lines("seq.nt");
    assert!(!seq.is_empty());
    assert_eq!(seq, data_lines("par.nt"));
}

#[test]
fn undecodable_row_does_not_abort_the_run() {
    let tmp = TempDir::new().unwrap();
    write_fixture(tmp.path());
    fs::write(tmp.path().join("people.csv"), b"id;name;city\n1;Ann;Utrecht\n2;\xff\xfe;Leiden\n3;Cem;Delft\n").unwrap();

    for workers in ["1", "3"] {
        let output = format!("people-{workers}.nt");
        csvw_cmd(&tmp)
            .args(["convert", "people.csv", "-f", "nt", "--chunk-size", "1", "-w", workers, "-o", output.as_str()])
            .assert()
            .success()
            .stderr(predicate::str::contains("skipping unreadable CSV record"));

        let out = fs::read_to_string(tmp.path().join(&output)).unwrap();
        assert!(out.contains("<https://data.example/person/1> <https://vocab.example/name> \"Ann\""));
        assert!(out.contains("<https://data.example/person/3> <https://vocab.example/city> <https://data.example/city/Delft>"));
        assert!(!out.contains("city/Leiden"));
    }
}

#[test]
fn quiet_prints_nothing() {
    let tmp = TempDir::new().unwrap();
    write_fixture(tmp.path());

    csvw_cmd(&tmp)
        .args(["--quiet", "convert", "people.csv", "--format", "turtle"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::is_empty());

    let out = fs::read_to_string(tmp.path().join("people.csv.ttl")).unwrap();
    assert!(out.starts_with("@prefix"));
}

#[test]
fn config_file_sets_format() {
    let tmp = TempDir::new().unwrap();
    write_fixture(tmp.path());
    fs::write(
        tmp.path().join("csvw.toml"),
        "[convert]\nformat = \"trix\"\nworkers = 1\n",
    )
    .unwrap();

    csvw_cmd(&tmp)
        .args(["-q", "convert", "people.csv"])
        .assert()
        .success();

    let out = fs::read_to_string(tmp.path().join("people.csv.trix")).unwrap();
    assert!(out.starts_with("<?xml"));
    assert!(out.trim_end().ends_with("</TriX>"));
}

#[test]
fn flag_overrides_config_file() {
    let tmp = TempDir::new().unwrap();
    write_fixture(tmp.path());
    fs::write(tmp.path().join("settings.toml"), "[convert]\nformat = \"trix\"\n").unwrap();

    csvw_cmd(&tmp)
        .args(["-q", "--config", "settings.toml", "convert", "people.csv", "--format", "trig"])
        .assert()
        .success();

    assert!(tmp.path().join("people.csv.trig").exists());
    assert!(!tmp.path().join("people.csv.trix").exists());
}

#[test]
fn missing_metadata_is_an_error() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("people.csv"), CSV).unwrap();

    csvw_cmd(&tmp)
        .args(["convert", "people.csv"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("people.csv-metadata.json"));
}

#[test]
fn invalid_schema_leaves_no_output() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("people.csv"), CSV).unwrap();
    fs::write(tmp.path().join("people.csv-metadata.json"), "{\"tableSchema\": 3}").unwrap();

    csvw_cmd(&tmp)
        .args(["convert", "people.csv"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("tableSchema"));

    assert!(!tmp.path().join("people.csv.nq").exists());
}

#[test]
fn output_with_several_inputs_is_usage_error() {
    let tmp = TempDir::new().unwrap();
    csvw_cmd(&tmp)
        .args(["convert", "a.csv", "b.csv", "--output", "out.nq"])
        .assert()
        .code(2);
}

#[test]
fn zero_workers_is_rejected() {
    let tmp = TempDir::new().unwrap();
    write_fixture(tmp.path());

    csvw_cmd(&tmp)
        .args(["convert", "people.csv", "--workers", "0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("worker count"));
}
