use std::fs;

use assert_cmd::Command;
use tempfile::tempdir;

#[test]
fn cli_help_runs() {
    let mut cmd = Command::cargo_bin("cdr-pipeline").expect("binary exists");
    cmd.arg("--help").assert().success();
}

#[test]
fn extract_prints_summary() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("abstracts.jsonl");
    let lexicon = dir.path().join("lexicon.json");
    let output = dir.path().join("out/candidates.jsonl");
    fs::write(
        &input,
        r#"{"pmid":"1","title":"","abstract":"Drug X may increase risk of disease Y."}"#,
    )
    .unwrap();
    fs::write(&lexicon, r#"{"chemical":["Drug X"],"disease":["disease Y"]}"#).unwrap();

    let assert = Command::cargo_bin("cdr-pipeline")
        .unwrap()
        .arg("extract")
        .arg("--in")
        .arg(&input)
        .arg("--out")
        .arg(&output)
        .arg("--lexicon")
        .arg(&lexicon)
        .arg("--summary")
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("Total sentences: 1"));
    assert!(stdout.contains("Score range: 5.5 .. 5.5"));
    assert!(stdout.contains("  speculative: 1"));
    assert_eq!(fs::read_to_string(&output).unwrap().lines().count(), 1);
}

#[test]
fn fetch_requires_contact_email() {
    let dir = tempdir().unwrap();
    let pmids = dir.path().join("pmids.txt");
    fs::write(&pmids, "123\n").unwrap();

    let assert = Command::cargo_bin("cdr-pipeline")
        .unwrap()
        .current_dir(dir.path())
        .env_remove("NCBI_EMAIL")
        .arg("fetch")
        .arg("--pmids")
        .arg(&pmids)
        .arg("--out")
        .arg(dir.path().join("abstracts.jsonl"))
        .assert()
        .failure();

    let stderr = String::from_utf8(assert.get_output().stderr.clone()).unwrap();
    assert!(stderr.contains("missing contact email"));
}

#[test]
fn fetch_rejects_empty_pmid_list() {
    let dir = tempdir().unwrap();
    let pmids = dir.path().join("empty.txt");
    fs::write(&pmids, "\n  \n").unwrap();

    let assert = Command::cargo_bin("cdr-pipeline")
        .unwrap()
        .current_dir(dir.path())
        .arg("fetch")
        .arg("--pmids")
        .arg(&pmids)
        .arg("--email")
        .arg("curator@example.org")
        .arg("--out")
        .arg(dir.path().join("abstracts.jsonl"))
        .assert()
        .failure();

    let stderr = String::from_utf8(assert.get_output().stderr.clone()).unwrap();
    assert!(stderr.contains("no PMIDs found"));
    assert!(!dir.path().join("abstracts.jsonl").exists());
}
