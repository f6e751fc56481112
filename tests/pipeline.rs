use std::fs;

use cdr_pipeline::{
    data::export::{export_csv, EXPORT_COLUMNS},
    nlp::{
        candidates::SentenceCandidateRecord,
        cues::Polarity,
        extract_candidates,
        ner::{DictionaryRecognizer, Lexicon},
    },
};
use tempfile::tempdir;

const ABSTRACTS: &str = r#"{"pmid":"1","title":"","abstract":"Drug X may increase risk of disease Y."}
{"pmid":"2","title":"","abstract":""}

{"pmid":"3","title":"Background.","abstract":"Drug X was not associated with disease Y."}
"#;

fn recognizer() -> DictionaryRecognizer {
    DictionaryRecognizer::new(&Lexicon {
        chemical: vec!["Drug X".into()],
        disease: vec!["disease Y".into()],
    })
    .unwrap()
}

fn read_csv(path: &std::path::Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let header = reader.headers().unwrap().iter().map(String::from).collect();
    let rows = reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    (header, rows)
}

#[test]
fn extract_then_export_round_trip() {
    let dir = tempdir().unwrap();
    let abstracts = dir.path().join("abstracts.jsonl");
    let candidates = dir.path().join("candidates.jsonl");
    fs::write(&abstracts, ABSTRACTS).unwrap();

    let summary = extract_candidates(&abstracts, &candidates, &recognizer()).unwrap();
    assert_eq!(summary.documents, 2);
    assert_eq!(summary.total_sentences, 3);
    assert_eq!(summary.sentences_with_entities, 2);
    assert_eq!(summary.sentences_with_pairs, 2);
    assert_eq!(summary.score_min, Some(0.0));
    assert_eq!(summary.score_max, Some(5.5));
    assert_eq!(
        summary.to_string(),
        "Total sentences: 3\n\
         Sentences with any entities: 2\n\
         Sentences with pairs: 2\n\
         Score range: 0.0 .. 5.5\n\
         Polarity counts:\n  \
         negative: 1\n  \
         speculative: 1\n  \
         unknown: 1\n"
    );

    let text = fs::read_to_string(&candidates).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        r#"{"pmid":"1","sentence":"Drug X may increase risk of disease Y.","chemicals":["Drug X"],"diseases":["disease Y"],"pairs":[{"chemical":"Drug X","disease":"disease Y"}],"score":5.5,"polarity_guess":"speculative"}"#
    );
    let background: SentenceCandidateRecord = serde_json::from_str(lines[1]).unwrap();
    assert_eq!(background.sentence_text, "Background.");
    assert!(background.pairs.is_empty());
    assert_eq!(background.score, 0.0);
    assert_eq!(background.polarity, Polarity::Unknown);
    let negated: SentenceCandidateRecord = serde_json::from_str(lines[2]).unwrap();
    assert_eq!(negated.polarity, Polarity::Negative);
    assert_eq!(negated.score, 5.0);

    let csv_path = dir.path().join("export/candidates.csv");
    let rows = export_csv(&candidates, &csv_path, false).unwrap();
    assert_eq!(rows, 2);
    let (header, rows) = read_csv(&csv_path);
    assert_eq!(header, EXPORT_COLUMNS.to_vec());
    assert_eq!(
        rows[0],
        vec![
            "1",
            "Drug X",
            "disease Y",
            "Drug X may increase risk of disease Y.",
            "speculative",
            "5.5",
            "",
            "",
            "",
            "",
            "",
        ]
    );
    assert_eq!(rows[1][0], "3");
    assert_eq!(rows[1][4], "negative");
}

#[test]
fn export_can_keep_pairless_sentences() {
    let dir = tempdir().unwrap();
    let abstracts = dir.path().join("abstracts.jsonl");
    let candidates = dir.path().join("candidates.jsonl");
    fs::write(&abstracts, ABSTRACTS).unwrap();
    extract_candidates(&abstracts, &candidates, &recognizer()).unwrap();

    let csv_path = dir.path().join("all.csv");
    assert_eq!(export_csv(&candidates, &csv_path, true).unwrap(), 3);
    let (_, rows) = read_csv(&csv_path);
    assert_eq!(rows[1][0], "3");
    assert_eq!(rows[1][1], "");
    assert_eq!(rows[1][2], "");
    assert_eq!(rows[1][3], "Background.");
    assert_eq!(rows[1][4], "unknown");
}

#[test]
fn export_tolerates_sparse_records() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("sparse.jsonl");
    fs::write(
        &input,
        "{\"pmid\":\"5\",\"pairs\":[{\"chemical\":\"a\",\"disease\":\"b\"},{\"chemical\":\"a\",\"disease\":\"c\"}]}\n{\"pmid\":\"6\"}\n",
    )
    .unwrap();
    let csv_path = dir.path().join("sparse.csv");
    assert_eq!(export_csv(&input, &csv_path, false).unwrap(), 2);
    let (_, rows) = read_csv(&csv_path);
    assert_eq!(rows[0][..6], ["5", "a", "b", "", "unknown", ""]);
    assert_eq!(rows[1][2], "c");
}

#[test]
fn export_of_empty_input_writes_header_only() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("empty.jsonl");
    fs::write(&input, "").unwrap();
    let csv_path = dir.path().join("empty.csv");
    assert_eq!(export_csv(&input, &csv_path, true).unwrap(), 0);
    assert_eq!(
        fs::read_to_string(&csv_path).unwrap(),
        format!("{}\n", EXPORT_COLUMNS.join(","))
    );
}

#[test]
fn malformed_line_reports_its_position() {
    let dir = tempdir().unwrap();
    let abstracts = dir.path().join("broken.jsonl");
    fs::write(&abstracts, "{\"pmid\":\"1\",\"abstract\":\"Fine.\"}\nnot json\n").unwrap();
    let err = extract_candidates(&abstracts, &dir.path().join("out.jsonl"), &recognizer())
        .unwrap_err();
    assert!(format!("{err:#}").contains("broken.jsonl:2"));
}

#[test]
fn export_tolerates_null_and_numeric_fields() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("loose.jsonl");
    fs::write(
        &input,
        concat!(
            "{\"pmid\":\"1\",\"pairs\":null,\"sentence\":\"x\"}\n",
            "{\"pmid\":42,\"pairs\":[{\"chemical\":\"a\"},{\"disease\":\"d\"}],",
            "\"polarity_guess\":null,\"sentence\":null,\"score\":2.5}\n",
            "{\"pmid\":null,\"pairs\":[{\"chemical\":null,\"disease\":\"e\"}]}\n",
        ),
    )
    .unwrap();
    let csv_path = dir.path().join("loose.csv");
    assert_eq!(export_csv(&input, &csv_path, true).unwrap(), 4);
    let (_, rows) = read_csv(&csv_path);
    assert_eq!(rows[0][..6], ["1", "", "", "x", "unknown", ""]);
    assert_eq!(rows[1][..6], ["42", "a", "", "", "unknown", "2.5"]);
    assert_eq!(rows[2][..3], ["42", "", "d"]);
    assert_eq!(rows[3][..3], ["", "", "e"]);
}
