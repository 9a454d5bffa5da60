//! End-to-end pipeline tests on temporary corpora
//!
//! Drives `Pipeline` through the library API and checks the written table
//! and report.

use corpuslens::config::CorpusConfig;
use corpuslens::metadata::parse_table;
use corpuslens::models::DensityMode;
use corpuslens::pipeline::{Pipeline, RunOutcome, RunReport};
use corpuslens::pos::{NullTagger, SuffixTagger};
use corpuslens::reporters::{present_columns, Column};
use std::fs;
use std::path::Path;

fn setup_corpus(files: &[(&str, &str)]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let corpus = dir.path().join("corpus");
    fs::create_dir_all(&corpus).unwrap();
    for (name, text) in files {
        fs::write(corpus.join(name), text).unwrap();
    }
    dir
}

fn write_metadata(root: &Path, content: &str) {
    let data = root.join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("metadata.csv"), content).unwrap();
}

fn pipeline(root: &Path) -> Pipeline {
    Pipeline::from_config(&CorpusConfig::default())
        .with_corpus_dir(root.join("corpus"))
        .with_metadata(root.join("data").join("metadata.csv"))
        .with_table_output(root.join("results").join("statistics.csv"))
        .with_report_output(root.join("results").join("report.txt"))
}

fn run_completed(pipeline: Pipeline) -> RunReport {
    match pipeline.run().expect("pipeline run") {
        RunOutcome::Completed(report) => report,
        RunOutcome::EmptyCorpus { .. } => panic!("unexpected empty corpus"),
    }
}

#[test]
fn test_cat_mat_scenario() {
    let dir = setup_corpus(&[("a.txt", "the cat sat"), ("b.txt", "the cat sat on the mat")]);
    let report = run_completed(pipeline(dir.path()).without_density());

    let a = &report.records[0].metrics;
    let b = &report.records[1].metrics;
    assert_eq!((a.word_count, b.word_count), (3, 6));
    assert_eq!((a.unique_words, b.unique_words), (3, 5));
    assert_eq!(a.ttr, 1.0);
    assert!((b.ttr - 0.8333).abs() < 1e-3);

    let summary = &report.summary;
    assert_eq!(summary.total_files, 2);
    assert_eq!(summary.total_words, 9);
    assert!((summary.average_ttr - 0.9167).abs() < 1e-4);
    assert_eq!(summary.file_with_max_word_count.as_deref(), Some("b.txt"));
    assert_eq!(summary.file_with_max_ttr.as_deref(), Some("a.txt"));
}

#[test]
fn test_missing_year_gets_sentinel() {
    let dir = setup_corpus(&[("text1.txt", "Ночью ничего нет"), ("text2.txt", "быстро")]);
    write_metadata(
        dir.path(),
        "filename,title,author,year,genre\ntext1.txt,Ночью,Всеволод Некрасов,,стихи\n",
    );

    let report = run_completed(pipeline(dir.path()).with_tagger(Box::new(SuffixTagger::new())));
    let first = &report.records[0];
    assert_eq!(first.title, "Ночью");
    assert_eq!(first.author, "Всеволод Некрасов");
    assert_eq!(first.year, "Неизвестно");

    // No metadata row at all
    let second = &report.records[1];
    assert_eq!(second.title, "Неизвестно");
    assert_eq!(second.genre, "Неизвестно");

    let table = fs::read_to_string(&report.table_path).unwrap();
    assert!(table.contains("text1.txt,Ночью,Всеволод Некрасов,Неизвестно,стихи,"));
}

#[test]
fn test_short_metadata_rows_do_not_break_the_run() {
    let dir = setup_corpus(&[("a.txt", "слово")]);
    write_metadata(dir.path(), "filename,title,author,year,genre\na.txt,Заглавие\n");

    let report = run_completed(pipeline(dir.path()).without_density());
    assert_eq!(report.metadata_issues.len(), 1);
    assert_eq!(report.metadata_issues[0].line, 2);
    assert_eq!(report.records[0].title, "Заглавие");
    assert_eq!(report.records[0].author, "Неизвестно");
}

#[test]
fn test_empty_corpus_writes_nothing() {
    let dir = setup_corpus(&[]);
    match pipeline(dir.path()).without_density().run().unwrap() {
        RunOutcome::EmptyCorpus {
            discovered,
            skipped,
            summary,
        } => {
            assert_eq!(discovered, 0);
            assert!(skipped.is_empty());
            assert_eq!(summary.total_files, 0);
            assert_eq!(summary.total_words, 0);
            assert_eq!(summary.average_ttr, 0.0);
            assert!(summary.file_with_max_word_count.is_none());
            assert!(summary.file_with_max_ttr.is_none());
            assert!(summary.file_with_max_lexical_density.is_none());
        }
        RunOutcome::Completed(_) => panic!("expected an empty corpus"),
    }
    assert!(!dir.path().join("results").join("statistics.csv").exists());
    assert!(!dir.path().join("results").join("report.txt").exists());
}

#[test]
fn test_only_unreadable_documents_is_empty_corpus() {
    let dir = setup_corpus(&[]);
    fs::write(dir.path().join("corpus").join("bad.txt"), [0xff, 0xfe, 0xfd]).unwrap();

    match pipeline(dir.path()).without_density().run().unwrap() {
        RunOutcome::EmptyCorpus {
            discovered,
            skipped,
            summary,
        } => {
            assert_eq!(summary.total_files, 0);
            assert_eq!(discovered, 1);
            assert_eq!(skipped.len(), 1);
            assert_eq!(skipped[0].filename, "bad.txt");
        }
        RunOutcome::Completed(_) => panic!("expected an empty corpus"),
    }
}

#[test]
fn test_unreadable_document_is_skipped_and_reported() {
    let dir = setup_corpus(&[("a.txt", "первый текст"), ("c.txt", "третий текст")]);
    fs::write(dir.path().join("corpus").join("b.txt"), [0xc3, 0x28]).unwrap();

    let report = run_completed(pipeline(dir.path()).without_density());
    let names: Vec<&str> = report.records.iter().map(|r| r.filename()).collect();
    assert_eq!(names, vec!["a.txt", "c.txt"]);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].filename, "b.txt");

    let text = fs::read_to_string(&report.report_path).unwrap();
    assert!(text.contains("Пропущено файлов: 1"));
}

#[test]
fn test_degraded_tagger_zero_densities() {
    let dir = setup_corpus(&[("a.txt", "Рыжая кошка спала"), ("b.txt", "Белый снег лежал")]);
    let report = run_completed(pipeline(dir.path()).with_tagger(Box::new(NullTagger)));

    for record in &report.records {
        let m = &record.metrics;
        assert_eq!(m.density_mode, DensityMode::Degraded);
        assert_eq!(m.lexical_density, 0.0);
        assert_eq!(m.noun_density, 0.0);
        assert_eq!(m.adj_density, 0.0);
        assert_eq!(m.verb_density, 0.0);
    }
    assert_eq!(report.summary.average_lexical_density, None);

    let table = fs::read_to_string(&report.table_path).unwrap();
    assert!(table.lines().next().unwrap().ends_with("lexical_density,noun_density,adj_density,verb_density"));
    assert!(table.lines().nth(1).unwrap().ends_with(",0.0,0.0,0.0,0.0"));
    let text = fs::read_to_string(&report.report_path).unwrap();
    assert!(text.contains("Лекс. плотность: н/д"));
}

#[test]
fn test_disabled_density_omits_columns() {
    let dir = setup_corpus(&[("a.txt", "Рыжая кошка спала")]);
    let report = run_completed(pipeline(dir.path()).without_density());

    let table = fs::read_to_string(&report.table_path).unwrap();
    let header = table.lines().next().unwrap();
    assert_eq!(
        header,
        "filename,title,author,year,genre,word_count,unique_words,ttr,line_count,avg_word_length"
    );
}

#[test]
fn test_table_is_idempotent() {
    let dir = setup_corpus(&[
        ("b.txt", "Белый снег лежал на крыше"),
        ("a.txt", "Рыжая кошка спала\nна тёплом окне"),
        ("c.txt", ""),
    ]);
    write_metadata(dir.path(), "filename,title,author,year,genre\na.txt,Кошка,Автор,2001,проза\n");

    let first = run_completed(
        pipeline(dir.path())
            .with_tagger(Box::new(SuffixTagger::new()))
            .with_workers(3),
    );
    let table_one = fs::read(&first.table_path).unwrap();

    let second = run_completed(
        pipeline(dir.path())
            .with_tagger(Box::new(SuffixTagger::new()))
            .with_workers(1),
    );
    let table_two = fs::read(&second.table_path).unwrap();
    assert_eq!(table_one, table_two);
}

#[test]
fn test_table_reads_back_through_metadata_parser() {
    let dir = setup_corpus(&[
        ("a.txt", "Рыжая кошка спала на тёплом окне"),
        ("b.txt", "the cat sat on the mat"),
        ("c.txt", ""),
    ]);
    write_metadata(dir.path(), "filename,title,author,year,genre\nb.txt,Cat,Anon,1999,prose\n");

    let report = run_completed(pipeline(dir.path()).with_tagger(Box::new(SuffixTagger::new())));
    let content = fs::read_to_string(&report.table_path).unwrap();
    let table = parse_table(&content, ',');

    let columns = present_columns(&report.records);
    let headers: Vec<&str> = columns.iter().map(|c| c.header()).collect();
    assert_eq!(table.headers, headers);
    assert!(table.issues.is_empty());
    assert_eq!(table.rows.len(), report.records.len());

    for (row, record) in table.rows.iter().zip(&report.records) {
        assert_eq!(row["filename"], record.filename());
        for column in &columns {
            assert_eq!(
                Some(&row[column.header()]),
                column.value(record).as_ref(),
                "column {} of {}",
                column.header(),
                record.filename()
            );
        }
    }
    assert_eq!(
        table.rows[2][Column::LineCount.header()],
        "1",
        "an empty document is one line"
    );
}

#[test]
fn test_json_output() {
    let dir = setup_corpus(&[("a.txt", "the cat sat")]);
    let json_path = dir.path().join("out").join("stats.json");
    let report = run_completed(pipeline(dir.path()).without_density().with_json_output(&json_path));

    assert_eq!(report.json_path.as_deref(), Some(json_path.as_path()));
    let parsed: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(parsed["summary"]["total_words"], 3);
    assert_eq!(parsed["records"][0]["filename"], "a.txt");
    assert_eq!(parsed["records"][0]["density_mode"], "disabled");
}

#[test]
fn test_strip_punctuation_tokenization() {
    let dir = setup_corpus(&[("a.txt", "Слово, слово - и ещё слово!")]);
    let mut config = CorpusConfig::default();
    config.text.tokenization = "strip-punctuation".parse().unwrap();

    let report = run_completed(
        Pipeline::from_config(&config)
            .with_corpus_dir(dir.path().join("corpus"))
            .with_metadata(dir.path().join("none.csv"))
            .with_table_output(dir.path().join("results").join("statistics.csv"))
            .with_report_output(dir.path().join("results").join("report.txt"))
            .without_density(),
    );
    let m = &report.records[0].metrics;
    assert_eq!(m.word_count, 5);
    assert_eq!(m.unique_words, 3);
}
