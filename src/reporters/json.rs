//! JSON writer
//!
//! Pretty-printed `{ "summary": ..., "records": [...] }` for jq and other
//! tools. Densities are written unrounded.

use crate::models::{CorpusSummary, EnrichedRecord};
use anyhow::Result;
use serde::Serialize;

#[derive(Serialize)]
struct JsonOutput<'a> {
    summary: &'a CorpusSummary,
    records: &'a [EnrichedRecord],
}

pub fn render(records: &[EnrichedRecord], summary: &CorpusSummary) -> Result<String> {
    let mut out = serde_json::to_string_pretty(&JsonOutput { summary, records })?;
    out.push('\n');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::summarize;
    use crate::models::DensityMode;
    use crate::reporters::tests::test_records;

    #[test]
    fn test_json_render_valid() {
        let records = test_records();
        let summary = summarize(&records);
        let json_str = render(&records, &summary).expect("render JSON");
        let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("parse JSON");

        assert_eq!(parsed["summary"]["total_files"], 2);
        assert_eq!(parsed["summary"]["total_words"], 1203);
        let records = parsed["records"].as_array().expect("records array");
        assert_eq!(records.len(), 2);
        // Metrics are flattened next to the metadata fields
        assert_eq!(records[0]["filename"], "a.txt");
        assert_eq!(records[0]["author"], "Всеволод Некрасов");
        assert_eq!(records[0]["density_mode"], "tagged");
        assert_eq!(
            parsed["summary"]["per_author_counts"]["Неизвестно"]["files"][0],
            "b.txt"
        );
    }

    #[test]
    fn test_json_records_read_back() {
        let records = test_records();
        let json_str = render(&records, &summarize(&records)).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json_str).unwrap();
        let back: Vec<EnrichedRecord> =
            serde_json::from_value(parsed["records"].clone()).expect("records deserialize");
        assert_eq!(back.len(), records.len());
        assert_eq!(back[1].filename(), "b.txt");
        assert_eq!(back[1].title, "Неизвестно");
        assert_eq!(back[1].metrics.word_count, 1200);
        assert_eq!(back[1].metrics.density_mode, DensityMode::Tagged);
        assert!((back[1].metrics.ttr - records[1].metrics.ttr).abs() < 1e-12);
    }

    #[test]
    fn test_json_empty() {
        let json_str = render(&[], &CorpusSummary::default()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed["records"].as_array().map(|a| a.len()), Some(0));
        assert!(parsed["summary"]["average_lexical_density"].is_null());
    }
}
