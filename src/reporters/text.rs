//! Narrative report in Russian, the language of the corpus
//!
//! Fixed layout: banner, corpus summary, one block per document, then
//! conclusions. Independent of the table: nothing here is read back.

use super::ReportContext;
use crate::models::{CorpusSummary, DensityMode, EnrichedRecord};
use anyhow::Result;

const WIDTH: usize = 60;
const RULE: usize = 40;
const NOT_AVAILABLE: &str = "н/д";

/// Group digits in threes with commas (`12,345`)
pub fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

fn density_cell(record: &EnrichedRecord) -> Option<String> {
    match record.metrics.density_mode {
        DensityMode::Tagged => Some(percent(record.metrics.lexical_density)),
        DensityMode::Degraded => Some(NOT_AVAILABLE.to_string()),
        DensityMode::Disabled => None,
    }
}

pub fn render(
    records: &[EnrichedRecord],
    summary: &CorpusSummary,
    ctx: &ReportContext,
) -> Result<String> {
    let icon = |glyph: &str| {
        if ctx.emoji {
            format!("{glyph} ")
        } else {
            String::new()
        }
    };
    let banner = "=".repeat(WIDTH);
    let rule = "-".repeat(RULE);
    let mut out = String::new();

    // Header
    out.push_str(&format!("{banner}\n"));
    out.push_str(&format!("{}ОТЧЕТ ПО АНАЛИЗУ ТЕКСТОВОГО КОРПУСА\n", icon("📊")));
    out.push_str(&format!("{banner}\n"));
    out.push_str(&format!("Папка корпуса: {}\n", ctx.corpus_dir.display()));
    out.push_str(&format!(
        "Дата анализа: {}\n\n",
        ctx.generated_at.format("%Y-%m-%d %H:%M:%S")
    ));

    // Summary
    out.push_str(&format!("{}ОБЩАЯ СТАТИСТИКА:\n", icon("📈")));
    out.push_str(&format!("{rule}\n"));
    out.push_str(&format!("  Всего файлов: {}\n", summary.total_files));
    out.push_str(&format!(
        "  Всего слов: {}\n",
        group_thousands(summary.total_words)
    ));
    out.push_str(&format!(
        "  Всего уникальных слов: {}\n",
        group_thousands(summary.total_unique_words)
    ));
    out.push_str(&format!("  Средний TTR: {:.4}\n", summary.average_ttr));
    let density_reported = records
        .iter()
        .any(|r| r.metrics.density_mode != DensityMode::Disabled);
    match summary.average_lexical_density {
        Some(avg) => out.push_str(&format!(
            "  Средняя лексическая плотность: {}\n",
            percent(avg)
        )),
        None if density_reported => out.push_str(&format!(
            "  Средняя лексическая плотность: {NOT_AVAILABLE}\n"
        )),
        None => {}
    }
    if ctx.skipped > 0 {
        out.push_str(&format!("  Пропущено файлов: {}\n", ctx.skipped));
    }

    // Per document
    out.push_str(&format!("\n{}ДЕТАЛЬНАЯ СТАТИСТИКА ПО ФАЙЛАМ:\n", icon("📋")));
    out.push_str(&format!("{banner}\n"));
    for (i, record) in records.iter().enumerate() {
        let m = &record.metrics;
        out.push_str(&format!("\n{}. {}{}\n", i + 1, icon("📄"), m.filename));
        out.push_str(&format!("{rule}\n"));
        out.push_str(&format!("   Название: {}\n", record.title));
        out.push_str(&format!("   Автор: {}\n", record.author));
        out.push_str(&format!("   Год: {}\n", record.year));
        out.push_str(&format!("   Слов: {}\n", group_thousands(m.word_count)));
        out.push_str(&format!(
            "   Уникальных слов: {}\n",
            group_thousands(m.unique_words)
        ));
        out.push_str(&format!("   TTR: {:.4}\n", m.ttr));
        out.push_str(&format!("   Строк: {}\n", group_thousands(m.line_count)));
        out.push_str(&format!("   Ср. длина слова: {:.2}\n", m.avg_word_length));
        if let Some(density) = density_cell(record) {
            out.push_str(&format!("   Лекс. плотность: {density}\n"));
        }
    }

    // Conclusions
    out.push_str(&format!("\n{banner}\n"));
    out.push_str(&format!("{}ВЫВОДЫ И НАБЛЮДЕНИЯ:\n", icon("💡")));
    out.push_str(&format!("{banner}\n"));

    let find = |name: &Option<String>| {
        name.as_deref()
            .and_then(|n| records.iter().find(|r| r.filename() == n))
    };
    if let Some(r) = find(&summary.file_with_max_word_count) {
        out.push_str(&format!(
            "• Самый большой файл: {} ({} слов)\n",
            r.filename(),
            group_thousands(r.metrics.word_count)
        ));
    }
    if let Some(r) = find(&summary.file_with_max_ttr) {
        out.push_str(&format!(
            "• Самый лексически разнообразный: {} (TTR: {:.4})\n",
            r.filename(),
            r.metrics.ttr
        ));
    }
    if let Some(r) = find(&summary.file_with_max_lexical_density) {
        out.push_str(&format!(
            "• Наибольшая лексическая плотность: {} ({})\n",
            r.filename(),
            percent(r.metrics.lexical_density)
        ));
    }
    if summary.per_author_counts.len() > 1 {
        out.push_str(&format!(
            "\n• Всего авторов: {}\n",
            summary.per_author_counts.len()
        ));
        for (author, group) in &summary.per_author_counts {
            out.push_str(&format!("  - {}: {} файлов\n", author, group.count));
        }
    }

    out.push_str(&format!("\n{banner}\n"));
    out.push_str(&format!("{}Анализ завершен успешно!\n", icon("✅")));
    out.push_str(&format!("{banner}\n"));

    Ok(out)
}
