//! Table formatting utilities for CLI output.

use comfy_table::{ContentArrangement, Table, presets};

/// Coverage data for a single locale.
pub struct LocaleCoverage {
    /// Locale key (e.g., "de", "fr").
    pub locale: String,
    /// Number of source keys present in the translation.
    pub translated: usize,
    /// Source keys absent from the translation.
    pub missing: Vec<String>,
    /// Translation keys absent from the source.
    pub extra: Vec<String>,
}

/// Format coverage data as a table.
pub fn format_coverage_table(source_count: usize, coverage: &[LocaleCoverage]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_BORDERS_ONLY);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Locale", "Coverage", "Missing", "Extra"]);

    for locale in coverage {
        table.add_row(vec![
            locale.locale.clone(),
            format!("{}/{}", locale.translated, source_count),
            locale.missing.len().to_string(),
            locale.extra.len().to_string(),
        ]);
    }

    table
}
