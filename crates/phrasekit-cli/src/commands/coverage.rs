//! Coverage command implementation.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use clap::Args;
use miette::{IntoDiagnostic, Result, miette};
use phrasekit::interpreter::flatten;
use serde::Serialize;
use tracing::debug;

use super::{locale_for, read_phrase_file};
use crate::output::table::{LocaleCoverage, format_coverage_table};

/// Arguments for the coverage command.
#[derive(Debug, Args)]
pub struct CoverageArgs {
    /// Source locale file (e.g., en.json).
    #[arg(long)]
    pub source: PathBuf,

    /// Locales to check coverage for (comma-separated).
    #[arg(long, value_delimiter = ',')]
    pub lang: Vec<String>,

    /// Directory containing translation files. Defaults to source file directory.
    #[arg(long)]
    pub translations: Option<PathBuf>,

    /// Exit with non-zero code if any translation is incomplete.
    #[arg(long)]
    pub strict: bool,

    /// Output results as JSON.
    #[arg(long)]
    pub json: bool,
}

/// JSON output format for coverage data.
#[derive(Debug, Serialize)]
struct CoverageJson {
    locale: String,
    translated: usize,
    total: usize,
    missing: Vec<String>,
    extra: Vec<String>,
}

/// Run the coverage command.
pub fn run_coverage(args: CoverageArgs) -> Result<i32> {
    let source_keys = phrase_keys(&args.source)?;
    let source_count = source_keys.len();

    // Translation files live next to the source unless told otherwise
    let base_dir = args
        .translations
        .clone()
        .or_else(|| args.source.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));

    let mut coverage_data: Vec<LocaleCoverage> = Vec::new();
    for locale in &args.lang {
        let locale_file = base_dir.join(format!("{locale}.json"));
        let translated_keys = if locale_file.exists() {
            phrase_keys(&locale_file)?
        } else {
            debug!(file = %locale_file.display(), "translation file missing");
            BTreeSet::new()
        };
        coverage_data.push(compare(locale, &source_keys, &translated_keys));
    }

    let any_incomplete = coverage_data.iter().any(|c| !c.missing.is_empty());

    if args.json {
        let json_data: Vec<CoverageJson> = coverage_data
            .iter()
            .map(|c| CoverageJson {
                locale: c.locale.clone(),
                translated: c.translated,
                total: source_count,
                missing: c.missing.clone(),
                extra: c.extra.clone(),
            })
            .collect();

        let json_output = serde_json::to_string_pretty(&json_data).into_diagnostic()?;
        println!("{json_output}");
    } else {
        let table = format_coverage_table(source_count, &coverage_data);
        println!("{table}");

        for locale_coverage in &coverage_data {
            if !locale_coverage.missing.is_empty() {
                println!("\nMissing in {}:", locale_coverage.locale);
                for key in &locale_coverage.missing {
                    println!("  - {key}");
                }
            }
        }
    }

    if args.strict && any_incomplete {
        Ok(exitcode::DATAERR)
    } else {
        Ok(exitcode::OK)
    }
}

/// Flattened phrase keys of a file.
fn phrase_keys(path: &Path) -> Result<BTreeSet<String>> {
    let tree = read_phrase_file(path)?;
    let flat: BTreeMap<String, String> =
        flatten(&locale_for(path), &tree).map_err(|e| miette!("{}: {e}", path.display()))?;
    Ok(flat.into_keys().collect())
}

/// Compare translated keys against source keys.
fn compare(
    locale: &str,
    source: &BTreeSet<String>,
    translated: &BTreeSet<String>,
) -> LocaleCoverage {
    LocaleCoverage {
        locale: locale.to_string(),
        translated: source.intersection(translated).count(),
        missing: source.difference(translated).cloned().collect(),
        extra: translated.difference(source).cloned().collect(),
    }
}
