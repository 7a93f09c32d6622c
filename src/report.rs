//! Markdown reports for `bitcomb stats`.

use bitcomb::{BitArray, Error, Result};
use itertools::Itertools;
use markdown_tables::{MarkdownTableRow, as_table};
use std::io::{BufWriter, Write};
use std::path::Path;

struct RunOption {
    option: String,
    value: String,
}

impl MarkdownTableRow for RunOption {
    fn column_names() -> Vec<&'static str> {
        vec!["Option", "Value"]
    }

    fn column_values(&self) -> Vec<String> {
        vec![self.option.clone(), self.value.clone()]
    }
}

struct LineRecord {
    line: usize,
    size: usize,
    words: usize,
    set: usize,
    last_set: Option<usize>,
    indices: String,
}

impl MarkdownTableRow for LineRecord {
    fn column_names() -> Vec<&'static str> {
        vec!["Line", "Size", "Words", "Set bits", "Highest set bit", "Set indices"]
    }

    fn column_values(&self) -> Vec<String> {
        vec![
            self.line.to_string(),
            self.size.to_string(),
            self.words.to_string(),
            self.set.to_string(),
            self.last_set.map_or_else(|| "-".to_string(), |bit| bit.to_string()),
            self.indices.clone(),
        ]
    }
}

struct PairRecord {
    first: usize,
    second: usize,
    relation: &'static str,
}

impl MarkdownTableRow for PairRecord {
    fn column_names() -> Vec<&'static str> {
        vec!["Line", "Line", "Relation"]
    }

    fn column_values(&self) -> Vec<String> {
        vec![
            self.first.to_string(),
            self.second.to_string(),
            self.relation.to_string(),
        ]
    }
}

/// Configuration echoed at the top of a report.
#[derive(Debug)]
pub struct ReportConfig {
    pub input_path: String,
    pub output_path: String,
}

macro_rules! write_err {
    ($path:expr) => {
        |e| Error::ReportWrite {
            path: $path.to_path_buf(),
            source: e,
        }
    };
}

/// Writes a report describing every parsed bit array and how equal-sized arrays relate.
pub fn write_report(
    path: impl AsRef<Path>,
    config: &ReportConfig,
    arrays: &[BitArray<'_>],
) -> Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path).map_err(write_err!(path))?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "# bitcomb statistics\n").map_err(write_err!(path))?;
    write_options_section(&mut writer, config, arrays.len(), path)?;
    write_arrays_section(&mut writer, arrays, path)?;
    write_relations_section(&mut writer, arrays, path)?;

    writer.flush().map_err(write_err!(path))?;
    Ok(())
}

fn write_options_section(
    writer: &mut impl Write,
    config: &ReportConfig,
    count: usize,
    path: &Path,
) -> Result<()> {
    let options = vec![
        RunOption {
            option: "Input".to_string(),
            value: config.input_path.clone(),
        },
        RunOption {
            option: "Output".to_string(),
            value: config.output_path.clone(),
        },
        RunOption {
            option: "Bit arrays".to_string(),
            value: count.to_string(),
        },
    ];
    writeln!(writer, "## Run options\n").map_err(write_err!(path))?;
    writeln!(writer, "{}", as_table(&options)).map_err(write_err!(path))
}

fn write_arrays_section(writer: &mut impl Write, arrays: &[BitArray<'_>], path: &Path) -> Result<()> {
    let records: Vec<LineRecord> = arrays
        .iter()
        .enumerate()
        .map(|(index, bits)| LineRecord {
            line: index + 1,
            size: bits.size(),
            words: bits.word_count(),
            set: bits.num_set(),
            last_set: bits.last_set_bit(),
            indices: bits.iter_set_bits().format(", ").to_string(),
        })
        .collect();
    writeln!(writer, "## Bit arrays\n").map_err(write_err!(path))?;
    writeln!(writer, "{}", as_table(&records)).map_err(write_err!(path))
}

fn write_relations_section(
    writer: &mut impl Write,
    arrays: &[BitArray<'_>],
    path: &Path,
) -> Result<()> {
    let records: Vec<PairRecord> = arrays
        .iter()
        .enumerate()
        .tuple_combinations()
        .filter(|((_, a), (_, b))| a.size() == b.size())
        .map(|((i, a), (j, b))| PairRecord {
            first: i + 1,
            second: j + 1,
            relation: relation(a, b),
        })
        .collect();

    writeln!(writer, "## Relations between equal-sized arrays\n").map_err(write_err!(path))?;
    if records.is_empty() {
        writeln!(writer, "No two arrays have the same size.").map_err(write_err!(path))
    } else {
        writeln!(writer, "{}", as_table(&records)).map_err(write_err!(path))
    }
}

fn relation(a: &BitArray<'_>, b: &BitArray<'_>) -> &'static str {
    match (a.is_subset(b), a.is_superset(b)) {
        (true, true) => "equal",
        (true, false) => "subset",
        (false, true) => "superset",
        (false, false) if a.intersects(b) => "overlapping",
        (false, false) => "disjoint",
    }
}
