//! Artifact assembly
//!
//! Lays out the single-header artifact: optional generated-file warning, the
//! artifact's own guard, a metadata comment (banner, version, timestamp,
//! license), the sorted external includes, every transformed unit in resolved
//! order and the closing guard. The result is normalised to LF line endings
//! with no run of more than one blank line.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::config::AmalgamConfig;

pub const GENERATED_FILE_WARNING: &str = "\
============================================================================
WARNING: This file is auto-generated from multiple source headers.
Any changes made directly to this file may be overwritten.
For persistent modifications, please edit the original source headers and
re-run the amalgamation tool to regenerate this file.
============================================================================";

/// ISO 8601, UTC, second precision
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Guard symbol for the artifact, derived from its file name
pub fn header_guard(prefix: &str, file_name: &str) -> String {
    let name: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{}_{}", prefix, name)
}

/// Collapse every run of two or more blank (empty or whitespace-only) lines
/// to a single empty line. An isolated blank line is kept as written. The
/// result always ends with a newline unless it is empty.
pub fn collapse_blank_lines(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < lines.len() {
        let run = lines[i..]
            .iter()
            .take_while(|line| line.trim().is_empty())
            .count();
        if run > 1 {
            i += run;
        } else {
            out.push_str(lines[i]);
            i += 1;
        }
        out.push('\n');
    }

    out
}

/// Everything that goes into the metadata comment
#[derive(Debug, Clone, Default)]
pub struct ArtifactHeader<'a> {
    pub warning: bool,
    pub version: Option<&'a str>,
    pub generated_at: Option<DateTime<Utc>>,
    pub license: &'a str,
}

/// A unit's transformed content, ready to be emitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitContent {
    pub name: String,
    pub lines: Vec<String>,
}

pub struct Assembler<'a> {
    config: &'a AmalgamConfig,
}

impl<'a> Assembler<'a> {
    pub fn new(config: &'a AmalgamConfig) -> Self {
        Self { config }
    }

    pub fn assemble(
        &self,
        guard: &str,
        header: &ArtifactHeader<'_>,
        external: &BTreeSet<String>,
        units: &[UnitContent],
    ) -> String {
        let mut out: Vec<String> = Vec::new();

        if header.warning {
            out.extend(GENERATED_FILE_WARNING.lines().map(|line| format!("// {}", line)));
        }

        out.push(format!("#ifndef {}", guard));
        out.push(format!("#define {}", guard));
        out.push(String::new());

        out.push("/**".to_string());
        out.extend(self.config.banner.lines().map(comment_line));
        out.push(comment_line(""));
        if let Some(version) = header.version {
            out.push(comment_line(&format!("Version: {}", version)));
        }
        if let Some(generated_at) = header.generated_at {
            out.push(comment_line(&format!(
                "Generated: {}",
                generated_at.format(TIMESTAMP_FORMAT)
            )));
        }
        out.push(comment_line(""));
        out.push(comment_line("---"));
        out.push(comment_line(""));
        out.extend(header.license.lines().map(comment_line));
        out.push(" */".to_string());
        out.push(String::new());

        out.extend(external.iter().map(|name| format!("#include <{}>", name)));
        out.push(String::new());

        for unit in units {
            out.extend(unit.lines.iter().cloned());
            out.push(String::new());
        }

        out.push(format!("#endif // {}", guard));

        collapse_blank_lines(&out.join("\n"))
    }
}

fn comment_line(content: &str) -> String {
    if content.is_empty() {
        " *".to_string()
    } else {
        format!(" *  {}", content)
    }
}
