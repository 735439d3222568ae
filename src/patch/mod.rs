//! Idempotent patching of a Django settings module
//!
//! Three independent steps run against one in-memory buffer, each guarded
//! by a containment check for the text it would add:
//!
//! 1. append the CORS / REST framework block when the CORS marker is absent
//! 2. append the configured apps to the installed applications list
//! 3. prepend the CORS middleware to the middleware list
//!
//! Running the patcher on its own output changes nothing.

mod block;

pub use block::render_cors_block;

use serde::Serialize;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::settings::{line_of, ListLiteral, SettingsDocument};

const ENTRY_INDENT: &str = "    ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    CorsBlock,
    InstalledApps,
    Middleware,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::CorsBlock => write!(f, "CORS block"),
            Step::InstalledApps => write!(f, "installed apps"),
            Step::Middleware => write!(f, "middleware"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Text was inserted starting on `line`
    Applied { line: usize },
    AlreadyPresent,
    /// The target list literal does not exist
    ListNotFound { list: String },
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied { .. })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Applied { line } => write!(f, "applied (line {})", line),
            Outcome::AlreadyPresent => write!(f, "already present"),
            Outcome::ListNotFound { list } => write!(f, "{} not found", list),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub step: Step,
    pub outcome: Outcome,
}

/// Result of patching a text buffer
#[derive(Debug, Clone)]
pub struct Patched {
    pub text: String,
    pub steps: Vec<StepReport>,
}

impl Patched {
    pub fn changed(&self) -> bool {
        self.steps.iter().any(|s| s.outcome.is_applied())
    }
}

/// Result of patching a settings file on disk
#[derive(Debug, Clone, Serialize)]
pub struct PatchReport {
    pub path: PathBuf,
    pub steps: Vec<StepReport>,
    pub changed: bool,
    /// Whether the file was rewritten (false on dry runs and no-ops)
    pub written: bool,
}

impl PatchReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Write,
    DryRun,
}

pub struct Patcher<'a> {
    config: &'a Config,
}

impl<'a> Patcher<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Run all steps against `text`
    pub fn patch_text(&self, text: &str) -> Result<Patched> {
        let mut buffer = text.to_string();
        let eol = line_ending(text);
        let mut results: Vec<(Step, Edit)> = Vec::with_capacity(3);

        for step in [Step::CorsBlock, Step::InstalledApps, Step::Middleware] {
            let before = buffer.len();
            let edit = match step {
                Step::CorsBlock => self.append_cors_block(&mut buffer, eol)?,
                Step::InstalledApps => self.add_installed_apps(&mut buffer, eol)?,
                Step::Middleware => self.add_middleware(&mut buffer, eol)?,
            };

            // Keep earlier anchors pointing into the final text
            if let Edit::Inserted { start, .. } = edit {
                let growth = buffer.len() - before;
                for (_, earlier) in results.iter_mut() {
                    if let Edit::Inserted { anchor, .. } = earlier {
                        if *anchor >= start {
                            *anchor += growth;
                        }
                    }
                }
            }
            results.push((step, edit));
        }

        let steps: Vec<StepReport> = results
            .into_iter()
            .map(|(step, edit)| StepReport {
                step,
                outcome: match edit {
                    Edit::Inserted { anchor, .. } => Outcome::Applied {
                        line: line_of(&buffer, anchor),
                    },
                    Edit::Skipped(outcome) => outcome,
                },
            })
            .collect();

        for report in &steps {
            tracing::info!("{}: {}", report.step, report.outcome);
        }

        Ok(Patched {
            text: buffer,
            steps,
        })
    }

    /// Patch the settings file at `path` in place
    pub fn patch_file(&self, path: &Path, mode: WriteMode) -> Result<PatchReport> {
        let original = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::SettingsNotFound(path.to_path_buf()),
            _ => Error::Io(e),
        })?;

        let patched = self.patch_text(&original)?;
        let changed = patched.changed();
        let written = changed && mode == WriteMode::Write;

        if written {
            fs::write(path, &patched.text)?;
            tracing::info!("Wrote {:?}", path);
        } else {
            tracing::debug!("Left {:?} untouched", path);
        }

        Ok(PatchReport {
            path: path.to_path_buf(),
            steps: patched.steps,
            changed,
            written,
        })
    }

    fn append_cors_block(&self, buffer: &mut String, eol: &str) -> Result<Edit> {
        if buffer.contains(&self.config.cors.marker) {
            return Ok(Edit::Skipped(Outcome::AlreadyPresent));
        }

        let mut block = render_cors_block(self.config)?;
        if eol != "\n" {
            block = block.replace('\n', eol);
        }
        let start = buffer.len();
        let blank_lines = block.len() - block.trim_start_matches(|c| c == '\r' || c == '\n').len();
        buffer.push_str(&block);
        Ok(Edit::Inserted {
            start,
            anchor: start + blank_lines,
        })
    }

    fn add_installed_apps(&self, buffer: &mut String, eol: &str) -> Result<Edit> {
        let apps = &self.config.installed_apps;
        let Some(guard) = apps.guard() else {
            return Ok(Edit::Skipped(Outcome::AlreadyPresent));
        };

        if buffer.contains(&format!("\"{}\"", guard)) || buffer.contains(&format!("'{}'", guard)) {
            return Ok(Edit::Skipped(Outcome::AlreadyPresent));
        }

        let Some(list) = SettingsDocument::parse(buffer).find_list(&apps.list)? else {
            return Ok(Edit::Skipped(Outcome::ListNotFound {
                list: apps.list.clone(),
            }));
        };

        let indent = entry_indent(buffer, &list, list.last_item);
        let entries: String = apps
            .apps
            .iter()
            .map(|app| format!("{}\"{}\",{}", indent, app, eol))
            .collect();

        let (patched, anchor) = append_to_list(buffer, &list, &entries, eol);
        *buffer = patched;
        Ok(Edit::Inserted {
            start: list.open + 1,
            anchor,
        })
    }

    fn add_middleware(&self, buffer: &mut String, eol: &str) -> Result<Edit> {
        let middleware = &self.config.middleware;
        if buffer.contains(&middleware.class_name) {
            return Ok(Edit::Skipped(Outcome::AlreadyPresent));
        }

        let Some(list) = SettingsDocument::parse(buffer).find_list(&middleware.list)? else {
            return Ok(Edit::Skipped(Outcome::ListNotFound {
                list: middleware.list.clone(),
            }));
        };

        let indent = entry_indent(buffer, &list, list.first_item);
        let entry = format!("{}{}\"{}\",", eol, indent, middleware.class_name);
        buffer.insert_str(list.open + 1, &entry);
        Ok(Edit::Inserted {
            start: list.open + 1,
            anchor: list.open + 1 + eol.len(),
        })
    }
}

/// What a single step did to the buffer
enum Edit {
    /// Text was inserted; `start` is where the buffer first changed and
    /// `anchor` is where the inserted content begins
    Inserted { start: usize, anchor: usize },
    Skipped(Outcome),
}

/// Insert `entries` before the closing bracket of `list`.
///
/// A missing comma after the last element is added, and when the closing
/// bracket sits on its own line the entries go above it so its indentation
/// is kept. Returns the new text and the offset of the first entry.
fn append_to_list(source: &str, list: &ListLiteral, entries: &str, eol: &str) -> (String, usize) {
    let close_line = line_start(source, list.close);
    let bracket_on_own_line = source[close_line..list.close].trim().is_empty();
    let insert_at = if bracket_on_own_line {
        close_line
    } else {
        list.close
    };

    let mut out = String::with_capacity(source.len() + entries.len() + 2);
    match list.unterminated_tail {
        Some(tail) => {
            out.push_str(&source[..tail]);
            out.push(',');
            out.push_str(&source[tail..insert_at]);
        }
        None => out.push_str(&source[..insert_at]),
    }
    if !bracket_on_own_line {
        out.push_str(eol);
    }
    let at = out.len();
    out.push_str(entries);
    out.push_str(&source[insert_at..]);

    (out, at)
}

/// Indentation for a new entry: copied from `item` when it starts its own
/// line, otherwise one level deeper than the assignment
fn entry_indent(source: &str, list: &ListLiteral, item: Option<usize>) -> String {
    let is_indent = |c: char| c == ' ' || c == '\t';

    if let Some(at) = item {
        let prefix = &source[line_start(source, at)..at];
        if prefix.chars().all(is_indent) {
            return prefix.to_string();
        }
    }

    let base: String = source[line_start(source, list.open)..]
        .chars()
        .take_while(|&c| is_indent(c))
        .collect();
    format!("{}{}", base, ENTRY_INDENT)
}

fn line_start(source: &str, offset: usize) -> usize {
    source[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0)
}

/// `\r\n` when the text already uses it, otherwise `\n`
fn line_ending(text: &str) -> &'static str {
    if text.contains("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}

/// Patch `path` with the default configuration
pub fn patch_settings(path: impl AsRef<Path>) -> Result<PatchReport> {
    let config = Config::default();
    Patcher::new(&config).patch_file(path.as_ref(), WriteMode::Write)
}
