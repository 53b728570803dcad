//! Dump splitting orchestration.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::io::BufRead;
use std::path::Path;

use crate::classify::{classify, schema_of, Classified, ObjectKind, UtilityKind};
use crate::error::Error;
use crate::layout::{Layout, SplitWriter, OTHERS_SCHEMA};
use crate::segment::Segments;
use crate::tool::FunctionSource;

/// Outcome of one split run.
#[derive(Debug, Clone)]
pub struct SplitReport {
    /// Distinct schema names seen, sorted, excluding the reserved `others`
    /// group.
    pub schemas: Vec<String>,
    /// Number of statements processed.
    pub statements: usize,
    /// Problems that did not stop the run.
    pub warnings: Vec<String>,
}

/// Splits a schema dump stream into files under `<directory>/schema`.
pub struct Splitter<'a> {
    writer: SplitWriter,
    layout: Layout,
    functions: &'a dyn FunctionSource,
    schemas: BTreeSet<String>,
    statements: usize,
    warnings: Vec<String>,
}

impl<'a> Splitter<'a> {
    /// Create a splitter, clearing any previous split output.
    pub fn new(
        directory: &Path,
        layout: Layout,
        functions: &'a dyn FunctionSource,
    ) -> Result<Self, Error> {
        Ok(Self {
            writer: SplitWriter::create(directory)?,
            layout,
            functions,
            schemas: BTreeSet::new(),
            statements: 0,
            warnings: Vec::new(),
        })
    }

    /// Consume the dump stream and write split files.
    pub fn split<R: BufRead>(mut self, reader: R) -> Result<SplitReport, Error> {
        for stmt in Segments::new(reader) {
            let stmt = stmt?;
            self.place(&stmt)?;
        }
        tracing::debug!(
            statements = self.statements,
            schemas = self.schemas.len(),
            "split complete"
        );
        Ok(SplitReport {
            schemas: self.schemas.into_iter().collect(),
            statements: self.statements,
            warnings: self.warnings,
        })
    }

    fn place(&mut self, stmt: &str) -> Result<(), Error> {
        self.statements += 1;
        let placements = classify(stmt);
        if placements.is_empty() {
            self.warnings
                .push(format!("unclassified statement: {}", preamble(stmt)));
        }

        let content = self.resolve_function(stmt, &placements);

        match self.layout {
            Layout::Flat => match schema_of(stmt) {
                Some(schema) => {
                    self.schemas.insert(schema.to_string());
                    self.writer.append_flat(schema, &content)
                }
                None => self.writer.append_flat(OTHERS_SCHEMA, &content),
            },
            Layout::Tree => {
                if placements.is_empty() {
                    return self.writer.write_utility(UtilityKind::Unclassified, &content);
                }
                for placement in &placements {
                    match placement {
                        Classified::Object { kind, schema, name } => {
                            self.schemas.insert(schema.clone());
                            self.writer.write_object(*kind, schema, name, &content)?;
                        }
                        Classified::Utility(kind) => {
                            self.writer.write_utility(*kind, &content)?;
                        }
                    }
                }
                Ok(())
            }
        }
    }

    fn resolve_function<'s>(&mut self, stmt: &'s str, placements: &[Classified]) -> Cow<'s, str> {
        let target = placements.iter().find_map(|p| match p {
            Classified::Object {
                kind: ObjectKind::Functions,
                schema,
                name,
            } => Some((schema.clone(), name.clone())),
            _ => None,
        });
        let Some((schema, name)) = target else {
            return Cow::Borrowed(stmt);
        };
        match self.functions.function_def(&schema, &name) {
            Ok(Some(def)) => Cow::Owned(def),
            Ok(None) => Cow::Borrowed(stmt),
            Err(e) => {
                tracing::warn!(
                    schema = %schema,
                    function = %name,
                    error = %e,
                    "function definition fetch failed"
                );
                self.warnings.push(format!(
                    "could not fetch definition for function {}.{}: {}",
                    schema, name, e
                ));
                Cow::Borrowed(stmt)
            }
        }
    }
}

/// First line of a statement, truncated for warning messages.
fn preamble(stmt: &str) -> String {
    let first = stmt.lines().next().unwrap_or_default();
    if first.chars().count() > 80 {
        let head: String = first.chars().take(80).collect();
        format!("{}...", head)
    } else {
        first.to_string()
    }
}
