//! Split output layouts and file writing.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::classify::{ObjectKind, UtilityKind};
use crate::error::Error;

/// Reserved schema name for statements not owned by a single schema.
pub const OTHERS_SCHEMA: &str = "others";

/// Name of the split output directory under the target directory.
pub const SCHEMA_DIR: &str = "schema";

/// Parent directory for utility statements in the tree layout.
const UTILITIES_DIR: &str = "utilities";

/// How split files are arranged on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// One `<schema>.sql` per schema plus `others.sql`.
    #[default]
    Flat,
    /// `<object_type>/<schema>/<object>.sql` trees.
    Tree,
}

impl std::fmt::Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Layout::Flat => write!(f, "flat"),
            Layout::Tree => write!(f, "tree"),
        }
    }
}

/// Make a schema or object name safe to use as a file name.
pub fn sanitize_name(name: &str) -> Result<String, Error> {
    if name.is_empty() {
        return Err(Error::InvalidName(name.to_string()));
    }
    Ok(name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect())
}

/// Writer for split schema files rooted at `<directory>/schema`.
#[derive(Debug)]
pub struct SplitWriter {
    root: PathBuf,
}

impl SplitWriter {
    /// Create a writer, removing any previous split output first.
    pub fn create(directory: &Path) -> Result<Self, Error> {
        let root = directory.join(SCHEMA_DIR);
        if root.exists() {
            fs::remove_dir_all(&root).map_err(|source| Error::io(&root, source))?;
        }
        fs::create_dir_all(&root).map_err(|source| Error::io(&root, source))?;
        Ok(Self { root })
    }

    /// Root of the split output.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Append a statement to a per-schema file (flat layout).
    pub fn append_flat(&self, schema: &str, stmt: &str) -> Result<(), Error> {
        let file = self.root.join(format!("{}.sql", sanitize_name(schema)?));
        append(&file, stmt)
    }

    /// Write a statement for a schema-qualified object (tree layout).
    pub fn write_object(
        &self,
        kind: ObjectKind,
        schema: &str,
        name: &str,
        stmt: &str,
    ) -> Result<(), Error> {
        let dir = self.root.join(kind.dir_name()).join(sanitize_name(schema)?);
        fs::create_dir_all(&dir).map_err(|source| Error::io(&dir, source))?;
        let file = dir.join(format!("{}.sql", sanitize_name(name)?));
        if kind.appends() {
            append_if_absent(&file, stmt)
        } else {
            fs::write(&file, stmt).map_err(|source| Error::io(&file, source))
        }
    }

    /// Append a utility statement under the reserved `others` schema
    /// (tree layout).
    pub fn write_utility(&self, kind: UtilityKind, stmt: &str) -> Result<(), Error> {
        let dir = self.root.join(UTILITIES_DIR).join(OTHERS_SCHEMA);
        fs::create_dir_all(&dir).map_err(|source| Error::io(&dir, source))?;
        let file = dir.join(format!("{}.sql", kind.file_name()));
        append_if_absent(&file, stmt)
    }
}

fn append(path: &Path, stmt: &str) -> Result<(), Error> {
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| Error::io(path, source))?;
    file.write_all(stmt.as_bytes())
        .map_err(|source| Error::io(path, source))
}

/// Append only when the exact statement is not already present, so that
/// accumulated files never hold duplicates.
fn append_if_absent(path: &Path, stmt: &str) -> Result<(), Error> {
    if path.exists() {
        let current = fs::read_to_string(path).map_err(|source| Error::io(path, source))?;
        if current.contains(stmt) {
            return Ok(());
        }
    }
    append(path, stmt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("app").unwrap(), "app");
        assert_eq!(sanitize_name("audit_2024").unwrap(), "audit_2024");
        assert_eq!(sanitize_name("weird name/..").unwrap(), "weird_name___");
        assert!(sanitize_name("").is_err());
    }

    #[test]
    fn test_create_removes_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let stale = dir.path().join(SCHEMA_DIR).join("stale.sql");
        fs::create_dir_all(stale.parent().unwrap()).unwrap();
        fs::write(&stale, "leftover").unwrap();

        let writer = SplitWriter::create(dir.path()).unwrap();
        assert!(!stale.exists());
        assert!(writer.root().exists());
    }

    #[test]
    fn test_append_flat_accumulates_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let writer = SplitWriter::create(dir.path()).unwrap();
        writer.append_flat("app", "CREATE TABLE app.a ();\n").unwrap();
        writer.append_flat("app", "CREATE TABLE app.b ();\n").unwrap();

        let content = fs::read_to_string(writer.root().join("app.sql")).unwrap();
        assert_eq!(content, "CREATE TABLE app.a ();\nCREATE TABLE app.b ();\n");
    }

    #[test]
    fn test_write_object_create_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let writer = SplitWriter::create(dir.path()).unwrap();
        writer
            .write_object(ObjectKind::Tables, "app", "users", "CREATE TABLE app.users (a);\n")
            .unwrap();
        writer
            .write_object(ObjectKind::Tables, "app", "users", "CREATE TABLE app.users (b);\n")
            .unwrap();

        let file = writer.root().join("tables").join("app").join("users.sql");
        assert_eq!(fs::read_to_string(file).unwrap(), "CREATE TABLE app.users (b);\n");
    }

    #[test]
    fn test_write_object_append_deduplicates() {
        let dir = tempfile::tempdir().unwrap();
        let writer = SplitWriter::create(dir.path()).unwrap();
        let stmt = "ALTER TABLE ONLY app.users ADD CONSTRAINT users_pkey PRIMARY KEY (id);\n";
        writer
            .write_object(ObjectKind::Constraints, "app", "users", stmt)
            .unwrap();
        writer
            .write_object(ObjectKind::Constraints, "app", "users", stmt)
            .unwrap();
        writer
            .write_object(ObjectKind::Constraints, "app", "users", "ALTER TABLE ONLY app.users ADD CONSTRAINT users_email_key UNIQUE (email);\n")
            .unwrap();

        let file = writer.root().join("constraints").join("app").join("users.sql");
        let content = fs::read_to_string(file).unwrap();
        assert_eq!(content.matches("users_pkey").count(), 1);
        assert!(content.contains("users_email_key"));
    }

    #[test]
    fn test_write_utility_groups_under_others() {
        let dir = tempfile::tempdir().unwrap();
        let writer = SplitWriter::create(dir.path()).unwrap();
        writer
            .write_utility(UtilityKind::Schemas, "CREATE SCHEMA app;\n")
            .unwrap();
        writer
            .write_utility(UtilityKind::Schemas, "CREATE SCHEMA audit;\n")
            .unwrap();

        let file = writer
            .root()
            .join("utilities")
            .join(OTHERS_SCHEMA)
            .join("schemas.sql");
        let content = fs::read_to_string(file).unwrap();
        assert_eq!(content, "CREATE SCHEMA app;\nCREATE SCHEMA audit;\n");
    }
}
