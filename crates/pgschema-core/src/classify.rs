//! Statement classification.
//!
//! The leading keywords of a dump statement decide its object type; the
//! first `<schema>.<name>` pair after them decides where it lands. Index,
//! extension, and function statements name their target in positions the
//! general pattern does not cover and get their own extraction rules.

use once_cell::sync::Lazy;
use regex::Regex;

/// Schema-qualified object categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Tables,
    ClusteredIndexes,
    Constraints,
    Defaults,
    Partitions,
    Indexes,
    Views,
    MaterializedViews,
    ForeignTables,
    Aggregates,
    Functions,
    Types,
    Sequences,
    Triggers,
    Rules,
    Grants,
    Comments,
    Extensions,
}

impl ObjectKind {
    /// Directory name in the tree layout.
    pub fn dir_name(self) -> &'static str {
        match self {
            ObjectKind::Tables => "tables",
            ObjectKind::ClusteredIndexes => "clustered_indexes",
            ObjectKind::Constraints => "constraints",
            ObjectKind::Defaults => "defaults",
            ObjectKind::Partitions => "partitions",
            ObjectKind::Indexes => "indexes",
            ObjectKind::Views => "views",
            ObjectKind::MaterializedViews => "materialized_views",
            ObjectKind::ForeignTables => "foreign_tables",
            ObjectKind::Aggregates => "aggregates",
            ObjectKind::Functions => "functions",
            ObjectKind::Types => "types",
            ObjectKind::Sequences => "sequences",
            ObjectKind::Triggers => "triggers",
            ObjectKind::Rules => "rules",
            ObjectKind::Grants => "grants",
            ObjectKind::Comments => "comments",
            ObjectKind::Extensions => "extensions",
        }
    }

    /// Whether statements of this kind accumulate in their file instead of
    /// replacing it. ALTER-style statements pile up against one object;
    /// CREATE-style statements define it.
    pub fn appends(self) -> bool {
        matches!(
            self,
            ObjectKind::ClusteredIndexes
                | ObjectKind::Constraints
                | ObjectKind::Defaults
                | ObjectKind::Partitions
                | ObjectKind::Triggers
                | ObjectKind::Rules
                | ObjectKind::Grants
                | ObjectKind::Comments
        )
    }
}

/// Statements that are not tied to a single schema-qualified object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UtilityKind {
    Schemas,
    Ownerships,
    Grants,
    Comments,
    Servers,
    Events,
    Mappings,
    Publications,
    Subscriptions,
    Unclassified,
}

impl UtilityKind {
    /// File stem in the catch-all group.
    pub fn file_name(self) -> &'static str {
        match self {
            UtilityKind::Schemas => "schemas",
            UtilityKind::Ownerships => "ownerships",
            UtilityKind::Grants => "grants",
            UtilityKind::Comments => "comments",
            UtilityKind::Servers => "servers",
            UtilityKind::Events => "events",
            UtilityKind::Mappings => "mappings",
            UtilityKind::Publications => "publications",
            UtilityKind::Subscriptions => "subscriptions",
            UtilityKind::Unclassified => "unclassified",
        }
    }
}

/// A single placement for a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classified {
    /// Statement owned by a schema-qualified object.
    Object {
        kind: ObjectKind,
        schema: String,
        name: String,
    },
    /// Statement grouped under the reserved `others` schema.
    Utility(UtilityKind),
}

static QUALIFIED_TARGET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(CREATE.*TABLE|COMMENT ON \w+|CREATE AGGREGATE|CREATE.*VIEW|CREATE TYPE|CREATE SEQUENCE|ALTER TABLE \w+|ALTER TABLE|GRANT.*ON \w+|REVOKE.*ON \w+|.*TRIGGER.*?ON|.*RULE.*\n.*?ON.*) (\w+)\.(\w+)",
    )
    .expect("qualified target pattern")
});

static INDEX_TARGET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^CREATE .*INDEX (\w+) ON (\w+)\.(\w+)").expect("index target pattern"));

static EXTENSION_TARGET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^CREATE EXTENSION.* (\w+) WITH SCHEMA (\w+)").expect("extension target pattern")
});

static FUNCTION_TARGET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^CREATE FUNCTION (\w+)\.(\w+)").expect("function target pattern"));

static QUALIFIED_PAIR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\w+\.\w+").expect("qualified pair pattern"));

/// Schema owning a statement, when one can be extracted.
pub fn schema_of(stmt: &str) -> Option<&str> {
    if let Some(caps) = FUNCTION_TARGET.captures(stmt) {
        return caps.get(1).map(|m| m.as_str());
    }
    if let Some(caps) = INDEX_TARGET.captures(stmt) {
        return caps.get(2).map(|m| m.as_str());
    }
    if let Some(caps) = EXTENSION_TARGET.captures(stmt) {
        return caps.get(2).map(|m| m.as_str());
    }
    QUALIFIED_TARGET
        .captures(stmt)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str())
}

fn qualified_target(stmt: &str) -> Option<(String, String)> {
    let caps = QUALIFIED_TARGET.captures(stmt)?;
    Some((caps.get(2)?.as_str().to_string(), caps.get(3)?.as_str().to_string()))
}

fn push_object(out: &mut Vec<Classified>, stmt: &str, kind: ObjectKind) {
    if let Some((schema, name)) = qualified_target(stmt) {
        out.push(Classified::Object { kind, schema, name });
    }
}

/// Classify a statement into zero or more placements.
///
/// A statement can land in more than one group (a sequence created with
/// OWNED BY is both a sequence and an ownership); an empty result means no
/// rule recognized the statement.
pub fn classify(stmt: &str) -> Vec<Classified> {
    let mut out = Vec::new();

    if stmt.starts_with("CREATE TABLE") {
        push_object(&mut out, stmt, ObjectKind::Tables);
    }
    if stmt.starts_with("ALTER TABLE") && stmt.contains("CLUSTER ON") {
        push_object(&mut out, stmt, ObjectKind::ClusteredIndexes);
    }
    if stmt.starts_with("ALTER TABLE") && stmt.contains("ADD CONSTRAINT") {
        push_object(&mut out, stmt, ObjectKind::Constraints);
    }
    if stmt.starts_with("ALTER TABLE") && stmt.contains("SET DEFAULT") {
        push_object(&mut out, stmt, ObjectKind::Defaults);
    }
    if stmt.starts_with("ALTER TABLE")
        && (stmt.contains("ATTACH PARTITION") || stmt.contains("INHERIT"))
    {
        push_object(&mut out, stmt, ObjectKind::Partitions);
    }
    if stmt.starts_with("CREATE INDEX") || stmt.starts_with("CREATE UNIQUE INDEX") {
        if let Some(caps) = INDEX_TARGET.captures(stmt) {
            out.push(Classified::Object {
                kind: ObjectKind::Indexes,
                schema: caps[2].to_string(),
                name: caps[1].to_string(),
            });
        }
    }
    if stmt.starts_with("CREATE VIEW") {
        push_object(&mut out, stmt, ObjectKind::Views);
    }
    if stmt.starts_with("CREATE MATERIALIZED VIEW") {
        push_object(&mut out, stmt, ObjectKind::MaterializedViews);
    }
    if stmt.starts_with("CREATE FOREIGN TABLE") {
        push_object(&mut out, stmt, ObjectKind::ForeignTables);
    }
    if stmt.starts_with("CREATE AGGREGATE") {
        push_object(&mut out, stmt, ObjectKind::Aggregates);
    }
    if stmt.starts_with("CREATE FUNCTION") {
        if let Some(caps) = FUNCTION_TARGET.captures(stmt) {
            out.push(Classified::Object {
                kind: ObjectKind::Functions,
                schema: caps[1].to_string(),
                name: caps[2].to_string(),
            });
        }
    }
    if stmt.starts_with("CREATE TYPE") {
        push_object(&mut out, stmt, ObjectKind::Types);
    }
    if stmt.starts_with("CREATE SEQUENCE") {
        push_object(&mut out, stmt, ObjectKind::Sequences);
    }
    if stmt.starts_with("CREATE TRIGGER")
        || stmt.starts_with("CREATE CONSTRAINT TRIGGER")
        || stmt.starts_with("ALTER TRIGGER")
    {
        push_object(&mut out, stmt, ObjectKind::Triggers);
    }
    if stmt.starts_with("CREATE RULE") {
        push_object(&mut out, stmt, ObjectKind::Rules);
    }
    if stmt.starts_with("CREATE SCHEMA") {
        out.push(Classified::Utility(UtilityKind::Schemas));
    }
    if stmt.contains("OWNER TO") || stmt.contains("OWNED BY") {
        out.push(Classified::Utility(UtilityKind::Ownerships));
    }
    let has_grant = stmt.contains("GRANT") || stmt.contains("REVOKE");
    if has_grant && QUALIFIED_PAIR.is_match(stmt) {
        push_object(&mut out, stmt, ObjectKind::Grants);
    }
    if has_grant && !QUALIFIED_PAIR.is_match(stmt) {
        out.push(Classified::Utility(UtilityKind::Grants));
    }
    if stmt.starts_with("CREATE EXTENSION") {
        if let Some(caps) = EXTENSION_TARGET.captures(stmt) {
            out.push(Classified::Object {
                kind: ObjectKind::Extensions,
                schema: caps[2].to_string(),
                name: caps[1].to_string(),
            });
        }
    }
    if stmt.starts_with("CREATE SERVER") {
        out.push(Classified::Utility(UtilityKind::Servers));
    }
    if stmt.starts_with("COMMENT") && QUALIFIED_PAIR.is_match(stmt) {
        push_object(&mut out, stmt, ObjectKind::Comments);
    }
    if stmt.starts_with("COMMENT") && !QUALIFIED_PAIR.is_match(stmt) {
        out.push(Classified::Utility(UtilityKind::Comments));
    }
    if stmt.starts_with("CREATE EVENT TRIGGER") {
        out.push(Classified::Utility(UtilityKind::Events));
    }
    if stmt.starts_with("CREATE USER MAPPING") {
        out.push(Classified::Utility(UtilityKind::Mappings));
    }
    if stmt.starts_with("CREATE PUBLICATION") {
        out.push(Classified::Utility(UtilityKind::Publications));
    }
    if stmt.starts_with("ALTER PUBLICATION") && !stmt.contains("OWNER TO") {
        out.push(Classified::Utility(UtilityKind::Publications));
    }
    if stmt.starts_with("CREATE SUBSCRIPTION") {
        out.push(Classified::Utility(UtilityKind::Subscriptions));
    }
    if stmt.starts_with("ALTER SUBSCRIPTION") && !stmt.contains("OWNER TO") {
        out.push(Classified::Utility(UtilityKind::Subscriptions));
    }

    out
}
