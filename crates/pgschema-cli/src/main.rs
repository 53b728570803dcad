//! pgschema - split a PostgreSQL schema dump into per-schema files.

mod config;

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use pgschema_core::{
    tool, DumpMetadata, Layout, PsqlFunctionSource, SchemaDump, Splitter,
};

/// Split a PostgreSQL schema dump into per-schema files.
#[derive(Parser, Debug)]
#[command(name = "pgschema")]
#[command(version, about = "Split a PostgreSQL schema dump into per-schema files")]
pub struct Args {
    /// Directory to drop the schema files into
    #[arg(long)]
    pub directory: PathBuf,

    /// Database configuration file (TOML, see pgschema.sample.toml)
    #[arg(long)]
    pub configfile: PathBuf,

    /// Output layout
    #[arg(long, default_value = "flat", value_enum)]
    pub layout: LayoutArg,

    /// Do not query the server for versions or write metadata.json
    #[arg(long)]
    pub skip_metadata: bool,
}

/// Output layout for split files.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LayoutArg {
    /// One file per schema plus others.sql
    Flat,
    /// schema/<object_type>/<schema>/<object>.sql trees
    Tree,
}

impl From<LayoutArg> for Layout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Flat => Layout::Flat,
            LayoutArg::Tree => Layout::Tree,
        }
    }
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pgschema_cli=info,pgschema_core=info".into()),
        )
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = config::FileConfig::load(&args.configfile)?;
    let params = config.into_params();

    tracing::info!(
        host = %params.host,
        database = %params.dbname,
        directory = %args.directory.display(),
        layout = %Layout::from(args.layout),
        "starting schema dump"
    );

    // Resolve tool and server versions up front so a missing binary or an
    // unreachable server fails before any output is replaced.
    let versions = if args.skip_metadata {
        None
    } else {
        let pg_dump_version = tool::pg_dump_version()?;
        let server_version = tool::server_version(&params)?;
        tracing::info!(pg_dump = %pg_dump_version, server = %server_version, "resolved versions");
        Some((pg_dump_version, server_version))
    };

    let functions = PsqlFunctionSource::new(&params);
    let mut dump = SchemaDump::spawn(&params)?;
    let reader = dump.take_stdout()?;

    let splitter = Splitter::new(&args.directory, args.layout.into(), &functions)?;
    let report = splitter.split(reader)?;
    dump.finish()?;

    if let Some((pg_dump_version, server_version)) = versions {
        let metadata = DumpMetadata {
            server_version,
            host: params.host.clone(),
            database: params.dbname.clone(),
            pg_dump_version,
            warnings: report.warnings.clone(),
            generated_at: chrono::Utc::now(),
        };
        let path = metadata.write(&args.directory)?;
        tracing::info!(path = %path.display(), "metadata written");
    }

    for warning in &report.warnings {
        tracing::warn!("{}", warning);
    }
    tracing::info!(
        statements = report.statements,
        schemas = report.schemas.len(),
        warnings = report.warnings.len(),
        "schema parsed successfully"
    );

    Ok(())
}
