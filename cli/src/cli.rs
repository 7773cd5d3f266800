use std::path::PathBuf;

use resultados::{CIRCUITS_MEMBER, CIRCUITS_URL, RESULTS_MEMBER, RESULTS_URL};

/// Circuit maps and vote tables for the 2023 general election
#[derive(clap::Parser, Debug)]
#[command(name = "resultados", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(flatten)]
    pub source: SourceArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Args, Debug)]
pub struct SourceArgs {
    /// ZIP archive with the election results CSV
    #[arg(long, default_value = RESULTS_URL, global = true)]
    pub results_url: String,

    /// Path of the CSV inside the results archive
    #[arg(long, default_value = RESULTS_MEMBER, global = true)]
    pub results_member: String,

    /// ZIP archive with the circuit boundaries GeoJSON
    #[arg(long, default_value = CIRCUITS_URL, global = true)]
    pub circuits_url: String,

    /// Path of the GeoJSON inside the circuits archive
    #[arg(long, default_value = CIRCUITS_MEMBER, global = true)]
    pub circuits_member: String,

    /// Parse the results CSV this many rows at a time
    #[arg(long, global = true)]
    pub chunk_rows: Option<usize>,

    /// Keep only vote rows of this district while loading
    #[arg(long, global = true)]
    pub load_district: Option<String>,

    /// Overall timeout for each download, in seconds (client default: 30)
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// List the values accepted by each filter
    Options,

    /// Render the map and tables for one selection
    Render(RenderArgs),

    /// Read selections from stdin and re-render after each one
    Interactive(InteractiveArgs),
}

#[derive(clap::Args, Debug)]
pub struct FilterArgs {
    /// Office (cargo_nombre); defaults to the first one in the data
    #[arg(long)]
    pub cargo: Option<String>,

    /// District (distrito_nombre), or "Todas"
    #[arg(long, default_value = "Todas")]
    pub distrito: String,

    /// Head locality (cabecera), or "Todas"
    #[arg(long, default_value = "Todas")]
    pub cabecera: String,

    /// Circuit id, or "Todos"
    #[arg(long, default_value = "Todos")]
    pub circuito: String,
}

#[derive(clap::Args, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// Output directory, defaults to "."
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Overwrite existing output files
    #[arg(long)]
    pub force: bool,

    /// Map width in pixels
    #[arg(long, default_value_t = 1200.0)]
    pub width: f64,
}

#[derive(clap::Args, Debug)]
pub struct InteractiveArgs {
    /// Output directory, defaults to "."
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Map width in pixels
    #[arg(long, default_value_t = 1200.0)]
    pub width: f64,
}
