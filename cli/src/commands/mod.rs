pub mod interactive;
pub mod options;
pub mod render;

use std::{path::Path, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use resultados::{
    write_atomic_all, Archive, Choice, Dashboard, HttpFetcher, LoadOptions, Report, Selection, SourceCache, Sources,
};

use crate::cli::{Cli, FilterArgs};

/// Build the pipeline object from the global source flags.
pub(crate) fn dashboard(cli: &Cli) -> Result<Dashboard<HttpFetcher>> {
    let args = &cli.source;
    let sources = Sources {
        results: Archive::new(&args.results_url, &args.results_member),
        circuits: Archive::new(&args.circuits_url, &args.circuits_member),
    };
    let load = LoadOptions { chunk_rows: args.chunk_rows, district: args.load_district.clone() };
    let fetcher = HttpFetcher::with_timeout(args.timeout_secs.map(Duration::from_secs))
        .context("[cli] failed to build HTTP client")?;

    Ok(Dashboard::new(sources, load, Arc::new(SourceCache::new(fetcher))))
}

impl FilterArgs {
    pub(crate) fn selection(&self) -> Selection {
        Selection {
            district: parse_choice(&self.distrito),
            head_locality: parse_choice(&self.cabecera),
            office: self.cargo.clone(),
            circuit: parse_choice(&self.circuito),
        }
    }
}

pub(crate) fn parse_choice(value: &str) -> Choice {
    value.parse().unwrap_or_default()
}

/// Write the map, both tables, the HTML page and the JSON summary into `out_dir`, then print
/// the tables.
pub(crate) fn write_report(report: &Report, out_dir: &Path, width: f64, force: bool) -> Result<()> {
    let outputs = [
        ("mapa.svg", report.to_svg(width)?),
        ("porcentajes.csv", report.percentage_csv()?),
        ("totales.csv", report.totals_csv()?),
        ("index.html", report.to_html(width)?),
        ("resumen.json", report.to_json()?),
    ];
    let files: Vec<_> = outputs.iter().map(|(name, contents)| (out_dir.join(name), contents)).collect();
    write_atomic_all(&files, force)
        .with_context(|| format!("[cli] failed to write outputs to {}", out_dir.display()))?;
    for (path, _) in &files {
        log::info!("[cli] wrote {}", path.display());
    }

    println!("{}", report.title());
    if report.join.dropped() > 0 {
        println!(
            "({} circuits with votes but no boundary, {} boundaries without votes were left out)",
            report.join.votes_without_geometry, report.join.geometry_without_votes,
        );
    }
    println!("{}", report.percentage_table()?);
    println!("Porcentajes totales de votos por agrupación ({}):", report.office);
    println!("{}", report.totals_table()?);
    Ok(())
}
