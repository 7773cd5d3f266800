//! Single-page HTML report: title, inline map, percentage and totals tables.
//! Deterministic and offline; no external assets.

use crate::{dashboard::Report, error::Result, io::svg::escape};

const STYLE: &str = "body{font-family:sans-serif;margin:24px;color:#111827}\
table{border-collapse:collapse;margin:12px 0}\
th,td{border:1px solid #d1d5db;padding:4px 8px;text-align:right}\
th:first-child,td:first-child{text-align:left}\
.warn{color:#92400e}";

struct Html {
    buf: String,
}

impl Html {
    fn new() -> Self { Self { buf: String::with_capacity(64 * 1024) } }
    fn push<S: AsRef<str>>(&mut self, s: S) { self.buf.push_str(s.as_ref()); }
    fn finish(self) -> String { self.buf }
}

/// Render `report` around an already rendered SVG map.
pub(crate) fn render_report(report: &Report, svg: &str) -> Result<String> {
    let mut w = Html::new();
    let title = escape(&report.title());

    w.push("<!DOCTYPE html><html lang=\"es\"><head><meta charset=\"utf-8\"><title>");
    w.push(&title);
    w.push("</title><style>");
    w.push(STYLE);
    w.push("</style></head><body>");
    w.push(format!("<h1>{title}</h1>"));

    // Inline SVG must not carry its own XML declaration.
    let body = svg.find("<svg").map_or(svg, |start| &svg[start..]);
    w.push(body);

    warnings(&mut w, report);
    percentage_table(&mut w, report);
    totals_table(&mut w, report);

    w.push("</body></html>\n");
    Ok(w.finish())
}

fn warnings(w: &mut Html, report: &Report) {
    let join = &report.join;
    if join.dropped() == 0 && report.degenerate.is_empty() { return }

    w.push("<ul class=\"warn\">");
    if join.votes_without_geometry > 0 {
        w.push(format!("<li>{} circuito(s) con votos sin geometría</li>", join.votes_without_geometry));
    }
    if join.geometry_without_votes > 0 {
        w.push(format!("<li>{} circuito(s) sin votos para este cargo</li>", join.geometry_without_votes));
    }
    if !report.degenerate.is_empty() {
        let keys = report.degenerate.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
        w.push(format!("<li>Circuitos sin votos emitidos: {}</li>", escape(&keys)));
    }
    w.push("</ul>");
}

fn percentage_table(w: &mut Html, report: &Report) {
    w.push("<h2>Porcentaje de votos por circuito</h2><table><thead><tr><th>circuito</th>");
    for party in &report.parties {
        w.push(format!("<th>{}</th>", escape(party)));
    }
    w.push("</tr></thead><tbody>");
    for circuit in &report.circuits {
        w.push(format!("<tr><td>{}</td>", escape(&circuit.circuit_id().to_string())));
        for party in &report.parties {
            let pct = circuit.result.tallies.iter()
                .find(|t| &t.party == party)
                .map_or(0.0, |t| t.percentage);
            w.push(format!("<td>{pct:.2}</td>"));
        }
        w.push("</tr>");
    }
    w.push("</tbody></table>");
}

fn totals_table(w: &mut Html, report: &Report) {
    let scope = report.head_locality.as_option().unwrap_or("Todas");
    w.push(format!(
        "<h2>Porcentajes totales de votos por agrupación en {} ({})</h2>",
        escape(scope), escape(&report.office),
    ));
    w.push("<table><thead><tr><th>agrupación</th><th>votos</th><th>% de Votos</th></tr></thead><tbody>");
    for total in &report.totals {
        w.push(format!(
            "<tr><td>{}</td><td>{}</td><td>{:.2}</td></tr>",
            escape(&total.party), total.votes, total.percentage,
        ));
    }
    w.push("</tbody></table>");
}
