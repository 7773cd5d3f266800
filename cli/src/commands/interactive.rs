use std::io::{self, BufRead, Write};

use anyhow::{bail, Result};
use resultados::Selection;

use super::parse_choice;

const HELP: &str = "\
Enter filters as `key=value` pairs separated by ';', e.g.
  cargo=PRESIDENTE Y VICE; cabecera=La Plata; circuito=Todos
Keys: cargo, distrito, cabecera, circuito. Unmentioned filters keep their value.
Commands: options, help, quit";

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::InteractiveArgs) -> Result<()> {
    let out_dir = args.output.clone().unwrap_or(".".into());
    let mut dashboard = super::dashboard(cli)?;
    let mut selection = Selection::default();

    println!("{HELP}");
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 { break }

        match line.trim() {
            "" => continue,
            "quit" | "exit" => break,
            "help" => { println!("{HELP}"); continue }
            "options" => {
                match dashboard.options() {
                    Ok(options) => {
                        println!("cargo: {}", options.offices.join(" | "));
                        println!("distrito: {}", options.districts.join(" | "));
                        println!("cabecera: {}", options.head_localities.join(" | "));
                        println!("circuitos: {}", options.circuits.len());
                    }
                    Err(e) => eprintln!("error: {e}"),
                }
                continue;
            }
            input => {
                let mut next = selection.clone();
                if let Err(e) = apply(&mut next, input) {
                    eprintln!("error: {e}");
                    continue;
                }
                selection = next;
            }
        }

        // A failed render keeps the previous outputs on disk.
        match dashboard.render(&selection) {
            Ok(report) => {
                if let Err(e) = super::write_report(report, &out_dir, args.width, true) {
                    eprintln!("error: {e:#}");
                }
            }
            Err(e) => eprintln!("error: {e}"),
        }
    }

    Ok(())
}

/// Update `selection` from `key=value; key=value`.
fn apply(selection: &mut Selection, input: &str) -> Result<()> {
    for pair in input.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("expected key=value, got '{pair}'");
        };
        let value = value.trim();
        match key.trim().to_lowercase().as_str() {
            "cargo" => selection.office = (!value.is_empty()).then(|| value.to_string()),
            "distrito" => selection.district = parse_choice(value),
            "cabecera" => selection.head_locality = parse_choice(value),
            "circuito" => selection.circuit = parse_choice(value),
            other => bail!("unknown filter '{other}'"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use resultados::Choice;

    #[test]
    fn updates_only_mentioned_filters() {
        let mut selection = Selection::default();
        apply(&mut selection, "cargo=PRESIDENTE Y VICE; cabecera = La Plata").unwrap();
        assert_eq!(selection.office.as_deref(), Some("PRESIDENTE Y VICE"));
        assert_eq!(selection.head_locality, Choice::Only("La Plata".into()));

        apply(&mut selection, "circuito=0012").unwrap();
        assert_eq!(selection.circuit, Choice::Only("0012".into()));
        assert_eq!(selection.head_locality, Choice::Only("La Plata".into()));

        apply(&mut selection, "cabecera=Todas").unwrap();
        assert_eq!(selection.head_locality, Choice::All);
    }

    #[test]
    fn rejects_unknown_keys() {
        let mut selection = Selection::default();
        assert!(apply(&mut selection, "partido=X").is_err());
        assert!(apply(&mut selection, "cargo").is_err());
    }
}
