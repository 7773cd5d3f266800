use anyhow::Result;

pub fn run(cli: &crate::cli::Cli) -> Result<()> {
    let mut dashboard = super::dashboard(cli)?;
    let options = dashboard.options()?;

    let sections = [
        ("distrito", &options.districts),
        ("cargo", &options.offices),
        ("cabecera", &options.head_localities),
        ("circuito", &options.circuits),
    ];
    for (name, values) in sections {
        println!("{name} ({}):", values.len());
        for value in values {
            println!("  {value}");
        }
    }

    Ok(())
}
