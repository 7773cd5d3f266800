use anyhow::Result;

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::RenderArgs) -> Result<()> {
    let out_dir = args.output.clone().unwrap_or(".".into());
    let selection = args.filters.selection();

    let mut dashboard = super::dashboard(cli)?;
    let report = dashboard.render(&selection)?;

    super::write_report(report, &out_dir, args.width, args.force)
}
