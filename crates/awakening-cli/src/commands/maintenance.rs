use clap::CommandFactory;
use clap_complete::generate;

use crate::app::AppContext;
use crate::cli::{Cli, CompletionsArgs};
use crate::output::print_report;

pub fn handle_check(ctx: &AppContext) -> anyhow::Result<()> {
    let mode = ctx.output_mode()?;
    let protocol = ctx.open_protocol()?;
    protocol.store().check_database()?;
    let metadata = protocol.metadata()?;
    let report = protocol.check_integrity()?;
    print_report(mode, ctx.quiet(), &metadata, &report)
}

pub fn handle_completions(args: &CompletionsArgs) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, "awakening", &mut std::io::stdout());
    Ok(())
}
