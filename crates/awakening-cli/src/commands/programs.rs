use awakening_core::storage::{NewProgram, Principal, ProgramFilter, ProgramId};
use awakening_core::CallResult;

use crate::app::AppContext;
use crate::cli::{ProgramCreateArgs, ProgramIdArgs, ProgramListArgs};
use crate::output::{print_call, print_program, print_programs, print_stats};

pub fn handle_create(ctx: &AppContext, args: &ProgramCreateArgs) -> anyhow::Result<()> {
    let mode = ctx.output_mode()?;
    let tx = ctx.tx_context()?;
    let mut protocol = ctx.open_protocol()?;

    let new_program = NewProgram::new(&args.title, args.duration_days, args.difficulty)
        .with_description(&args.description);
    let result = CallResult::from_result(protocol.create_program(&tx, &new_program))?;

    let summary = format!("Created program \"{}\" as {}", args.title, tx.caller());
    print_call(mode, ctx.quiet(), &summary, &result)
}

pub fn handle_show(ctx: &AppContext, args: &ProgramIdArgs) -> anyhow::Result<()> {
    let mode = ctx.output_mode()?;
    let protocol = ctx.open_protocol()?;
    let program = protocol.get_program(ProgramId(args.id))?;
    print_program(mode, program.as_ref())
}

pub fn handle_list(ctx: &AppContext, args: &ProgramListArgs) -> anyhow::Result<()> {
    let mode = ctx.output_mode()?;
    let protocol = ctx.open_protocol()?;

    let mut filter = ProgramFilter::new();
    if let Some(ref guide) = args.guide {
        filter = filter.guide(Principal::from(guide.as_str()));
    }
    if args.active {
        filter = filter.active(true);
    }
    if args.inactive {
        filter = filter.active(false);
    }
    if let Some(limit) = args.limit {
        filter = filter.limit(limit);
    }

    let programs = protocol.list_programs(&filter)?;
    print_programs(mode, ctx.quiet(), &programs)
}

pub fn handle_set_active(ctx: &AppContext, args: &ProgramIdArgs, active: bool) -> anyhow::Result<()> {
    let mode = ctx.output_mode()?;
    let tx = ctx.tx_context()?;
    let mut protocol = ctx.open_protocol()?;

    let result = CallResult::from_result(protocol.set_active(&tx, ProgramId(args.id), active))?;

    let summary = if active {
        format!("Program {} is accepting enrollments", args.id)
    } else {
        format!("Program {} stopped accepting enrollments", args.id)
    };
    print_call(mode, ctx.quiet(), &summary, &result)
}

pub fn handle_stats(ctx: &AppContext, args: &ProgramIdArgs) -> anyhow::Result<()> {
    let mode = ctx.output_mode()?;
    let protocol = ctx.open_protocol()?;
    let stats = protocol.program_stats(ProgramId(args.id))?;
    print_stats(mode, stats.as_ref())
}
