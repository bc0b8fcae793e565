use awakening_core::storage::{EnrollmentFilter, Principal, ProgramId};
use awakening_core::CallResult;

use crate::app::AppContext;
use crate::cli::{EnrollmentListArgs, EnrollmentShowArgs, ProgramIdArgs, ProgressArgs};
use crate::output::{print_call, print_enrollment, print_enrollments};

pub fn handle_enroll(ctx: &AppContext, args: &ProgramIdArgs) -> anyhow::Result<()> {
    let mode = ctx.output_mode()?;
    let tx = ctx.tx_context()?;
    let mut protocol = ctx.open_protocol()?;

    let result = CallResult::from_result(protocol.enroll(&tx, ProgramId(args.id)))?;

    let summary = format!("Enrolled {} in program {}", tx.caller(), args.id);
    print_call(mode, ctx.quiet(), &summary, &result)
}

pub fn handle_progress(ctx: &AppContext, args: &ProgressArgs) -> anyhow::Result<()> {
    let mode = ctx.output_mode()?;
    let tx = ctx.tx_context()?;
    let mut protocol = ctx.open_protocol()?;

    let result = CallResult::from_result(protocol.update_progress(
        &tx,
        ProgramId(args.id),
        args.percentage,
    ))?;

    let summary = format!(
        "Progress for {} in program {} is {}%",
        tx.caller(),
        args.id,
        args.percentage
    );
    print_call(mode, ctx.quiet(), &summary, &result)
}

pub fn handle_show(ctx: &AppContext, args: &EnrollmentShowArgs) -> anyhow::Result<()> {
    let mode = ctx.output_mode()?;
    let user = match args.user {
        Some(ref user) => Principal::from(user.as_str()),
        None => ctx.caller()?,
    };
    let protocol = ctx.open_protocol()?;
    let enrollment = protocol.get_enrollment(&user, ProgramId(args.id))?;
    print_enrollment(mode, enrollment.as_ref())
}

pub fn handle_list(ctx: &AppContext, args: &EnrollmentListArgs) -> anyhow::Result<()> {
    let mode = ctx.output_mode()?;
    let protocol = ctx.open_protocol()?;

    let mut filter = EnrollmentFilter::new();
    if let Some(ref user) = args.user {
        filter = filter.user(Principal::from(user.as_str()));
    }
    if let Some(program) = args.program {
        filter = filter.program(ProgramId(program));
    }
    if args.completed {
        filter = filter.completed(true);
    }

    let entries = protocol.list_enrollments(&filter)?;
    print_enrollments(mode, ctx.quiet(), &entries)
}
