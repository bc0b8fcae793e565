//! Output formatting helpers for the CLI.
//!
//! Three modes: JSON (machine-readable, the `{type, value}` result shape and raw
//! records), plain `key=value` lines stable for scripts, and comfy-table tables for
//! terminals. Reads print the record or `none`.

use std::fmt::Display;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use serde::Serialize;

use awakening_core::storage::{Enrollment, EnrollmentEntry, Program, ProgramStats, StoreMetadata};
use awakening_core::{CallResult, IntegrityReport};

use crate::config::OutputFormat;
use crate::errors::CliError;

/// Output mode determines how results are formatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    Json,
    #[default]
    Plain,
    Table,
}

impl OutputMode {
    /// Resolve output mode.
    ///
    /// 1. `--json` overrides everything
    /// 2. `--format`
    /// 3. `[output] format` from the config file
    /// 4. table on a terminal, plain otherwise
    pub fn resolve(
        json_flag: bool,
        format_flag: Option<OutputMode>,
        configured: Option<OutputMode>,
        is_tty: bool,
    ) -> Self {
        if json_flag {
            return Self::Json;
        }
        if let Some(mode) = format_flag.or(configured) {
            return mode;
        }
        if is_tty {
            Self::Table
        } else {
            Self::Plain
        }
    }

    pub fn parse(value: &str) -> anyhow::Result<Self> {
        match value {
            "json" => Ok(Self::Json),
            "plain" => Ok(Self::Plain),
            "table" => Ok(Self::Table),
            other => Err(CliError::usage(format!(
                "Unknown format \"{}\" (expected table, plain or json)",
                other
            ))
            .into()),
        }
    }
}

impl From<OutputFormat> for OutputMode {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => Self::Json,
            OutputFormat::Plain => Self::Plain,
            OutputFormat::Table => Self::Table,
        }
    }
}

/// Print the result of a mutating command.
///
/// A rejection is printed like a success (it is a normal outcome) and then
/// returned as `CliError::Rejected` so the process exits non-zero.
pub fn print_call<T: Serialize + Display>(
    mode: OutputMode,
    quiet: bool,
    summary: &str,
    result: &CallResult<T>,
) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => println!("{}", serde_json::to_string(result)?),
        OutputMode::Plain | OutputMode::Table => match result {
            CallResult::Ok(value) => {
                if quiet {
                    println!("{}", value);
                } else {
                    println!("status=ok");
                    println!("value={}", value);
                    println!("{}", summary);
                }
            }
            CallResult::Error(code) => {
                println!("status=error");
                println!("code={}", code.code());
                if !quiet {
                    println!("error={}", code.name());
                }
            }
        },
    }

    match result.error_code() {
        Some(code) => Err(CliError::Rejected(code).into()),
        None => Ok(()),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

/// Print a single program, or `none`.
pub fn print_program(mode: OutputMode, program: Option<&Program>) -> anyhow::Result<()> {
    let Some(program) = program else {
        return print_none(mode);
    };

    match mode {
        OutputMode::Json => print_json(program)?,
        OutputMode::Plain => {
            println!("id={}", program.id);
            println!("guide_id={}", program.guide_id);
            println!("title={}", program.title);
            println!("description={}", program.description);
            println!("duration_days={}", program.duration_days);
            println!("difficulty_level={}", program.difficulty_level);
            println!("active={}", program.active);
            println!("created_at={}", program.created_at);
        }
        OutputMode::Table => {
            let mut table = new_table();
            table.add_row(vec![Cell::new("ID"), Cell::new(program.id)]);
            table.add_row(vec![Cell::new("Guide"), Cell::new(&program.guide_id)]);
            table.add_row(vec![Cell::new("Title"), Cell::new(&program.title)]);
            table.add_row(vec![Cell::new("Description"), Cell::new(&program.description)]);
            table.add_row(vec![
                Cell::new("Duration"),
                Cell::new(format!("{} days", program.duration_days)),
            ]);
            table.add_row(vec![
                Cell::new("Difficulty"),
                Cell::new(program.difficulty_level),
            ]);
            table.add_row(vec![Cell::new("Active"), Cell::new(yes_no(program.active))]);
            table.add_row(vec![Cell::new("Created at"), Cell::new(program.created_at)]);
            println!("{table}");
        }
    }
    Ok(())
}

/// Print a list of programs.
pub fn print_programs(mode: OutputMode, quiet: bool, programs: &[Program]) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => print_json(&programs)?,
        OutputMode::Plain => {
            for program in programs {
                println!(
                    "{} {} {} {} {}",
                    program.id, program.active, program.difficulty_level, program.guide_id, program.title
                );
            }
        }
        OutputMode::Table => {
            if programs.is_empty() {
                if !quiet {
                    println!("No programs.");
                }
                return Ok(());
            }
            let mut table = new_table();
            table.set_header(vec!["ID", "TITLE", "DAYS", "LEVEL", "ACTIVE", "GUIDE"]);
            for program in programs {
                table.add_row(vec![
                    Cell::new(program.id),
                    Cell::new(&program.title),
                    Cell::new(program.duration_days),
                    Cell::new(program.difficulty_level),
                    Cell::new(yes_no(program.active)),
                    Cell::new(&program.guide_id),
                ]);
            }
            println!("{table}");
        }
    }
    Ok(())
}

/// Print a single enrollment, or `none`.
pub fn print_enrollment(mode: OutputMode, enrollment: Option<&Enrollment>) -> anyhow::Result<()> {
    let Some(enrollment) = enrollment else {
        return print_none(mode);
    };

    match mode {
        OutputMode::Json => print_json(enrollment)?,
        OutputMode::Plain => {
            println!("enrolled_at={}", enrollment.enrolled_at);
            println!("progress_percentage={}", enrollment.progress_percentage);
            println!("completed={}", enrollment.completed);
            println!("completion_date={}", enrollment.completion_date);
        }
        OutputMode::Table => {
            let mut table = new_table();
            table.add_row(vec![Cell::new("Enrolled at"), Cell::new(enrollment.enrolled_at)]);
            table.add_row(vec![
                Cell::new("Progress"),
                Cell::new(format!("{}%", enrollment.progress_percentage)),
            ]);
            table.add_row(vec![Cell::new("Completed"), Cell::new(yes_no(enrollment.completed))]);
            table.add_row(vec![
                Cell::new("Completion date"),
                Cell::new(enrollment.completion_date),
            ]);
            println!("{table}");
        }
    }
    Ok(())
}

/// Print a list of enrollments.
pub fn print_enrollments(
    mode: OutputMode,
    quiet: bool,
    entries: &[EnrollmentEntry],
) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => print_json(&entries)?,
        OutputMode::Plain => {
            for entry in entries {
                println!(
                    "{} {} {} {}",
                    entry.key.program_id,
                    entry.key.user_id,
                    entry.enrollment.progress_percentage,
                    entry.enrollment.completed
                );
            }
        }
        OutputMode::Table => {
            if entries.is_empty() {
                if !quiet {
                    println!("No enrollments.");
                }
                return Ok(());
            }
            let mut table = new_table();
            table.set_header(vec!["PROGRAM", "USER", "PROGRESS", "ENROLLED", "COMPLETED"]);
            for entry in entries {
                let completed = if entry.enrollment.completed {
                    entry.enrollment.completion_date.to_string()
                } else {
                    "-".to_string()
                };
                table.add_row(vec![
                    Cell::new(entry.key.program_id),
                    Cell::new(&entry.key.user_id),
                    Cell::new(format!("{}%", entry.enrollment.progress_percentage)),
                    Cell::new(entry.enrollment.enrolled_at),
                    Cell::new(completed),
                ]);
            }
            println!("{table}");
        }
    }
    Ok(())
}

/// Print enrollment counts for a program, or `none`.
pub fn print_stats(mode: OutputMode, stats: Option<&ProgramStats>) -> anyhow::Result<()> {
    let Some(stats) = stats else {
        return print_none(mode);
    };

    match mode {
        OutputMode::Json => print_json(stats)?,
        OutputMode::Plain | OutputMode::Table => {
            println!("enrolled={}", stats.enrolled);
            println!("completed={}", stats.completed);
        }
    }
    Ok(())
}

/// Print the result of an integrity check that passed.
pub fn print_report(
    mode: OutputMode,
    quiet: bool,
    metadata: &StoreMetadata,
    report: &IntegrityReport,
) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => print_json(&serde_json::json!({
            "status": "ok",
            "format_version": metadata.format_version,
            "store_id": metadata.store_id.to_string(),
            "created_at": metadata.created_at.to_rfc3339(),
            "programs": report.programs,
            "enrollments": report.enrollments,
            "completed": report.completed,
        }))?,
        OutputMode::Plain | OutputMode::Table => {
            println!("status=ok");
            if !quiet {
                println!("format_version={}", metadata.format_version);
                println!("store_id={}", metadata.store_id);
                println!("programs={}", report.programs);
                println!("enrollments={}", report.enrollments);
                println!("completed={}", report.completed);
            }
        }
    }
    Ok(())
}

fn print_none(mode: OutputMode) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => println!("null"),
        OutputMode::Plain | OutputMode::Table => println!("none"),
    }
    Ok(())
}
