use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use awakening_core::VERSION;

/// Awakening - guided programs and enrollment tracking on a local ledger store
#[derive(Parser)]
#[command(name = "awakening")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the store file
    #[arg(short, long, global = true, env = "AWAKENING_STORE")]
    pub store: Option<String>,

    /// Principal the transaction is sent as
    #[arg(short, long, global = true, env = "AWAKENING_CALLER")]
    pub caller: Option<String>,

    /// Block height for the transaction (defaults to the current Unix time)
    #[arg(long, global = true, value_name = "HEIGHT")]
    pub height: Option<u64>,

    /// Config path override
    #[arg(long, global = true, env = "AWAKENING_CONFIG")]
    pub config: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Output format (table, plain)
    #[arg(long, global = true, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Path where the store will be created
    #[arg(value_name = "PATH")]
    pub path: Option<String>,

    /// Also write a config file pointing at the new store
    #[arg(long)]
    pub write_config: bool,
}

/// Arguments for `program create`
#[derive(Args)]
pub struct ProgramCreateArgs {
    /// Program title
    #[arg(value_name = "TITLE")]
    pub title: String,

    /// Program description
    #[arg(short, long, default_value = "")]
    pub description: String,

    /// Duration in days
    #[arg(long, value_name = "DAYS")]
    pub duration_days: u32,

    /// Difficulty level (1-5)
    #[arg(long, value_name = "LEVEL")]
    pub difficulty: u8,
}

/// Arguments that select a single program
#[derive(Args)]
pub struct ProgramIdArgs {
    /// Program ID
    #[arg(value_name = "ID")]
    pub id: u64,
}

/// Arguments for `program list`
#[derive(Args)]
pub struct ProgramListArgs {
    /// Only programs created by this guide
    #[arg(long)]
    pub guide: Option<String>,

    /// Only active programs
    #[arg(long, conflicts_with = "inactive")]
    pub active: bool,

    /// Only inactive programs
    #[arg(long)]
    pub inactive: bool,

    /// Limit number of results
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Subcommand)]
pub enum ProgramSubcommand {
    /// Create a program owned by the caller
    Create(ProgramCreateArgs),

    /// Show a program by ID
    Show(ProgramIdArgs),

    /// List programs
    List(ProgramListArgs),

    /// Accept new enrollments (owner only)
    Activate(ProgramIdArgs),

    /// Stop accepting new enrollments (owner only)
    Deactivate(ProgramIdArgs),

    /// Show enrollment counts for a program
    Stats(ProgramIdArgs),
}

/// Arguments for the `progress` command
#[derive(Args)]
pub struct ProgressArgs {
    /// Program ID
    #[arg(value_name = "ID")]
    pub id: u64,

    /// New progress percentage (0-100)
    #[arg(value_name = "PERCENT")]
    pub percentage: u32,
}

/// Arguments for `enrollment show`
#[derive(Args)]
pub struct EnrollmentShowArgs {
    /// Program ID
    #[arg(value_name = "ID")]
    pub id: u64,

    /// User to look up (defaults to the caller)
    #[arg(long)]
    pub user: Option<String>,
}

/// Arguments for `enrollment list`
#[derive(Args)]
pub struct EnrollmentListArgs {
    /// Only enrollments of this user
    #[arg(long)]
    pub user: Option<String>,

    /// Only enrollments in this program
    #[arg(long)]
    pub program: Option<u64>,

    /// Only completed enrollments
    #[arg(long)]
    pub completed: bool,
}

#[derive(Subcommand)]
pub enum EnrollmentSubcommand {
    /// Show one enrollment
    Show(EnrollmentShowArgs),

    /// List enrollments
    List(EnrollmentListArgs),
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new store
    Init(InitArgs),

    /// Create, inspect and administer programs
    #[command(subcommand)]
    Program(ProgramSubcommand),

    /// Enroll the caller in a program
    Enroll(ProgramIdArgs),

    /// Record the caller's progress in a program
    Progress(ProgressArgs),

    /// Inspect enrollments
    #[command(subcommand)]
    Enrollment(EnrollmentSubcommand),

    /// Verify store integrity
    Check,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
