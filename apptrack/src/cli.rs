//! Command-line interface definition and parsing.

use apptrack_core::models::{OutcomeFilter, OwnerKey, Scope, SearchFilter, SubmissionId};
use apptrack_engine::{CompanyOrder, ImportMode};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments for the application tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file.
    #[arg(short, long, env = "APP_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// The operation to run.
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn import() -> Result<Self, clap::Error> {
        Self::try_parse()
    }
}

/// The operations the tracker exposes. Results are printed as JSON.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List submissions, or company groups with `--companies`.
    List {
        #[command(flatten)]
        scope: ScopeArgs,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Add one submission (a JSON object) or a batch for one employer (a JSON array).
    Add {
        #[command(flatten)]
        owner: OwnerArg,
        /// JSON input file; standard input if omitted
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Index of the batch entry to mark as primary
        #[arg(long)]
        primary: Option<usize>,
    },
    /// Replace the fields of a submission with a JSON object.
    Update {
        #[command(flatten)]
        owner: OwnerArg,
        /// The submission to update
        id: SubmissionId,
        /// JSON input file; standard input if omitted
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Delete a submission.
    Delete {
        #[command(flatten)]
        owner: OwnerArg,
        /// The submission to delete
        id: SubmissionId,
    },
    /// Make a submission the primary position of its company group.
    Primary {
        #[command(flatten)]
        owner: OwnerArg,
        /// The submission to promote
        id: SubmissionId,
    },
    /// List the other positions in a submission's company group.
    Siblings {
        #[command(flatten)]
        owner: OwnerArg,
        /// The submission whose group to list
        id: SubmissionId,
    },
    /// Search submissions.
    Search {
        #[command(flatten)]
        scope: ScopeArgs,
        #[command(flatten)]
        filter: FilterArgs,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Write matching submissions to an `.xlsx` workbook.
    Export {
        #[command(flatten)]
        scope: ScopeArgs,
        #[command(flatten)]
        filter: FilterArgs,
        /// Fan out company groups instead of listing submissions flat
        #[arg(long)]
        companies: bool,
        /// Destination workbook
        #[arg(long)]
        output: PathBuf,
    },
    /// Decode a workbook and print its rows without saving anything.
    Preview {
        /// An `.xlsx` or `.xls` workbook
        input: PathBuf,
    },
    /// Add the rows of a workbook to an owner's submissions.
    Import {
        #[command(flatten)]
        owner: OwnerArg,
        /// An `.xlsx` or `.xls` workbook
        input: PathBuf,
        /// What to do with the owner's existing submissions
        #[arg(long, value_enum, default_value_t = ImportModeArg::Skip)]
        mode: ImportModeArg,
    },
}

/// The acting owner.
#[derive(Args, Debug)]
pub struct OwnerArg {
    /// Owner key of the acting user
    #[arg(short, long, env = "APP_OWNER")]
    pub owner: String,
}

impl OwnerArg {
    /// The owner as a key
    pub fn key(&self) -> OwnerKey {
        OwnerKey::from(self.owner.as_str())
    }
}

/// Which owner's submissions an operation covers.
#[derive(Args, Debug)]
pub struct ScopeArgs {
    /// Owner key of the acting user
    #[arg(short, long, env = "APP_OWNER", required_unless_present = "all")]
    pub owner: Option<String>,
    /// Cover every owner (administrative view)
    #[arg(long, conflicts_with = "owner")]
    pub all: bool,
}

impl ScopeArgs {
    /// The selected scope
    pub fn scope(&self) -> Scope {
        match (&self.owner, self.all) {
            (Some(owner), false) => Scope::Owner(OwnerKey::from(owner.as_str())),
            _ => Scope::All,
        }
    }
}

/// How a listing is presented.
#[derive(Args, Debug)]
pub struct ViewArgs {
    /// Group submissions by company
    #[arg(long)]
    pub companies: bool,
    /// Ordering of company groups within an outcome tier
    #[arg(long, value_enum)]
    pub order: Option<OrderArg>,
}

/// Search criteria.
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Comma separated keywords matched against employer, position and location
    #[arg(short, long)]
    pub keywords: Option<String>,
    /// `已挂` for any rejection, `待定` for pending, or an exact outcome label
    #[arg(long)]
    pub outcome: Option<String>,
    /// Exact current status
    #[arg(long)]
    pub status: Option<String>,
    /// Minimum annualized salary
    #[arg(long)]
    pub min_salary: Option<f64>,
}

impl From<&FilterArgs> for SearchFilter {
    fn from(args: &FilterArgs) -> Self {
        SearchFilter {
            keywords: args.keywords.clone(),
            outcome: args.outcome.as_deref().and_then(OutcomeFilter::parse),
            status: args.status.clone(),
            min_salary: args.min_salary,
        }
    }
}

/// Command-line spelling of [`CompanyOrder`].
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderArg {
    /// Fewest pool-days first
    PoolDays,
    /// Most recently modified first
    UpdatedAt,
    /// Most recently applied first
    AppliedAt,
    /// Most recently created first
    CreatedAt,
}

impl From<OrderArg> for CompanyOrder {
    fn from(value: OrderArg) -> Self {
        match value {
            OrderArg::PoolDays => CompanyOrder::PoolDays,
            OrderArg::UpdatedAt => CompanyOrder::UpdatedAt,
            OrderArg::AppliedAt => CompanyOrder::AppliedAt,
            OrderArg::CreatedAt => CompanyOrder::CreatedAt,
        }
    }
}

/// Command-line spelling of [`ImportMode`].
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportModeArg {
    /// Keep existing submissions and skip duplicate (employer, position) rows
    Skip,
    /// Delete the owner's existing submissions first
    Replace,
}

impl From<ImportModeArg> for ImportMode {
    fn from(value: ImportModeArg) -> Self {
        match value {
            ImportModeArg::Skip => ImportMode::SkipDuplicates,
            ImportModeArg::Replace => ImportMode::ReplaceAll,
        }
    }
}
