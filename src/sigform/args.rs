use std::path::PathBuf;
use std::sync::OnceLock;

use clap::{Parser, Subcommand};

/// Version string: the plain crate version for release archives,
/// `x.y.z (hash date)` when built from a checkout.
fn version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");

    static VERSION_STRING: OnceLock<String> = OnceLock::new();
    VERSION_STRING.get_or_init(|| {
        if GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{VERSION} ({GIT_HASH} {GIT_COMMIT_DATE})")
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "sigform", version = version())]
#[command(about = "Edit the mail signatures and fixed-form texts of a profile", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Operate on the fixed-form texts document instead of signatures
    #[arg(short, long, global = true)]
    pub texts: bool,

    /// Profile directory (defaults to the platform data directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub profile_dir: Option<PathBuf>,

    /// Assume yes on the overwrite confirmation
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List entries
    #[command(alias = "ls")]
    List,

    /// Print the body of an entry
    #[command(alias = "v")]
    Show {
        /// Position as shown by list
        position: usize,
    },

    /// Add a new entry
    #[command(alias = "n")]
    Add {
        /// Entry name
        name: String,

        /// Body text (opens the editor if not provided)
        #[arg(long)]
        body: Option<String>,

        /// Skip opening the editor
        #[arg(long)]
        no_editor: bool,

        /// Restrict to one account (signatures only)
        #[arg(long, value_name = "NAME", conflicts_with = "regex")]
        account: Option<String>,

        /// Restrict by account pattern (signatures only)
        #[arg(long, value_name = "PATTERN")]
        regex: Option<String>,

        /// Mark as the default signature (signatures only)
        #[arg(long)]
        default: bool,
    },

    /// Edit an entry
    #[command(alias = "e")]
    Edit {
        /// Position as shown by list
        position: usize,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// Replace the body without opening the editor
        #[arg(long)]
        body: Option<String>,

        /// Edit the body in the editor
        #[arg(long)]
        edit_body: bool,

        /// Skip opening the editor
        #[arg(long)]
        no_editor: bool,

        /// Restrict to one account (signatures only)
        #[arg(long, value_name = "NAME", conflicts_with = "regex")]
        account: Option<String>,

        /// Restrict by account pattern (signatures only)
        #[arg(long, value_name = "PATTERN")]
        regex: Option<String>,

        /// Clear the account restriction (signatures only)
        #[arg(long, conflicts_with_all = ["account", "regex"])]
        no_account: bool,

        /// Set or clear the default mark (signatures only)
        #[arg(long, value_name = "BOOL")]
        default: Option<bool>,
    },

    /// Remove an entry
    #[command(alias = "rm")]
    Remove {
        /// Position as shown by list
        position: usize,
    },

    /// Move an entry one slot up (texts only)
    Up {
        /// Position as shown by list
        position: usize,
    },

    /// Move an entry one slot down (texts only)
    Down {
        /// Position as shown by list
        position: usize,
    },

    /// Print the document path
    Path,
}
