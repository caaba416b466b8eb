use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    version = env!("CARGO_PKG_VERSION"),
    about = "snipcat - a shared snippet catalog",
    long_about = "snipcat keeps department master snippets and your personal snippets in one \
                  catalog, and expands calendar variables when a snippet is rendered."
)]
pub struct Snipcat {
    #[clap(subcommand)]
    pub commands: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new personal snippet
    Add {
        #[clap(long, short = 'f', help = "Folder to place the snippet in")]
        folder: String,

        #[clap(long, short = 't', help = "Title of the snippet")]
        title: String,

        #[clap(long, short = 'c', help = "The snippet text")]
        content: String,

        #[clap(long, short = 'd', help = "Optional description")]
        description: Option<String>,
    },
    /// Delete a personal snippet by id
    Delete {
        #[clap(help = "Id of the snippet to delete")]
        id: String,
    },
    /// Update an existing personal snippet by id
    Update {
        #[clap(help = "Id of the snippet to update")]
        id: String,

        #[clap(long, short = 't', help = "New title")]
        title: Option<String>,

        #[clap(long, short = 'c', help = "New snippet text")]
        content: Option<String>,

        #[clap(long, short = 'd', help = "New description")]
        description: Option<String>,
    },
    /// List all folders and snippets in the catalog
    List,
    /// Expand template variables in a snippet and print the result
    Expand {
        #[clap(help = "Id of the snippet to expand")]
        id: String,

        #[clap(long, help = "Override the user name from the profile")]
        name: Option<String>,
    },
    /// Fetch department master documents and merge them into the catalog
    Sync,
    /// Import a personal snippet export file
    Import {
        #[clap(help = "Path to the XML export to import")]
        path: PathBuf,
    },
    /// Export personal snippets as an interchange XML document
    Export {
        #[clap(long, short, help = "Write to a file instead of stdout")]
        output: Option<PathBuf>,
    },
    /// Emit a department's master document for upload (admins only)
    ExportMaster {
        #[clap(help = "Department whose master document to produce")]
        department: String,

        #[clap(long, short, help = "Write to a file instead of stdout")]
        output: Option<PathBuf>,
    },
}
