use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "catlist")]
#[command(about = "A terminal to-do list that files items under categories", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add an item
    Add {
        text: String,

        /// Category to file the item under (asks when omitted on a terminal)
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Print active items grouped by category
    List {
        /// Only show items containing this text (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Print the completed items log
    Done,
    /// Replace an item's text, optionally moving it to another category
    Edit {
        category: String,
        /// 1-based position within the category
        number: usize,
        text: String,

        #[arg(short = 'c', long = "category")]
        new_category: Option<String>,
    },
    /// Mark an item done and move it to the completed log
    Complete {
        category: String,
        /// 1-based position within the category
        number: usize,
    },
    /// Delete an item without logging it
    Remove {
        category: String,
        /// 1-based position within the category
        number: usize,
    },
}
