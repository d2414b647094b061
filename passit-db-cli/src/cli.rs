use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "passit", about = "Passit DB command-line tool", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output (also respects NO_COLOR env var)
    #[arg(long, global = true)]
    pub no_color: bool,

    /// DynamoDB endpoint override, e.g. a LocalStack URL
    #[arg(long, global = true, env = "PASSIT_DYNAMODB_ENDPOINT")]
    pub endpoint: Option<String>,

    /// AWS region (defaults to the SDK's region chain)
    #[arg(long, global = true, env = "PASSIT_REGION")]
    pub region: Option<String>,

    /// Operation timeout in milliseconds
    #[arg(long, global = true, env = "PASSIT_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Answer index resource lifecycle calls
    Lifecycle {
        #[command(subcommand)]
        action: LifecycleAction,
    },

    /// Print one page of a table or index
    Page {
        /// Table name
        #[arg(long)]
        table: String,

        /// Secondary index to read
        #[arg(long)]
        index: Option<String>,

        /// Query this partition (ATTR=VALUE) instead of scanning
        #[arg(long, value_parser = parse_partition)]
        partition: Option<(String, String)>,

        /// Continue after this cursor token
        #[arg(long)]
        after: Option<String>,

        /// Maximum number of items
        #[arg(long)]
        limit: Option<u32>,

        /// Newest first (queries only)
        #[arg(long)]
        descending: bool,
    },

    /// Create or look up the conversation between two users
    Conversation {
        #[arg(long)]
        member_a: String,

        /// Receives the printed link
        #[arg(long)]
        member_b: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum LifecycleAction {
    /// Handle a Create/Update/Delete event
    OnEvent {
        /// Event JSON file, or `-` for stdin
        #[arg(long)]
        event: PathBuf,

        /// Return after the first wait instead of polling to completion
        #[arg(long)]
        resumable: bool,
    },

    /// Handle a completion check
    IsComplete {
        /// Event JSON file, or `-` for stdin
        #[arg(long)]
        event: PathBuf,

        /// Advance the migration state carried in the event
        #[arg(long)]
        resumable: bool,
    },
}

/// Parse `ATTR=VALUE`
pub fn parse_partition(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((attr, value)) if !attr.is_empty() => Ok((attr.to_string(), value.to_string())),
        _ => Err(format!("expected ATTR=VALUE, got '{s}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_splits_on_first_equals() {
        assert_eq!(
            parse_partition("conversationId=a=b").unwrap(),
            ("conversationId".to_string(), "a=b".to_string())
        );
        assert!(parse_partition("=x").is_err());
        assert!(parse_partition("userId").is_err());
    }
}
