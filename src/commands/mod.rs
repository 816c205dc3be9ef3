/// Subcommand handlers
pub mod init;
pub mod ssh;
pub mod steps;
