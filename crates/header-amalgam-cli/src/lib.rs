//! Library interface for the header-amalgam command line

pub mod amalgamate;
pub mod cli;
pub mod config;
pub mod order;
pub mod prompt;
pub mod release;
