use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum DirectoryError {
    #[error("unknown facet attribute: {0}")]
    UnknownFacet(String),

    #[error("directory request failed: {0}")]
    DirectoryHttp(String),

    #[error("directory returned status {status}: {message}")]
    DirectoryStatus { status: u16, message: String },

    #[error("negotiator request failed: {0}")]
    NegotiatorHttp(String),

    #[error("negotiator returned status {status}: {message}")]
    NegotiatorStatus { status: u16, message: String },

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("invalid client configuration: {0}")]
    ClientBuild(String),
}
