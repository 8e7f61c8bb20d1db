//! Library error type.

pub type Result<T> = std::result::Result<T, Error>;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
	#[error("IO error: {0}")]
	IO(#[from] std::io::Error),
	#[error("JSON error: {0}")]
	SerdeJSON(#[from] serde_json::Error),
	#[error("not found: {0}")]
	NotFound(String),
	#[error("already exists: {0}")]
	AlreadyExists(String),
	#[error("provider fetch failed for {key}: {reason}")]
	Provider { key: String, reason: String },
	#[error("invalid state: {0}")]
	InvalidState(String),
	#[error("bisection complete")]
	BisectionComplete,
	#[error("operation cancelled")]
	Cancelled,
	#[error("{} instance file operations failed: {}", .0.len(), .0.join("; "))]
	InstanceFiles(Vec<String>),
}
