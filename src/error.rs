//! # Error Types
//!
//! Custom error types for the solver. Every fallible operation in the crate
//! returns the [`Result`] alias defined here.
//!
//! ```rust
//! use tsp_evolve::error::{Result, TspError};
//!
//! fn check_dimension(dimension: usize) -> Result<()> {
//!     if dimension < 2 {
//!         return Err(TspError::Configuration(
//!             "at least two cities are required".to_string(),
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Represents errors that can occur while configuring or running the solver.
#[derive(Error, Debug)]
pub enum TspError {
    /// Error that occurs when an invalid run configuration is provided.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error that occurs when a problem instance is malformed or unreadable.
    #[error("Problem instance error: {0}")]
    Problem(String),

    /// Error that occurs when an operation is attempted on an empty population.
    #[error("Empty population error: Cannot operate on an empty population")]
    EmptyPopulation,

    /// Error that occurs when an I/O operation fails.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error that occurs when the background worker fails.
    #[error("Worker error: {0}")]
    Worker(String),
}

/// A specialized Result type for solver operations.
pub type Result<T> = std::result::Result<T, TspError>;

/// Extension trait for Result to add context to errors.
///
/// Converts an arbitrary error into a [`TspError::Problem`] carrying both the
/// supplied context and the original error message.
pub trait ResultExt<T, E> {
    /// Adds context to an error, converting it into a `TspError`.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| TspError::Problem(format!("{}: {}", context, e)))
    }
}
