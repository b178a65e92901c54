// Dweve TMDL - Tabular Model Definition Language
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Error types for the TMDL CLI.
//!
//! Every command returns `Result<(), CliError>`; the binary turns the error
//! into a message on stderr and an exit code.

use std::path::PathBuf;
use thiserror::Error;
use tmdl::{TmdlError, TmdlErrorKind};

/// Exit code for a failed parse, an unreadable file or bad input.
pub const EXIT_FAILURE: u8 = 1;

/// Exit code for a lint run that found errors.
pub const EXIT_LINT: u8 = 2;

/// The main error type for TMDL CLI operations.
#[derive(Error, Debug)]
pub enum CliError {
    /// Parsing, normalizing or writing failed.
    #[error("{0}")]
    Tmdl(#[from] TmdlError),

    /// Writing an output file failed.
    #[error("I/O error for '{path}': {message}")]
    Io {
        /// The file that could not be written
        path: PathBuf,
        /// The underlying error message
        message: String,
    },

    /// Lint found errors, or warnings under `--warn-error`.
    #[error("lint failed with {errors} error(s) and {warnings} warning(s)")]
    LintFailed { errors: usize, warnings: usize },

    /// `format --check` found a file that is not in canonical form.
    #[error("'{0}' is not in canonical form")]
    NotCanonical(PathBuf),

    /// A flag or environment variable had an unusable value.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl CliError {
    /// Create an I/O error with file path context.
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// The process exit code for this error.
    ///
    /// ```
    /// use tmdl_cli::error::{CliError, EXIT_LINT};
    ///
    /// let err = CliError::LintFailed { errors: 1, warnings: 0 };
    /// assert_eq!(err.exit_code(), EXIT_LINT);
    /// ```
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::LintFailed { .. } => EXIT_LINT,
            _ => EXIT_FAILURE,
        }
    }

    /// The TMDL error kind, when the failure came from the library.
    pub fn kind(&self) -> Option<TmdlErrorKind> {
        match self {
            Self::Tmdl(e) => Some(e.kind),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let syntax = CliError::from(TmdlError::syntax("unclosed quote", 3));
        assert_eq!(syntax.exit_code(), EXIT_FAILURE);
        assert_eq!(syntax.kind(), Some(TmdlErrorKind::Syntax));

        let io = CliError::from(TmdlError::io("not found"));
        assert_eq!(io.exit_code(), EXIT_FAILURE);

        let lint = CliError::LintFailed {
            errors: 0,
            warnings: 2,
        };
        assert_eq!(lint.exit_code(), EXIT_LINT);
        assert_eq!(lint.kind(), None);
    }

    #[test]
    fn test_messages() {
        let err = CliError::NotCanonical(PathBuf::from("Sales.tmdl"));
        assert_eq!(err.to_string(), "'Sales.tmdl' is not in canonical form");

        let err = CliError::io_error(
            "out.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "I/O error for 'out.json': denied");

        let err = CliError::from(TmdlError::syntax("ambiguous dedent", 4));
        assert!(err.to_string().contains("line 4"));
    }
}
