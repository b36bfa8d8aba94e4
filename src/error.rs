//! Application error types using thiserror
//!
//! Error hierarchy:
//! - LockError: composer.json / composer.lock reading and parsing
//! - RegistryError: Packagist communication
//! - ConstraintError: Composer version-constraint parsing
//! - CommandError: external command execution (composer, diff, patch)
//! - PatchError: patch registration and file handling

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Manifest/lockfile related errors
    #[error(transparent)]
    Lock(#[from] LockError),

    /// Packagist related errors
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Constraint parsing errors
    #[error(transparent)]
    Constraint(#[from] ConstraintError),

    /// External command errors
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Patch management errors
    #[error(transparent)]
    Patch(#[from] PatchError),
}

/// Errors related to composer.json / composer.lock handling
#[derive(Error, Debug)]
pub enum LockError {
    /// File not found
    #[error("file not found: {path}")]
    NotFound { path: PathBuf },

    /// Failed to read file
    #[error("failed to read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write file
    #[error("failed to write {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing error
    #[error("failed to parse JSON in {path}: {message}")]
    JsonParseError { path: PathBuf, message: String },

    /// A required package is absent from the lock file
    #[error("package '{package}' not present in {path}")]
    PackageNotLocked { package: String, path: PathBuf },
}

/// Errors related to Packagist communication
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Package not found in registry
    #[error("package '{package}' not found on {registry}")]
    PackageNotFound { package: String, registry: String },

    /// Network request failed
    #[error("failed to fetch '{package}' from {registry}: {message}")]
    NetworkError {
        package: String,
        registry: String,
        message: String,
    },

    /// Rate limit exceeded
    #[error("rate limit exceeded for {registry}")]
    RateLimitExceeded { registry: String },

    /// Invalid response from registry
    #[error("invalid response from {registry} for '{package}': {message}")]
    InvalidResponse {
        package: String,
        registry: String,
        message: String,
    },

    /// Timeout
    #[error("timeout while fetching '{package}' from {registry}")]
    Timeout { package: String, registry: String },
}

/// Errors related to Composer constraint handling
#[derive(Error, Debug)]
pub enum ConstraintError {
    /// The constraint string could not be parsed
    #[error("unparseable constraint '{constraint}': {message}")]
    Unparseable { constraint: String, message: String },

    /// Operator the normalizer does not support
    #[error("unsupported operator in constraint '{constraint}'")]
    UnsupportedOperator { constraint: String },
}

/// Errors from running external commands
#[derive(Error, Debug)]
pub enum CommandError {
    /// The command could not be spawned at all
    #[error("failed to run {program}: {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The command ran but exited unsuccessfully
    #[error("{program} exited with {code}: {stderr}")]
    Failed {
        program: String,
        code: i32,
        stderr: String,
    },
}

/// Errors related to patch management
#[derive(Error, Debug)]
pub enum PatchError {
    /// No patch registered for the package
    #[error("no patch registered for '{package}'")]
    NotRegistered { package: String },

    /// Patch file missing on disk
    #[error("patch file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// The extra.patches section is not an object
    #[error("extra.patches in {path} is not a JSON object")]
    MalformedSection { path: PathBuf },
}

impl LockError {
    /// Creates a new NotFound error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        LockError::NotFound { path: path.into() }
    }

    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LockError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new WriteError
    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LockError::WriteError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new JsonParseError
    pub fn json_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        LockError::JsonParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new PackageNotLocked error
    pub fn package_not_locked(package: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        LockError::PackageNotLocked {
            package: package.into(),
            path: path.into(),
        }
    }
}

impl RegistryError {
    /// Creates a new PackageNotFound error
    pub fn package_not_found(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::PackageNotFound {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// Creates a new NetworkError
    pub fn network_error(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::NetworkError {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new RateLimitExceeded error
    pub fn rate_limit_exceeded(registry: impl Into<String>) -> Self {
        RegistryError::RateLimitExceeded {
            registry: registry.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::Timeout {
            package: package.into(),
            registry: registry.into(),
        }
    }
}

impl ConstraintError {
    /// Creates a new Unparseable error
    pub fn unparseable(constraint: impl Into<String>, message: impl Into<String>) -> Self {
        ConstraintError::Unparseable {
            constraint: constraint.into(),
            message: message.into(),
        }
    }
}

impl CommandError {
    /// Creates a new SpawnFailed error
    pub fn spawn_failed(program: impl Into<String>, source: std::io::Error) -> Self {
        CommandError::SpawnFailed {
            program: program.into(),
            source,
        }
    }

    /// Creates a new Failed error
    pub fn failed(program: impl Into<String>, code: i32, stderr: impl Into<String>) -> Self {
        CommandError::Failed {
            program: program.into(),
            code,
            stderr: stderr.into(),
        }
    }
}
