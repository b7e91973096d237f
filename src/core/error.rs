//! # Error Taxonomy
//!
//! Every fallible operation in the pipeline reports one of the error types in
//! this module. They fall into four groups:
//!
//! * **Encoding errors** (`EncodingError`) - a block record field was given a value
//!   wider than its bit field.
//! * **Bounds errors** (`GridError`) - a coordinate, index, stack or bulk array did not
//!   fit the fixed chunk extent.
//! * **Protocol misuse** (`WorkerError`, most of `DefinitionError`) - the caller used an
//!   API out of order, or talked to a worker thread that is no longer running.
//! * **Configuration** (`ConfigError`) - unreadable or malformed configuration input.
//!
//! Expected races, such as a mesh finishing for a chunk that has since been
//! unloaded, are not errors and never show up here.
//!
//! `EngineError` wraps all of them so `?` works across module boundaries.

use std::fmt;

/// The three addressable fields of a packed block record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockField {
    Id,
    Light,
    State,
}

impl fmt::Display for BlockField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BlockField::Id => "block id",
            BlockField::Light => "light level",
            BlockField::State => "block state",
        };
        f.write_str(name)
    }
}

/// A value did not fit the bit width of its block record field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    FieldOutOfRange {
        field: BlockField,
        value: u32,
        max: u32,
    },
}

impl fmt::Display for EncodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodingError::FieldOutOfRange { field, value, max } => write!(
                f,
                "{} value ({}) exceeds its bit width (max {})",
                field, value, max
            ),
        }
    }
}

impl std::error::Error for EncodingError {}

/// Chunk-extent violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    PositionOutOfBounds { x: i32, y: i32, z: i32 },
    IndexOutOfBounds { index: usize },
    WrongLength { expected: usize, actual: usize },
    StackOutOfBounds { stack: usize },
    /// The chunk's world coordinates do not fit in an `i32`.
    ChunkOutOfRange { x: i32, z: i32 },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::PositionOutOfBounds { x, y, z } => {
                write!(f, "position ({}, {}, {}) is out of bounds", x, y, z)
            }
            GridError::IndexOutOfBounds { index } => {
                write!(f, "index ({}) is out of bounds", index)
            }
            GridError::WrongLength { expected, actual } => write!(
                f,
                "tried to replace chunk data with an array of length ({}), expected ({})",
                actual, expected
            ),
            GridError::StackOutOfBounds { stack } => {
                write!(f, "mesh stack ({}) is out of bounds", stack)
            }
            GridError::ChunkOutOfRange { x, z } => {
                write!(f, "chunk ({}, {}) lies outside the world", x, z)
            }
        }
    }
}

impl std::error::Error for GridError {}

/// Misuse or corruption of the definition tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    DuplicateName(String),
    UnknownName(String),
    UnknownId(u32),
    Frozen,
    NotFrozen,
    Empty,
    ModifiedDuplicate,
    OutOfIds,
    InvalidDrawType(u8),
    InvalidProperty {
        block: String,
        property: &'static str,
        value: u32,
    },
    Malformed(String),
}

impl fmt::Display for DefinitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefinitionError::DuplicateName(name) => {
                write!(f, "definition ({}) is registered more than once", name)
            }
            DefinitionError::UnknownName(name) => {
                write!(f, "tried to access undefined name ({})", name)
            }
            DefinitionError::UnknownId(id) => write!(f, "tried to access undefined id ({})", id),
            DefinitionError::Frozen => f.write_str("definition tables are frozen"),
            DefinitionError::NotFrozen => {
                f.write_str("definition tables must be frozen before they are duplicated")
            }
            DefinitionError::Empty => f.write_str("tried to duplicate empty definition tables"),
            DefinitionError::ModifiedDuplicate => {
                f.write_str("tried to register into a worker duplicate of the definition tables")
            }
            DefinitionError::OutOfIds => f.write_str("out of valid block ids"),
            DefinitionError::InvalidDrawType(value) => {
                write!(f, "invalid draw type value ({})", value)
            }
            DefinitionError::InvalidProperty {
                block,
                property,
                value,
            } => write!(
                f,
                "{} ({}) on block ({}) is out of bounds",
                property, value, block
            ),
            DefinitionError::Malformed(reason) => {
                write!(f, "malformed definition document: {}", reason)
            }
        }
    }
}

impl std::error::Error for DefinitionError {}

/// Misuse of a background worker's public surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerError {
    NotAlive { worker: &'static str },
    NoPendingUpdate { worker: &'static str },
    Stopped { worker: &'static str },
    Spawn { worker: &'static str, reason: String },
}

impl fmt::Display for WorkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerError::NotAlive { worker } => {
                write!(f, "{}: worker thread is not alive", worker)
            }
            WorkerError::NoPendingUpdate { worker } => write!(
                f,
                "{}: no pending update, check has_update before get_update",
                worker
            ),
            WorkerError::Stopped { worker } => {
                write!(f, "{}: worker was stopped, no further requests accepted", worker)
            }
            WorkerError::Spawn { worker, reason } => {
                write!(f, "{}: failed to spawn worker thread: {}", worker, reason)
            }
        }
    }
}

impl std::error::Error for WorkerError {}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "failed to read configuration: {}", err),
            ConfigError::Parse(err) => write!(f, "failed to parse configuration: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Parse(err) => Some(err),
        }
    }
}

/// Crate-wide error, one variant per concern.
#[derive(Debug)]
pub enum EngineError {
    Encoding(EncodingError),
    Grid(GridError),
    Definition(DefinitionError),
    Worker(WorkerError),
    Config(ConfigError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Encoding(err) => write!(f, "encoding error: {}", err),
            EngineError::Grid(err) => write!(f, "bounds error: {}", err),
            EngineError::Definition(err) => write!(f, "definition error: {}", err),
            EngineError::Worker(err) => write!(f, "worker error: {}", err),
            EngineError::Config(err) => write!(f, "configuration error: {}", err),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Encoding(err) => Some(err),
            EngineError::Grid(err) => Some(err),
            EngineError::Definition(err) => Some(err),
            EngineError::Worker(err) => Some(err),
            EngineError::Config(err) => Some(err),
        }
    }
}

impl From<EncodingError> for EngineError {
    fn from(err: EncodingError) -> Self {
        EngineError::Encoding(err)
    }
}

impl From<GridError> for EngineError {
    fn from(err: GridError) -> Self {
        EngineError::Grid(err)
    }
}

impl From<DefinitionError> for EngineError {
    fn from(err: DefinitionError) -> Self {
        EngineError::Definition(err)
    }
}

impl From<WorkerError> for EngineError {
    fn from(err: WorkerError) -> Self {
        EngineError::Worker(err)
    }
}

impl From<ConfigError> for EngineError {
    fn from(err: ConfigError) -> Self {
        EngineError::Config(err)
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
