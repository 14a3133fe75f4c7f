use crate::validation::ValidationProblems;
use crate::value::Scalar;
use thiserror::Error;

/// Errors raised by a `Store` implementation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Node '{0}' does not exist in the store")]
    NodeNotFound(String),

    #[error("'{0}' is not a valid store path")]
    InvalidPath(String),

    #[error("Snapshot failed: {0}")]
    Snapshot(String),
}

/// Errors that can occur while resolving a `Value` to a concrete result.
#[derive(Error, Debug, Clone)]
pub enum ValueResolutionError {
    #[error("Path '{0}' does not exist")]
    PathNotFound(String),

    #[error("Property '{property}' is not set on node '{node}'")]
    ValueAbsent { node: String, property: String },

    #[error("No operation is registered at '{0}'")]
    UnknownOperation(String),

    #[error("Operation '{0}' references itself through its inputs")]
    Cycle(String),

    #[error("Evaluation of '{path}' exceeded the maximum depth of {max_depth}")]
    DepthExceeded { path: String, max_depth: usize },

    #[error("Store failure: {0}")]
    Store(#[from] StoreError),

    #[error("Referenced operation '{path}' failed: {source}")]
    Operation {
        path: String,
        #[source]
        source: Box<OperationError>,
    },
}

/// Caller misuse of the mutation API. These are never recorded as validation problems.
#[derive(Error, Debug, Clone)]
pub enum StructuralError {
    #[error("Descriptor '{descriptor_id}' is not an input of operation kind '{kind}'")]
    UnknownDescriptor { kind: String, descriptor_id: String },

    #[error("A null value was supplied for input '{0}'")]
    NullInputValue(String),

    #[error("Operation has no inputs for descriptor '{0}'")]
    NoMatchingInput(String),

    #[error("Value '{value}' is not an input of descriptor '{descriptor_id}'")]
    ValueNotFound { descriptor_id: String, value: String },

    #[error("Input descriptor '{0}' is not modifiable")]
    NotModifiable(String),

    #[error("Input index {index} is out of range for descriptor '{descriptor_id}' ({len} inputs)")]
    InputIndexOutOfRange {
        descriptor_id: String,
        index: usize,
        len: usize,
    },

    #[error("Operation kind '{0}' is not registered")]
    UnknownOperationKind(String),

    #[error("Operation '{0}' does not exist")]
    UnknownOperation(String),

    #[error("Transformation '{0}' does not exist")]
    UnknownTransformation(String),

    #[error("Transformation '{0}' already exists")]
    DuplicateTransformation(String),

    #[error("Path '{0}' is already in use")]
    DuplicatePath(String),

    #[error("Operation '{0}' is owned by a composite operation and cannot be edited directly")]
    DelegateOperation(String),
}

/// Errors surfaced by `Operation::get` and the workspace API.
#[derive(Error, Debug, Clone)]
pub enum OperationError {
    #[error("Operation '{path}' has errors:\n{problems}")]
    HasErrors {
        path: String,
        problems: ValidationProblems,
    },

    #[error(transparent)]
    Resolution(#[from] ValueResolutionError),

    #[error(transparent)]
    Structural(#[from] StructuralError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(
        "Type mismatch during operation '{operation}': expected {expected}, but found value '{found}'"
    )]
    TypeMismatch {
        operation: String,
        expected: String,
        found: Scalar,
    },

    #[error("Arithmetic error during operation '{operation}': {message}")]
    Arithmetic { operation: String, message: String },

    #[error(
        "Cannot map '{source_path}' onto '{target_path}': one side is single-valued and the other multi-valued"
    )]
    SourceTargetArityMismatch {
        source_path: String,
        target_path: String,
    },
}

/// Errors that can occur when loading or converting a workspace definition.
#[derive(Error, Debug, Clone)]
pub enum DefinitionError {
    #[error("Failed to parse definition JSON: {0}")]
    JsonParseError(String),

    #[error("Invalid definition: {0}")]
    ValidationError(String),

    #[error("Unsupported literal '{0}'")]
    UnsupportedLiteral(String),

    #[error("Operation '{path}' could not be built: {source}")]
    Operation {
        path: String,
        #[source]
        source: OperationError,
    },
}
