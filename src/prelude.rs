//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the keisan crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use keisan::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let json = std::fs::read_to_string("path/to/workspace.json")?;
//! let workspace = Workspace::from_definition(json.as_str())?;
//!
//! for transformation in workspace.transformations() {
//!     for handle in transformation.operations() {
//!         match workspace.get(handle) {
//!             Ok(result) => println!("{} = {}", handle, result),
//!             Err(e) => println!("{}: {}", handle, e),
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```

// Workspace and evaluation
pub use crate::workspace::{Workspace, WorkspaceBuilder};
pub use crate::operation::{EvaluationContext, Input, Operation, OperationHandle};
pub use crate::transformation::Transformation;
pub use crate::validation::{Severity, ValidationProblem, ValidationProblems};

// Values and schema
pub use crate::descriptor::{DeclaredType, Descriptor, OperationDescriptor, OperationKind, Registry};
pub use crate::value::{Numeric, NumericKind, Resolved, Scalar, Value};

// Store
pub use crate::store::{MemoryStore, NodeHandle, PropertyValue, Store};

// Definitions
pub use crate::definition::{
    InputDefinition, IntoDefinition, OperationDefinition, TransformationDefinition,
    ValueDefinition, WorkspaceDefinition,
};

// Display
pub use crate::display::OperationTree;

// Error types
pub use crate::error::{
    DefinitionError, OperationError, StoreError, StructuralError, ValueResolutionError,
};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
