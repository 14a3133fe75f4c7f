//! # Keisan - Operation Graph Evaluation Engine
//!
//! **Keisan** evaluates computed values described as graphs of named operations.
//! Each operation (arithmetic, aggregation, text or mapping) takes typed inputs
//! that are literals, references to properties in a hierarchical store, or
//! references to other operations. Results are computed lazily: every read
//! re-validates the operation and re-resolves its inputs.
//!
//! ## Core Workflow
//!
//! 1.  **Build a Workspace**: Use `Workspace::builder` with any `Store`
//!     implementation (the bundled `MemoryStore` works out of the box), optionally
//!     registering kind aliases and a maximum evaluation depth.
//! 2.  **Create Operations**: Create a transformation, instantiate operation kinds
//!     inside it, and wire their inputs with `add_input`, `set_input`,
//!     `remove_input` and `set_value`.
//! 3.  **Validate**: `validate` returns the current problem set without failing.
//! 4.  **Evaluate**: `get` validates and computes, failing with
//!     `OperationError::HasErrors` while any ERROR problem exists.
//!
//! Workspaces can also be loaded from a JSON `WorkspaceDefinition`, or from any
//! custom format implementing `IntoDefinition`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use keisan::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let store = MemoryStore::new()
//!         .with_property("/sensors/a/value", 4i64)?
//!         .with_property("/sensors/b/value", 6i64)?;
//!     let mut workspace = Workspace::builder(store).with_alias("sum", "add").build();
//!
//!     workspace.create_transformation("stats", "Sensor statistics")?;
//!     let total = workspace.create_operation("stats", "/stats/total", "sum")?;
//!     workspace.add_input(
//!         &total,
//!         "add.terms",
//!         [Value::path("/sensors/a/value"), Value::path("/sensors/b/value")],
//!     )?;
//!
//!     let mean = workspace.create_operation("stats", "/stats/mean", "average")?;
//!     workspace.set_input(&mean, "average.terms", [Value::operation(&total), Value::from(2i64)])?;
//!
//!     // Inspect problems before evaluating.
//!     let problems = workspace.validate(&mean)?;
//!     assert!(!problems.is_error());
//!
//!     println!("total = {}", workspace.get(&total)?);
//!     println!("mean  = {}", workspace.get(&mean)?);
//!     println!("{}", workspace.tree(&mean));
//!     Ok(())
//! }
//! ```

pub mod definition;
pub mod descriptor;
pub mod display;
pub mod error;
pub mod operation;
pub mod prelude;
pub mod store;
pub mod transformation;
pub mod validation;
pub mod value;
pub mod workspace;
