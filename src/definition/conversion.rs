use super::document::WorkspaceDefinition;
use crate::error::DefinitionError;

/// A trait for custom document formats that can be converted into a `WorkspaceDefinition`.
///
/// This is the extension point for loading workspaces from formats other than the
/// built-in JSON document. Implement it on your own configuration structs and pass
/// them to `Workspace::from_definition` or `Workspace::apply_definition`.
///
/// # Example
///
/// ```rust,no_run
/// use keisan::prelude::*;
/// use keisan::error::DefinitionError;
///
/// // 1. Your own format: a flat list of sums over sensor properties.
/// struct SensorSums { sums: Vec<(String, Vec<String>)> }
///
/// // 2. Translate it into the canonical definition.
/// impl IntoDefinition for SensorSums {
///     fn into_definition(self) -> std::result::Result<WorkspaceDefinition, DefinitionError> {
///         let operations = self
///             .sums
///             .into_iter()
///             .map(|(path, sensors)| OperationDefinition {
///                 path,
///                 kind: "add".to_string(),
///                 inputs: sensors
///                     .into_iter()
///                     .map(|sensor| InputDefinition {
///                         descriptor: "terms".to_string(),
///                         value: ValueDefinition::Property(sensor),
///                     })
///                     .collect(),
///             })
///             .collect();
///
///         Ok(WorkspaceDefinition {
///             properties: Default::default(),
///             transformations: vec![TransformationDefinition {
///                 id: "sensors".to_string(),
///                 name: "Sensor sums".to_string(),
///                 operations,
///             }],
///         })
///     }
/// }
/// ```
pub trait IntoDefinition {
    /// Consumes the object and converts it into a workspace definition.
    fn into_definition(self) -> Result<WorkspaceDefinition, DefinitionError>;
}

impl IntoDefinition for WorkspaceDefinition {
    fn into_definition(self) -> Result<WorkspaceDefinition, DefinitionError> {
        Ok(self)
    }
}

/// JSON text in the built-in document format.
impl IntoDefinition for &str {
    fn into_definition(self) -> Result<WorkspaceDefinition, DefinitionError> {
        WorkspaceDefinition::from_json(self)
    }
}
