use super::conversion::IntoDefinition;
use super::document::{ValueDefinition, WorkspaceDefinition};
use super::literal::{property_from_json, scalar_from_json};
use crate::error::{DefinitionError, OperationError};
use crate::operation::OperationHandle;
use crate::store::{MemoryStore, Store};
use crate::value::Value;
use crate::workspace::Workspace;
use log::info;

fn operation_error(path: &str) -> impl FnOnce(OperationError) -> DefinitionError + '_ {
    move |source| DefinitionError::Operation {
        path: path.to_string(),
        source,
    }
}

impl Workspace<MemoryStore> {
    /// Builds a workspace over a fresh `MemoryStore` from a definition.
    pub fn from_definition(definition: impl IntoDefinition) -> Result<Self, DefinitionError> {
        let mut workspace = Workspace::default();
        workspace.apply_definition(definition)?;
        Ok(workspace)
    }
}

impl<S: Store> Workspace<S> {
    /// Seeds the store and creates every transformation and operation of a definition.
    ///
    /// All operations are created before any input is added, so inputs may reference
    /// operations defined later in the document.
    pub fn apply_definition(&mut self, definition: impl IntoDefinition) -> Result<(), DefinitionError> {
        let definition: WorkspaceDefinition = definition.into_definition()?;

        for (path, json) in &definition.properties {
            let value = property_from_json(json)?;
            self.store()
                .write_property(path, value)
                .map_err(|e| DefinitionError::ValidationError(format!("property '{}': {}", path, e)))?;
        }

        for transformation in &definition.transformations {
            self.create_transformation(&transformation.id, &transformation.name)
                .map_err(|e| DefinitionError::ValidationError(e.to_string()))?;
            for operation in &transformation.operations {
                self.create_operation(&transformation.id, &operation.path, &operation.kind)
                    .map_err(operation_error(&operation.path))?;
            }
        }

        for transformation in &definition.transformations {
            for operation in &transformation.operations {
                let handle = OperationHandle::new(operation.path.as_str());
                let kind_id = self
                    .operation(&handle)
                    .map(|op| op.kind().id())
                    .unwrap_or_default();
                for input in &operation.inputs {
                    let descriptor_id = if input.descriptor.contains('.') {
                        input.descriptor.clone()
                    } else {
                        format!("{}.{}", kind_id, input.descriptor)
                    };
                    let value = to_value(&input.value)?;
                    self.add_input(&handle, &descriptor_id, [value])
                        .map_err(operation_error(&operation.path))?;
                }
            }
        }

        info!(
            "Loaded {} transformation(s) with {} operation(s)",
            definition.transformations.len(),
            definition.operation_count()
        );
        Ok(())
    }
}

fn to_value(definition: &ValueDefinition) -> Result<Value, DefinitionError> {
    Ok(match definition {
        ValueDefinition::Literal(json) => Value::Literal(scalar_from_json(json)?),
        ValueDefinition::Property(path) => Value::path(path.as_str()),
        ValueDefinition::Properties(path) => Value::multivalued_path(path.as_str()),
        ValueDefinition::Operation(path) => Value::operation(path.as_str()),
    })
}
