//! Tests for the mutation API: creating and removing operations, editing inputs and
//! keeping composite delegates in sync.
//!
mod common;
use common::*;
use keisan::prelude::*;

fn values(ws: &Workspace, handle: &OperationHandle, descriptor_id: &str) -> Vec<Value> {
    ws.inputs_for(handle, descriptor_id)
        .expect("inputs_for failed")
        .into_iter()
        .cloned()
        .collect()
}

#[cfg(test)]
mod lifecycle_tests {
    use super::*;
    use std::result::Result;

    /// A memory store that refuses to create `mean` nodes.
    struct NoMeanStore {
        inner: MemoryStore,
    }

    impl Store for NoMeanStore {
        fn resolve_property(&self, path: &str) -> Result<Option<PropertyValue>, StoreError> {
            self.inner.resolve_property(path)
        }

        fn node(&self, path: &str) -> Option<NodeHandle> {
            self.inner.node(path)
        }

        fn create_node(&self, path: &str) -> Result<NodeHandle, StoreError> {
            if path.ends_with("/mean") {
                return Err(StoreError::InvalidPath(path.to_string()));
            }
            self.inner.create_node(path)
        }

        fn remove_node(&self, handle: &NodeHandle) -> Result<(), StoreError> {
            self.inner.remove_node(handle)
        }

        fn property(
            &self,
            handle: &NodeHandle,
            name: &str,
        ) -> Result<Option<PropertyValue>, StoreError> {
            self.inner.property(handle, name)
        }

        fn set_property(
            &self,
            handle: &NodeHandle,
            name: &str,
            value: PropertyValue,
        ) -> Result<(), StoreError> {
            self.inner.set_property(handle, name, value)
        }

        fn remove_property(&self, handle: &NodeHandle, name: &str) -> Result<(), StoreError> {
            self.inner.remove_property(handle, name)
        }
    }

    #[test]
    fn test_failed_delegate_leaves_nothing_behind() {
        init_logging();
        let mut ws = Workspace::new(NoMeanStore {
            inner: MemoryStore::new(),
        });
        ws.create_transformation("t", "Test transformation")
            .expect("create transformation failed");

        let result = ws.create_operation("t", "/agg/avg", "average");
        assert!(matches!(
            result,
            Err(OperationError::Store(StoreError::InvalidPath(ref path))) if path == "/agg/avg/mean"
        ));

        let composite = OperationHandle::new("/agg/avg");
        let sum = OperationHandle::new("/agg/avg/sum");
        assert!(ws.operation(&composite).is_none());
        assert!(ws.operation(&sum).is_none());
        assert!(!ws.store().inner.contains("/agg/avg"));
        assert!(!ws.store().inner.contains("/agg/avg/sum"));
        let transformation = ws.transformation("t").expect("transformation missing");
        assert!(!transformation.contains(&composite));

        // The path is free again for an operation without delegates.
        ws.create_operation("t", "/agg/avg", "add")
            .expect("create after failure failed");
    }

    #[test]
    fn test_operation_node_is_created() {
        let mut ws = workspace();
        let sum = ws.create_operation("t", "/calc/sum", "add").expect("create failed");
        assert!(ws.store().contains("/calc/sum"));
        assert_eq!(
            ws.store().resolve_property("/calc/sum/kind").expect("read failed"),
            Some(PropertyValue::from("add"))
        );
        assert_eq!(
            ws.store()
                .resolve_property("/calc/sum/transformation")
                .expect("read failed"),
            Some(PropertyValue::from("t"))
        );
        assert_eq!(ws.transformation("t").expect("missing").operations(), &[sum]);
    }

    #[test]
    fn test_creation_errors() {
        let mut ws = workspace();
        ws.create_operation("t", "/calc/sum", "add").expect("create failed");

        assert!(matches!(
            ws.create_operation("t", "/calc/sum", "add"),
            Err(OperationError::Structural(StructuralError::DuplicatePath(_)))
        ));
        assert!(matches!(
            ws.create_operation("t", "/calc/other", "frobnicate"),
            Err(OperationError::Structural(StructuralError::UnknownOperationKind(_)))
        ));
        assert!(matches!(
            ws.create_operation("missing", "/calc/other", "add"),
            Err(OperationError::Structural(StructuralError::UnknownTransformation(_)))
        ));
        assert!(matches!(
            ws.create_operation("t", "/", "add"),
            Err(OperationError::Store(StoreError::InvalidPath(_)))
        ));
        assert!(matches!(
            ws.create_operation("t", "calc/relative", "add"),
            Err(OperationError::Store(StoreError::InvalidPath(_)))
        ));
        assert!(matches!(
            ws.create_transformation("t", "Again"),
            Err(StructuralError::DuplicateTransformation(_))
        ));
        // Failed creations leave nothing behind.
        assert!(!ws.store().contains("/calc/other"));
        assert_eq!(ws.operations("t").expect("operations failed").len(), 1);
    }

    #[test]
    fn test_aliases_create_builtin_kinds() {
        init_logging();
        let mut ws = Workspace::builder(sensor_store())
            .with_alias("sum", "add")
            .build();
        ws.create_transformation("t", "Aliases").expect("create failed");
        let sum = ws.create_operation("t", "/calc/sum", "sum").expect("create failed");
        assert_eq!(ws.lookup_kind("sum"), Some(OperationKind::Add));
        assert_eq!(ws.operation(&sum).expect("missing").kind(), OperationKind::Add);
        assert!(ws.kind_ids().contains(&"sum"));
        assert!(ws.kind_ids().contains(&"average"));
    }

    #[test]
    fn test_remove_operation() {
        let mut ws = workspace();
        let sum = operation_with(&mut ws, "/calc/sum", "add", "add.terms", vec![1i64, 2]);
        assert!(ws.store().contains("/calc/sum/inputs/1"));

        ws.remove_operation(&sum).expect("remove failed");
        assert!(ws.operation(&sum).is_none());
        assert!(!ws.store().contains("/calc/sum"));
        assert!(!ws.store().contains("/calc/sum/inputs/1"));
        assert!(ws.transformation("t").expect("missing").operations().is_empty());
        assert!(matches!(
            ws.remove_operation(&sum),
            Err(OperationError::Structural(StructuralError::UnknownOperation(_)))
        ));
    }

    #[test]
    fn test_remove_transformation_cascades() {
        let mut ws = workspace();
        operation_with(&mut ws, "/calc/sum", "add", "add.terms", vec![1i64]);
        let average = operation_with(&mut ws, "/calc/avg", "average", "average.terms", vec![1i64]);
        let delegate_paths: Vec<String> = ws
            .delegates(&average)
            .expect("delegates failed")
            .iter()
            .map(|op| op.path().to_string())
            .collect();

        let removed = ws.remove_transformation("t").expect("remove failed");
        assert_eq!(removed.id(), "t");
        assert_eq!(removed.operations().len(), 0);
        assert!(ws.transformation("t").is_none());
        assert!(!ws.store().contains("/calc/sum"));
        assert!(!ws.store().contains("/calc/avg"));
        for path in delegate_paths {
            assert!(ws.operation(&OperationHandle::new(path.as_str())).is_none());
        }
    }
}

#[cfg(test)]
mod input_tests {
    use super::*;

    #[test]
    fn test_add_input_appends_in_order() {
        let mut ws = workspace();
        let text = operation_with(&mut ws, "/text/t", "concat", "concat.parts", vec!["a"]);
        ws.add_input(&text, "concat.parts", [Value::from("b"), Value::from("c")])
            .expect("add_input failed");
        assert_eq!(
            values(&ws, &text, "concat.parts"),
            vec![Value::from("a"), Value::from("b"), Value::from("c")]
        );
        assert_eq!(
            ws.get(&text).expect("concat failed"),
            Resolved::Single(Scalar::from("abc"))
        );
    }

    #[test]
    fn test_set_input_replaces_the_group() {
        let mut ws = workspace();
        let sum = operation_with(&mut ws, "/calc/sum", "add", "add.terms", vec![1i64, 2, 3]);
        ws.set_input(&sum, "add.terms", [Value::from(10i64)])
            .expect("set_input failed");

        assert_eq!(values(&ws, &sum, "add.terms"), vec![Value::from(10i64)]);
        assert_eq!(ws.get(&sum).expect("add failed"), int(10));
        // Old input nodes are gone, the new one got a fresh slot.
        assert!(!ws.store().contains("/calc/sum/inputs/0"));
        assert!(ws.store().contains("/calc/sum/inputs/3"));
    }

    #[test]
    fn test_set_input_leaves_other_groups_alone() {
        let mut ws = workspace();
        let difference = binary_operation(
            &mut ws,
            "/calc/difference",
            "subtract",
            ("subtract.minuend", Value::from(10i64)),
            ("subtract.subtrahend", Value::from(3i64)),
        );
        ws.set_input(&difference, "subtract.subtrahend", [Value::from(4i64)])
            .expect("set_input failed");
        assert_eq!(values(&ws, &difference, "subtract.minuend"), vec![Value::from(10i64)]);
        assert_eq!(ws.get(&difference).expect("subtract failed"), int(6));
    }

    #[test]
    fn test_input_nodes_hold_the_value() {
        let mut ws = workspace();
        let sum = operation_with(
            &mut ws,
            "/calc/sum",
            "add",
            "add.terms",
            vec![Value::from(7i64), Value::multivalued_path("/sensors/series/values")],
        );
        let inputs = ws.inputs(&sum).expect("inputs failed");
        assert_eq!(inputs.len(), 2);
        assert_eq!(
            ws.store()
                .property(inputs[0].node(), "descriptor")
                .expect("read failed"),
            Some(PropertyValue::from("add.terms"))
        );
        for input in inputs {
            let stored = Value::read_from(ws.store(), input.node()).expect("read_from failed");
            assert_eq!(&stored, input.value());
        }
    }

    #[test]
    fn test_null_values_are_rejected_before_any_change() {
        let mut ws = workspace();
        let sum = ws.create_operation("t", "/calc/sum", "add").expect("create failed");
        let result = ws.add_input(&sum, "add.terms", [Some(Value::from(1i64)), None]);
        assert!(matches!(
            result,
            Err(OperationError::Structural(StructuralError::NullInputValue(_)))
        ));
        assert!(ws.inputs(&sum).expect("inputs failed").is_empty());

        // A literal null is a regular value.
        ws.add_input(&sum, "add.terms", [Value::literal(Scalar::Null)])
            .expect("add_input failed");
        assert_eq!(ws.inputs(&sum).expect("inputs failed").len(), 1);
    }

    #[test]
    fn test_unknown_descriptor() {
        let mut ws = workspace();
        let sum = ws.create_operation("t", "/calc/sum", "add").expect("create failed");
        assert!(matches!(
            ws.add_input(&sum, "multiply.factors", [Value::from(1i64)]),
            Err(OperationError::Structural(StructuralError::UnknownDescriptor { .. }))
        ));
        assert!(matches!(
            ws.inputs_for(&sum, "terms"),
            Err(StructuralError::UnknownDescriptor { .. })
        ));
    }

    #[test]
    fn test_remove_input_by_value() {
        let mut ws = workspace();
        let sum = operation_with(&mut ws, "/calc/sum", "add", "add.terms", vec![1i64, 1, 2]);
        ws.remove_input(&sum, "add.terms", [Value::from(1i64)])
            .expect("remove_input failed");
        assert_eq!(
            values(&ws, &sum, "add.terms"),
            vec![Value::from(1i64), Value::from(2i64)]
        );
    }

    #[test]
    fn test_remove_input_by_reference_and_by_result() {
        let mut ws = workspace();
        let sum = operation_with(
            &mut ws,
            "/calc/sum",
            "add",
            "add.terms",
            vec![
                Value::multivalued_path("/sensors/series/values"),
                Value::path("/sensors/a/value"),
                Value::from(9i64),
            ],
        );
        // Same path, different flag.
        ws.remove_input(&sum, "add.terms", [Value::path("/sensors/series/values")])
            .expect("remove by reference failed");
        // `/sensors/a/value` resolves to 4.
        ws.remove_input(&sum, "add.terms", [Value::from(4i64)])
            .expect("remove by result failed");
        assert_eq!(values(&ws, &sum, "add.terms"), vec![Value::from(9i64)]);
    }

    #[test]
    fn test_remove_input_errors() {
        let mut ws = workspace();
        let sum = ws.create_operation("t", "/calc/sum", "add").expect("create failed");
        assert!(matches!(
            ws.remove_input(&sum, "add.terms", [Value::from(1i64)]),
            Err(OperationError::Structural(StructuralError::NoMatchingInput(_)))
        ));

        ws.add_input(&sum, "add.terms", [Value::from(1i64), Value::from(2i64)])
            .expect("add_input failed");
        assert!(matches!(
            ws.remove_input(&sum, "add.terms", [Value::from(2i64), Value::from(3i64)]),
            Err(OperationError::Structural(StructuralError::ValueNotFound { .. }))
        ));
        // Nothing was removed by the failed call.
        assert_eq!(values(&ws, &sum, "add.terms").len(), 2);
    }

    #[test]
    fn test_set_value_in_place() {
        let mut ws = workspace();
        let sum = operation_with(&mut ws, "/calc/sum", "add", "add.terms", vec![1i64, 2, 3]);
        let node = ws.inputs(&sum).expect("inputs failed")[1].node().clone();

        ws.set_value(&sum, "add.terms", 1, Value::path("/sensors/b/value"))
            .expect("set_value failed");
        assert_eq!(ws.get(&sum).expect("add failed"), int(10));
        // The slot keeps its node.
        assert_eq!(ws.inputs(&sum).expect("inputs failed")[1].node(), &node);
        assert_eq!(
            Value::read_from(ws.store(), &node).expect("read_from failed"),
            Value::path("/sensors/b/value")
        );
    }

    #[test]
    fn test_set_value_errors() {
        let mut ws = workspace();
        let sum = operation_with(&mut ws, "/calc/sum", "add", "add.terms", vec![1i64]);
        assert!(matches!(
            ws.set_value(&sum, "add.terms", 3, Value::from(1i64)),
            Err(OperationError::Structural(StructuralError::InputIndexOutOfRange {
                index: 3,
                len: 1,
                ..
            }))
        ));
        assert!(matches!(
            ws.set_value(&sum, "add.terms", 0, None::<Value>),
            Err(OperationError::Structural(StructuralError::NullInputValue(_)))
        ));

        let median = operation_with(&mut ws, "/agg/median", "median", "median.terms", vec![1i64]);
        assert!(matches!(
            ws.set_value(&median, "median.terms", 0, Value::from(2i64)),
            Err(OperationError::Structural(StructuralError::NotModifiable(_)))
        ));
    }
}

#[cfg(test)]
mod composite_tests {
    use super::*;

    #[test]
    fn test_delegates_are_created() {
        let mut ws = workspace();
        let average = ws
            .create_operation("t", "/agg/avg", "average")
            .expect("create failed");
        let delegates = ws.delegates(&average).expect("delegates failed");
        let paths: Vec<&str> = delegates.iter().map(|op| op.path()).collect();
        assert_eq!(paths, vec!["/agg/avg/sum", "/agg/avg/mean"]);
        assert_eq!(delegates[0].kind(), OperationKind::Add);
        assert_eq!(delegates[1].kind(), OperationKind::Divide);
        assert!(delegates.iter().all(|op| op.owner() == Some(&average)));
        // Delegates are not listed as operations of the transformation.
        assert_eq!(ws.operations("t").expect("operations failed").len(), 1);
        // Non-composite kinds have none.
        let sum = ws.create_operation("t", "/calc/sum", "add").expect("create failed");
        assert!(ws.delegates(&sum).expect("delegates failed").is_empty());
    }

    #[test]
    fn test_delegates_follow_the_terms() {
        let mut ws = workspace();
        let average = operation_with(
            &mut ws,
            "/agg/avg",
            "average",
            "average.terms",
            vec![Value::from(2i64), Value::path("/sensors/b/value")],
        );
        let sum = OperationHandle::new("/agg/avg/sum");
        let mean = OperationHandle::new("/agg/avg/mean");

        assert_eq!(
            values(&ws, &sum, "add.terms"),
            values(&ws, &average, "average.terms")
        );
        assert_eq!(values(&ws, &mean, "divide.dividend"), vec![Value::operation(&sum)]);
        assert_eq!(values(&ws, &mean, "divide.divisor"), vec![Value::from(2i64)]);
        assert_eq!(ws.get(&sum).expect("sum failed"), int(8));
        assert_float(&ws.get(&average).expect("average failed"), 4.0);

        ws.remove_input(&average, "average.terms", [Value::from(2i64)])
            .expect("remove_input failed");
        assert_eq!(values(&ws, &sum, "add.terms"), vec![Value::path("/sensors/b/value")]);
        assert_eq!(values(&ws, &mean, "divide.divisor"), vec![Value::from(1i64)]);
        assert_float(&ws.get(&average).expect("average failed"), 6.0);

        ws.set_input(&average, "average.terms", [1i64, 2, 3, 4].map(Value::from))
            .expect("set_input failed");
        assert_eq!(values(&ws, &mean, "divide.divisor"), vec![Value::from(4i64)]);
        assert_float(&ws.get(&average).expect("average failed"), 2.5);
    }

    #[test]
    fn test_median_keeps_delegates_in_sync() {
        let mut ws = workspace();
        let median = operation_with(&mut ws, "/agg/median", "median", "median.terms", vec![5i64, 1, 3]);
        assert_eq!(ws.get(&median).expect("median failed"), int(3));
        let sum = OperationHandle::new("/agg/median/sum");
        assert_eq!(values(&ws, &sum, "add.terms").len(), 3);
        assert_eq!(ws.get(&sum).expect("sum failed"), int(9));
    }

    #[test]
    fn test_delegates_cannot_be_edited_directly() {
        let mut ws = workspace();
        let average = operation_with(&mut ws, "/agg/avg", "average", "average.terms", vec![1i64]);
        let sum = OperationHandle::new("/agg/avg/sum");
        assert!(matches!(
            ws.add_input(&sum, "add.terms", [Value::from(1i64)]),
            Err(OperationError::Structural(StructuralError::DelegateOperation(_)))
        ));
        assert!(matches!(
            ws.remove_operation(&sum),
            Err(OperationError::Structural(StructuralError::DelegateOperation(_)))
        ));

        ws.remove_operation(&average).expect("remove failed");
        assert!(ws.operation(&sum).is_none());
        assert!(!ws.store().contains("/agg/avg/sum"));
    }

    #[test]
    fn test_delegate_paths_cannot_be_taken() {
        let mut ws = workspace();
        ws.create_operation("t", "/agg/avg/sum", "add").expect("create failed");
        assert!(matches!(
            ws.create_operation("t", "/agg/avg", "average"),
            Err(OperationError::Structural(StructuralError::DuplicatePath(_)))
        ));
    }
}
