//! Common test utilities for seeding stores and building workspaces.
use keisan::prelude::*;
use std::sync::Once;

static INIT: Once = Once::new();

/// Routes `log` output through the test harness. Set `RUST_LOG=debug` to see it.
#[allow(dead_code)]
pub fn init_logging() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// A store with a handful of sensor readings.
///
/// - `/sensors/a/value` = 4
/// - `/sensors/b/value` = 6
/// - `/sensors/c/value` = 2.5
/// - `/sensors/label/value` = "line-1"
/// - `/sensors/series/values` = [1, 3, 5]
/// - `/sensors/empty` exists but has no properties
#[allow(dead_code)]
pub fn sensor_store() -> MemoryStore {
    let store = MemoryStore::new()
        .with_property("/sensors/a/value", 4i64)
        .and_then(|s| s.with_property("/sensors/b/value", 6i64))
        .and_then(|s| s.with_property("/sensors/c/value", 2.5))
        .and_then(|s| s.with_property("/sensors/label/value", "line-1"))
        .and_then(|s| {
            s.with_property(
                "/sensors/series/values",
                vec![Scalar::from(1i64), Scalar::from(3i64), Scalar::from(5i64)],
            )
        })
        .expect("Failed to seed sensor store");
    store
        .create_node("/sensors/empty")
        .expect("Failed to create empty node");
    store
}

/// A workspace over `sensor_store` with a single transformation `t`.
#[allow(dead_code)]
pub fn workspace() -> Workspace {
    init_logging();
    let mut workspace = Workspace::new(sensor_store());
    workspace
        .create_transformation("t", "Test transformation")
        .expect("Failed to create transformation");
    workspace
}

/// Creates an operation of `kind` at `path` in transformation `t` and fills one
/// input group.
#[allow(dead_code)]
pub fn operation_with<V: Into<Value>>(
    workspace: &mut Workspace,
    path: &str,
    kind: &str,
    descriptor_id: &str,
    values: Vec<V>,
) -> OperationHandle {
    let handle = workspace
        .create_operation("t", path, kind)
        .expect("Failed to create operation");
    let values: Vec<Value> = values.into_iter().map(Into::into).collect();
    if !values.is_empty() {
        workspace
            .add_input(&handle, descriptor_id, values)
            .expect("Failed to add inputs");
    }
    handle
}

/// Creates a binary operation with one value per slot.
#[allow(dead_code)]
pub fn binary_operation(
    workspace: &mut Workspace,
    path: &str,
    kind: &str,
    left: (&str, Value),
    right: (&str, Value),
) -> OperationHandle {
    let handle = workspace
        .create_operation("t", path, kind)
        .expect("Failed to create operation");
    workspace
        .add_input(&handle, left.0, [left.1])
        .expect("Failed to add left input");
    workspace
        .add_input(&handle, right.0, [right.1])
        .expect("Failed to add right input");
    handle
}

#[allow(dead_code)]
pub fn int(n: i64) -> Resolved {
    Resolved::Single(Scalar::from(n))
}

#[allow(dead_code)]
pub fn float(n: f64) -> Resolved {
    Resolved::Single(Scalar::from(n))
}

#[allow(dead_code)]
pub fn many(values: &[i64]) -> Resolved {
    Resolved::Many(values.iter().copied().map(Scalar::from).collect())
}

/// Asserts that the result is a single float within `1e-9` of `expected`.
#[allow(dead_code)]
pub fn assert_float(result: &Resolved, expected: f64) {
    let actual = result
        .as_single()
        .and_then(Scalar::as_numeric)
        .map(Numeric::to_f64)
        .expect("Result is not a single number");
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

/// Two transformations: production totals and a derived average that references an
/// operation declared later in the document.
#[allow(dead_code)]
pub const PRODUCTION_JSON: &str = r#"{
    "properties": {
        "/line/a/output": 120,
        "/line/b/output": 80,
        "/line/c/output": 100,
        "/line/shifts/hours": [8, 8, 6],
        "/line/name/value": "Line 1"
    },
    "transformations": [
        {
            "id": "report",
            "name": "Daily report",
            "operations": [
                {
                    "path": "/report/mean",
                    "kind": "average",
                    "inputs": [
                        {"descriptor": "terms", "value": {"operation": "/totals/output"}},
                        {"descriptor": "terms", "value": {"literal": 100}}
                    ]
                },
                {
                    "path": "/report/title",
                    "kind": "concat",
                    "inputs": [
                        {"descriptor": "parts", "value": {"property": "/line/name/value"}},
                        {"descriptor": "parts", "value": {"literal": ": "}},
                        {"descriptor": "parts", "value": {"operation": "/totals/output"}}
                    ]
                }
            ]
        },
        {
            "id": "totals",
            "name": "Totals",
            "operations": [
                {
                    "path": "/totals/output",
                    "kind": "sum",
                    "inputs": [
                        {"descriptor": "terms", "value": {"property": "/line/a/output"}},
                        {"descriptor": "terms", "value": {"property": "/line/b/output"}},
                        {"descriptor": "add.terms", "value": {"property": "/line/c/output"}}
                    ]
                },
                {
                    "path": "/totals/hours",
                    "kind": "add",
                    "inputs": [
                        {"descriptor": "terms", "value": {"properties": "/line/shifts/hours"}}
                    ]
                }
            ]
        }
    ]
}"#;
