//! Shared proptest generators.
//!
//! Values are plain strings so the generators stay independent of the
//! client crate's types.

use proptest::prelude::*;

/// Operation names the server accepts in permission entries.
pub const OPERATIONS: [&str; 5] = ["read", "write", "delete", "read_acl", "write_acl"];

/// Generate credential names such as `/team/app/db-password`.
pub fn credential_name_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z][a-z0-9_-]{1,12}", 1..5)
        .prop_map(|segments| format!("/{}", segments.join("/")))
}

/// Generate credential path prefixes ending in `/`.
pub fn credential_path_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z][a-z0-9-]{1,10}", 1..4)
        .prop_map(|segments| format!("/{}/", segments.join("/")))
}

/// Generate actor identities of every kind the server knows.
pub fn actor_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z][a-z0-9-]{2,15}".prop_map(|id| format!("uaa-user:{id}")),
        "[a-z][a-z0-9_-]{2,15}".prop_map(|id| format!("uaa-client:{id}")),
        "[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}"
            .prop_map(|guid| format!("mtls-app:{guid}")),
    ]
}

/// Generate a non-empty subset of operation names, in canonical order.
pub fn operations_strategy() -> impl Strategy<Value = Vec<&'static str>> {
    prop::collection::btree_set(0..OPERATIONS.len(), 1..=OPERATIONS.len())
        .prop_map(|indices| indices.into_iter().map(|i| OPERATIONS[i]).collect())
}

/// Generate `(actor, operations)` entries with distinct actors.
pub fn permission_entries_strategy() -> impl Strategy<Value = Vec<(String, Vec<&'static str>)>> {
    prop::collection::btree_map(actor_strategy(), operations_strategy(), 1..6)
        .prop_map(|entries| entries.into_iter().collect())
}

/// Generate password values.
pub fn password_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9!@#$%^&*]{8,64}"
}

/// Generate HTTP status codes the client must treat as errors.
pub fn error_status_strategy() -> impl Strategy<Value = u16> {
    prop_oneof![
        Just(400u16),
        Just(401),
        Just(403),
        Just(404),
        Just(409),
        Just(422),
        Just(429),
        Just(500),
        Just(502),
        Just(503),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::strategy::ValueTree;
    use proptest::test_runner::TestRunner;

    #[test]
    fn test_operations_are_canonical_and_unique() {
        let mut runner = TestRunner::default();
        for _ in 0..50 {
            let ops = operations_strategy().new_tree(&mut runner).unwrap().current();
            assert!(!ops.is_empty());
            let positions: Vec<usize> = ops
                .iter()
                .map(|op| OPERATIONS.iter().position(|o| o == op).unwrap())
                .collect();
            assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_credential_names_are_absolute() {
        let mut runner = TestRunner::default();
        for _ in 0..50 {
            let name = credential_name_strategy().new_tree(&mut runner).unwrap().current();
            assert!(name.starts_with('/'));
            assert!(!name.contains("//"));
        }
    }
}
