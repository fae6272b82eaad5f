//! Pruning of empty branches before a field tree is encoded.

use crate::types::{FieldSet, FieldValue};

/// A [`FieldSet`] with every null, empty-string and empty-container node removed.
///
/// Parents left without children are removed as well. The order of the
/// surviving siblings is untouched. Only a sanitized tree can be handed to
/// the [`codec`](crate::codec) encoder.
///
/// ```
/// use genesis_core::{tree::SanitizedTree, types::{FieldSet, FieldValue}};
///
/// let fields = FieldSet::new().with(
///     "payment_transaction",
///     FieldSet::new()
///         .with("transaction_id", "43671")
///         .with("usage", "")
///         .with("remote_ip", FieldValue::Null)
///         .with("billing_address", FieldSet::new().with("country", ""))
///         .with("amount", "5000"),
/// );
///
/// let tree = SanitizedTree::build(fields);
/// let payment = tree.as_fields().get("payment_transaction").and_then(FieldValue::as_map).unwrap();
/// assert_eq!(payment.keys().collect::<Vec<_>>(), ["transaction_id", "amount"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanitizedTree(FieldSet);

impl SanitizedTree {
    pub fn build(fields: FieldSet) -> Self {
        SanitizedTree(sanitize_fields(fields))
    }

    pub fn as_fields(&self) -> &FieldSet {
        &self.0
    }

    pub fn into_inner(self) -> FieldSet {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<FieldSet> for SanitizedTree {
    fn from(fields: FieldSet) -> Self {
        SanitizedTree::build(fields)
    }
}

fn sanitize_fields(fields: FieldSet) -> FieldSet {
    fields
        .into_iter()
        .filter_map(|(name, value)| sanitize_value(value).map(|value| (name, value)))
        .collect()
}

fn sanitize_value(value: FieldValue) -> Option<FieldValue> {
    match value {
        FieldValue::Null => None,
        FieldValue::Text(text) if text.is_empty() => None,
        FieldValue::Text(text) => Some(FieldValue::Text(text)),
        FieldValue::List(items) => {
            let items: Vec<FieldValue> = items.into_iter().filter_map(sanitize_value).collect();
            (!items.is_empty()).then_some(FieldValue::List(items))
        }
        FieldValue::Map(fields) => {
            let fields = sanitize_fields(fields);
            (!fields.is_empty()).then_some(FieldValue::Map(fields))
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn empty_input_gives_empty_tree() {
        assert!(SanitizedTree::build(FieldSet::new()).is_empty());
    }

    #[test]
    fn removes_parents_emptied_recursively() {
        let fields = FieldSet::new()
            .with("transaction_id", "1")
            .with(
                "threeds_v2_params",
                FieldSet::new().with(
                    "control",
                    FieldSet::new()
                        .with("device_type", "")
                        .with("challenge_window_size", FieldValue::Null),
                ),
            )
            .with("currency", "EUR");

        let tree = SanitizedTree::build(fields);

        assert_eq!(
            tree.into_inner(),
            FieldSet::new()
                .with("transaction_id", "1")
                .with("currency", "EUR")
        );
    }

    #[test]
    fn lists_are_pruned_element_wise() {
        let mut fields = FieldSet::new();
        fields.append("transaction_type", "sale");
        fields.append("transaction_type", "");
        fields.append("transaction_type", "authorize3d");
        fields.append("empty", FieldValue::Null);

        let tree = SanitizedTree::build(fields);

        assert_eq!(
            tree.as_fields().get("transaction_type"),
            Some(&FieldValue::List(vec!["sale".into(), "authorize3d".into()]))
        );
        assert!(tree.as_fields().get("empty").is_none());
    }

    fn arb_value() -> impl Strategy<Value = FieldValue> {
        let leaf = prop_oneof![
            Just(FieldValue::Null),
            Just(FieldValue::from("")),
            "[a-z0-9]{1,6}".prop_map(FieldValue::Text),
        ];
        leaf.prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(FieldValue::List),
                prop::collection::vec(("[a-e]{1,3}", inner), 0..4)
                    .prop_map(|entries| FieldValue::Map(entries.into_iter().collect())),
            ]
        })
    }

    fn arb_fields() -> impl Strategy<Value = FieldSet> {
        prop::collection::vec(("[a-e]{1,3}", arb_value()), 0..6)
            .prop_map(|entries| entries.into_iter().collect())
    }

    fn has_empty_node(fields: &FieldSet) -> bool {
        fields.iter().any(|(_, value)| value_has_empty(value))
    }

    fn value_has_empty(value: &FieldValue) -> bool {
        match value {
            FieldValue::Map(fields) => fields.is_empty() || has_empty_node(fields),
            FieldValue::List(items) => items.is_empty() || items.iter().any(value_has_empty),
            other => other.is_empty(),
        }
    }

    fn leaves(fields: &FieldSet, out: &mut Vec<String>) {
        for (_, value) in fields.iter() {
            value_leaves(value, out);
        }
    }

    fn value_leaves(value: &FieldValue, out: &mut Vec<String>) {
        match value {
            FieldValue::Text(text) if !text.is_empty() => out.push(text.clone()),
            FieldValue::List(items) => items.iter().for_each(|item| value_leaves(item, out)),
            FieldValue::Map(fields) => leaves(fields, out),
            _ => {}
        }
    }

    proptest! {
        #[test]
        fn sanitized_tree_has_no_empty_nodes(fields in arb_fields()) {
            let tree = SanitizedTree::build(fields);
            prop_assert!(!has_empty_node(tree.as_fields()));
        }

        #[test]
        fn sanitizing_keeps_non_empty_leaves_in_order(fields in arb_fields()) {
            let mut before = Vec::new();
            leaves(&fields, &mut before);

            let tree = SanitizedTree::build(fields);
            let mut after = Vec::new();
            leaves(tree.as_fields(), &mut after);

            prop_assert_eq!(before, after);
        }
    }
}
