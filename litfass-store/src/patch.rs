use crate::document::FieldMap;
use serde_json::Value;

/// Atomic field-level update. The store applies a patch to one field of one
/// document without the caller ever reading the prior value, so concurrent
/// patches from different callers never clobber each other.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum FieldPatch {
    /// Add every element not already present. Set semantics.
    ArrayUnion {
        field: String,
        elements: Vec<Value>,
    },
    /// Remove all occurrences of every element.
    ArrayRemove {
        field: String,
        elements: Vec<Value>,
    },
    /// Append every element, duplicates allowed, order preserved.
    ArrayAppend {
        field: String,
        elements: Vec<Value>,
    },
}

impl FieldPatch {
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            FieldPatch::ArrayUnion { field, .. }
            | FieldPatch::ArrayRemove { field, .. }
            | FieldPatch::ArrayAppend { field, .. } => field,
        }
    }

    /// A missing or non-array target field is treated as an empty array
    /// first.
    pub fn apply(&self, fields: &mut FieldMap) {
        let array = coerce_array(fields, self.field());

        match self {
            FieldPatch::ArrayUnion { elements, .. } => {
                for element in elements {
                    if !array.contains(element) {
                        array.push(element.clone());
                    }
                }
            }
            FieldPatch::ArrayRemove { elements, .. } => {
                array.retain(|existing| !elements.contains(existing));
            }
            FieldPatch::ArrayAppend { elements, .. } => {
                array.extend(elements.iter().cloned());
            }
        }
    }
}

fn coerce_array<'a>(fields: &'a mut FieldMap, field: &str) -> &'a mut Vec<Value> {
    let entry = fields
        .entry(field)
        .or_insert_with(|| Value::Array(Vec::new()));

    if !entry.is_array() {
        *entry = Value::Array(Vec::new());
    }

    entry
        .as_array_mut()
        .expect("The entry was coerced to an array above.")
}
