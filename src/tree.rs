//! Pointer-addressed views over schema and instance documents.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde_json::Value;

use crate::pointer::JsonPointer;

static MISSING: Value = Value::Null;

/// A schema document together with the location currently being processed.
///
/// Cloning is cheap: the document is shared.
#[derive(Debug, Clone)]
pub struct SchemaTree {
    document: Arc<Value>,
    pointer: JsonPointer,
}

impl SchemaTree {
    pub fn new(document: Value) -> Self {
        Self::from_shared(Arc::new(document))
    }

    pub fn from_shared(document: Arc<Value>) -> Self {
        Self {
            document,
            pointer: JsonPointer::root(),
        }
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn pointer(&self) -> &JsonPointer {
        &self.pointer
    }

    /// The schema node at the current pointer, or `null` if the pointer
    /// does not resolve.
    pub fn node(&self) -> &Value {
        self.pointer.resolve(&self.document).unwrap_or(&MISSING)
    }

    /// A tree over the same document, one level deeper.
    pub fn append(&self, token: impl Into<String>) -> Self {
        self.with_pointer(self.pointer.append(token))
    }

    /// A tree over the same document at an arbitrary location.
    pub fn with_pointer(&self, pointer: JsonPointer) -> Self {
        Self {
            document: Arc::clone(&self.document),
            pointer,
        }
    }

    /// Identity of the current node, used as the validator cache key.
    pub fn key(&self) -> SchemaKey {
        SchemaKey {
            document: Arc::clone(&self.document),
            pointer: self.pointer.clone(),
        }
    }
}

/// Identity of a schema node: the owning document allocation plus a pointer.
///
/// Two structurally equal documents loaded separately never share a key.
#[derive(Debug, Clone)]
pub struct SchemaKey {
    document: Arc<Value>,
    pointer: JsonPointer,
}

impl SchemaKey {
    pub fn pointer(&self) -> &JsonPointer {
        &self.pointer
    }
}

impl PartialEq for SchemaKey {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.document, &other.document) && self.pointer == other.pointer
    }
}

impl Eq for SchemaKey {}

impl Hash for SchemaKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.document), state);
        self.pointer.hash(state);
    }
}

/// A borrowed, read-only instance document and the location being validated.
#[derive(Debug, Clone)]
pub struct InstanceTree<'i> {
    document: &'i Value,
    pointer: JsonPointer,
}

impl<'i> InstanceTree<'i> {
    pub fn new(document: &'i Value) -> Self {
        Self {
            document,
            pointer: JsonPointer::root(),
        }
    }

    pub fn pointer(&self) -> &JsonPointer {
        &self.pointer
    }

    pub fn node(&self) -> &'i Value {
        self.pointer.resolve(self.document).unwrap_or(&MISSING)
    }

    pub fn append(&self, token: impl Into<String>) -> Self {
        Self {
            document: self.document,
            pointer: self.pointer.append(token),
        }
    }
}

/// One (schema node, instance location) pair on the current validation path.
#[derive(Debug)]
struct Frame {
    schema: SchemaKey,
    instance: JsonPointer,
    parent: Option<Arc<Frame>>,
}

/// The pair (schema location, instance location) threaded through processors.
///
/// It also carries the chain of pairs the processor has entered on the way
/// here, so that a keyword re-applying a node to the same instance location
/// is caught instead of recursing forever.
#[derive(Debug, Clone)]
pub struct FullData<'i> {
    schema: SchemaTree,
    instance: InstanceTree<'i>,
    path: Option<Arc<Frame>>,
}

impl<'i> FullData<'i> {
    pub fn new(schema: SchemaTree, instance: InstanceTree<'i>) -> Self {
        Self {
            schema,
            instance,
            path: None,
        }
    }

    pub fn schema(&self) -> &SchemaTree {
        &self.schema
    }

    pub fn instance(&self) -> &InstanceTree<'i> {
        &self.instance
    }

    /// Same instance, different schema location.
    pub fn with_schema(&self, schema: SchemaTree) -> Self {
        Self {
            schema,
            instance: self.instance.clone(),
            path: self.path.clone(),
        }
    }

    /// Same schema, different instance location.
    pub fn with_instance(&self, instance: InstanceTree<'i>) -> Self {
        Self {
            schema: self.schema.clone(),
            instance,
            path: self.path.clone(),
        }
    }

    /// Record the current pair on the validation path.
    ///
    /// Returns `None` if the pair is already on the path.
    pub fn enter(&self) -> Option<Self> {
        let schema = self.schema.key();
        let instance = self.instance.pointer();
        let mut frame = self.path.as_deref();
        while let Some(current) = frame {
            if current.schema == schema && &current.instance == instance {
                return None;
            }
            frame = current.parent.as_deref();
        }
        Some(Self {
            schema: self.schema.clone(),
            instance: self.instance.clone(),
            path: Some(Arc::new(Frame {
                schema,
                instance: instance.clone(),
                parent: self.path.clone(),
            })),
        })
    }

    /// Number of pairs entered on the way to this one.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut frame = self.path.as_deref();
        while let Some(current) = frame {
            depth += 1;
            frame = current.parent.as_deref();
        }
        depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    #[test]
    fn node_follows_pointer() {
        let tree = SchemaTree::new(json!({"extends": {"type": "string"}}));
        assert_eq!(tree.node()["extends"]["type"], "string");
        let child = tree.append("extends");
        assert_eq!(child.pointer().to_string(), "/extends");
        assert_eq!(child.node(), &json!({"type": "string"}));
        assert!(tree.append("missing").node().is_null());
    }

    #[test]
    fn keys_compare_by_document_identity() {
        let schema = json!({"properties": {"a": {"type": "string"}}});
        let first = SchemaTree::new(schema.clone());
        let second = SchemaTree::new(schema);

        assert_eq!(first.key(), first.clone().key());
        assert_eq!(first.append("properties").key(), first.append("properties").key());
        assert_ne!(first.key(), second.key());

        let keys: HashSet<_> = [first.key(), second.key(), first.clone().key()]
            .into_iter()
            .collect();
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn full_data_advances_independently() {
        let instance = json!([1, 2]);
        let data = FullData::new(SchemaTree::new(json!({"items": {}})), InstanceTree::new(&instance));
        let child = data
            .with_schema(data.schema().append("items"))
            .with_instance(data.instance().append("1"));
        assert_eq!(child.schema().pointer().to_string(), "/items");
        assert_eq!(child.instance().node(), &json!(2));
        assert!(data.instance().pointer().is_root());
    }

    #[test]
    fn enter_rejects_pairs_already_on_the_path() {
        let instance = json!({"a": 1});
        let root = FullData::new(SchemaTree::new(json!({"allOf": [{}]})), InstanceTree::new(&instance));
        let entered = root.enter().unwrap();
        assert_eq!(entered.depth(), 1);
        assert!(entered.enter().is_none());

        // same schema node, another instance location
        let member = entered.with_instance(entered.instance().append("a"));
        let member = member.enter().unwrap();
        assert_eq!(member.depth(), 2);

        // a sub-schema leading back to an entered pair
        let sub = member.with_schema(member.schema().append("allOf").append("0"));
        let sub = sub.enter().unwrap();
        let back = sub.with_schema(sub.schema().with_pointer(JsonPointer::root()));
        assert!(back.enter().is_none());
        assert!(back.with_instance(InstanceTree::new(&instance)).enter().is_none());

        // the sub-schema itself was only entered at "/a"
        assert!(sub.with_instance(InstanceTree::new(&instance)).enter().is_some());
    }

    #[test]
    fn separate_documents_never_collide_on_the_path() {
        let instance = json!(1);
        let first = FullData::new(SchemaTree::new(json!({})), InstanceTree::new(&instance));
        let entered = first.enter().unwrap();
        let other = entered.with_schema(SchemaTree::new(json!({})));
        assert!(other.enter().is_some());
    }
}
