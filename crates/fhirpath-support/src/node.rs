//! The reflective walk an evaluator uses to navigate a resource tree.

use crate::type_info::TypeInfoResult;
use crate::value::PrimitiveValue;

/// A child of a node, tagged with the member name it was found under.
///
/// Choice members are reported under their logical name (`value`, not
/// `valueQuantity`); the concrete type is available from
/// [`FhirNode::type_info`] of the child.
#[derive(Clone)]
pub struct ChildNode<'a> {
    pub name: String,
    pub node: &'a dyn FhirNode,
}

impl<'a> ChildNode<'a> {
    pub fn new(name: impl Into<String>, node: &'a dyn FhirNode) -> Self {
        Self {
            name: name.into(),
            node,
        }
    }
}

impl std::fmt::Debug for ChildNode<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChildNode")
            .field("name", &self.name)
            .field("type", &self.node.type_info())
            .finish()
    }
}

/// A node of a FHIR resource tree as seen by an evaluator.
pub trait FhirNode {
    /// Static type of this node.
    fn type_info(&self) -> TypeInfoResult;

    /// Children in schema order, restricted to members called `name` when given.
    ///
    /// Repeated members contribute one child per item, with the same name.
    fn children(&self, name: Option<&str>) -> Vec<ChildNode<'_>>;

    /// The scalar of a primitive node; `None` for complex nodes and for
    /// primitives that only carry an id or extensions.
    fn primitive_value(&self) -> Option<PrimitiveValue> {
        None
    }
}

impl<T: FhirNode + ?Sized> FhirNode for Box<T> {
    fn type_info(&self) -> TypeInfoResult {
        (**self).type_info()
    }

    fn children(&self, name: Option<&str>) -> Vec<ChildNode<'_>> {
        (**self).children(name)
    }

    fn primitive_value(&self) -> Option<PrimitiveValue> {
        (**self).primitive_value()
    }
}

/// Plain strings are the attribute-level members of the model (element
/// `id`, extension `url`).
impl FhirNode for String {
    fn type_info(&self) -> TypeInfoResult {
        TypeInfoResult::system("String")
    }

    fn children(&self, _name: Option<&str>) -> Vec<ChildNode<'_>> {
        Vec::new()
    }

    fn primitive_value(&self) -> Option<PrimitiveValue> {
        Some(PrimitiveValue::String(self.clone()))
    }
}
