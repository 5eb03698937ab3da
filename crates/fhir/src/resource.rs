//! The closed registry of resource shapes.

use helios_fhirpath_support::{ChildNode, FhirNode, PrimitiveValue, TypeInfoResult};

use crate::record::{MemberVisitor, Record};
use crate::resources::{Bundle, Observation, Organization, Patient};

/// A record shape that can stand as a resource.
pub trait ResourceRecord: Record {
    fn into_resource(self) -> Resource;

    /// Unwraps `resource` if it holds this shape, handing it back otherwise.
    fn from_resource(resource: Resource) -> Result<Self, Resource>;

    /// The logical id, if set.
    fn resource_id(&self) -> Option<&str>;
}

/// Builds a resource record from whatever input a decoder is positioned on.
///
/// [`Resource::decode_by_type`] picks the shape; the builder reads it.
pub trait ResourceBuilder {
    type Error;

    fn build<R: ResourceRecord>(&mut self) -> Result<R, Self::Error>;
}

/// A value that encodes as a whole resource document: [`Resource`] itself
/// or any concrete resource record.
pub trait FhirDocument: Sized {
    /// The resource type this document must have, `None` if any will do.
    const EXPECTED_TYPE: Option<&'static str>;

    fn resource_type(&self) -> &'static str;

    fn walk_document<'a, V: MemberVisitor<'a>>(&'a self, visitor: &mut V)
    -> Result<(), V::Error>;

    fn from_resource(resource: Resource) -> Result<Self, Resource>;
}

macro_rules! resource_registry {
    ($($variant:ident),+ $(,)?) => {
        /// Any registered resource.
        ///
        /// Variants are boxed so the enum stays pointer-sized and nested
        /// `contained` chains cost little stack while decoding.
        #[derive(Debug, Clone, PartialEq)]
        pub enum Resource {
            $( $variant(Box<$variant>), )+
        }

        /// Every registered resource type tag.
        pub const RESOURCE_TYPES: &[&str] = &[$(stringify!($variant)),+];

        impl Resource {
            pub fn resource_type(&self) -> &'static str {
                match self {
                    $( Resource::$variant(_) => <$variant as Record>::TYPE_NAME, )+
                }
            }

            pub fn id(&self) -> Option<&str> {
                match self {
                    $( Resource::$variant(r) => r.resource_id(), )+
                }
            }

            /// Builds the shape registered for `resource_type`, or returns
            /// `Ok(None)` for an unregistered tag.
            pub fn decode_by_type<B: ResourceBuilder>(
                resource_type: &str,
                builder: &mut B,
            ) -> Result<Option<Resource>, B::Error> {
                $(
                    if resource_type == <$variant as Record>::TYPE_NAME {
                        let record = builder.build::<$variant>()?;
                        return Ok(Some(record.into_resource()));
                    }
                )+
                Ok(None)
            }

            pub fn walk<'a, V: MemberVisitor<'a>>(&'a self, visitor: &mut V) -> Result<(), V::Error> {
                match self {
                    $( Resource::$variant(r) => r.walk(visitor), )+
                }
            }

            pub fn memory_footprint(&self) -> usize {
                let inner = match self {
                    $( Resource::$variant(r) => r.memory_footprint(), )+
                };
                std::mem::size_of::<Self>() + inner
            }

            fn as_node(&self) -> &dyn FhirNode {
                match self {
                    $( Resource::$variant(r) => &**r as &dyn FhirNode, )+
                }
            }
        }

        $(
            impl ResourceRecord for $variant {
                fn into_resource(self) -> Resource {
                    Resource::$variant(Box::new(self))
                }

                fn from_resource(resource: Resource) -> Result<Self, Resource> {
                    match resource {
                        Resource::$variant(r) => Ok(*r),
                        other => Err(other),
                    }
                }

                fn resource_id(&self) -> Option<&str> {
                    self.id.as_ref()?.value.as_ref().map(|id| id.as_str())
                }
            }

            impl From<$variant> for Resource {
                fn from(record: $variant) -> Self {
                    record.into_resource()
                }
            }
        )+
    };
}

resource_registry!(Patient, Observation, Organization, Bundle);

impl FhirNode for Resource {
    fn type_info(&self) -> TypeInfoResult {
        self.as_node().type_info()
    }

    fn children(&self, name: Option<&str>) -> Vec<ChildNode<'_>> {
        self.as_node().children(name)
    }

    fn primitive_value(&self) -> Option<PrimitiveValue> {
        None
    }
}

impl FhirDocument for Resource {
    const EXPECTED_TYPE: Option<&'static str> = None;

    fn resource_type(&self) -> &'static str {
        Resource::resource_type(self)
    }

    fn walk_document<'a, V: MemberVisitor<'a>>(
        &'a self,
        visitor: &mut V,
    ) -> Result<(), V::Error> {
        self.walk(visitor)
    }

    fn from_resource(resource: Resource) -> Result<Self, Resource> {
        Ok(resource)
    }
}

impl<R: ResourceRecord> FhirDocument for R {
    const EXPECTED_TYPE: Option<&'static str> = Some(R::TYPE_NAME);

    fn resource_type(&self) -> &'static str {
        R::TYPE_NAME
    }

    fn walk_document<'a, V: MemberVisitor<'a>>(
        &'a self,
        visitor: &mut V,
    ) -> Result<(), V::Error> {
        self.walk(visitor)
    }

    fn from_resource(resource: Resource) -> Result<Self, Resource> {
        <R as ResourceRecord>::from_resource(resource)
    }
}
