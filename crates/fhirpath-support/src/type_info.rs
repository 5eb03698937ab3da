//! Static type descriptors reported by model nodes.

use std::fmt;

/// Namespace of FHIR model types.
pub const FHIR_NAMESPACE: &str = "FHIR";

/// Namespace of FHIRPath system types (`System.String`, `System.Boolean`, ...).
pub const SYSTEM_NAMESPACE: &str = "System";

/// Qualified type name of a node, e.g. `FHIR.HumanName` or `System.String`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeInfoResult {
    pub namespace: &'static str,
    pub name: &'static str,
}

impl TypeInfoResult {
    pub const fn new(namespace: &'static str, name: &'static str) -> Self {
        Self { namespace, name }
    }

    /// A type from the FHIR namespace.
    pub const fn fhir(name: &'static str) -> Self {
        Self::new(FHIR_NAMESPACE, name)
    }

    /// A type from the System namespace.
    pub const fn system(name: &'static str) -> Self {
        Self::new(SYSTEM_NAMESPACE, name)
    }

    pub fn is_fhir(&self) -> bool {
        self.namespace == FHIR_NAMESPACE
    }
}

impl fmt::Display for TypeInfoResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.name)
    }
}
