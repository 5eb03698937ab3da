//! Child enumeration for [`FhirNode::children`], driven by the record walk.

use std::convert::Infallible;

use helios_fhirpath_support::{ChildNode, FhirNode};

use crate::choice::Choice;
use crate::element::{Element, Xhtml};
use crate::primitives::PrimitiveType;
use crate::record::{MemberVisitor, Record};
use crate::resource::Resource;

/// Children of `record` in schema order, restricted to `filter` when given.
pub(crate) fn collect_children<'a, R: Record>(
    record: &'a R,
    filter: Option<&str>,
) -> Vec<ChildNode<'a>> {
    let mut collector = ChildCollector {
        filter,
        children: Vec::new(),
    };
    let Ok(()) = record.walk(&mut collector);
    collector.children
}

struct ChildCollector<'a, 'f> {
    filter: Option<&'f str>,
    children: Vec<ChildNode<'a>>,
}

impl<'a> ChildCollector<'a, '_> {
    fn push(&mut self, name: &str, node: &'a dyn FhirNode) {
        if self.filter.is_none_or(|f| f == name) {
            self.children.push(ChildNode::new(name, node));
        }
    }
}

impl<'a> MemberVisitor<'a> for ChildCollector<'a, '_> {
    type Error = Infallible;

    fn attribute(&mut self, name: &str, value: Option<&'a String>) -> Result<(), Infallible> {
        if let Some(value) = value {
            self.push(name, value);
        }
        Ok(())
    }

    fn primitive<V: PrimitiveType>(
        &mut self,
        name: &str,
        value: Option<&'a Element<V>>,
    ) -> Result<(), Infallible> {
        if let Some(value) = value {
            self.push(name, value);
        }
        Ok(())
    }

    fn primitives<V: PrimitiveType>(
        &mut self,
        name: &str,
        values: &'a [Element<V>],
    ) -> Result<(), Infallible> {
        for value in values {
            self.push(name, value);
        }
        Ok(())
    }

    fn record<R: Record>(&mut self, name: &str, value: Option<&'a R>) -> Result<(), Infallible> {
        if let Some(value) = value {
            self.push(name, value);
        }
        Ok(())
    }

    fn records<R: Record>(&mut self, name: &str, values: &'a [R]) -> Result<(), Infallible> {
        for value in values {
            self.push(name, value);
        }
        Ok(())
    }

    fn resource(&mut self, name: &str, value: Option<&'a Resource>) -> Result<(), Infallible> {
        if let Some(value) = value {
            self.push(name, value);
        }
        Ok(())
    }

    fn resources(&mut self, name: &str, values: &'a [Resource]) -> Result<(), Infallible> {
        for value in values {
            self.push(name, value);
        }
        Ok(())
    }

    fn xhtml(&mut self, name: &str, value: Option<&'a Xhtml>) -> Result<(), Infallible> {
        if let Some(value) = value {
            self.push(name, value);
        }
        Ok(())
    }

    /// Choice payloads are reported under the logical member name.
    fn choice<C: Choice>(&mut self, name: &str, value: Option<&'a C>) -> Result<(), Infallible> {
        match value {
            Some(choice) => choice.walk(name, self),
            None => Ok(()),
        }
    }
}
