//! Advisory memory accounting.
//!
//! A node's footprint is its own inline size plus the heap it owns: string
//! bytes and the footprints of its children. The figure is additive, so
//! adding a child to a repeated member grows the parent by exactly the
//! child's footprint.

use std::convert::Infallible;
use std::mem::size_of;

use crate::element::{Element, Xhtml};
use crate::primitives::PrimitiveType;
use crate::record::{MemberVisitor, Record};
use crate::resource::Resource;

pub(crate) fn record_footprint<R: Record>(record: &R) -> usize {
    let mut counter = FootprintCounter { total: 0 };
    let Ok(()) = record.walk(&mut counter);
    size_of::<R>() + counter.total
}

/// Footprint of a primitive element.
pub fn element_footprint<V: PrimitiveType>(element: &Element<V>) -> usize {
    size_of::<Element<V>>()
        + element.id.as_ref().map_or(0, String::len)
        + element.value.as_ref().map_or(0, PrimitiveType::heap_size)
        + element
            .extension
            .iter()
            .map(|extension| extension.memory_footprint())
            .sum::<usize>()
}

struct FootprintCounter {
    total: usize,
}

impl<'a> MemberVisitor<'a> for FootprintCounter {
    type Error = Infallible;

    fn attribute(&mut self, _name: &str, value: Option<&'a String>) -> Result<(), Infallible> {
        self.total += value.map_or(0, String::len);
        Ok(())
    }

    fn primitive<V: PrimitiveType>(
        &mut self,
        _name: &str,
        value: Option<&'a Element<V>>,
    ) -> Result<(), Infallible> {
        self.total += value.map_or(0, element_footprint);
        Ok(())
    }

    fn primitives<V: PrimitiveType>(
        &mut self,
        _name: &str,
        values: &'a [Element<V>],
    ) -> Result<(), Infallible> {
        self.total += values.iter().map(element_footprint).sum::<usize>();
        Ok(())
    }

    fn record<R: Record>(&mut self, _name: &str, value: Option<&'a R>) -> Result<(), Infallible> {
        self.total += value.map_or(0, R::memory_footprint);
        Ok(())
    }

    fn records<R: Record>(&mut self, _name: &str, values: &'a [R]) -> Result<(), Infallible> {
        self.total += values.iter().map(R::memory_footprint).sum::<usize>();
        Ok(())
    }

    fn resource(&mut self, _name: &str, value: Option<&'a Resource>) -> Result<(), Infallible> {
        self.total += value.map_or(0, Resource::memory_footprint);
        Ok(())
    }

    fn resources(&mut self, _name: &str, values: &'a [Resource]) -> Result<(), Infallible> {
        self.total += values.iter().map(Resource::memory_footprint).sum::<usize>();
        Ok(())
    }

    fn xhtml(&mut self, _name: &str, value: Option<&'a Xhtml>) -> Result<(), Infallible> {
        self.total += value.map_or(0, |x| x.0.len());
        Ok(())
    }
}
