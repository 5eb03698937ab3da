//! `Bundle`: a container of resources, one per entry.

use crate::datatypes::{Identifier, Meta};
use crate::element::{Code, Id, Instant, UnsignedInt, Uri};
use crate::extension::Extension;
use crate::resource::Resource;

fhir_record! {
    /// A collection of resources.
    pub struct Bundle: "Bundle" {
        id: primitive<Id> = "id",
        meta: record<Meta> = "meta",
        implicit_rules: primitive<Uri> = "implicitRules",
        language: primitive<Code> = "language",
        identifier: record<Identifier> = "identifier",
        type_: primitive<Code> = "type",
        timestamp: primitive<Instant> = "timestamp",
        total: primitive<UnsignedInt> = "total",
        entry: records<BundleEntry> = "entry",
    }
}

fhir_record! {
    pub struct BundleEntry: "BundleEntry" {
        id: attribute<String> = "id",
        extension: records<Extension> = "extension",
        modifier_extension: records<Extension> = "modifierExtension",
        full_url: primitive<Uri> = "fullUrl",
        resource: resource<Resource> = "resource",
    }
}
