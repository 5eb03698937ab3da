//! Declarative record and choice definitions.
//!
//! A record is declared once as an ordered member list; its struct, member
//! walk, member decoder and [`FhirNode`](helios_fhirpath_support::FhirNode)
//! impl all expand from that list.
//!
//! ```ignore
//! fhir_record! {
//!     pub struct Period: "Period" {
//!         id: attribute<String> = "id",
//!         extension: records<Extension> = "extension",
//!         start: primitive<DateTime> = "start",
//!         end: primitive<DateTime> = "end",
//!     }
//! }
//! ```

macro_rules! fhir_record {
    (@type attribute $ty:ty) => { Option<$ty> };
    (@type primitive $ty:ty) => { Option<$ty> };
    (@type primitives $ty:ty) => { Vec<$ty> };
    (@type record $ty:ty) => { Option<$ty> };
    (@type records $ty:ty) => { Vec<$ty> };
    (@type resource $ty:ty) => { Option<$ty> };
    (@type resources $ty:ty) => { Vec<$ty> };
    (@type choice $ty:ty) => { Option<$ty> };
    (@type xhtml $ty:ty) => { Option<$ty> };

    (@walk attribute $v:ident $wire:literal $slot:expr) => { $v.attribute($wire, $slot.as_ref()) };
    (@walk primitive $v:ident $wire:literal $slot:expr) => { $v.primitive($wire, $slot.as_ref()) };
    (@walk primitives $v:ident $wire:literal $slot:expr) => { $v.primitives($wire, $slot.as_slice()) };
    (@walk record $v:ident $wire:literal $slot:expr) => { $v.record($wire, $slot.as_ref()) };
    (@walk records $v:ident $wire:literal $slot:expr) => { $v.records($wire, $slot.as_slice()) };
    (@walk resource $v:ident $wire:literal $slot:expr) => { $v.resource($wire, $slot.as_ref()) };
    (@walk resources $v:ident $wire:literal $slot:expr) => { $v.resources($wire, $slot.as_slice()) };
    (@walk choice $v:ident $wire:literal $slot:expr) => { $v.choice($wire, $slot.as_ref()) };
    (@walk xhtml $v:ident $wire:literal $slot:expr) => { $v.xhtml($wire, $slot.as_ref()) };

    (@finish choice $slot:expr) => {
        $crate::choice::drop_empty_choice(&mut $slot);
    };
    (@finish $kind:ident $slot:expr) => {};

    (@decode choice $d:ident $name:ident $wire:literal $slot:expr) => {
        if $crate::choice::decode_choice(&mut $slot, $wire, $name, $d)? {
            return Ok(true);
        }
    };
    (@decode $kind:ident $d:ident $name:ident $wire:literal $slot:expr) => {
        if $name == $wire {
            $d.$kind(&mut $slot)?;
            return Ok(true);
        }
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident : $type_name:literal {
            $(
                $(#[$field_meta:meta])*
                $field:ident : $kind:ident < $ty:ty > = $wire:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Default)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                pub $field: fhir_record!(@type $kind $ty),
            )*
        }

        impl $crate::record::Record for $name {
            const TYPE_NAME: &'static str = $type_name;

            fn walk<'a, V: $crate::record::MemberVisitor<'a>>(
                &'a self,
                visitor: &mut V,
            ) -> Result<(), V::Error> {
                $( fhir_record!(@walk $kind visitor $wire self.$field)?; )*
                Ok(())
            }

            fn decode_member<D: $crate::record::MemberDecoder>(
                &mut self,
                name: &str,
                decoder: &mut D,
            ) -> Result<bool, D::Error> {
                $( fhir_record!(@decode $kind decoder name $wire self.$field); )*
                Ok(false)
            }

            fn finish_decode(&mut self) -> Result<(), $crate::error::MissingMember> {
                $( fhir_record!(@finish $kind self.$field); )*
                Ok(())
            }
        }

        impl helios_fhirpath_support::FhirNode for $name {
            fn type_info(&self) -> helios_fhirpath_support::TypeInfoResult {
                helios_fhirpath_support::TypeInfoResult::fhir($type_name)
            }

            fn children(
                &self,
                name: Option<&str>,
            ) -> Vec<helios_fhirpath_support::ChildNode<'_>> {
                $crate::children::collect_children(self, name)
            }
        }
    };
}

/// Declares a choice enum. Each alternative is `Suffix(kind Type)` where
/// `kind` is `primitive` or `record`.
macro_rules! fhir_choice {
    (@walk primitive $v:ident $name:ident $inner:ident) => { $v.primitive($name, Some($inner)) };
    (@walk record $v:ident $name:ident $inner:ident) => { $v.record($name, Some($inner)) };

    (@decode primitive $d:ident $inner:ident) => { $d.primitive(&mut $inner) };
    (@decode record $d:ident $inner:ident) => { $d.record(&mut $inner) };

    // the alternative stays selected even if it decoded empty
    (@seen primitive $inner:ident) => {
        if $inner.is_none() {
            $inner = Some(Default::default());
        }
    };
    (@seen record $inner:ident) => {};

    (@is_empty primitive $inner:ident) => { $inner.is_empty() };
    (@is_empty record $inner:ident) => {{
        let _ = $inner;
        false
    }};

    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident ( $kind:ident $ty:ty )
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant($ty),
            )+
        }

        impl $crate::choice::Choice for $name {
            const TYPES: &'static [&'static str] = &[$(stringify!($variant)),+];

            fn type_name(&self) -> &'static str {
                match self {
                    $( Self::$variant(_) => stringify!($variant), )+
                }
            }

            fn is_empty(&self) -> bool {
                match self {
                    $( Self::$variant(inner) => fhir_choice!(@is_empty $kind inner), )+
                }
            }

            fn walk<'a, V: $crate::record::MemberVisitor<'a>>(
                &'a self,
                name: &str,
                visitor: &mut V,
            ) -> Result<(), V::Error> {
                match self {
                    $( Self::$variant(inner) => fhir_choice!(@walk $kind visitor name inner), )+
                }
            }

            fn decode_variant<D: $crate::record::MemberDecoder>(
                slot: &mut Option<Self>,
                type_name: &str,
                decoder: &mut D,
            ) -> Result<(), D::Error> {
                $(
                    if type_name == stringify!($variant) {
                        let mut inner = match slot.take() {
                            Some(Self::$variant(inner)) => Some(inner),
                            _ => None,
                        };
                        fhir_choice!(@decode $kind decoder inner)?;
                        fhir_choice!(@seen $kind inner);
                        *slot = inner.map(Self::$variant);
                        return Ok(());
                    }
                )+
                Ok(())
            }
        }
    };
}
