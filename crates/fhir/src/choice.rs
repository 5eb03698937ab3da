//! Choice members (`value[x]`): closed unions keyed by type suffix.

use std::fmt::Debug;

use helios_serde_support::choice_suffix;

use crate::record::{MemberDecoder, MemberVisitor};

/// A closed set of alternatives for one choice member.
///
/// Implemented by enums declared with `fhir_choice!`; the variant name is
/// the wire suffix (`Quantity` in `valueQuantity`).
pub trait Choice: Clone + PartialEq + Debug + 'static {
    /// All suffixes, in declaration order.
    const TYPES: &'static [&'static str];

    /// Suffix of the selected alternative.
    fn type_name(&self) -> &'static str;

    /// True for a primitive alternative with no value, id or extension.
    fn is_empty(&self) -> bool;

    /// Visits the selected alternative under `name`.
    fn walk<'a, V: MemberVisitor<'a>>(&'a self, name: &str, visitor: &mut V)
    -> Result<(), V::Error>;

    /// Decodes the alternative `type_name` into `slot`.
    ///
    /// A slot already holding the same alternative is decoded into rather
    /// than replaced, so a primitive's value and metadata keys merge.
    fn decode_variant<D: MemberDecoder>(
        slot: &mut Option<Self>,
        type_name: &str,
        decoder: &mut D,
    ) -> Result<(), D::Error>;
}

/// Decodes `key` into the choice member `logical` if it names one of its
/// alternatives.
///
/// Returns `Ok(false)` when `key` is not a key of this member. A key for a
/// different alternative than the one already decoded fails with
/// [`MemberDecoder::choice_conflict`].
pub fn decode_choice<C: Choice, D: MemberDecoder>(
    slot: &mut Option<C>,
    logical: &str,
    key: &str,
    decoder: &mut D,
) -> Result<bool, D::Error> {
    let Some(type_name) = choice_suffix(key, logical, C::TYPES) else {
        return Ok(false);
    };
    if let Some(existing) = slot.as_ref() {
        let first = existing.type_name();
        if first != type_name {
            return Err(decoder.choice_conflict(logical, first, type_name));
        }
    }
    C::decode_variant(slot, type_name, decoder)?;
    Ok(true)
}

/// Clears a choice member whose alternative decoded empty.
///
/// Decoders keep an empty alternative in the slot while a record is being
/// read so that a second alternative is still reported as a conflict.
pub fn drop_empty_choice<C: Choice>(slot: &mut Option<C>) {
    if slot.as_ref().is_some_and(|choice| choice.is_empty()) {
        *slot = None;
    }
}
