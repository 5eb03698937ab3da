//! Wire naming rules shared by the FHIR model and its JSON/XML codecs.
//!
//! FHIR's two wire formats agree on two naming conventions that neither
//! generic JSON nor generic XML has:
//!
//! - **Primitive metadata siblings.** A primitive `birthDate` with an `id` or
//!   extensions travels in JSON as `"birthDate"` plus `"_birthDate"`.
//! - **Choice keys.** A polymorphic `value[x]` holding a `Quantity` is written
//!   as `valueQuantity` (JSON key or XML element name).
//!
//! Repeated primitives additionally keep their value and metadata arrays
//! index-aligned; [`AlignedPairs`] walks such a pair in lock-step.

/// Prefix marking the metadata sibling of a primitive member in FHIR JSON.
pub const METADATA_PREFIX: char = '_';

/// Returns the metadata sibling key for a primitive member (`given` → `_given`).
pub fn metadata_key(name: &str) -> String {
    let mut key = String::with_capacity(name.len() + 1);
    key.push(METADATA_PREFIX);
    key.push_str(name);
    key
}

/// Splits a JSON key into its member name and whether it is a metadata sibling.
///
/// ```
/// use helios_serde_support::split_metadata_key;
///
/// assert_eq!(split_metadata_key("_birthDate"), ("birthDate", true));
/// assert_eq!(split_metadata_key("birthDate"), ("birthDate", false));
/// ```
pub fn split_metadata_key(key: &str) -> (&str, bool) {
    match key.strip_prefix(METADATA_PREFIX) {
        Some(name) => (name, true),
        None => (key, false),
    }
}

/// Builds the concrete key of a choice member (`value` + `Quantity` → `valueQuantity`).
pub fn choice_key(logical: &str, type_name: &str) -> String {
    let mut key = String::with_capacity(logical.len() + type_name.len());
    key.push_str(logical);
    key.push_str(type_name);
    key
}

/// Returns the type suffix of `key` if it names one of `types` for the
/// choice member `logical`.
///
/// Matching is a case-sensitive concatenation with no separator, and the
/// suffix must be one of the declared alternatives exactly.
pub fn choice_suffix<'k>(key: &'k str, logical: &str, types: &[&str]) -> Option<&'k str> {
    let suffix = key.strip_prefix(logical)?;
    types.contains(&suffix).then_some(suffix)
}

/// Lock-step iterator over a value array and its metadata array.
///
/// Yields `(value, metadata)` pairs until both inputs are exhausted; the
/// shorter side reports `None` for its missing tail. A metadata array
/// longer than its value array therefore extends the logical array.
#[derive(Debug, Clone)]
pub struct AlignedPairs<A, B> {
    values: A,
    metadata: B,
}

impl<A, B> AlignedPairs<A, B>
where
    A: Iterator,
    B: Iterator,
{
    pub fn new(values: A, metadata: B) -> Self {
        Self { values, metadata }
    }
}

impl<A, B> Iterator for AlignedPairs<A, B>
where
    A: Iterator,
    B: Iterator,
{
    type Item = (Option<A::Item>, Option<B::Item>);

    fn next(&mut self) -> Option<Self::Item> {
        match (self.values.next(), self.metadata.next()) {
            (None, None) => None,
            pair => Some(pair),
        }
    }
}

/// Pairs two optional sequences by index, see [`AlignedPairs`].
pub fn aligned<A, B>(values: A, metadata: B) -> AlignedPairs<A::IntoIter, B::IntoIter>
where
    A: IntoIterator,
    B: IntoIterator,
{
    AlignedPairs::new(values.into_iter(), metadata.into_iter())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_key() {
        assert_eq!(metadata_key("given"), "_given");
    }

    #[test]
    fn test_choice_suffix_exact_match() {
        let types = ["Quantity", "String", "DateTime"];
        assert_eq!(choice_suffix("valueQuantity", "value", &types), Some("Quantity"));
        assert_eq!(choice_suffix("valueDateTime", "value", &types), Some("DateTime"));
        assert_eq!(choice_suffix("valuestring", "value", &types), None);
        assert_eq!(choice_suffix("valueBoolean", "value", &types), None);
        assert_eq!(choice_suffix("effectiveDateTime", "value", &types), None);
        assert_eq!(choice_suffix("value", "value", &types), None);
    }

    #[test]
    fn test_choice_key() {
        assert_eq!(choice_key("deceased", "Boolean"), "deceasedBoolean");
    }

    #[test]
    fn test_aligned_pairs_longer_metadata() {
        let pairs: Vec<_> = aligned(["A"], [None, Some("x")]).collect();
        assert_eq!(pairs, vec![(Some("A"), Some(None)), (None, Some(Some("x")))]);
    }

    #[test]
    fn test_aligned_pairs_empty() {
        let pairs: Vec<(Option<u8>, Option<u8>)> =
            aligned(Vec::<u8>::new(), Vec::<u8>::new()).collect();
        assert!(pairs.is_empty());
    }
}
