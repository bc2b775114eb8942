//! Deterministic key ordering
//!
//! Schema properties carry no intrinsic order. Every map walked by the
//! generator goes through [`ordered_keys`] so the output never depends on
//! how the source map iterates.

/// Collect the keys of a map in ascending natural order
///
/// Works for any map whose references iterate as `(&K, &V)`, so `BTreeMap`
/// and `HashMap` with string or integer keys are all accepted.
pub fn ordered_keys<'a, K, V, M>(map: M) -> Vec<K>
where
    M: IntoIterator<Item = (&'a K, &'a V)>,
    K: Ord + Clone + 'a,
    V: 'a,
{
    let mut keys: Vec<K> = map.into_iter().map(|(key, _)| key.clone()).collect();
    keys.sort_unstable();
    keys
}
