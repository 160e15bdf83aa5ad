use indexmap::IndexMap;

/// Splits `items` into groups keyed by `key_of`.
///
/// Groups appear in the order their key was first produced and keep the
/// relative order of their items.
///
/// # Examples
///
/// ```
/// use flex_json_util::separate_by_value;
///
/// let groups = separate_by_value(vec![1, 2, 3, 4, 5], |n| {
///     if n % 2 == 0 { "even".to_string() } else { "odd".to_string() }
/// });
/// assert_eq!(groups["odd"], vec![1, 3, 5]);
/// assert_eq!(groups["even"], vec![2, 4]);
/// assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["odd", "even"]);
/// ```
pub fn separate_by_value<T, I, F>(items: I, mut key_of: F) -> IndexMap<String, Vec<T>>
where
    I: IntoIterator<Item = T>,
    F: FnMut(&T) -> String,
{
    let mut groups: IndexMap<String, Vec<T>> = IndexMap::new();
    for item in items {
        groups.entry(key_of(&item)).or_default().push(item);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_input() {
        let groups = separate_by_value(Vec::<u8>::new(), |b| b.to_string());
        assert!(groups.is_empty());
    }

    proptest! {
        #[test]
        fn grouping_keeps_every_item(items in prop::collection::vec(0u8..10, 0..50)) {
            let groups = separate_by_value(items.clone(), |n| (n % 3).to_string());
            let total: usize = groups.values().map(Vec::len).sum();
            prop_assert_eq!(total, items.len());
            for (key, group) in &groups {
                prop_assert!(group.iter().all(|n| (n % 3).to_string() == *key));
            }
        }
    }
}
