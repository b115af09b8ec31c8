use deploydiff_common::{Diff, MismatchFilter};

/// Compares two sequences of keys regardless of their order.
///
/// Every left key cancels one equal key from the right side (first occurrence
/// first), so duplicates are matched one for one. Keys left over on either
/// side are reported unless `filter` suppresses them for that side.
pub fn diff<T>(left: &[T], right: &[T], filter: &dyn MismatchFilter<T>) -> Diff<T>
where
    T: Clone + PartialEq,
{
    let mut remaining: Vec<&T> = right.iter().collect();
    let mut only_in_left = Vec::new();

    for key in left {
        if let Some(index) = remaining.iter().position(|candidate| *candidate == key) {
            remaining.remove(index);
        } else if !filter.ignore_in_left(key) {
            only_in_left.push(key.clone());
        }
    }

    let only_in_right = remaining
        .into_iter()
        .filter(|key| !filter.ignore_in_right(key))
        .cloned()
        .collect();

    Diff::new(only_in_left, only_in_right)
}
