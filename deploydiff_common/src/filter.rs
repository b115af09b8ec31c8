/// Suppression policy deciding which keys are not worth reporting.
///
/// `ignore_in_left` is consulted for keys that would be reported as only in
/// the left side, `ignore_in_right` for keys only in the right side.
pub trait MismatchFilter<T: ?Sized>: Send + Sync {
    fn ignore_in_left(&self, key: &T) -> bool;

    fn ignore_in_right(&self, key: &T) -> bool;
}

/// Filter that suppresses nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopFilter;

impl<T: ?Sized> MismatchFilter<T> for NoopFilter {
    fn ignore_in_left(&self, _key: &T) -> bool {
        false
    }

    fn ignore_in_right(&self, _key: &T) -> bool {
        false
    }
}
