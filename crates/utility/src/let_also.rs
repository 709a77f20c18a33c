/// Scope function for writing transformations as method chains.
pub trait LetAlso: Sized {
    /// Passes `self` to `block` and returns its result.
    fn let_owned<R, F>(self, block: F) -> R
    where
        F: FnOnce(Self) -> R,
    {
        block(self)
    }
}

impl<T> LetAlso for T {}

#[cfg(test)]
mod tests {
    use super::LetAlso;

    #[test]
    fn let_owned_maps_value() {
        let length = vec![1, 2, 3].let_owned(|values| values.len());
        assert_eq!(length, 3);
    }
}
