//! Order-preserving per-document maps, parallel under the `parallel` feature.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[cfg(not(feature = "parallel"))]
pub(crate) fn map<T, U, F>(items: &[T], f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync + Send,
{
    items.iter().map(f).collect()
}

#[cfg(feature = "parallel")]
pub(crate) fn map<T, U, F>(items: &[T], f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync + Send,
{
    items.par_iter().map(f).collect()
}

/// Like [`map`] but `f` also receives the document index and may fail.
/// The first error in document order is returned.
#[cfg(not(feature = "parallel"))]
pub(crate) fn try_map_indexed<T, U, E, F>(items: &[T], f: F) -> Result<Vec<U>, E>
where
    T: Sync,
    U: Send,
    E: Send,
    F: Fn(usize, &T) -> Result<U, E> + Sync + Send,
{
    items.iter().enumerate().map(|(i, item)| f(i, item)).collect()
}

#[cfg(feature = "parallel")]
pub(crate) fn try_map_indexed<T, U, E, F>(items: &[T], f: F) -> Result<Vec<U>, E>
where
    T: Sync,
    U: Send,
    E: Send,
    F: Fn(usize, &T) -> Result<U, E> + Sync + Send,
{
    let results: Vec<Result<U, E>> = items
        .par_iter()
        .enumerate()
        .map(|(i, item)| f(i, item))
        .collect();
    results.into_iter().collect()
}
