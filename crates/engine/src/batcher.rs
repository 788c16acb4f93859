use std::num::NonZeroUsize;

/// Maximum number of recipients in one notification request.
pub const BATCH_SIZE: NonZeroUsize = NonZeroUsize::new(500).unwrap();

/// Split `items` into consecutive groups of `max_size`, keeping order.
///
/// Every group but the last has exactly `max_size` items; the last holds the
/// remainder. An empty input yields no groups at all.
pub fn batch<T>(items: Vec<T>, max_size: NonZeroUsize) -> Vec<Vec<T>> {
    let max_size = max_size.get();
    let mut batches = Vec::with_capacity(items.len().div_ceil(max_size));

    let mut iter = items.into_iter().peekable();
    while iter.peek().is_some() {
        batches.push(iter.by_ref().take(max_size).collect());
    }

    batches
}
