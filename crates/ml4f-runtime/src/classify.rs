//! Caller conveniences over the output tensor.

/// Index of the largest element, or `None` for an empty slice.
///
/// Ties keep the first occurrence. NaN elements never win a comparison,
/// so a slice of all-NaN yields index 0.
pub fn argmax(data: &[f32]) -> Option<usize> {
    let mut best = *data.first()?;
    let mut best_index = 0;
    for (i, &v) in data.iter().enumerate().skip(1) {
        if v > best {
            best = v;
            best_index = i;
        }
    }
    Some(best_index)
}
