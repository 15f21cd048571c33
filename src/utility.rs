use optional::{none, some, Optioned};

/// Wrap a raw value, mapping NaN and infinities to the missing value.
#[inline]
pub(crate) fn optioned(val: f64) -> Optioned<f64> {
    if val.is_finite() {
        some(val)
    } else {
        none()
    }
}

/// Present values of a column, in row order.
#[inline]
pub(crate) fn present(vals: &[Optioned<f64>]) -> impl Iterator<Item = f64> + '_ {
    vals.iter().filter_map(|v| v.into_option())
}
