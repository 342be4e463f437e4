//! Trend series downsampling
//!
//! The running-mean series grows by one point per sample. Plotting it in full
//! becomes expensive long before a run ends, so long series are thinned by a
//! fixed stride before rendering. The statistics themselves are never
//! recomputed from the thinned series.

/// Default number of plot points a long series is reduced towards
pub const DEFAULT_MAX_POINTS: usize = 1000;

/// Default series length above which downsampling kicks in
pub const DEFAULT_THRESHOLD: usize = 10_000;

/// Thin `series` to roughly `max_points` points
///
/// Series no longer than `threshold` are returned unchanged. Longer series
/// keep every `ceil(len / max_points)`-th element plus the final element, so
/// the trend always ends at the latest value. The result may exceed
/// `max_points` slightly but never `2 * max_points`.
///
/// # Examples
///
/// ```
/// use samplepulse::stats::downsample::downsample;
///
/// let series: Vec<f64> = (0..50).map(|i| i as f64).collect();
/// assert_eq!(downsample(&series, 10, 100), series);
///
/// let thinned = downsample(&series, 10, 20);
/// assert_eq!(thinned, vec![0.0, 5.0, 10.0, 15.0, 20.0, 25.0, 30.0, 35.0, 40.0, 45.0, 49.0]);
/// ```
pub fn downsample(series: &[f64], max_points: usize, threshold: usize) -> Vec<f64> {
    if series.len() <= threshold {
        return series.to_vec();
    }

    let len = series.len();
    let stride = len.div_ceil(max_points.max(1));
    let last = len - 1;

    let mut points: Vec<f64> = series.iter().step_by(stride).copied().collect();
    if last % stride != 0 {
        points.push(series[last]);
    }
    points
}
