/// Evenly spaced angles from `start` to `end` inclusive, one per projection.
pub fn angles_from_range(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Angular step between consecutive projections, if constant.
pub fn uniform_step(angles: &[f64]) -> Option<f64> {
    const TOLERANCE: f64 = 1e-9;
    let first = angles.windows(2).next().map(|w| w[1] - w[0])?;
    angles
        .windows(2)
        .all(|w| ((w[1] - w[0]) - first).abs() <= TOLERANCE)
        .then_some(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_includes_both_ends() {
        assert_eq!(angles_from_range(-60.0, 60.0, 5), vec![-60.0, -30.0, 0.0, 30.0, 60.0]);
        assert_eq!(angles_from_range(10.0, 20.0, 1), vec![10.0]);
        assert!(angles_from_range(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn uniform_step_detects_irregular_series() {
        assert_eq!(uniform_step(&[0.0, 2.0, 4.0]), Some(2.0));
        assert_eq!(uniform_step(&[0.0, 2.0, 5.0]), None);
        assert_eq!(uniform_step(&[1.0]), None);
    }
}
