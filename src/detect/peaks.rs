//! Local-maximum search with height and spacing constraints.

/// Indices of local maxima in `x` at least `height` high and at least
/// `distance` samples apart.
///
/// A peak is a sample strictly greater than its left neighbour and strictly
/// greater than the first differing sample to its right; a flat top resolves
/// to its middle sample (rounded down). The first and last samples are never
/// peaks. When two peaks are closer than `distance`, the lower one is
/// dropped, processing from the tallest peak down.
///
/// Returned indices are ascending.
pub fn find_peaks(x: &[f64], height: f64, distance: usize) -> Vec<usize> {
    let peaks: Vec<usize> = local_maxima(x)
        .into_iter()
        .filter(|&i| x[i] >= height)
        .collect();

    if distance <= 1 || peaks.len() < 2 {
        return peaks;
    }
    select_by_distance(&peaks, x, distance)
}

fn local_maxima(x: &[f64]) -> Vec<usize> {
    let mut maxima = Vec::new();
    if x.len() < 3 {
        return maxima;
    }

    let last = x.len() - 1;
    let mut i = 1;
    while i < last {
        if x[i - 1] < x[i] {
            let mut ahead = i + 1;
            while ahead < last && x[ahead] == x[i] {
                ahead += 1;
            }
            if x[ahead] < x[i] {
                maxima.push((i + ahead - 1) / 2);
                i = ahead;
            }
        }
        i += 1;
    }
    maxima
}

fn select_by_distance(peaks: &[usize], x: &[f64], distance: usize) -> Vec<usize> {
    let mut keep = vec![true; peaks.len()];

    // tallest first; stable sort keeps later peaks ahead of equal earlier ones
    let mut order: Vec<usize> = (0..peaks.len()).collect();
    order.sort_by(|&a, &b| x[peaks[a]].total_cmp(&x[peaks[b]]));

    for &j in order.iter().rev() {
        if !keep[j] {
            continue;
        }

        let mut k = j;
        while k > 0 && peaks[j] - peaks[k - 1] < distance {
            keep[k - 1] = false;
            k -= 1;
        }

        let mut k = j + 1;
        while k < peaks.len() && peaks[k] - peaks[j] < distance {
            keep[k] = false;
            k += 1;
        }
    }

    peaks
        .iter()
        .zip(keep)
        .filter_map(|(&p, kept)| kept.then_some(p))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_maxima() {
        let x = [0.0, 1.0, 0.0, 2.0, 0.0, 3.0, 0.0];
        assert_eq!(find_peaks(&x, f64::MIN, 1), vec![1, 3, 5]);
    }

    #[test]
    fn test_edges_are_never_peaks() {
        let x = [5.0, 1.0, 2.0, 1.0, 5.0];
        assert_eq!(find_peaks(&x, f64::MIN, 1), vec![2]);
    }

    #[test]
    fn test_plateau_resolves_to_middle() {
        let x = [0.0, 2.0, 2.0, 2.0, 2.0, 0.0];
        // plateau 1..=4, middle rounded down
        assert_eq!(find_peaks(&x, f64::MIN, 1), vec![2]);
    }

    #[test]
    fn test_plateau_running_to_edge_is_not_a_peak() {
        let x = [0.0, 2.0, 2.0, 2.0];
        assert!(find_peaks(&x, f64::MIN, 1).is_empty());
    }

    #[test]
    fn test_height_is_inclusive() {
        let x = [0.0, 1.0, 0.0, 2.0, 0.0];
        assert_eq!(find_peaks(&x, 2.0, 1), vec![3]);
        assert!(find_peaks(&x, 2.5, 1).is_empty());
    }

    #[test]
    fn test_distance_keeps_tallest() {
        let x = [0.0, 1.0, 0.0, 3.0, 0.0, 2.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        // peaks at 1, 3, 5, 9; distance 3 keeps 3 (tallest), drops 1 and 5, keeps 9
        assert_eq!(find_peaks(&x, f64::MIN, 3), vec![3, 9]);
    }

    #[test]
    fn test_distance_boundary_is_exclusive() {
        let x = [0.0, 2.0, 0.0, 0.0, 1.0, 0.0];
        // peaks 1 and 4 are exactly 3 apart: both survive distance 3
        assert_eq!(find_peaks(&x, f64::MIN, 3), vec![1, 4]);
        assert_eq!(find_peaks(&x, f64::MIN, 4), vec![1]);
    }

    #[test]
    fn test_short_input() {
        assert!(find_peaks(&[], 0.0, 1).is_empty());
        assert!(find_peaks(&[1.0, 2.0], 0.0, 1).is_empty());
    }
}
