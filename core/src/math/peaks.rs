/// Local maxima at least `min_height` tall and `min_distance` samples apart.
///
/// Plateaus report their midpoint. When two candidates sit closer than the
/// minimum separation the taller one survives; results are index-ordered.
pub fn find_peaks(trace: &[f64], min_height: f64, min_distance: usize) -> Vec<usize> {
    let candidates: Vec<usize> = local_maxima(trace)
        .into_iter()
        .filter(|&index| trace[index] >= min_height)
        .collect();

    if min_distance <= 1 || candidates.len() < 2 {
        return candidates;
    }

    let mut keep = vec![true; candidates.len()];
    let mut order: Vec<usize> = (0..candidates.len()).collect();
    order.sort_by(|&a, &b| {
        trace[candidates[b]]
            .partial_cmp(&trace[candidates[a]])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    for &winner in &order {
        if !keep[winner] {
            continue;
        }
        let index = candidates[winner];
        for (other, &other_index) in candidates.iter().enumerate() {
            if other != winner && keep[other] && other_index.abs_diff(index) < min_distance {
                keep[other] = false;
            }
        }
    }

    candidates
        .into_iter()
        .zip(keep)
        .filter_map(|(index, kept)| kept.then_some(index))
        .collect()
}

fn local_maxima(trace: &[f64]) -> Vec<usize> {
    let mut maxima = Vec::new();
    if trace.len() < 3 {
        return maxima;
    }
    let mut i = 1;
    while i < trace.len() - 1 {
        if trace[i] > trace[i - 1] {
            // Ride out any plateau before judging the right-hand slope.
            let mut j = i;
            while j < trace.len() - 1 && trace[j + 1] == trace[i] {
                j += 1;
            }
            if j < trace.len() - 1 && trace[j + 1] < trace[i] {
                maxima.push((i + j) / 2);
            }
            i = j + 1;
        } else {
            i += 1;
        }
    }
    maxima
}
