use unicode_bidi::{BidiInfo, LTR_LEVEL, Level};

/// Visual-to-logical permutation for items carrying embedding `levels`.
///
/// `result[visual] == logical`, computed with the UAX-9 L2 reversal rule.
pub fn visual_to_logical(levels: &[u8]) -> Vec<usize> {
    let levels: Vec<Level> = levels
        .iter()
        .map(|&l| Level::new(l).unwrap_or(LTR_LEVEL))
        .collect();
    BidiInfo::reorder_visual(&levels)
}

/// Inverse of a permutation: `result[permutation[i]] == i`.
pub fn invert_permutation(permutation: &[usize]) -> Vec<usize> {
    let mut inverse = vec![0; permutation.len()];
    for (i, &p) in permutation.iter().enumerate() {
        inverse[p] = i;
    }
    inverse
}
