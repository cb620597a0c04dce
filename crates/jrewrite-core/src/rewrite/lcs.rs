//! Longest common subsequence over element identities

/// Index pairs `(i, j)` of a longest common subsequence of `a` and `b`,
/// in increasing order of both indices
pub fn longest_common_subsequence<T: PartialEq>(a: &[T], b: &[T]) -> Vec<(usize, usize)> {
    let (n, m) = (a.len(), b.len());
    // lengths[i][j] = LCS length of a[i..] and b[j..]
    let mut lengths = vec![vec![0usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lengths[i][j] = if a[i] == b[j] {
                lengths[i + 1][j + 1] + 1
            } else {
                lengths[i + 1][j].max(lengths[i][j + 1])
            };
        }
    }

    let mut pairs = Vec::with_capacity(lengths[0][0]);
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if a[i] == b[j] {
            pairs.push((i, j));
            i += 1;
            j += 1;
        } else if lengths[i + 1][j] >= lengths[i][j + 1] {
            i += 1;
        } else {
            j += 1;
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical() {
        assert_eq!(longest_common_subsequence(&[1, 2, 3], &[1, 2, 3]), vec![(0, 0), (1, 1), (2, 2)]);
    }

    #[test]
    fn test_swap_keeps_one() {
        let pairs = longest_common_subsequence(&['a', 'b'], &['b', 'a']);
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn test_insert_and_remove() {
        let pairs = longest_common_subsequence(&["x", "y", "z"], &["y", "new", "z"]);
        assert_eq!(pairs, vec![(1, 0), (2, 2)]);
        assert!(longest_common_subsequence::<u8>(&[], &[1]).is_empty());
    }
}
