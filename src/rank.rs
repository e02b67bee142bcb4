//! Ordering candidates by how often they have been picked.

use crate::store::FrequencyTable;

/// Sort `candidates` most-picked first, ties by ascending name.
///
/// The result is fully determined by the multiset of names and the table,
/// whatever order the candidates arrived in.
pub fn rank(mut candidates: Vec<String>, table: &FrequencyTable) -> Vec<String> {
    candidates.sort_by(|a, b| table.compare(a, b));
    candidates
}

/// Whether `name` is among `ranked`.
///
/// `ranked` must come from [`rank`] with the same `table`; the lookup is a
/// binary search over that order.
pub fn contains(ranked: &[String], name: &str, table: &FrequencyTable) -> bool {
    ranked
        .binary_search_by(|probe| table.compare(probe, name))
        .is_ok()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_alphabetical_without_history() {
        let ranked = rank(names(&["vim", "cat", "ls"]), &FrequencyTable::new());
        assert_eq!(ranked, names(&["cat", "ls", "vim"]));
    }

    #[test]
    fn test_counts_come_first() {
        let table: FrequencyTable = [("vim", 5u64), ("ls", 2)].into_iter().collect();
        let ranked = rank(names(&["vim", "cat", "ls"]), &table);
        assert_eq!(ranked, names(&["vim", "ls", "cat"]));
    }

    #[test]
    fn test_equal_counts_fall_back_to_name() {
        let table: FrequencyTable = [("b", 3u64), ("a", 3), ("c", 1)].into_iter().collect();
        let ranked = rank(names(&["c", "d", "b", "a"]), &table);
        assert_eq!(ranked, names(&["a", "b", "c", "d"]));
    }

    #[test]
    fn test_duplicates_stay_adjacent() {
        let table: FrequencyTable = [("sh", 1u64)].into_iter().collect();
        let ranked = rank(names(&["sh", "awk", "sh"]), &table);
        assert_eq!(ranked, names(&["sh", "sh", "awk"]));
    }

    #[test]
    fn test_rank_ignores_input_order() {
        let table: FrequencyTable = [("git", 7u64), ("make", 2), ("cc", 2)]
            .into_iter()
            .collect();
        let base = names(&["make", "git", "cc", "ar", "zip", "git"]);
        let expected = rank(base.clone(), &table);

        // every rotation and its reverse
        for shift in 0..base.len() {
            let mut rotated = base.clone();
            rotated.rotate_left(shift);
            assert_eq!(rank(rotated.clone(), &table), expected);
            rotated.reverse();
            assert_eq!(rank(rotated, &table), expected);
        }
    }

    #[test]
    fn test_contains_agrees_with_rank() {
        let table: FrequencyTable = [("vim", 5u64), ("ls", 2), ("ghost", 9)]
            .into_iter()
            .collect();
        let ranked = rank(names(&["vim", "cat", "ls", "awk", "zsh", "cat"]), &table);

        for name in &ranked {
            assert!(contains(&ranked, name, &table), "{name} not found");
        }
        // in the table but never scanned
        assert!(!contains(&ranked, "ghost", &table));
        assert!(!contains(&ranked, "rm -rf /", &table));
        assert!(!contains(&ranked, "", &table));
    }

    #[test]
    fn test_contains_on_empty_list() {
        assert!(!contains(&[], "vim", &FrequencyTable::new()));
    }
}
