//! Row-wise boolean combination of intermediate condition columns.

/// Row-wise AND. With no conditions every row is true.
pub fn combine_all(conditions: &[&[bool]], rows: usize) -> Vec<bool> {
    (0..rows)
        .map(|row| {
            conditions
                .iter()
                .all(|c| c.get(row).copied().unwrap_or(false))
        })
        .collect()
}

/// Row-wise OR. With no conditions every row is false.
pub fn combine_any(conditions: &[&[bool]], rows: usize) -> Vec<bool> {
    (0..rows)
        .map(|row| {
            conditions
                .iter()
                .any(|c| c.get(row).copied().unwrap_or(false))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn and_truth_table_three_inputs() {
        // Every combination of three conditions, one row each.
        let mut a = Vec::new();
        let mut b = Vec::new();
        let mut c = Vec::new();
        for bits in 0..8u8 {
            a.push(bits & 1 != 0);
            b.push(bits & 2 != 0);
            c.push(bits & 4 != 0);
        }
        let out = combine_all(&[&a, &b, &c], 8);
        for (row, flag) in out.iter().enumerate() {
            assert_eq!(*flag, row == 7, "row {row}");
        }
    }

    #[test]
    fn or_raises_on_any_input() {
        let a = [false, true, false, false];
        let b = [false, false, true, false];
        assert_eq!(combine_any(&[&a, &b], 4), vec![false, true, true, false]);
    }

    #[test]
    fn empty_conditions() {
        assert_eq!(combine_all(&[], 2), vec![true, true]);
        assert_eq!(combine_any(&[], 2), vec![false, false]);
    }

    #[test]
    fn short_condition_reads_false() {
        let a = [true, true];
        let b = [true];
        assert_eq!(combine_all(&[&a, &b], 2), vec![true, false]);
    }
}
