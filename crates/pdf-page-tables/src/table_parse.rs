/// Splits a text line into cells on tabs and on runs of two or more
/// spaces. Single spaces stay inside the cell.
pub(crate) fn split_line_into_cells(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut whitespace_run = 0_usize;

    let flush = |current: &mut String, cells: &mut Vec<String>| {
        let cell = current.trim();
        if !cell.is_empty() {
            cells.push(cell.to_string());
        }
        current.clear();
    };

    for ch in trimmed.chars() {
        if ch == '\t' {
            flush(&mut current, &mut cells);
            whitespace_run = 0;
            continue;
        }

        if ch.is_whitespace() {
            whitespace_run += 1;
            if whitespace_run >= 2 {
                flush(&mut current, &mut cells);
            } else {
                current.push(' ');
            }
            continue;
        }

        whitespace_run = 0;
        current.push(ch);
    }

    flush(&mut current, &mut cells);
    cells
}

pub(crate) fn soft_split_line_into_cells(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

/// Pads every row with empty cells up to the widest row.
pub(crate) fn pad_to_widest(rows: &mut [Vec<String>]) {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in rows {
        row.resize(width, String::new());
    }
}

#[cfg(test)]
mod tests {
    use super::{pad_to_widest, soft_split_line_into_cells, split_line_into_cells};

    #[test]
    fn splits_double_space_separated_cells() {
        let cells = split_line_into_cells("Alice  30  98");
        assert_eq!(cells, vec!["Alice", "30", "98"]);
    }

    #[test]
    fn keeps_single_spaces_inside_cells() {
        let cells = split_line_into_cells("New York   8 336 817");
        assert_eq!(cells, vec!["New York", "8 336 817"]);
    }

    #[test]
    fn splits_tab_separated_cells() {
        let cells = split_line_into_cells("A\tB\t\tC");
        assert_eq!(cells, vec!["A", "B", "C"]);
    }

    #[test]
    fn soft_splits_single_space_cells() {
        let cells = soft_split_line_into_cells("Name Age Score");
        assert_eq!(cells, vec!["Name", "Age", "Score"]);
    }

    #[test]
    fn pads_ragged_rows() {
        let mut rows = vec![
            vec!["a".to_string()],
            vec!["b".to_string(), "c".to_string(), "d".to_string()],
        ];
        pad_to_widest(&mut rows);
        assert_eq!(rows[0], vec!["a", "", ""]);
        assert_eq!(rows[1], vec!["b", "c", "d"]);
    }
}
