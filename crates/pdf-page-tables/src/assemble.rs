use std::collections::HashMap;

use crate::error::ExtractError;
use crate::model::{AssembledTable, Grid};

/// Merges the fragments found on one page into a single table whose first
/// row becomes the header.
///
/// Returns `Ok(None)` when there is nothing to assemble. Rows of different
/// widths are rejected with [`ExtractError::MalformedGrid`].
pub fn assemble(fragments: &[Grid]) -> Result<Option<AssembledTable>, ExtractError> {
    let mut rows = fragments.iter().flatten();
    let Some(first) = rows.next() else {
        return Ok(None);
    };

    let expected = first.len();
    let mut body = Vec::new();
    for (index, row) in rows.enumerate() {
        if row.len() != expected {
            return Err(ExtractError::MalformedGrid {
                row: index + 1,
                expected,
                found: row.len(),
            });
        }
        body.push(row.clone());
    }

    Ok(Some(AssembledTable::from_checked_parts(
        dedup_header_names(first),
        body,
    )))
}

/// Renames repeated column names so every name is unique.
///
/// The first occurrence keeps its name and the Nth repeat gets a `.N-1`
/// suffix (`Total`, `Total.1`, `Total.2`). A generated name that is
/// already in use is suffixed again (`a.1` becomes `a.1.1`).
#[must_use]
pub fn dedup_header_names(names: &[String]) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::with_capacity(names.len());

    for name in names {
        let mut name = name.clone();
        let mut seen = counts.get(&name).copied().unwrap_or(0);
        while seen > 0 {
            counts.insert(name.clone(), seen + 1);
            name = format!("{name}.{seen}");
            seen = counts.get(&name).copied().unwrap_or(0);
        }
        counts.insert(name.clone(), seen + 1);
        out.push(name);
    }

    out
}
