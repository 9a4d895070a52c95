/// A structural change to the grouped list display.
///
/// Mutations return changes in the order they happened. Each index refers to
/// the layout as left by the changes before it in the same batch, so a batch
/// can be replayed front to back against the layout of the map before the
/// mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    InsertSection { section: usize, title: String },
    DeleteSection { section: usize },
    InsertRow { section: usize, row: usize, text: String },
    DeleteRow { section: usize, row: usize },
    ReloadRow { section: usize, row: usize, text: String },
}

impl Change {
    /// The (section, row) a change leaves something at, used to place the cursor.
    pub fn landing_row(&self) -> Option<(usize, usize)> {
        match self {
            Change::InsertRow { section, row, .. } | Change::ReloadRow { section, row, .. } => {
                Some((*section, *row))
            }
            _ => None,
        }
    }
}

/// Last row a batch inserted or reloaded.
pub fn last_landing_row(changes: &[Change]) -> Option<(usize, usize)> {
    changes.iter().rev().find_map(Change::landing_row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landing_row_only_for_inserts_and_reloads() {
        let insert = Change::InsertRow {
            section: 1,
            row: 2,
            text: "x".to_string(),
        };
        assert_eq!(insert.landing_row(), Some((1, 2)));
        assert_eq!(Change::DeleteRow { section: 0, row: 0 }.landing_row(), None);
        assert_eq!(Change::DeleteSection { section: 0 }.landing_row(), None);
    }

    #[test]
    fn test_last_landing_row_skips_trailing_deletes() {
        let changes = vec![
            Change::ReloadRow {
                section: 0,
                row: 3,
                text: "a".to_string(),
            },
            Change::DeleteSection { section: 2 },
        ];
        assert_eq!(last_landing_row(&changes), Some((0, 3)));
        assert_eq!(last_landing_row(&[]), None);
    }
}
