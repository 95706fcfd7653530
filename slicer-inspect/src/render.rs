//! Text and JSON renderings of the projected filter view.

use anyhow::{Context, Result};
use engine::{BuildReport, GroupView, SelectionCommit, SelectionState, ViewState, VisibleRow};
use serde::Serialize;
use std::fmt;

/// Plain-text tree, one line per visible row.
pub struct TextView<'a> {
    pub state: ViewState,
    pub groups: &'a [GroupView],
}

impl fmt::Display for TextView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state {
            ViewState::NoData => return writeln!(f, "No data"),
            ViewState::NoResults => writeln!(f, "No results for the current search")?,
            ViewState::Ready => {}
        }

        for group in self.groups {
            write!(f, "{}", group.name)?;
            if group.selected_count > 0 {
                write!(f, " [{} selected]", group.selected_count)?;
            }
            if group.collapsed {
                write!(f, " (collapsed)")?;
            }
            writeln!(f)?;

            for row in &group.rows {
                writeln!(f, "{}", RowLine(row))?;
            }
        }
        Ok(())
    }
}

struct RowLine<'a>(&'a VisibleRow);

impl fmt::Display for RowLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let row = self.0;
        let expander = match (row.has_children, row.expanded) {
            (true, true) => '▾',
            (true, false) => '▸',
            (false, _) => ' ',
        };
        let mark = match row.state {
            SelectionState::Selected => "[x]",
            SelectionState::Indeterminate => "[-]",
            SelectionState::Unselected => "[ ]",
        };
        write!(f, "{:indent$}{} {} {}", "", expander, mark, row.key, indent = (row.depth + 1) * 2)
    }
}

/// Everything `show --json` prints.
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub state: ViewState,
    pub report: &'a BuildReport,
    pub selection: SelectionCommit,
    pub groups: &'a [GroupView],
}

pub fn render_json(snapshot: &Snapshot<'_>) -> Result<String> {
    serde_json::to_string_pretty(snapshot).context("Failed to serialize view")
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::{FilterStore, RowIdentity};
    use shared::{DataSet, FieldColumn};

    fn store() -> FilterStore {
        let data = DataSet::new(vec![
            FieldColumn::new("Category")
                .lineage("Product")
                .values(["Fruit", "Fruit", "Veg"]),
            FieldColumn::new("Item")
                .lineage("Product")
                .values(["Apple", "Banana", "Carrot"]),
            FieldColumn::new("Size").values(["M", "S", "M"]),
        ]);
        let mut store = FilterStore::default();
        store.rebuild(&data, &RowIdentity);
        store
    }

    #[test]
    fn text_tree_marks_state_and_expansion() {
        let mut store = store();
        store.toggle("Category", 1, "Apple").unwrap();
        store.toggle_expanded("Category", 0, "Fruit").unwrap();
        store.set_collapsed("Size", true).unwrap();

        let groups = store.view();
        let text = TextView { state: store.view_state(), groups: &groups }.to_string();

        let expected = "\
Category [1 selected]
  ▾ [-] Fruit
      [x] Apple
      [ ] Banana
  ▸ [ ] Veg
Size (collapsed)
";
        assert_eq!(text, expected);
    }

    #[test]
    fn empty_model_says_so() {
        let text = TextView { state: ViewState::NoData, groups: &[] }.to_string();
        assert_eq!(text, "No data\n");
    }

    #[test]
    fn json_snapshot_carries_selection() {
        let mut store = store();
        let selection = store.toggle("Size", 0, "S").unwrap();
        let groups = store.view();

        let json = render_json(&Snapshot {
            state: store.view_state(),
            report: store.report(),
            selection,
            groups: &groups,
        })
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["state"], "ready");
        assert_eq!(value["selection"]["action"], "apply");
        assert_eq!(value["selection"]["identities"][0], "2:Size#1");
        assert_eq!(value["report"]["groups"], 2);
        assert_eq!(value["groups"][1]["rows"][1]["state"], "selected");
    }
}
