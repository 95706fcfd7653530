use crate::node::GroupKind;
use shared::FieldColumn;
use std::collections::HashSet;

/// How a run of source fields becomes one filter group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupPlan {
    pub name: String,
    pub order: usize,
    pub kind: GroupKind,
    /// Indices into the source field list, root level first for hierarchies.
    pub fields: Vec<usize>,
}

/// Partitions fields into hierarchies (shared lineage key) and standalone filters.
///
/// Groups come out in the order their first field appears. A field without a
/// lineage key is always standalone.
pub fn group_fields(fields: &[FieldColumn]) -> Vec<GroupPlan> {
    let mut consumed = vec![false; fields.len()];
    let mut used_names = HashSet::new();
    let mut plans = Vec::new();

    for (index, field) in fields.iter().enumerate() {
        if consumed[index] {
            continue;
        }

        let members: Vec<usize> = match &field.lineage {
            Some(lineage) => (index..fields.len())
                .filter(|&candidate| {
                    !consumed[candidate] && fields[candidate].lineage.as_ref() == Some(lineage)
                })
                .collect(),
            None => vec![index],
        };
        for &member in &members {
            consumed[member] = true;
        }

        let kind = if members.len() > 1 {
            GroupKind::Hierarchy
        } else {
            GroupKind::Standalone
        };
        let name = unique_name(group_name(field), &mut used_names);

        plans.push(GroupPlan {
            name,
            order: plans.len(),
            kind,
            fields: members,
        });
    }

    plans
}

fn group_name(first: &FieldColumn) -> String {
    if first.display_name.is_empty() {
        first.lineage.clone().unwrap_or_default()
    } else {
        first.display_name.clone()
    }
}

// Group names key the session maps, so a repeated name gets a " (n)" suffix.
fn unique_name(name: String, used: &mut HashSet<String>) -> String {
    if used.insert(name.clone()) {
        return name;
    }
    let mut suffix = 2;
    loop {
        let candidate = format!("{name} ({suffix})");
        if used.insert(candidate.clone()) {
            return candidate;
        }
        suffix += 1;
    }
}
