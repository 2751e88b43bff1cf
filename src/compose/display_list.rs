use std::collections::BTreeMap;

use crate::scene::model::{Depth, Placement, Record};

/// Instances visible at `frame` (0-based) of a record stream, keyed by depth.
///
/// Records are applied up to the `frame`-th frame boundary. A stream with fewer boundaries simply
/// yields its final state.
pub fn build_display_list(records: &[Record], frame: u32) -> BTreeMap<Depth, Placement> {
    let mut list: BTreeMap<Depth, Placement> = BTreeMap::new();
    let mut current = 0u32;
    for record in records {
        match record {
            Record::PlaceInstance(p) => place(&mut list, p),
            Record::RemoveInstance(r) => {
                if list.remove(&r.depth).is_none() {
                    tracing::debug!(depth = r.depth, "remove at empty depth ignored");
                }
            }
            Record::ShowFrame => {
                if current == frame {
                    break;
                }
                current += 1;
            }
            _ => {}
        }
    }
    list
}

fn place(list: &mut BTreeMap<Depth, Placement>, p: &Placement) {
    if !p.is_move {
        if p.character_id.is_none() {
            tracing::warn!(depth = p.depth, "placement without character ignored");
            return;
        }
        list.insert(p.depth, p.clone());
        return;
    }

    let Some(prev) = list.remove(&p.depth) else {
        if p.character_id.is_some() {
            list.insert(p.depth, p.clone());
        } else {
            tracing::warn!(depth = p.depth, "move at empty depth ignored");
        }
        return;
    };
    // A move keeps every attribute it does not restate.
    let merged = Placement {
        depth: p.depth,
        character_id: p.character_id.or(prev.character_id),
        matrix: p.matrix.or(prev.matrix),
        color_transform: p.color_transform.or(prev.color_transform),
        filters: p.filters.clone().or(prev.filters),
        clip_depth: p.clip_depth.or(prev.clip_depth),
        is_move: false,
        name: p.name.clone().or(prev.name),
        ratio: p.ratio.or(prev.ratio),
    };
    list.insert(p.depth, merged);
}

#[cfg(test)]
#[path = "../../tests/unit/compose/display_list.rs"]
mod tests;
