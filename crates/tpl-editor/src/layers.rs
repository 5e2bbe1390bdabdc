//! Layer model: z-order, visibility, duplicate and delete.
//!
//! All operations take the live field collection and report whether they
//! changed anything; callers record history only for real changes. Unknown
//! ids are ignored.

use tpl_core::coords::clamp_percent;
use tpl_core::id::FieldId;
use tpl_core::model::{Field, Position, find_field_mut, paint_order};

/// Percentage offset applied to duplicates on both axes.
pub const DUPLICATE_OFFSET: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerDirection {
    Up,
    Down,
}

/// Swap `id`'s `z_index` with its neighbour in z-sorted order.
///
/// No-op at either end of the order.
pub fn move_layer(fields: &mut [Field], id: FieldId, direction: LayerDirection) -> bool {
    let order = paint_order(fields);
    let Some(pos) = order.iter().position(|&i| fields[i].id == id) else {
        return false;
    };
    let neighbour = match direction {
        LayerDirection::Up => pos.checked_add(1).filter(|&n| n < order.len()),
        LayerDirection::Down => pos.checked_sub(1),
    };
    let Some(n) = neighbour else {
        return false;
    };
    let (a, b) = (order[pos], order[n]);
    let za = fields[a].z_index;
    let zb = fields[b].z_index;
    if za == zb {
        // Equal z: give the pair distinct values so the order really flips.
        match direction {
            LayerDirection::Up => fields[a].z_index = zb.saturating_add(1),
            LayerDirection::Down => fields[a].z_index = zb.saturating_sub(1),
        }
    } else {
        fields[a].z_index = zb;
        fields[b].z_index = za;
    }
    true
}

/// Flip `visible`. Hidden fields stay in the collection.
pub fn toggle_visibility(fields: &mut [Field], id: FieldId) -> bool {
    match find_field_mut(fields, id) {
        Some(field) => {
            field.visible = !field.visible;
            true
        }
        None => false,
    }
}

pub fn max_z(fields: &[Field]) -> i32 {
    fields.iter().map(|f| f.z_index).max().unwrap_or(0)
}

/// Clone `ids` (in collection order) with fresh ids, stacked above every
/// existing field and offset by [`DUPLICATE_OFFSET`]. Returns the new ids.
/// A source is skipped when no unused id is left.
pub fn duplicate(fields: &mut Vec<Field>, ids: &[FieldId]) -> Vec<FieldId> {
    let sources: Vec<Field> = fields.iter().filter(|f| ids.contains(&f.id)).cloned().collect();
    let mut z = max_z(fields);
    let mut created = Vec::with_capacity(sources.len());
    for mut copy in sources {
        let Some(next) = FieldId::next_free(fields.iter().map(|f| f.id)) else {
            log::warn!("DUPLICATE skipped {}: no free id", copy.id);
            continue;
        };
        z = z.saturating_add(1);
        copy.id = next;
        copy.z_index = z;
        copy.position = Position {
            x: clamp_percent(copy.position.x + DUPLICATE_OFFSET),
            y: clamp_percent(copy.position.y + DUPLICATE_OFFSET),
            snapped_to_grid: None,
        };
        created.push(next);
        fields.push(copy);
    }
    created
}

/// Remove `ids`. Returns how many fields were removed.
pub fn delete(fields: &mut Vec<Field>, ids: &[FieldId]) -> usize {
    let before = fields.len();
    fields.retain(|f| !ids.contains(&f.id));
    before - fields.len()
}
