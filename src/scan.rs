//! `scan` contains the search itself: walking the chunk range around an origin
//! and tallying matching item stacks inside container block entities.

use crate::{
    error::{Error, Result},
    ident::Ident,
    world::{World, block_entities},
};
use simdnbt::owned::{NbtCompound, NbtList};
use tracing::debug;

/// A container that held at least one matching stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerMatch {
    /// Block position of the container.
    pub coordinates: (i32, i32, i32),
    /// Namespaced id of the container block entity, e.g. `minecraft:chest`.
    pub container: String,
    /// Total matching items in it, nested contents included.
    pub count: u32,
}

impl World {
    /// Searches all loaded chunks within `radius` blocks of `origin` for
    /// containers holding the given item.
    ///
    /// The scan covers the cubic bounding box `origin ± radius` on every axis.
    /// Chunks that aren't loaded are skipped, never pulled in. A container
    /// counts direct stacks plus one level of nested contents (shulker-box
    /// inventories and bundles).
    ///
    /// `container_filter` narrows results to block entities whose id path
    /// contains the filter as a substring, case-insensitive, namespace ignored.
    ///
    /// ## Example
    /// ```no_run
    /// let matches = world.search((0, 64, 0), &Ident::new("diamond"), Some("chest"), 50)?;
    /// ```
    pub fn search(
        &self,
        origin: (i32, i32, i32),
        item: &Ident,
        container_filter: Option<&str>,
        radius: i32,
    ) -> Result<Vec<ContainerMatch>> {
        // strip any namespace off the filter and lowercase it once, outside the loops
        let filter_key = container_filter.map(|filter| {
            match filter.split_once(':') {
                Some((_, path)) => path,
                None => filter,
            }
            .to_lowercase()
        });

        let (x, y, z) = origin;
        let (min_x, max_x) = (x - radius, x + radius);
        let (min_y, max_y) = (y - radius, y + radius);
        let (min_z, max_z) = (z - radius, z + radius);

        let mut matches = vec![];
        for chunk_x in (min_x >> 4)..=(max_x >> 4) {
            for chunk_z in (min_z >> 4)..=(max_z >> 4) {
                // only resident chunks, loading one here would stall the server
                let Some(chunk) = self.get_chunk(chunk_x, chunk_z) else {
                    continue;
                };

                for entity in block_entities(chunk)? {
                    let (ex, ey, ez) = block_entity_position(entity)?;

                    // a chunk covers 16x16, its edges can stick out past the radius
                    if ex < min_x || ex > max_x || ey < min_y || ey > max_y || ez < min_z || ez > max_z
                    {
                        continue;
                    }

                    let Some(slots) = container_slots(entity) else {
                        continue;
                    };

                    let id = entity.string("id").ok_or(Error::MissingNbtTag("id"))?;
                    if let Some(key) = &filter_key {
                        let id = id.to_str();
                        let path = match id.split_once(':') {
                            Some((_, path)) => path,
                            None => id.as_ref(),
                        };
                        if !path.contains(key.as_str()) {
                            continue;
                        }
                    }

                    let count = count_matching(slots, item);
                    if count > 0 {
                        matches.push(ContainerMatch {
                            coordinates: (ex, ey, ez),
                            container: Ident::populate_namespace(&id.to_str()).into_owned(),
                            count,
                        });
                    }
                }
            }
        }

        debug!(item = ?item, radius, matches = matches.len(), "container search finished");
        Ok(matches)
    }
}

/// Block position of a block entity, stored as plain `x`/`y`/`z` ints.
fn block_entity_position(entity: &NbtCompound) -> Result<(i32, i32, i32)> {
    Ok((
        entity.int("x").ok_or(Error::MissingNbtTag("x"))?,
        entity.int("y").ok_or(Error::MissingNbtTag("y"))?,
        entity.int("z").ok_or(Error::MissingNbtTag("z"))?,
    ))
}

/// The slot stacks of a container block entity.
///
/// Anything carrying an `Items` list is a container here, which covers the
/// whole chest/barrel/shulker/dispenser/dropper/hopper family. Returns [`None`]
/// for every other block entity so the scan can skip it.
fn container_slots(entity: &NbtCompound) -> Option<&[NbtCompound]> {
    match entity.list("Items")? {
        NbtList::Compound(slots) => Some(slots),
        NbtList::Empty => Some(&[]),
        _ => None,
    }
}

/// Tallies matching items across a container's slots.
///
/// Counts direct stack matches, then looks one level into each stack's
/// sub-container components: `minecraft:container` (shulker-box style,
/// `{slot, item}` entries) and `minecraft:bundle_contents` (flat stacks).
fn count_matching(slots: &[NbtCompound], item: &Ident) -> u32 {
    let mut total = 0;

    for stack in slots {
        if stack_matches(stack, item) {
            total += stack_count(stack);
        }

        if let Some(entries) = component_list(stack, "minecraft:container") {
            for entry in entries {
                let Some(inner) = entry.compound("item") else {
                    continue;
                };
                if stack_matches(inner, item) {
                    total += stack_count(inner);
                }
            }
        }

        if let Some(inner_stacks) = component_list(stack, "minecraft:bundle_contents") {
            for inner in inner_stacks {
                if stack_matches(inner, item) {
                    total += stack_count(inner);
                }
            }
        }
    }

    total
}

fn stack_matches(stack: &NbtCompound, item: &Ident) -> bool {
    stack.string("id").is_some_and(|id| item.matches(id))
}

/// How many items a stack holds, `count` int with the pre-components `Count` byte as fallback.
fn stack_count(stack: &NbtCompound) -> u32 {
    let count = match stack.int("count") {
        Some(count) => count,
        None => stack.byte("Count").unwrap_or(0) as i32,
    };
    count.max(0) as u32
}

/// A compound list under the stack's `components`, [`None`] if absent or not that shape.
fn component_list<'a>(stack: &'a NbtCompound, component: &str) -> Option<&'a Vec<NbtCompound>> {
    match stack.compound("components")?.list(component)? {
        NbtList::Compound(entries) => Some(entries),
        _ => None,
    }
}
