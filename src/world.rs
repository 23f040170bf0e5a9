//! `world` contains the core [`World`] struct: the set of loaded chunks a search runs over.
//!
//! Contains functions for constructing a [`World`], ingesting region files into it
//! and building synthetic chunks & container block entities for it.

use crate::{
    config::Config,
    error::{Error, Result},
    highlight::Marker,
    ident::Ident,
};
use ahash::AHashMap;
use mca::{RegionIter, RegionReader};
use simdnbt::owned::{Nbt, NbtCompound, NbtList, NbtTag};
use std::{
    fmt::Debug,
    io::{Cursor, Read},
};
use tracing::debug;

/// An in-memory set of loaded chunks, addressed by global chunk coordinates.
///
/// A chunk being present in `chunks` is what "loaded" means here: searches
/// visit exactly the resident chunks and skip everything else rather than
/// pulling anything in from disk.
#[derive(Clone)]
pub struct World {
    /// The loaded chunk NBT, mapped to global chunk coordinates
    pub chunks: AHashMap<(i32, i32), NbtCompound>,
    /// Config on radii and highlight lifetime
    pub config: Config,

    /// Highlight markers currently alive in the world
    pub(crate) markers: Vec<Marker>,
    /// Current game tick, advanced by [`World::tick`]
    pub(crate) game_tick: u64,
}

impl World {
    /// Whatever status a chunk needs to be in to count as loaded.
    pub(crate) const REQUIRED_STATUS: &'static str = "minecraft:full";
    /// The minimum dataversion that this crate works with.
    ///
    /// This is due the massive structural changes in how the nbt is stored that was introduced in `21w39a` & `21w43a`
    pub const MIN_DATA_VERSION: i32 = 2860;

    /// How many chunk columns a region spans per axis.
    pub(crate) const REGION_CHUNKS: i32 = mca::REGION_SIZE as i32;

    /// Creates an empty [`World`] with no chunks loaded.
    pub fn empty() -> Self {
        Self {
            chunks: AHashMap::new(),
            config: Config::default(),
            markers: Vec::new(),
            game_tick: 0,
        }
    }

    /// Creates a new [`World`] with already parsed chunks, keyed by global chunk coordinates.
    pub fn from_chunks(chunks: AHashMap<(i32, i32), NbtCompound>) -> Self {
        Self {
            chunks,
            config: Config::default(),
            markers: Vec::new(),
            game_tick: 0,
        }
    }

    /// Reads an entire region file and loads every valid chunk in it.
    ///
    /// Chunks land at `region * 32 + local`, so the world can hold any number
    /// of regions at once. Chunks that aren't fully generated (or are older
    /// than [`World::MIN_DATA_VERSION`]) are skipped, they wouldn't be loaded
    /// by a server either.
    ///
    /// Returns how many chunks were loaded.
    ///
    /// ## Example
    /// ```no_run
    /// let mut world = World::empty();
    /// world.load_region(&mut File::open("r.0.0.mca")?, (0, 0))?;
    /// ```
    pub fn load_region<R: Read>(&mut self, reader: &mut R, region_coords: (i32, i32)) -> Result<usize> {
        let mut bytes = vec![];
        reader.read_to_end(&mut bytes)?;
        let region_reader = RegionReader::new(&bytes)?;

        let mut loaded = 0;
        for (i, chunk) in region_reader.iter().enumerate() {
            let chunk = chunk?;
            let chunk = match chunk {
                Some(c) => c.decompress()?,
                None => continue,
            };

            let chunk_nbt = match simdnbt::owned::read(&mut Cursor::new(&chunk))? {
                Nbt::Some(nbt) => nbt.as_compound(),
                Nbt::None => return Err(Error::InvalidNbtType("base_nbt")),
            };
            let (x, z) = RegionIter::get_chunk_coordinate(i);
            let coords = (
                region_coords.0 * Self::REGION_CHUNKS + x as i32,
                region_coords.1 * Self::REGION_CHUNKS + z as i32,
            );

            match self.insert_chunk(coords, chunk_nbt) {
                Ok(()) => loaded += 1,
                Err(err @ (Error::NotFullyGenerated { .. } | Error::UnsupportedVersion { .. })) => {
                    debug!(%err, "skipping chunk");
                }
                Err(err) => return Err(err),
            }
        }

        debug!(loaded, region = ?region_coords, "region ingested");
        Ok(loaded)
    }

    /// Loads a single chunk at the given global chunk coordinates.
    ///
    /// Fails if the chunk isn't fully generated or its DataVersion is too old.
    pub fn insert_chunk(&mut self, coords: (i32, i32), chunk: NbtCompound) -> Result<()> {
        is_valid_chunk(&chunk, coords)?;
        self.chunks.insert(coords, chunk);
        Ok(())
    }

    /// Unloads a chunk, returning its NBT if it was loaded.
    pub fn unload_chunk(&mut self, coords: (i32, i32)) -> Option<NbtCompound> {
        self.chunks.remove(&coords)
    }

    /// Whether the chunk column at the given global chunk coordinates is resident.
    pub fn is_chunk_loaded(&self, x: i32, z: i32) -> bool {
        self.chunks.contains_key(&(x, z))
    }

    /// Returns the chunk nbt data found at the given global chunk coordinates.
    pub fn get_chunk(&self, x: i32, z: i32) -> Option<&NbtCompound> {
        self.chunks.get(&(x, z))
    }
}

impl Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "World\n  > loaded chunks: {}\n  > markers: {}\n  > tick: {}\n  > {:?}",
            self.chunks.len(),
            self.markers.len(),
            self.game_tick,
            self.config
        )
    }
}

/// Converts block coordinates to the global coordinates of the chunk column containing them.
///
/// The arithmetic shift divides by 16 rounding toward negative infinity,
/// so negative block coordinates land in the right column.
///
/// ## Example
/// ```no_run
/// assert_eq!(to_chunk_coords((-1, 64, 17)), (-1, 1));
/// ```
pub fn to_chunk_coords(coords: (i32, i32, i32)) -> (i32, i32) {
    (coords.0 >> 4, coords.2 >> 4)
}

/// The block entity compounds of a chunk, or an empty slice when it has none.
pub fn block_entities(chunk: &NbtCompound) -> Result<&[NbtCompound]> {
    match chunk.list("block_entities") {
        Some(NbtList::Compound(entities)) => Ok(entities),
        Some(NbtList::Empty) | None => Ok(&[]),
        Some(_) => Err(Error::InvalidNbtList("block_entities")),
    }
}

/// Appends a block entity to a chunk's `block_entities` list.
pub fn push_block_entity(chunk: &mut NbtCompound, entity: NbtCompound) -> Result<()> {
    match chunk.list_mut("block_entities") {
        Some(list) => match list {
            NbtList::Compound(entities) => entities.push(entity),
            NbtList::Empty => *list = NbtList::Compound(vec![entity]),
            _ => return Err(Error::InvalidNbtList("block_entities")),
        },
        None => {
            chunk.insert("block_entities", NbtTag::List(NbtList::Compound(vec![entity])));
        }
    }

    Ok(())
}

/// Generates an empty, fully generated chunk with no block entities in it.
///
/// DataVersion is defaulted to [`World::MIN_DATA_VERSION`]
pub fn empty_chunk(coords: (i32, i32)) -> NbtCompound {
    NbtCompound::from_values(vec![
        ("Status".into(), NbtTag::String(World::REQUIRED_STATUS.into())),
        ("DataVersion".into(), NbtTag::Int(World::MIN_DATA_VERSION)),
        ("block_entities".into(), NbtTag::List(NbtList::Empty)),
        ("isLightOn".into(), NbtTag::Byte(1)),
        ("xPos".into(), NbtTag::Int(coords.0)),
        ("yPos".into(), NbtTag::Int(-4)),
        ("zPos".into(), NbtTag::Int(coords.1)),
    ])
}

/// Builds a container block entity with the given item stacks in its `Items` list.
///
/// Slot indices are assigned in order. The id auto-populates into the
/// `minecraft:` namespace if no namespace was given.
///
/// ## Example
/// ```no_run
/// let chest = container_entity("chest", (5, 64, 5), vec![item_stack("diamond", 3)]);
/// ```
pub fn container_entity<I>(id: &str, position: (i32, i32, i32), items: I) -> NbtCompound
where
    I: IntoIterator<Item = NbtCompound>,
{
    let items = items
        .into_iter()
        .enumerate()
        .map(|(slot, mut stack)| {
            stack.insert("Slot", NbtTag::Byte(slot as i8));
            stack
        })
        .collect::<Vec<NbtCompound>>();

    NbtCompound::from_values(vec![
        (
            "id".into(),
            NbtTag::String(Ident::populate_namespace(id).as_ref().into()),
        ),
        ("x".into(), NbtTag::Int(position.0)),
        ("y".into(), NbtTag::Int(position.1)),
        ("z".into(), NbtTag::Int(position.2)),
        (
            "Items".into(),
            if items.is_empty() {
                NbtTag::List(NbtList::Empty)
            } else {
                NbtTag::List(NbtList::Compound(items))
            },
        ),
    ])
}

/// Builds an item stack compound in the modern (components) encoding.
pub fn item_stack(id: &str, count: i32) -> NbtCompound {
    NbtCompound::from_values(vec![
        (
            "id".into(),
            NbtTag::String(Ident::populate_namespace(id).as_ref().into()),
        ),
        ("count".into(), NbtTag::Int(count)),
    ])
}

/// Attaches shulker-box style nested contents to an item stack.
///
/// The nested stacks end up under the `minecraft:container` component as
/// `{slot, item}` entries, the way a placed-then-broken shulker box stores its
/// inventory.
pub fn with_container_contents(mut stack: NbtCompound, contents: Vec<NbtCompound>) -> NbtCompound {
    let entries = contents
        .into_iter()
        .enumerate()
        .map(|(slot, item)| {
            NbtCompound::from_values(vec![
                ("slot".into(), NbtTag::Int(slot as i32)),
                ("item".into(), NbtTag::Compound(item)),
            ])
        })
        .collect::<Vec<NbtCompound>>();

    components_mut(&mut stack).insert("minecraft:container", NbtTag::List(NbtList::Compound(entries)));
    stack
}

/// Attaches bundle contents to an item stack.
///
/// Bundles keep a flat list of stacks under `minecraft:bundle_contents`.
pub fn with_bundle_contents(mut stack: NbtCompound, contents: Vec<NbtCompound>) -> NbtCompound {
    components_mut(&mut stack).insert(
        "minecraft:bundle_contents",
        NbtTag::List(NbtList::Compound(contents)),
    );
    stack
}

fn components_mut(stack: &mut NbtCompound) -> &mut NbtCompound {
    if stack.compound("components").is_none() {
        stack.insert("components", NbtTag::Compound(NbtCompound::new()));
    }
    stack
        .compound_mut("components")
        .expect("components was just inserted")
}

/// Checks the data_version and status of the chunk if it's valid to load
pub(crate) fn is_valid_chunk(chunk: &NbtCompound, coords: (i32, i32)) -> Result<()> {
    let status = chunk
        .string("Status")
        .ok_or(Error::MissingNbtTag("Status"))?
        .to_str();
    if status != World::REQUIRED_STATUS {
        return Err(Error::NotFullyGenerated {
            chunk: coords,
            status: status.into_owned(),
        });
    }

    let data_version = chunk
        .int("DataVersion")
        .ok_or(Error::MissingNbtTag("DataVersion"))?;
    if data_version < World::MIN_DATA_VERSION {
        return Err(Error::UnsupportedVersion {
            chunk: coords,
            data_version,
        });
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use mca::{CompressionType, RegionWriter};
    use simdnbt::owned::BaseNbt;
    use std::io::BufReader;

    fn chunk_bytes(chunk: NbtCompound) -> Vec<u8> {
        let mut raw = vec![];
        Nbt::Some(BaseNbt::new("", chunk)).write(&mut raw);
        raw
    }

    #[test]
    fn empty_world() {
        let world = World::empty();
        assert_eq!(world.chunks.len(), 0);
        assert_eq!(world.markers.len(), 0);
        assert!(!world.is_chunk_loaded(0, 0));
    }

    #[test]
    fn chunk_coords() {
        assert_eq!(to_chunk_coords((0, 64, 0)), (0, 0));
        assert_eq!(to_chunk_coords((15, -12, 16)), (0, 1));
        assert_eq!(to_chunk_coords((-1, 64, -16)), (-1, -1));
        assert_eq!(to_chunk_coords((-17, 64, 31)), (-2, 1));
    }

    #[test]
    fn valid_empty_chunk() -> Result<()> {
        let chunk = empty_chunk((-3, 7));
        is_valid_chunk(&chunk, (-3, 7))?;

        let x_pos = chunk.int("xPos").ok_or(Error::MissingNbtTag("xPos"))?;
        let z_pos = chunk.int("zPos").ok_or(Error::MissingNbtTag("zPos"))?;
        assert_eq!(x_pos, -3);
        assert_eq!(z_pos, 7);
        assert_eq!(block_entities(&chunk)?.len(), 0);

        Ok(())
    }

    #[test]
    fn insert_and_get_chunk() -> Result<()> {
        let mut world = World::empty();
        world.insert_chunk((4, 8), empty_chunk((4, 8)))?;

        assert!(world.is_chunk_loaded(4, 8));
        assert!(world.get_chunk(4, 8).is_some());
        assert!(world.get_chunk(8, 4).is_none());

        Ok(())
    }

    #[test]
    fn unload_chunk() -> Result<()> {
        let mut world = World::empty();
        world.insert_chunk((0, 0), empty_chunk((0, 0)))?;
        assert!(world.unload_chunk((0, 0)).is_some());
        assert!(!world.is_chunk_loaded(0, 0));
        assert!(world.unload_chunk((0, 0)).is_none());
        Ok(())
    }

    fn chunk_with(status: &str, data_version: i32) -> NbtCompound {
        NbtCompound::from_values(vec![
            ("Status".into(), NbtTag::String(status.into())),
            ("DataVersion".into(), NbtTag::Int(data_version)),
            ("block_entities".into(), NbtTag::List(NbtList::Empty)),
        ])
    }

    #[test]
    fn rejects_proto_chunk() {
        let mut world = World::empty();
        assert!(matches!(
            world.insert_chunk((0, 0), chunk_with("minecraft:features", World::MIN_DATA_VERSION)),
            Err(Error::NotFullyGenerated { .. })
        ));
    }

    #[test]
    fn rejects_old_data_version() {
        let mut world = World::empty();
        assert!(matches!(
            world.insert_chunk((0, 0), chunk_with(World::REQUIRED_STATUS, 1519)),
            Err(Error::UnsupportedVersion { data_version: 1519, .. })
        ));
    }

    #[test]
    fn push_entity_into_empty_list() -> Result<()> {
        let mut chunk = empty_chunk((0, 0));
        push_block_entity(&mut chunk, container_entity("chest", (1, 64, 1), vec![]))?;
        push_block_entity(&mut chunk, container_entity("barrel", (2, 64, 1), vec![]))?;

        let entities = block_entities(&chunk)?;
        assert_eq!(entities.len(), 2);
        assert_eq!(
            entities[0].string("id").ok_or(Error::MissingNbtTag("id"))?.to_str(),
            "minecraft:chest"
        );

        Ok(())
    }

    #[test]
    fn container_entity_slots() -> Result<()> {
        let chest = container_entity(
            "chest",
            (5, 64, 5),
            vec![item_stack("diamond", 3), item_stack("stone", 64)],
        );

        let items = match chest.list("Items") {
            Some(NbtList::Compound(items)) => items,
            _ => return Err(Error::InvalidNbtList("Items")),
        };
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].byte("Slot"), Some(0));
        assert_eq!(items[1].byte("Slot"), Some(1));
        assert_eq!(items[1].int("count"), Some(64));

        Ok(())
    }

    #[test]
    fn region_roundtrip() -> Result<()> {
        let mut writer = RegionWriter::new();
        for (x, z) in [(0u8, 0u8), (1, 0), (31, 31)] {
            let raw = chunk_bytes(empty_chunk((x as i32, z as i32)));
            writer.push_chunk_with_compression(&raw, (x, z), CompressionType::Zlib)?;
        }
        let mut bytes = vec![];
        writer.write(&mut bytes)?;

        let mut world = World::empty();
        let loaded = world.load_region(&mut BufReader::new(&bytes[..]), (0, 0))?;

        assert_eq!(loaded, 3);
        assert!(world.is_chunk_loaded(0, 0));
        assert!(world.is_chunk_loaded(31, 31));
        assert!(!world.is_chunk_loaded(2, 2));

        Ok(())
    }

    #[test]
    fn region_offset_by_coords() -> Result<()> {
        let mut writer = RegionWriter::new();
        let raw = chunk_bytes(empty_chunk((5, 9)));
        writer.push_chunk_with_compression(&raw, (5, 9), CompressionType::Zlib)?;
        let mut bytes = vec![];
        writer.write(&mut bytes)?;

        let mut world = World::empty();
        world.load_region(&mut BufReader::new(&bytes[..]), (-1, 2))?;

        // region (-1, 2) spans chunks -32..0 on x and 64..96 on z
        assert!(world.is_chunk_loaded(-27, 73));

        Ok(())
    }

    #[test]
    fn load_region_skips_proto_chunks() -> Result<()> {
        let proto = chunk_with("minecraft:noise", World::MIN_DATA_VERSION);

        let mut writer = RegionWriter::new();
        writer.push_chunk_with_compression(&chunk_bytes(proto), (0, 0), CompressionType::Zlib)?;
        writer.push_chunk_with_compression(&chunk_bytes(empty_chunk((1, 0))), (1, 0), CompressionType::Zlib)?;
        let mut bytes = vec![];
        writer.write(&mut bytes)?;

        let mut world = World::empty();
        let loaded = world.load_region(&mut BufReader::new(&bytes[..]), (0, 0))?;

        assert_eq!(loaded, 1);
        assert!(!world.is_chunk_loaded(0, 0));
        assert!(world.is_chunk_loaded(1, 0));

        Ok(())
    }
}
