#![doc = include_str!("../readme.md")]

mod command;
mod config;
mod error;
mod feedback;
mod highlight;
mod ident;
mod scan;
mod world;

pub use command::{SINGLE_SUCCESS, SearchCommand, dispatch};
pub use config::Config;
pub use error::{Error, Result};
pub use feedback::{ClickEvent, Color, CommandSource, HoverEvent, Player, Text};
pub use highlight::{MARKER_BLOCK, MARKER_SCALE, Marker};
pub use ident::Ident;
pub use scan::ContainerMatch;
pub use world::{
    World, container_entity, empty_chunk, item_stack, push_block_entity, to_chunk_coords,
    with_bundle_contents, with_container_contents,
};
