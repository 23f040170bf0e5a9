//! `highlight` contains the temporary marker displays spawned on matched containers,
//! and the tick handling that despawns them again.

use crate::world::World;

/// Block state a highlight marker displays.
pub const MARKER_BLOCK: &str = "minecraft:sea_lantern";
/// Uniform scale of a marker inside its block space.
pub const MARKER_SCALE: f32 = 0.4;

/// A glowing block display sitting centered inside a matched container's block space.
///
/// Markers are plain data, the host platform turns them into display entities.
/// They despawn on their own once [`World::tick`] passes their expiry tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Block position of the highlighted container.
    pub position: (i32, i32, i32),
    /// Namespaced id of the displayed block state.
    pub block: &'static str,
    /// Whether the display renders a glowing outline through walls.
    pub glowing: bool,
    /// Translation that centers the scaled-down display, `(1 - scale) / 2` per axis.
    pub translation: (f32, f32, f32),
    pub scale: (f32, f32, f32),
    /// Game tick at which this marker gets culled.
    pub expires_at: u64,
}

impl World {
    /// Spawns a highlight marker at the given block position.
    ///
    /// The marker lives for [`Config::highlight_lifetime`](crate::Config::highlight_lifetime)
    /// ticks from now, nothing else in the world interacts with it.
    pub fn spawn_highlight(&mut self, position: (i32, i32, i32)) {
        let offset = (1.0 - MARKER_SCALE) / 2.0;
        self.markers.push(Marker {
            position,
            block: MARKER_BLOCK,
            glowing: true,
            translation: (offset, offset, offset),
            scale: (MARKER_SCALE, MARKER_SCALE, MARKER_SCALE),
            expires_at: self.game_tick + self.config.highlight_lifetime,
        });
    }

    /// Advances the world by one game tick, despawning expired markers.
    pub fn tick(&mut self) {
        self.game_tick += 1;
        let now = self.game_tick;
        self.markers.retain(|marker| marker.expires_at > now);
    }

    /// The current game tick.
    pub fn game_tick(&self) -> u64 {
        self.game_tick
    }

    /// Highlight markers currently alive, oldest first.
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }
}
