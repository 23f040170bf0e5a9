//! `config` contains the [`Config`] struct that tunes how searches and highlights behave.

/// Config for how a [`World`](crate::World) runs searches and highlight markers.
///
/// A [`World`](crate::World) always starts with [`Config::default`], mutate it
/// on the world after construction if you want different limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Radius used when the command doesn't carry one.
    pub default_radius: i32,
    /// Hard cap a search radius may not exceed at execution time.
    ///
    /// Parsing accepts the wider argument range (see
    /// [`SearchCommand::RADIUS_MAX`](crate::SearchCommand::RADIUS_MAX)), but
    /// anything above this cap is refused with a feedback message instead of
    /// running.
    pub max_radius: i32,
    /// How many ticks a highlight marker lives before
    /// [`World::tick`](crate::World::tick) despawns it.
    pub highlight_lifetime: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_radius: 10,
            // could go higher without issue, kept at 75 to be safe
            max_radius: 75,
            // 10 seconds at 20 ticks per second
            highlight_lifetime: 200,
        }
    }
}
