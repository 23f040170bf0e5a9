//! `command` contains the `fr` command surface: the three argument shapes,
//! container-name completions, and the execution that ties scan, feedback and
//! highlights together.

use crate::{
    error::{Error, Result},
    feedback::{self, CommandSource},
    ident::Ident,
    world::World,
};
use tracing::{debug, error};

/// Result value a successfully executed command returns, brigadier style.
pub const SINGLE_SUCCESS: i32 = 1;

/// A parsed `fr` invocation.
///
/// The grammar has three positional shapes:
/// - `fr <item>`
/// - `fr <item> <radius>`
/// - `fr <item> <container> [radius]`
///
/// Whether the second argument is a radius or a container filter is decided by
/// whether it parses as an integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCommand {
    pub item: Ident,
    /// Container-name filter, substring matched against block entity id paths.
    pub container: Option<String>,
    /// Parsed radius, [`None`] falls back to [`Config::default_radius`](crate::Config::default_radius).
    pub radius: Option<i32>,
}

impl SearchCommand {
    /// The literal players type after the slash.
    pub const LITERAL: &'static str = "fr";
    /// Bounds the radius argument type accepts at parse time.
    ///
    /// Execution applies the much tighter [`Config::max_radius`](crate::Config::max_radius)
    /// on top of this.
    pub const RADIUS_MIN: i32 = 1;
    pub const RADIUS_MAX: i32 = 500;
    /// Container names offered as completions for the filter argument.
    pub const CONTAINER_SUGGESTIONS: [&'static str; 7] = [
        "chest",
        "barrel",
        "shulker_box",
        "trapped_chest",
        "dispenser",
        "dropper",
        "hopper",
    ];

    /// Parses a full chat line, with or without the leading `/`.
    ///
    /// ## Example
    /// ```no_run
    /// let command = SearchCommand::parse("fr diamond chest 50")?;
    /// assert_eq!(command.radius, Some(50));
    /// ```
    pub fn parse(line: &str) -> Result<Self> {
        let mut tokens = line.trim().split_whitespace();

        let literal = tokens.next().ok_or(Error::EmptyCommand)?;
        let literal = literal.strip_prefix('/').unwrap_or(literal);
        if literal != Self::LITERAL {
            return Err(Error::UnknownCommand(literal.to_owned()));
        }

        let item = Ident::parse(tokens.next().ok_or(Error::MissingArgument("item"))?)?;

        let mut container = None;
        let mut radius = None;
        if let Some(second) = tokens.next() {
            // an integer second argument is a radius, anything else is a container filter
            if second.chars().next().is_some_and(|c| c == '-' || c.is_ascii_digit()) {
                radius = Some(Self::parse_radius(second)?);
            } else {
                container = Some(unquote(second).to_owned());
                if let Some(third) = tokens.next() {
                    radius = Some(Self::parse_radius(third)?);
                }
            }
        }

        if let Some(trailing) = tokens.next() {
            return Err(Error::TrailingArgument(trailing.to_owned()));
        }

        Ok(Self {
            item,
            container,
            radius,
        })
    }

    /// Parses the radius argument, bounds checked like the argument type `integer(1, 500)`.
    fn parse_radius(token: &str) -> Result<i32> {
        let radius = token
            .parse::<i32>()
            .map_err(|_| Error::InvalidRadius(token.to_owned()))?;
        if !(Self::RADIUS_MIN..=Self::RADIUS_MAX).contains(&radius) {
            return Err(Error::RadiusOutOfBounds { radius });
        }
        Ok(radius)
    }

    /// Completions for a partially typed container filter, prefix matched
    /// case-insensitively the way `suggestMatching` does.
    pub fn suggestions(prefix: &str) -> Vec<&'static str> {
        let prefix = prefix.to_lowercase();
        Self::CONTAINER_SUGGESTIONS
            .iter()
            .copied()
            .filter(|candidate| candidate.starts_with(&prefix))
            .collect()
    }

    /// Runs the search against the world, reporting to `source` and spawning a
    /// highlight on every matched container.
    ///
    /// Returns [`SINGLE_SUCCESS`] when the command ran, `0` when the radius
    /// cap refused it. Anything irregular (no player behind the source,
    /// malformed chunk NBT) comes back as an [`Error`] for the dispatcher to
    /// swallow.
    pub fn execute(&self, world: &mut World, source: &mut CommandSource) -> Result<i32> {
        let radius = self.radius.unwrap_or(world.config.default_radius);
        if radius > world.config.max_radius {
            source.send_feedback(feedback::radius_too_large(world.config.max_radius));
            return Ok(0);
        }

        let origin = source.player_or_err()?.position;
        source.send_feedback(feedback::searching(&self.item, radius));

        let matches = world.search(origin, &self.item, self.container.as_deref(), radius)?;
        debug!(
            item = %self.item.namespaced(),
            radius,
            matches = matches.len(),
            "search executed"
        );

        for found in &matches {
            source.send_feedback(feedback::found(
                found.coordinates,
                &found.container,
                found.count,
                &self.item,
            ));
            world.spawn_highlight(found.coordinates);
        }

        if matches.is_empty() {
            source.send_feedback(feedback::nothing_found());
        }

        Ok(SINGLE_SUCCESS)
    }
}

/// Parses and runs a chat line against the world.
///
/// This is the command-dispatch boundary: any error is logged and reported as
/// result `0` instead of propagating, the way a dispatcher keeps a broken
/// command from taking the server down with it.
pub fn dispatch(world: &mut World, source: &mut CommandSource, line: &str) -> i32 {
    match SearchCommand::parse(line).and_then(|command| command.execute(world, source)) {
        Ok(result) => result,
        Err(err) => {
            error!(%err, line, "search command failed");
            0
        }
    }
}

fn unquote(token: &str) -> &str {
    token
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(token)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        feedback::Color,
        world::{container_entity, empty_chunk, item_stack, push_block_entity},
    };

    #[test]
    fn parse_item_only() -> Result<()> {
        let command = SearchCommand::parse("fr diamond")?;
        assert_eq!(command.item, "minecraft:diamond");
        assert_eq!(command.container, None);
        assert_eq!(command.radius, None);
        Ok(())
    }

    #[test]
    fn parse_item_and_radius() -> Result<()> {
        let command = SearchCommand::parse("/fr minecraft:diamond 50")?;
        assert_eq!(command.item, "minecraft:diamond");
        assert_eq!(command.container, None);
        assert_eq!(command.radius, Some(50));
        Ok(())
    }

    #[test]
    fn parse_item_and_container() -> Result<()> {
        let command = SearchCommand::parse("fr diamond chest")?;
        assert_eq!(command.container.as_deref(), Some("chest"));
        assert_eq!(command.radius, None);
        Ok(())
    }

    #[test]
    fn parse_full_shape() -> Result<()> {
        let command = SearchCommand::parse("fr diamond \"trapped_chest\" 25")?;
        assert_eq!(command.container.as_deref(), Some("trapped_chest"));
        assert_eq!(command.radius, Some(25));
        Ok(())
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!(matches!(SearchCommand::parse("  "), Err(Error::EmptyCommand)));
        assert!(matches!(
            SearchCommand::parse("tp 0 0 0"),
            Err(Error::UnknownCommand(_))
        ));
        assert!(matches!(
            SearchCommand::parse("fr"),
            Err(Error::MissingArgument("item"))
        ));
        assert!(matches!(
            SearchCommand::parse("fr Diamond"),
            Err(Error::InvalidIdentifier(_))
        ));
        assert!(matches!(
            SearchCommand::parse("fr diamond chest 10 extra"),
            Err(Error::TrailingArgument(_))
        ));
    }

    #[test]
    fn parse_radius_bounds() {
        assert!(matches!(
            SearchCommand::parse("fr diamond 0"),
            Err(Error::RadiusOutOfBounds { radius: 0 })
        ));
        assert!(matches!(
            SearchCommand::parse("fr diamond -5"),
            Err(Error::RadiusOutOfBounds { radius: -5 })
        ));
        assert!(matches!(
            SearchCommand::parse("fr diamond 501"),
            Err(Error::RadiusOutOfBounds { radius: 501 })
        ));
        assert!(matches!(
            SearchCommand::parse("fr diamond 12abc"),
            Err(Error::InvalidRadius(_))
        ));
        // 500 parses fine, execution is what caps tighter
        assert!(SearchCommand::parse("fr diamond 500").is_ok());
    }

    #[test]
    fn suggestions_prefix_match() {
        assert_eq!(SearchCommand::suggestions("").len(), 7);
        assert_eq!(SearchCommand::suggestions("ch"), vec!["chest"]);
        assert_eq!(SearchCommand::suggestions("s"), vec!["shulker_box"]);
        assert_eq!(SearchCommand::suggestions("TRA"), vec!["trapped_chest"]);
        assert!(SearchCommand::suggestions("xyz").is_empty());
    }

    fn stocked_world() -> World {
        let mut world = World::empty();
        let mut chunk = empty_chunk((0, 0));
        push_block_entity(
            &mut chunk,
            container_entity("chest", (5, 64, 5), vec![item_stack("diamond", 3)]),
        )
        .unwrap();
        world.insert_chunk((0, 0), chunk).unwrap();
        world
    }

    #[test]
    fn execute_reports_and_highlights() -> Result<()> {
        let mut world = stocked_world();
        let mut source = CommandSource::player("Steve", (0, 64, 0));

        let result = SearchCommand::parse("fr diamond")?.execute(&mut world, &mut source)?;

        assert_eq!(result, SINGLE_SUCCESS);
        let sent = source.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].color, Some(Color::Gray));
        assert_eq!(sent[1].to_plain(), "Found 3 diamond in chest [5, 64, 5]");
        assert_eq!(world.markers().len(), 1);
        assert_eq!(world.markers()[0].position, (5, 64, 5));

        Ok(())
    }

    #[test]
    fn execute_nothing_found() -> Result<()> {
        let mut world = stocked_world();
        let mut source = CommandSource::player("Steve", (0, 64, 0));

        let result = SearchCommand::parse("fr emerald")?.execute(&mut world, &mut source)?;

        assert_eq!(result, SINGLE_SUCCESS);
        let last = source.sent().last().unwrap();
        assert_eq!(last.color, Some(Color::Red));
        assert!(world.markers().is_empty());

        Ok(())
    }

    #[test]
    fn execute_refuses_capped_radius() -> Result<()> {
        let mut world = stocked_world();
        let mut source = CommandSource::player("Steve", (0, 64, 0));

        // 80 parses (within 1..=500) but the execution cap is 75
        let result = SearchCommand::parse("fr diamond 80")?.execute(&mut world, &mut source)?;

        assert_eq!(result, 0);
        assert_eq!(source.sent().len(), 1);
        assert_eq!(source.sent()[0].color, Some(Color::Red));
        assert!(world.markers().is_empty());

        Ok(())
    }

    #[test]
    fn execute_requires_player() -> Result<()> {
        let mut world = stocked_world();
        let mut source = CommandSource::console();

        let result = SearchCommand::parse("fr diamond")?.execute(&mut world, &mut source);
        assert!(matches!(result, Err(Error::NotAPlayer)));

        Ok(())
    }

    #[test]
    fn default_radius_comes_from_config() -> Result<()> {
        let mut world = stocked_world();
        world.config.default_radius = 2;
        let mut source = CommandSource::player("Steve", (0, 64, 0));

        // chest at (5, 64, 5) is outside the shrunken default radius
        SearchCommand::parse("fr diamond")?.execute(&mut world, &mut source)?;
        assert_eq!(source.sent().last().unwrap().color, Some(Color::Red));

        Ok(())
    }

    #[test]
    fn dispatch_swallows_errors() {
        let mut world = stocked_world();
        let mut source = CommandSource::player("Steve", (0, 64, 0));

        assert_eq!(dispatch(&mut world, &mut source, "fr diamond"), SINGLE_SUCCESS);
        assert_eq!(dispatch(&mut world, &mut source, "fr"), 0);
        assert_eq!(dispatch(&mut world, &mut source, "nonsense"), 0);

        let mut console = CommandSource::console();
        assert_eq!(dispatch(&mut world, &mut console, "fr diamond"), 0);
    }
}
