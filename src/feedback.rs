//! `feedback` contains the [`Text`] component model for player-facing command output,
//! and the [`CommandSource`] that feedback gets sent through.

use crate::{
    error::{Error, Result},
    ident::Ident,
};

/// Named chat colors, with their legacy `§` formatting codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Aqua,
    Gold,
    Gray,
    Green,
    Red,
    Yellow,
}

impl Color {
    /// The legacy formatting code for this color.
    pub fn code(&self) -> char {
        match self {
            Color::Aqua => 'b',
            Color::Gold => '6',
            Color::Gray => '7',
            Color::Green => 'a',
            Color::Red => 'c',
            Color::Yellow => 'e',
        }
    }
}

/// Click action attached to a text component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickEvent {
    /// Puts a command into the player's chat bar without running it.
    SuggestCommand(String),
}

/// Hover action attached to a text component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoverEvent {
    ShowText(String),
}

/// A styled chat message: content, style, and appended children.
///
/// Built up the way the game's own component chains are:
///
/// ## Example
/// ```no_run
/// let message = Text::literal("Found ")
///     .append(Text::literal("64").colored(Color::Gold))
///     .append(Text::literal(" diamonds"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Text {
    pub content: String,
    pub color: Option<Color>,
    pub underlined: bool,
    pub click: Option<ClickEvent>,
    pub hover: Option<HoverEvent>,
    pub extra: Vec<Text>,
}

impl Text {
    /// Creates a plain unstyled component.
    pub fn literal<S: Into<String>>(content: S) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn colored(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn underlined(mut self) -> Self {
        self.underlined = true;
        self
    }

    pub fn on_click(mut self, event: ClickEvent) -> Self {
        self.click = Some(event);
        self
    }

    pub fn on_hover(mut self, event: HoverEvent) -> Self {
        self.hover = Some(event);
        self
    }

    /// Appends a child component, rendered after this one.
    pub fn append(mut self, child: Text) -> Self {
        self.extra.push(child);
        self
    }

    /// The message without any styling.
    pub fn to_plain(&self) -> String {
        let mut out = self.content.clone();
        for child in &self.extra {
            out.push_str(&child.to_plain());
        }
        out
    }

    /// The message with legacy `§` style codes, resets after every styled run.
    pub fn to_legacy(&self) -> String {
        let mut out = String::new();
        let styled = self.color.is_some() || self.underlined;

        if let Some(color) = self.color {
            out.push('§');
            out.push(color.code());
        }
        if self.underlined {
            out.push_str("§n");
        }
        out.push_str(&self.content);
        if styled {
            out.push_str("§r");
        }

        for child in &self.extra {
            out.push_str(&child.to_legacy());
        }
        out
    }
}

/// The player a command ran as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub name: String,
    /// Block position the search is centered on.
    pub position: (i32, i32, i32),
}

/// Who invoked a command and where its feedback goes.
///
/// Sent messages are buffered in order; the host platform is the one that
/// would flush them out to a client connection.
#[derive(Debug, Clone, Default)]
pub struct CommandSource {
    player: Option<Player>,
    sent: Vec<Text>,
}

impl CommandSource {
    /// A source without a player behind it, like the server console.
    pub fn console() -> Self {
        Self::default()
    }

    /// A source for the given player standing at `position`.
    pub fn player<S: Into<String>>(name: S, position: (i32, i32, i32)) -> Self {
        Self {
            player: Some(Player {
                name: name.into(),
                position,
            }),
            sent: Vec::new(),
        }
    }

    /// The player behind this source, or [`Error::NotAPlayer`].
    pub fn player_or_err(&self) -> Result<&Player> {
        self.player.as_ref().ok_or(Error::NotAPlayer)
    }

    /// Queues feedback for delivery.
    pub fn send_feedback(&mut self, text: Text) {
        self.sent.push(text);
    }

    /// Everything sent so far, oldest first.
    pub fn sent(&self) -> &[Text] {
        &self.sent
    }
}

/// The gray "search started" notice.
pub(crate) fn searching(item: &Ident, radius: i32) -> Text {
    Text::literal(format!("Searching for {} within radius {radius}...", item.path())).colored(Color::Gray)
}

/// A single container hit: count, item, container and a clickable coordinate.
///
/// The container shows up by its id path, `minecraft:chest` reads as `chest`.
pub(crate) fn found(position: (i32, i32, i32), container: &str, count: u32, item: &Ident) -> Text {
    let (x, y, z) = position;
    let container = container
        .split_once(':')
        .map(|(_, path)| path)
        .unwrap_or(container);

    Text::literal("Found ")
        .append(Text::literal(count.to_string()).colored(Color::Gold))
        .append(Text::literal(" "))
        .append(Text::literal(item.path()).colored(Color::Aqua))
        .append(Text::literal(" in "))
        .append(Text::literal(container).colored(Color::Green))
        .append(Text::literal(" "))
        .append(
            Text::literal(format!("[{x}, {y}, {z}]"))
                .colored(Color::Yellow)
                .underlined()
                .on_click(ClickEvent::SuggestCommand(format!("/tp @s {x} {y} {z}")))
                .on_hover(HoverEvent::ShowText(String::from("Click to teleport"))),
        )
}

/// The red notice when no container matched.
pub(crate) fn nothing_found() -> Text {
    Text::literal("Couldn't find that item nearby.").colored(Color::Red)
}

/// The red refusal when the radius exceeds the execution cap.
pub(crate) fn radius_too_large(max_radius: i32) -> Text {
    Text::literal(format!("Error: search radius cannot exceed {max_radius}!")).colored(Color::Red)
}
