//! `ident` contains the [`Ident`] resource-identifier type used for item and container ids.

use crate::error::{Error, Result};
use simdnbt::Mutf8Str;
use std::{borrow::Cow, fmt::Debug};

/// A resource identifier, an enum to decide if it carries a namespace or not.
///
/// If you know your id already contains a namespace you can safetely construct
/// an [`Ident::Namespaced`]. Otherwise construct an [`Ident::Bare`] and let it
/// auto-translate into the `minecraft:` namespace once it's actually compared
/// or displayed.
#[derive(Clone, Eq)]
pub enum Ident {
    Namespaced(String),
    Bare(String),
}

impl Ident {
    /// Creates a new [`Ident`] that may or may not contain a namespace.
    pub fn new<S: Into<String>>(id: S) -> Self {
        let id = id.into();
        if id.contains(':') {
            Ident::Namespaced(id)
        } else {
            Ident::Bare(id)
        }
    }

    /// Tries to create a new [`Ident`] from user input.
    ///
    /// Fails if the input isn't a valid resource identifier
    /// (`[a-z0-9_.-]` namespace, `[a-z0-9/._-]` path, at most one `:`).
    ///
    /// ## Example
    /// ```no_run
    /// let diamond = Ident::parse("diamond")?;
    /// assert_eq!(diamond.namespaced(), "minecraft:diamond");
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        let (namespace, path) = match input.split_once(':') {
            Some((namespace, path)) => (Some(namespace), path),
            None => (None, input),
        };

        let valid_namespace = namespace.is_none_or(|n| {
            !n.is_empty()
                && n.chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || "_.-".contains(c))
        });
        let valid_path = !path.is_empty()
            && path
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || "/_.-".contains(c));

        if !valid_namespace || !valid_path || path.contains(':') {
            return Err(Error::InvalidIdentifier(input.to_owned()));
        }

        Ok(Self::new(input))
    }

    /// Populates a namespace to the id if none is given.
    ///
    /// Defaults to `minecraft:<id>`
    pub(crate) fn populate_namespace(id: &str) -> Cow<'_, str> {
        if !id.contains(':') {
            Cow::Owned(String::from("minecraft:") + id)
        } else {
            Cow::Borrowed(id)
        }
    }

    /// The identifier in its guaranteed namespaced form, owned or borrowed.
    pub fn namespaced(&self) -> Cow<'_, str> {
        match self {
            Ident::Namespaced(id) => Cow::Borrowed(id),
            Ident::Bare(id) => Self::populate_namespace(id),
        }
    }

    /// The path part of the identifier, without any namespace.
    ///
    /// ## Example
    /// ```no_run
    /// assert_eq!(Ident::new("minecraft:trapped_chest").path(), "trapped_chest");
    /// ```
    pub fn path(&self) -> &str {
        match self {
            Ident::Namespaced(id) => id.split_once(':').map(|(_, path)| path).unwrap_or(id),
            Ident::Bare(id) => id,
        }
    }

    /// The identifier exactly as it was constructed.
    pub fn as_str(&self) -> &str {
        match self {
            Ident::Namespaced(id) => id,
            Ident::Bare(id) => id,
        }
    }

    /// Whether an NBT string holds this identifier, namespaces populated on both sides.
    pub fn matches(&self, other: &Mutf8Str) -> bool {
        Self::populate_namespace(&other.to_str()) == self.namespaced()
    }
}

impl Debug for Ident {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.namespaced())
    }
}

impl PartialEq<Ident> for Ident {
    fn eq(&self, other: &Ident) -> bool {
        self.namespaced() == other.namespaced()
    }
}

impl PartialEq<&str> for Ident {
    fn eq(&self, other: &&str) -> bool {
        self.namespaced() == *other
    }
}

impl PartialEq<Ident> for &str {
    fn eq(&self, other: &Ident) -> bool {
        other.namespaced() == *self
    }
}

impl From<&str> for Ident {
    fn from(value: &str) -> Self {
        Ident::new(value)
    }
}

impl From<String> for Ident {
    fn from(value: String) -> Self {
        Ident::new(value)
    }
}
