//! Configuration for parsing and building.
//!
//! - [`ParseOptions`]: what the parser accepts
//! - [`BuilderOptions`]: how the [`Builder`](crate::Builder) lays out text
//!
//! ## Examples
//!
//! ```rust
//! use plainfields::{parse_with_options, to_string_with_options, BuilderOptions, ParseOptions};
//! use serde::Serialize;
//!
//! // Reject positional values entirely.
//! let events: Vec<_> = parse_with_options("name,omitempty", ParseOptions::strict()).collect();
//! assert!(events.last().is_some_and(|e| e.is_error()));
//!
//! #[derive(Serialize)]
//! struct Server { host: String, port: u16 }
//!
//! let server = Server { host: "localhost".into(), port: 8080 };
//! let options = BuilderOptions::new().with_space_after_field_separator(true);
//! let text = to_string_with_options(&server, options).unwrap();
//! assert_eq!(text, "host=localhost, port=8080");
//! ```

/// Options accepted by the parser.
///
/// # Examples
///
/// ```rust
/// use plainfields::ParseOptions;
///
/// assert!(ParseOptions::new().allow_ordered);
/// assert!(!ParseOptions::strict().allow_ordered);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Accept bare (positional) values before the first labeled field.
    pub allow_ordered: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            allow_ordered: true,
        }
    }
}

impl ParseOptions {
    /// Creates default options: ordered values are allowed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options that only accept labeled fields.
    #[must_use]
    pub fn strict() -> Self {
        ParseOptions {
            allow_ordered: false,
        }
    }

    #[must_use]
    pub fn with_allow_ordered(mut self, allow_ordered: bool) -> Self {
        self.allow_ordered = allow_ordered;
        self
    }
}

/// Layout options for the [`Builder`](crate::Builder).
///
/// The default is the most compact form: no optional spaces and quotes only
/// where needed.
///
/// # Examples
///
/// ```rust
/// use plainfields::{Builder, BuilderOptions};
///
/// let mut builder = Builder::with_options(BuilderOptions::spaced());
/// builder.labeled("name", "john").unwrap().list("tags", ["dev", "prod"]).unwrap();
/// assert_eq!(builder.build(), "name = john, tags = dev; prod");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuilderOptions {
    /// `a=1, b=2`
    pub space_after_field_separator: bool,
    /// `tags=dev; prod`
    pub space_after_list_separator: bool,
    /// `settings=theme: dark`
    pub space_after_pair_separator: bool,
    /// `name = john`
    pub space_around_assignment: bool,
    /// Quote every text value, not only the ones that need it.
    pub always_quote_strings: bool,
}

impl BuilderOptions {
    /// Creates default options (compact, minimal quoting).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options with every optional space enabled.
    #[must_use]
    pub fn spaced() -> Self {
        BuilderOptions {
            space_after_field_separator: true,
            space_after_list_separator: true,
            space_after_pair_separator: true,
            space_around_assignment: true,
            always_quote_strings: false,
        }
    }

    #[must_use]
    pub fn with_space_after_field_separator(mut self, enabled: bool) -> Self {
        self.space_after_field_separator = enabled;
        self
    }

    #[must_use]
    pub fn with_space_after_list_separator(mut self, enabled: bool) -> Self {
        self.space_after_list_separator = enabled;
        self
    }

    #[must_use]
    pub fn with_space_after_pair_separator(mut self, enabled: bool) -> Self {
        self.space_after_pair_separator = enabled;
        self
    }

    #[must_use]
    pub fn with_space_around_assignment(mut self, enabled: bool) -> Self {
        self.space_around_assignment = enabled;
        self
    }

    #[must_use]
    pub fn with_always_quote_strings(mut self, enabled: bool) -> Self {
        self.always_quote_strings = enabled;
        self
    }

    pub(crate) const fn field_separator(&self) -> &'static str {
        if self.space_after_field_separator {
            ", "
        } else {
            ","
        }
    }

    pub(crate) const fn list_separator(&self) -> &'static str {
        if self.space_after_list_separator {
            "; "
        } else {
            ";"
        }
    }

    pub(crate) const fn pair_separator(&self) -> &'static str {
        if self.space_after_pair_separator {
            ": "
        } else {
            ":"
        }
    }

    pub(crate) const fn assignment(&self) -> &'static str {
        if self.space_around_assignment {
            " = "
        } else {
            "="
        }
    }
}
