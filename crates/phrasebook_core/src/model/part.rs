//! Sentence part model.
//!
//! # Responsibility
//! - Define the closed set of fragments a sentence is assembled from.
//! - Provide editor-time configuration updates and per-variant rendering.
//!
//! # Invariants
//! - `Choice::options` is stored as one comma-separated option list.
//! - Placeholder parts always render a label, falling back to a generic
//!   term when none was configured.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Fallback label for free-text placeholders without a configured label.
pub const FREE_TEXT_FALLBACK_LABEL: &str = "Field";
/// Fallback label for choice placeholders without a configured label.
pub const CHOICE_FALLBACK_LABEL: &str = "List";

/// Discriminant of a [`Part`], used by create/storage paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartKind {
    /// Fixed text copied verbatim.
    Literal,
    /// Free-text input filled at use-time.
    FreeText,
    /// Single choice out of a comma-separated option list.
    Choice,
}

impl PartKind {
    /// Stable storage name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Literal => "literal",
            Self::FreeText => "free_text",
            Self::Choice => "choice",
        }
    }

    /// Parses a storage name produced by [`PartKind::as_str`].
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "literal" => Some(Self::Literal),
            "free_text" => Some(Self::FreeText),
            "choice" => Some(Self::Choice),
            _ => None,
        }
    }
}

/// Defaults applied when a new part is created from the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartDefaults {
    pub free_text_label: String,
    pub free_text_width: String,
    pub choice_label: String,
    pub choice_options: String,
}

impl Default for PartDefaults {
    fn default() -> Self {
        Self {
            free_text_label: "Field".to_string(),
            free_text_width: "w-24".to_string(),
            choice_label: "List".to_string(),
            choice_options: "Option 1,Option 2".to_string(),
        }
    }
}

/// Editor-time configuration field of a part.
///
/// These are template settings, never use-time fill values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartField {
    /// Literal text. Applies to `Literal` only.
    Text(String),
    /// Display label. Applies to `FreeText` and `Choice`.
    Label(String),
    /// Comma-separated option list. Applies to `Choice` only.
    Options(String),
    /// Width hint. Applies to `FreeText` only.
    Width(String),
    /// Input hint such as `date`. Applies to `FreeText` only.
    InputHint(String),
}

/// One fragment of a sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Part {
    Literal {
        value: String,
    },
    FreeText {
        #[serde(default)]
        label: Option<String>,
        #[serde(default)]
        width: Option<String>,
        #[serde(default)]
        input_hint: Option<String>,
    },
    Choice {
        #[serde(default)]
        label: Option<String>,
        options: String,
    },
}

impl Part {
    /// Creates a part of `kind` seeded from editor defaults.
    pub fn new(kind: PartKind, defaults: &PartDefaults) -> Self {
        match kind {
            PartKind::Literal => Self::literal(""),
            PartKind::FreeText => Self::FreeText {
                label: Some(defaults.free_text_label.clone()),
                width: Some(defaults.free_text_width.clone()),
                input_hint: None,
            },
            PartKind::Choice => Self::Choice {
                label: Some(defaults.choice_label.clone()),
                options: defaults.choice_options.clone(),
            },
        }
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
        }
    }

    pub fn free_text(label: impl Into<String>) -> Self {
        Self::FreeText {
            label: Some(label.into()),
            width: None,
            input_hint: None,
        }
    }

    pub fn choice(label: impl Into<String>, options: impl Into<String>) -> Self {
        Self::Choice {
            label: Some(label.into()),
            options: options.into(),
        }
    }

    pub fn kind(&self) -> PartKind {
        match self {
            Self::Literal { .. } => PartKind::Literal,
            Self::FreeText { .. } => PartKind::FreeText,
            Self::Choice { .. } => PartKind::Choice,
        }
    }

    /// Returns whether this part takes a use-time fill value.
    pub fn is_placeholder(&self) -> bool {
        !matches!(self, Self::Literal { .. })
    }

    /// Label shown for a placeholder; `None` for literals.
    ///
    /// Blank labels are treated as absent.
    pub fn display_label(&self) -> Option<&str> {
        match self {
            Self::Literal { .. } => None,
            Self::FreeText { label, .. } => {
                Some(non_blank(label).unwrap_or(FREE_TEXT_FALLBACK_LABEL))
            }
            Self::Choice { label, .. } => Some(non_blank(label).unwrap_or(CHOICE_FALLBACK_LABEL)),
        }
    }

    /// Parsed option list of a choice part, trimmed, blanks dropped.
    pub fn options(&self) -> Vec<&str> {
        match self {
            Self::Choice { options, .. } => options
                .split(',')
                .map(str::trim)
                .filter(|option| !option.is_empty())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Applies one editor-time field update.
    ///
    /// Returns `false` and leaves the part untouched when the field does not
    /// apply to this part kind.
    pub fn update_field(&mut self, field: PartField) -> bool {
        match (self, field) {
            (Self::Literal { value }, PartField::Text(text)) => {
                *value = text;
                true
            }
            (Self::FreeText { label, .. }, PartField::Label(text))
            | (Self::Choice { label, .. }, PartField::Label(text)) => {
                *label = Some(text);
                true
            }
            (Self::Choice { options, .. }, PartField::Options(text)) => {
                *options = text;
                true
            }
            (Self::FreeText { width, .. }, PartField::Width(text)) => {
                *width = Some(text);
                true
            }
            (Self::FreeText { input_hint, .. }, PartField::InputHint(text)) => {
                *input_hint = Some(text);
                true
            }
            _ => false,
        }
    }

    /// Renders this part for output.
    ///
    /// Literals contribute their text verbatim. Placeholders contribute the
    /// fill value when present and non-empty, otherwise `[<label>]`.
    pub fn render<'a>(&'a self, fill: Option<&'a str>) -> Cow<'a, str> {
        match self {
            Self::Literal { value } => Cow::Borrowed(value.as_str()),
            Self::FreeText { .. } | Self::Choice { .. } => match fill {
                Some(value) if !value.is_empty() => Cow::Borrowed(value),
                _ => Cow::Owned(format!("[{}]", self.display_label().unwrap_or_default())),
            },
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|label| !label.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::{Part, PartDefaults, PartField, PartKind, CHOICE_FALLBACK_LABEL};

    #[test]
    fn new_parts_follow_editor_defaults() {
        let defaults = PartDefaults::default();
        assert_eq!(Part::new(PartKind::Literal, &defaults), Part::literal(""));
        match Part::new(PartKind::FreeText, &defaults) {
            Part::FreeText { label, width, .. } => {
                assert_eq!(label.as_deref(), Some("Field"));
                assert_eq!(width.as_deref(), Some("w-24"));
            }
            other => panic!("unexpected part: {other:?}"),
        }
        assert_eq!(
            Part::new(PartKind::Choice, &defaults).options(),
            vec!["Option 1", "Option 2"]
        );
    }

    #[test]
    fn update_field_ignores_fields_of_other_kinds() {
        let mut literal = Part::literal("a");
        assert!(!literal.update_field(PartField::Label("x".to_string())));
        assert!(literal.update_field(PartField::Text("b".to_string())));
        assert_eq!(literal, Part::literal("b"));

        let mut choice = Part::choice("Area", "head");
        assert!(!choice.update_field(PartField::Width("w-40".to_string())));
        assert!(choice.update_field(PartField::Options("head, back ,,chest".to_string())));
        assert_eq!(choice.options(), vec!["head", "back", "chest"]);
    }

    #[test]
    fn blank_label_renders_fallback() {
        let part = Part::Choice {
            label: Some("  ".to_string()),
            options: String::new(),
        };
        assert_eq!(part.render(None), format!("[{CHOICE_FALLBACK_LABEL}]"));
        assert_eq!(part.render(Some("")), format!("[{CHOICE_FALLBACK_LABEL}]"));
        assert_eq!(part.render(Some("back")), "back");
    }

    #[test]
    fn kind_names_round_trip_through_storage_form() {
        for kind in [PartKind::Literal, PartKind::FreeText, PartKind::Choice] {
            assert_eq!(PartKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(PartKind::parse("select"), None);
    }
}
