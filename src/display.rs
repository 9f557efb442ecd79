//! Status indicator text and state.
//!
//! Everything here is pure: the host decides how to draw a [StatusItem].

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Symbolic icon token understood by the host UI.
pub const ICON_MARKER: &str = "$(info)";
/// Text shown while the manifest is being read.
pub const LOADING_TEXT: &str = "$(sync~spin)";
/// Text shown when no manifest is available.
pub const NO_PACKAGE_TEXT: &str = "N/A";
/// Command the status item triggers when a manifest is available.
pub const OPEN_PACKAGE_COMMAND: &str = "projectVersion.openPackage";

const READY_TOOLTIP: &str = "Open project's package.json.";
const NO_PACKAGE_TOOLTIP: &str = "No package.json found.";

/// Which template renders the status text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DisplayMode {
    #[default]
    #[serde(alias = "Icon and Text")]
    IconAndText,
    #[serde(alias = "Text only")]
    TextOnly,
    Custom,
}

/// Side of the status bar the host places the item on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StatusAlignment {
    Left,
    #[default]
    Right,
}

fn placeholder_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?i)\$\{.*?\}").ok())
        .as_ref()
}

/// Render `name` and `version` with the selected template.
///
/// * `TextOnly` - `"{name} {version}"`
/// * `Custom` with a non-empty template - the first `${name}` and the first
///   `${version}` are substituted, then any other `${...}` is removed
/// * anything else - `"$(info) {name} {version}"`
pub fn format_display(name: &str, version: &str, mode: DisplayMode, custom_template: &str) -> String {
    match mode {
        DisplayMode::TextOnly => format!("{} {}", name, version),
        DisplayMode::Custom if !custom_template.is_empty() => {
            let text = custom_template
                .replacen("${name}", name, 1)
                .replacen("${version}", version, 1);
            match placeholder_pattern() {
                Some(re) => re.replace_all(&text, "").into_owned(),
                None => text,
            }
        }
        _ => format!("{} {} {}", ICON_MARKER, name, version),
    }
}

/// What the host should show in its status indicator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusItem {
    pub text: String,
    pub tooltip: Option<String>,
    pub command: Option<String>,
    pub alignment: StatusAlignment,
    pub priority: i32,
}

impl StatusItem {
    /// Spinner shown before the first read completes.
    pub fn loading(alignment: StatusAlignment, priority: i32) -> Self {
        StatusItem {
            text: LOADING_TEXT.to_string(),
            tooltip: None,
            command: None,
            alignment,
            priority,
        }
    }

    /// Switch to the "manifest available" state with `text`.
    pub fn set_ready(&mut self, text: String) {
        self.text = text;
        self.tooltip = Some(READY_TOOLTIP.to_string());
        self.command = Some(OPEN_PACKAGE_COMMAND.to_string());
    }

    /// Switch to the "no manifest" state.
    pub fn set_no_package(&mut self) {
        self.text = NO_PACKAGE_TEXT.to_string();
        self.tooltip = Some(NO_PACKAGE_TOOLTIP.to_string());
        self.command = None;
    }

    pub fn is_available(&self) -> bool {
        self.command.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_only() {
        assert_eq!(
            format_display("foo", "1.0.0", DisplayMode::TextOnly, ""),
            "foo 1.0.0"
        );
    }

    #[test]
    fn test_icon_and_text() {
        assert_eq!(
            format_display("foo", "1.0.0", DisplayMode::IconAndText, "ignored"),
            "$(info) foo 1.0.0"
        );
    }

    #[test]
    fn test_custom_strips_unknown_placeholders() {
        assert_eq!(
            format_display(
                "foo",
                "1.0.0",
                DisplayMode::Custom,
                "v${version} (${name}) ${unknown}"
            ),
            "v1.0.0 (foo) "
        );
    }

    #[test]
    fn test_custom_substitutes_first_occurrence_only() {
        assert_eq!(
            format_display("foo", "1.0.0", DisplayMode::Custom, "${name}-${name}@${version}"),
            "foo-@1.0.0"
        );
    }

    #[test]
    fn test_custom_placeholders_are_case_insensitive_when_stripped() {
        assert_eq!(
            format_display("foo", "1.0.0", DisplayMode::Custom, "${NAME}${version}${Other}"),
            "1.0.0"
        );
    }

    #[test]
    fn test_custom_empty_template_falls_back_to_icon() {
        assert_eq!(
            format_display("foo", "1.0.0", DisplayMode::Custom, ""),
            "$(info) foo 1.0.0"
        );
    }

    #[test]
    fn test_status_item_states() {
        let mut item = StatusItem::loading(StatusAlignment::Left, 7);
        assert_eq!(item.text, LOADING_TEXT);
        assert!(!item.is_available());

        item.set_ready("foo 1.0.0".to_string());
        assert_eq!(item.command.as_deref(), Some(OPEN_PACKAGE_COMMAND));
        assert_eq!(item.tooltip.as_deref(), Some("Open project's package.json."));
        assert!(item.is_available());

        item.set_no_package();
        assert_eq!(item.text, "N/A");
        assert!(item.command.is_none());
        assert_eq!(item.tooltip.as_deref(), Some("No package.json found."));
        assert_eq!(item.alignment, StatusAlignment::Left);
        assert_eq!(item.priority, 7);
    }
}
