//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Interactive prompts and user input handling

use std::io::{self, Write};

use anyhow::Result;

use crate::domain::Component;
use crate::service::ProjectVersionService;
use crate::store::ManifestStore;

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_bump, display_error, display_failure, display_info, display_status, display_success,
    status_line,
};

/// Prompt line for an increase-by input.
///
/// # Example
/// ```
/// # use project_version::ui::increase_by_prompt;
/// # use project_version::domain::Component;
/// assert_eq!(
///     increase_by_prompt(Component::Minor, 10),
///     "Increase minor version number\nValue to increase by (min: 1, max: 10)"
/// );
/// ```
pub fn increase_by_prompt(component: Component, max_increase: u32) -> String {
    format!(
        "Increase {} version number\nValue to increase by (min: 1, max: {})",
        component, max_increase
    )
}

/// Prompts user for how much to increase `component` by.
///
/// Re-prompts until the input is accepted by the service. Empty input cancels.
///
/// # Returns
/// * `Ok(Some(by))` - A validated increment
/// * `Ok(None)` - If the user entered nothing
/// * `Err` - If the version is unknown or input cannot be read
pub fn prompt_increase_by<S: ManifestStore>(
    service: &ProjectVersionService<S>,
    component: Component,
) -> Result<Option<u64>> {
    let max = service.max_increase(component)?;
    println!("\n{}", increase_by_prompt(component, max));

    loop {
        print!("Increase by: ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim();

        if input.is_empty() {
            return Ok(None);
        }

        match service.validate_increase_by(component, input) {
            Ok(by) => return Ok(Some(by)),
            Err(_) => display_error("Value not within the allowed range."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increase_by_prompt() {
        let prompt = increase_by_prompt(Component::Patch, 999_999_996);
        assert!(prompt.contains("Increase patch version number"));
        assert!(prompt.ends_with("(min: 1, max: 999999996)"));
    }
}
