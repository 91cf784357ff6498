//! Interactive entity selection.

use std::io::IsTerminal;

use dialoguer::MultiSelect;

use crate::error::{CliError, CliResult};

/// Chooses a subset of entity identifiers.
pub trait EntityPicker {
    /// Returns the chosen entities, in the order they were offered.
    fn pick(&self, entities: &[&str]) -> CliResult<Vec<String>>;
}

/// Checks if both stdin and stderr are connected to a terminal.
///
/// The prompt draws on stderr, so stdout may be piped.
pub fn is_interactive_terminal() -> bool {
    prompt_available(&std::io::stdin(), &std::io::stderr())
}

fn prompt_available(input: &impl IsTerminal, prompt_output: &impl IsTerminal) -> bool {
    input.is_terminal() && prompt_output.is_terminal()
}

/// Requires an interactive terminal, returning an error if not available.
pub fn require_interactive() -> CliResult<()> {
    if !is_interactive_terminal() {
        return Err(CliError::NotInteractive);
    }
    Ok(())
}

/// Checkbox prompt with every entity pre-checked.
#[derive(Debug, Default)]
pub struct TerminalPicker;

impl EntityPicker for TerminalPicker {
    fn pick(&self, entities: &[&str]) -> CliResult<Vec<String>> {
        require_interactive()?;

        let defaults = vec![true; entities.len()];
        let chosen = MultiSelect::new()
            .with_prompt("Select classes (space to toggle, enter to confirm)")
            .items(entities)
            .defaults(&defaults)
            .interact()
            .map_err(|e| CliError::Prompt(e.to_string()))?;

        Ok(picked_entities(entities, &chosen))
    }
}

/// Maps prompt indices back to entity identifiers, keeping catalog order.
pub fn picked_entities(entities: &[&str], chosen: &[usize]) -> Vec<String> {
    let mut chosen = chosen.to_vec();
    chosen.sort_unstable();
    chosen.dedup();
    chosen
        .into_iter()
        .filter_map(|i| entities.get(i).map(|e| e.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picked_entities_keeps_catalog_order() {
        let entities = ["User", "Order", "Invoice"];
        assert_eq!(picked_entities(&entities, &[2, 0]), vec!["User", "Invoice"]);
        assert_eq!(picked_entities(&entities, &[1, 1, 7]), vec!["Order"]);
        assert!(picked_entities(&entities, &[]).is_empty());
    }

    #[test]
    fn test_prompt_needs_terminal_input_and_prompt_output() {
        let file = tempfile::tempfile().unwrap();
        assert!(!prompt_available(&file, &file));
        assert!(!prompt_available(&file, &std::io::stderr()));
    }
}
