//! Option parsing shared by the index commands.

use clap::Args;
use esmap_index::{MappingCatalog, SelectionCriterion};

use crate::error::{CliError, CliResult};
use crate::prompt::EntityPicker;

/// Options that choose which mapped entities a command touches.
///
/// Precedence: `--by-name`, then `--by-class-name`, then `--select`, else all.
#[derive(Debug, Clone, Default, Args)]
pub struct SelectionArgs {
    /// Pick entities interactively (0 or 1)
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "1")]
    pub select: Option<String>,

    /// Only the entity mapped to this index name
    #[arg(long, value_name = "INDEX")]
    pub by_name: Option<String>,

    /// Only this entity
    #[arg(long, value_name = "CLASS")]
    pub by_class_name: Option<String>,
}

/// Parses a boolean option value.
///
/// `None` (option absent) is false. Accepts `0`, `1`, `true` and `false`.
pub fn resolve_bool_option(name: &str, value: Option<&str>) -> CliResult<bool> {
    let Some(raw) = value else {
        return Ok(false);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        _ => Err(CliError::InvalidOption {
            name: name.to_string(),
            value: raw.to_string(),
        }),
    }
}

impl SelectionArgs {
    /// Decides the selection criterion, prompting only when `--select` wins.
    pub fn criterion(
        &self,
        catalog: &MappingCatalog,
        picker: &dyn EntityPicker,
    ) -> CliResult<SelectionCriterion> {
        let select = resolve_bool_option("select", self.select.as_deref())?;

        if let Some(name) = &self.by_name {
            return Ok(SelectionCriterion::ByIndexName(name.clone()));
        }
        if let Some(entity) = &self.by_class_name {
            return Ok(SelectionCriterion::ByEntity(entity.clone()));
        }
        if select {
            let entities = catalog.entities();
            let picked = picker.pick(&entities)?;
            if picked.is_empty() {
                return Err(CliError::EmptySelection);
            }
            return Ok(SelectionCriterion::Selected(picked));
        }
        Ok(SelectionCriterion::All)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_option_values() {
        assert!(!resolve_bool_option("select", None).unwrap());
        assert!(resolve_bool_option("select", Some("1")).unwrap());
        assert!(resolve_bool_option("select", Some("true")).unwrap());
        assert!(resolve_bool_option("select", Some("TRUE")).unwrap());
        assert!(!resolve_bool_option("select", Some("0")).unwrap());
        assert!(!resolve_bool_option("select", Some("false")).unwrap());
    }

    #[test]
    fn test_bool_option_rejects_other_values() {
        let err = resolve_bool_option("re-create-indexes", Some("yes")).unwrap_err();
        assert!(matches!(
            err,
            CliError::InvalidOption { ref name, ref value } if name == "re-create-indexes" && value == "yes"
        ));
    }
}
