//! YAML output formatter

use crate::models::OutlineTree;
use crate::output::FormatError;

/// Format an outline tree as YAML
pub fn format_yaml(data: &OutlineTree) -> Result<String, FormatError> {
    serde_yaml::to_string(data).map_err(FormatError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::tests::create_test_tree;

    #[test]
    fn test_format_yaml() {
        let data = create_test_tree();
        let yaml = format_yaml(&data).unwrap();

        assert!(yaml.contains("root:"));
        assert!(yaml.contains("files:"));
        assert!(yaml.contains("Deploy"));
    }
}
