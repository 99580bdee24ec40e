use serde_json::Value;
use similar::TextDiff;

use crate::document::{ALIASES_KEY, ConfigDocument, VIEWER_CERTIFICATE_KEY};

fn changed_blocks(config: &ConfigDocument) -> serde_json::Result<String> {
    let mut blocks = ConfigDocument::new();
    for key in [VIEWER_CERTIFICATE_KEY, ALIASES_KEY] {
        blocks.insert(key.to_string(), config.get(key).cloned().unwrap_or(Value::Null));
    }

    let mut rendered = serde_json::to_string_pretty(&blocks)?;
    rendered.push('\n');
    Ok(rendered)
}

/// Unified diff of the `ViewerCertificate` and `Aliases` blocks between two configs.
/// Empty when neither block differs.
pub fn render_change_preview(current: &ConfigDocument, updated: &ConfigDocument) -> serde_json::Result<String> {
    let before = changed_blocks(current)?;
    let after = changed_blocks(updated)?;

    let diff = TextDiff::from_lines(before.as_str(), after.as_str());
    Ok(diff.unified_diff().context_radius(2).header("current", "updated").to_string())
}
