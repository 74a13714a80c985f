use coupon_core::BoardConfig;
use web_sys::{Document, Window};

use crate::constants::CONFIG_SCRIPT_ID;
use crate::utils::query_pairs;

/// Board config from, in increasing priority: defaults, the page's JSON
/// config block, then URL query parameters.
pub fn load_config(window: &Window, document: &Document) -> BoardConfig {
    let json = document
        .get_element_by_id(CONFIG_SCRIPT_ID)
        .and_then(|el| el.text_content());
    let search = window.location().search().unwrap_or_default();
    resolve_config(json.as_deref(), &search)
}

pub fn resolve_config(json: Option<&str>, search: &str) -> BoardConfig {
    let base = match json.map(str::trim).filter(|t| !t.is_empty()) {
        Some(text) => BoardConfig::from_json(text).unwrap_or_else(|err| {
            tracing::warn!("ignoring #{CONFIG_SCRIPT_ID}: {err}");
            BoardConfig::default()
        }),
        None => BoardConfig::default(),
    };
    let pairs = query_pairs(search);
    base.with_overrides(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
}
