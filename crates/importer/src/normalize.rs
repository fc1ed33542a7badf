//! Field normalization shared by every source.

/// Public CDN root that mirrors the game client's asset tree.
pub const ASSET_BASE_URL: &str =
    "https://raw.communitydragon.org/latest/plugins/rcp-be-lol-game-data/global/default/";

/// Prefix of client-relative asset paths.
const CLIENT_ASSET_PREFIX: &str = "/lol-game-data/assets/";

/// Highest rank stored per ability.
pub const MAX_RANKS: usize = 5;

/// `Champion:Slot` keys whose cooldown ignores ability haste.
const STATIC_COOLDOWNS: [&str; 3] = ["Anivia:P", "Zac:P", "Aatrox:P"];

/// Turns a client asset path into a lowercase CDN URL.
///
/// Absolute URLs are kept as they are; the CDN is case-sensitive and only
/// serves lowercase paths.
pub fn asset_url(path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let relative = path
        .strip_prefix(CLIENT_ASSET_PREFIX)
        .unwrap_or_else(|| path.trim_start_matches('/'));
    format!("{ASSET_BASE_URL}{}", relative.to_lowercase())
}

/// Keeps at most [`MAX_RANKS`] values.
pub fn truncate_ranks(values: &[f64]) -> Vec<f64> {
    values.iter().take(MAX_RANKS).copied().collect()
}

/// Strips the `k` enum prefix (`kEpic` becomes `Epic`). Empty results are `None`.
pub fn rarity(raw: &str) -> Option<String> {
    let stripped = raw.strip_prefix('k').unwrap_or(raw);
    (!stripped.is_empty()).then(|| stripped.to_string())
}

/// Whether ability haste shortens this ability's cooldown.
pub fn affected_by_cdr(champion_name: &str, slot: game_core::Slot) -> bool {
    let key = format!("{champion_name}:{slot}");
    !STATIC_COOLDOWNS.contains(&key.as_str())
}

/// Empty strings become `None`.
pub fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
