use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Deterministic bucket for `key` in `0..buckets`. Stable within a build,
/// which is all the palette fallback needs.
pub fn stable_index(key: &str, buckets: usize) -> usize {
    if buckets == 0 {
        return 0;
    }

    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    (hasher.finish() % buckets as u64) as usize
}

pub fn format_alpha(alpha: f32) -> String {
    if alpha < 0.001 {
        "settled".to_owned()
    } else {
        format!("{alpha:.3}")
    }
}
