use sha2::{Digest, Sha256};

/// Format a float value for display.
pub fn fmt_value(v: f64) -> String {
    if v == 0.0 {
        "0".to_string()
    } else if v.abs() < 0.01 || v.abs() > 10000.0 {
        format!("{:.4e}", v)
    } else {
        format!("{:.4}", v)
    }
}

/// SHA-256 over the little-endian bytes of `ids` and then every channel,
/// in order.
///
/// Two files decode to the same fingerprint exactly when every value is
/// bit-identical, so the hash doubles as a determinism check across runs.
pub fn fingerprint<'a>(ids: &[u64], channels: impl IntoIterator<Item = &'a [f64]>) -> String {
    let mut hasher = Sha256::new();
    hasher.update((ids.len() as u64).to_le_bytes());
    for id in ids {
        hasher.update(id.to_le_bytes());
    }
    for channel in channels {
        hasher.update((channel.len() as u64).to_le_bytes());
        for v in channel {
            hasher.update(v.to_le_bytes());
        }
    }
    format!("{:x}", hasher.finalize())
}
