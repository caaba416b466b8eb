//! Content-addressed snippet identity.
//!
//! Master documents are hand-maintained and carry no ids, yet the same
//! logical snippet must be recognized across re-imports and across
//! platforms without a central id authority. The id is derived from the
//! snippet's logical content with a classic 31-multiplier string fold in
//! wrapping 32-bit arithmetic. The fold order and width are load-bearing:
//! persisted catalogs identify snippets by these exact values.

/// Only this many leading characters of the content take part in the
/// hash, so trailing edits far into a long snippet do not mint a new
/// identity.
const CONTENT_HEAD: usize = 100;

const SNIPPET_PREFIX: &str = "snippet_";
const FOLDER_PREFIX: &str = "folder_";

/// Derive the stable identifier for a snippet from its folder, title and
/// content head. Pure and deterministic; collisions are tolerated (they
/// merge two snippets into one identity, they do not corrupt data).
pub fn fingerprint(folder: &str, title: &str, content: &str) -> String {
    let head: String = content.chars().take(CONTENT_HEAD).collect();
    let seed = format!("{}_{}_{}", folder, title, head);
    format!("{}{}", SNIPPET_PREFIX, base36(fold(&seed)))
}

/// Folder identity derived from the folder name alone.
pub fn folder_fingerprint(name: &str) -> String {
    format!("{}{}", FOLDER_PREFIX, base36(fold(name)))
}

fn fold(seed: &str) -> u64 {
    let mut hash: i32 = 0;
    for ch in seed.chars() {
        hash = hash.wrapping_mul(31).wrapping_add(ch as i32);
    }
    // i32::MIN has no i32 absolute value; widen first.
    (hash as i64).unsigned_abs()
}

fn base36(mut value: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = String::new();
    while value > 0 {
        out.insert(0, DIGITS[(value % 36) as usize] as char);
        value /= 36;
    }
    out
}
