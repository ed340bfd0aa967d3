/// Deterministic 128-bit digest of a listing's identity tuple. Any
/// non-cryptographic hash is fine here; MD5 is kept because that's
/// what the component the core was distilled from used, and changing it
/// would silently invalidate every `content_hash` already on disk.
pub fn compute(url: &str, address: &str, source_id: &str, city: &str) -> String {
    let joined = format!("{url}|{address}|{source_id}|{city}");
    format!("{:x}", md5::compute(joined.as_bytes()))
}
