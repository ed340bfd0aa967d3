use std::io::Read;

/// Decode `body` according to `content_encoding`, falling back to trying
/// every known codec in order if the declared encoding doesn't yield
/// valid text — some portals mislabel `Content-Encoding` or omit
/// it while still sending compressed bytes.
pub fn decode_body(body: &[u8], content_encoding: Option<&str>) -> Option<String> {
    if let Some(encoding) = content_encoding {
        if let Some(text) = decode_with(body, encoding) {
            return Some(text);
        }
    }

    if let Ok(text) = std::str::from_utf8(body) {
        if !looks_binary(text) {
            return Some(text.to_string());
        }
    }

    for codec in ["gzip", "deflate", "br", "zstd"] {
        if let Some(text) = decode_with(body, codec) {
            return Some(text);
        }
    }
    None
}

fn decode_with(body: &[u8], encoding: &str) -> Option<String> {
    match encoding {
        "gzip" => {
            let mut decoder = flate2::read::GzDecoder::new(body);
            let mut out = String::new();
            decoder.read_to_string(&mut out).ok().map(|_| out)
        }
        "deflate" => {
            let mut decoder = flate2::read::DeflateDecoder::new(body);
            let mut out = String::new();
            decoder.read_to_string(&mut out).ok().map(|_| out)
        }
        "br" => {
            let mut decoder = brotli::Decompressor::new(body, 4096);
            let mut out = String::new();
            decoder.read_to_string(&mut out).ok().map(|_| out)
        }
        "zstd" => zstd::stream::decode_all(body)
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok()),
        _ => None,
    }
}

fn looks_binary(text: &str) -> bool {
    text.chars().take(512).filter(|c| c.is_control() && *c != '\n' && *c != '\r' && *c != '\t').count() > 4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_passes_through_unmodified() {
        let body = b"<html>hello</html>";
        assert_eq!(decode_body(body, None).as_deref(), Some("<html>hello</html>"));
    }

    #[test]
    fn gzip_body_decodes_via_declared_encoding() {
        use flate2::write::GzEncoder;
        use flate2::Compression;
        use std::io::Write;

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"<html>gzipped</html>").unwrap();
        let compressed = encoder.finish().unwrap();

        assert_eq!(
            decode_body(&compressed, Some("gzip")).as_deref(),
            Some("<html>gzipped</html>")
        );
    }

    #[test]
    fn mislabeled_gzip_body_still_decodes_via_fallback_chain() {
        use flate2::write::GzEncoder;
        use flate2::Compression;
        use std::io::Write;

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"<html>fallback</html>").unwrap();
        let compressed = encoder.finish().unwrap();

        assert_eq!(
            decode_body(&compressed, Some("identity")).as_deref(),
            Some("<html>fallback</html>")
        );
    }
}
