//! Splitting of provider certificate containers.
//!
//! A container is a MIME-like byte stream: sections separated by `--End`,
//! each certificate section announcing itself with
//! `Content-Type: application/pkix-cert` followed by the DER bytes.

/// Section delimiter.
pub const SECTION_DELIMITER: &[u8] = b"--End";

/// Marker preceding the DER bytes of a certificate section.
pub const CERT_MARKER: &[u8] = b"Content-Type: application/pkix-cert";

/// Header spelling some publishers use, folded to the canonical one.
const HEADER_VARIANT: &[u8] = b"Content-type";
const HEADER_CANONICAL: &[u8] = b"Content-Type";

/// Split a container into the DER segments of its certificate sections, in order.
///
/// Sections without the certificate marker, and sections whose payload is
/// empty after trimming, are dropped.
#[must_use]
pub fn split(raw: &[u8]) -> Vec<Vec<u8>> {
    let mut segments = Vec::new();
    for section in split_on(raw, SECTION_DELIMITER) {
        let section = replace_all(section, HEADER_VARIANT, HEADER_CANONICAL);
        if let Some(pos) = find(&section, CERT_MARKER) {
            let payload = trim_ascii_whitespace(&section[pos + CERT_MARKER.len()..]);
            if !payload.is_empty() {
                segments.push(payload.to_vec());
            }
        }
    }
    segments
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn split_on<'a>(mut data: &'a [u8], delimiter: &[u8]) -> Vec<&'a [u8]> {
    let mut parts = Vec::new();
    while let Some(pos) = find(data, delimiter) {
        parts.push(&data[..pos]);
        data = &data[pos + delimiter.len()..];
    }
    parts.push(data);
    parts
}

fn replace_all(data: &[u8], from: &[u8], to: &[u8]) -> Vec<u8> {
    let parts = split_on(data, from);
    let mut out = Vec::with_capacity(data.len());
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            out.extend_from_slice(to);
        }
        out.extend_from_slice(part);
    }
    out
}

fn trim_ascii_whitespace(data: &[u8]) -> &[u8] {
    let is_ws = |b: &u8| matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c);
    let start = data.iter().position(|b| !is_ws(b)).unwrap_or(data.len());
    let end = data.iter().rposition(|b| !is_ws(b)).map_or(start, |p| p + 1);
    &data[start..end]
}
