//! Rewriting of raw color codes embedded in flat talk table strings
//!
//! The engine stores colors as `<c` followed by three raw bytes (red, green and blue) and `>`.
//! The raw bytes can be anything, including values that are not valid in the table's encoding,
//! so they are rewritten into the readable `<cRRGGBBFF>` form before the string is decoded.

const TOKEN_LENGTH: usize = 6;

/// Replace every raw color code in `data` with its hex form.
///
/// Bytes are matched one at a time. When a byte doesn't fit the token, everything collected so
/// far is copied as is along with that byte, and matching starts over at the next byte.
///
/// ```
/// use aurora_tlk::color::pre_parse_color_codes;
///
/// let parsed = pre_parse_color_codes(b"<c\xFF\x80\x00>Gold</c>");
/// assert_eq!(parsed, b"<cFF8000FF>Gold</c>");
/// ```
pub fn pre_parse_color_codes(data: &[u8]) -> Vec<u8> {
    let mut parsed = Vec::with_capacity(data.len());
    let mut collected = Vec::with_capacity(TOKEN_LENGTH);

    for &byte in data {
        match (collected.len(), byte) {
            (0, b'<') | (1, b'c') | (2..=4, _) => collected.push(byte),
            (0, _) => parsed.push(byte),
            (5, b'>') => {
                parsed.extend_from_slice(b"<c");
                for component in &collected[2..5] {
                    parsed.extend_from_slice(format!("{component:02X}").as_bytes());
                }
                parsed.extend_from_slice(b"FF>");
                collected.clear();
            }
            _ => {
                parsed.append(&mut collected);
                parsed.push(byte);
            }
        }
    }

    parsed.append(&mut collected);
    parsed
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::color::pre_parse_color_codes;

    #[test]
    fn rewrites_raw_tokens() {
        assert_eq!(
            pre_parse_color_codes(b"a<c\x01\x02\x03>b<c\xAA\xBB\xCC>c"),
            b"a<c010203FF>b<cAABBCCFF>c"
        );
    }

    #[test]
    fn closing_tokens_are_kept() {
        assert_eq!(pre_parse_color_codes(b"</c>"), b"</c>");
    }

    #[test]
    fn partial_tokens_are_kept() {
        assert_eq!(pre_parse_color_codes(b"<c\x01\x02"), b"<c\x01\x02");
        assert_eq!(pre_parse_color_codes(b"<c\x01\x02\x03x"), b"<c\x01\x02\x03x");
    }

    #[test]
    fn mismatched_bytes_are_not_rescanned() {
        assert_eq!(pre_parse_color_codes(b"<<c\x01\x02\x03>"), b"<<c\x01\x02\x03>");
        assert_eq!(
            pre_parse_color_codes(b"<c\x01\x02\x03<c\x04\x05\x06>"),
            b"<c\x01\x02\x03<c\x04\x05\x06>"
        );
        assert_eq!(
            pre_parse_color_codes(b"<x<c\x01\x02\x03>"),
            b"<x<c010203FF>"
        );
    }

    #[test]
    fn plain_text_is_unchanged() {
        assert_eq!(pre_parse_color_codes(b"Hello"), b"Hello");
        assert_eq!(pre_parse_color_codes(b""), b"");
    }
}
