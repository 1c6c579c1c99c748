//! ### English
//! Resynchronizing UTF-8 decoder for platform text-input payloads.
//!
//! A malformed leading or continuation byte costs exactly that one byte; decoding resumes at the
//! next byte instead of abandoning the string.
//!
//! ### 中文
//! 用于平台文本输入负载的可重新同步 UTF-8 解码器。
//!
//! 非法的首字节或后续字节只会丢弃该单个字节；解码从下一个字节继续，而不是放弃整个字符串。

/// ### English
/// Iterator over the scalars of a NUL-terminated UTF-8 byte buffer.
///
/// ### 中文
/// 遍历以 NUL 结尾的 UTF-8 字节缓冲区中的标量值。
pub struct Utf8Chars<'a> {
    bytes: &'a [u8],
    skipped: usize,
}

/// ### English
/// Decodes `bytes` up to the first NUL (or the end of the slice).
///
/// ### 中文
/// 解码 `bytes`，直到第一个 NUL（或切片末尾）。
pub fn decode_utf8(bytes: &[u8]) -> Utf8Chars<'_> {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    Utf8Chars {
        bytes: &bytes[..end],
        skipped: 0,
    }
}

impl Utf8Chars<'_> {
    /// ### English
    /// Bytes dropped so far during resynchronization.
    ///
    /// ### 中文
    /// 重新同步过程中迄今丢弃的字节数。
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

fn sequence_len(lead: u8) -> Option<(usize, u32)> {
    match lead {
        0x00..=0x7F => Some((1, u32::from(lead))),
        _ if lead & 0xE0 == 0xC0 => Some((2, u32::from(lead & 0x1F))),
        _ if lead & 0xF0 == 0xE0 => Some((3, u32::from(lead & 0x0F))),
        _ if lead & 0xF8 == 0xF0 => Some((4, u32::from(lead & 0x07))),
        _ => None,
    }
}

fn decode_one(bytes: &[u8]) -> Option<(char, usize)> {
    let (len, mut scalar) = sequence_len(*bytes.first()?)?;
    let tail = bytes.get(1..len)?;
    for &byte in tail {
        if byte & 0xC0 != 0x80 {
            return None;
        }
        scalar = (scalar << 6) | u32::from(byte & 0x3F);
    }
    // Overlong forms are malformed; the shortest encoding is the only valid one.
    let min_scalar = match len {
        1 => 0,
        2 => 0x80,
        3 => 0x800,
        _ => 0x1_0000,
    };
    if scalar < min_scalar {
        return None;
    }
    char::from_u32(scalar).map(|c| (c, len))
}

impl Iterator for Utf8Chars<'_> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        while !self.bytes.is_empty() {
            match decode_one(self.bytes) {
                Some((c, len)) => {
                    self.bytes = &self.bytes[len..];
                    return Some(c);
                }
                None => {
                    self.bytes = &self.bytes[1..];
                    self.skipped += 1;
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_scalars_survive_encoding() {
        let scalars = [
            'a', '\u{7F}', '\u{80}', '\u{7FF}', '\u{800}', '\u{FFFF}', '\u{10000}', '\u{10FFFF}',
            'é', '中', '😀',
        ];
        let mut bytes = Vec::new();
        for c in scalars {
            let mut buf = [0; 4];
            bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
        }
        let decoded: Vec<char> = decode_utf8(&bytes).collect();
        assert_eq!(decoded, scalars);
    }

    #[test]
    fn bad_continuation_skips_one_byte() {
        let mut chars = decode_utf8(&[0xE0, 0x41, 0x42]);
        assert_eq!(chars.by_ref().collect::<String>(), "AB");
        assert_eq!(chars.skipped(), 1);
    }

    #[test]
    fn stray_bytes_and_truncation_resync() {
        let bytes = [0x80, b'x', 0xFF, 0xC3, 0xA9, 0xF0, 0x9F, 0x98];
        let mut chars = decode_utf8(&bytes);
        assert_eq!(chars.by_ref().collect::<String>(), "xé");
        assert_eq!(chars.skipped(), 5);
    }

    #[test]
    fn overlong_forms_are_skipped() {
        let mut chars = decode_utf8(&[0xC0, 0xAF, 0xE0, 0x80, 0x80, b'k', 0xF0, 0x80, 0x80, 0x80]);
        assert_eq!(chars.by_ref().collect::<String>(), "k");
        assert_eq!(chars.skipped(), 9);
    }

    #[test]
    fn stops_at_nul() {
        let mut payload = [0u8; 32];
        payload[..3].copy_from_slice(b"hi!");
        payload[4] = b'z';
        assert_eq!(decode_utf8(&payload).collect::<String>(), "hi!");
    }
}
