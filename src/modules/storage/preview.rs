//! Bounded text previews of stored files
//!
//! Two limits apply independently: at most [`PREVIEW_WINDOW_BYTES`] are read
//! from the file, and the decoded text is cut to [`PREVIEW_MAX_CHARS`]
//! characters. `is_truncated` only reports the first one.

use std::path::Path;

use tokio::io::AsyncReadExt;

/// Maximum number of bytes read from a file for its preview
pub const PREVIEW_WINDOW_BYTES: usize = 4096;

/// Maximum number of characters returned in a preview
pub const PREVIEW_MAX_CHARS: usize = 1000;

/// Returned when the preview window holds no decodable text at all
pub const BINARY_PREVIEW_SENTINEL: &str = "<binary content>";

/// Textual preview of the beginning of a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePreview {
    pub preview: String,
    /// Number of characters in `preview`
    pub preview_size: usize,
    /// True when the file holds more bytes than the preview window
    pub is_truncated: bool,
}

/// Read the leading bytes of `path` and render them as a preview.
///
/// The path must already have been verified by the path guard.
pub async fn preview_file(path: &Path) -> std::io::Result<FilePreview> {
    let file = tokio::fs::File::open(path).await?;

    // One byte past the window tells us whether the source continues.
    let mut raw = Vec::with_capacity(PREVIEW_WINDOW_BYTES + 1);
    file.take(PREVIEW_WINDOW_BYTES as u64 + 1)
        .read_to_end(&mut raw)
        .await?;

    let is_truncated = raw.len() > PREVIEW_WINDOW_BYTES;
    raw.truncate(PREVIEW_WINDOW_BYTES);

    Ok(render_preview(&raw, is_truncated))
}

/// Render a preview from an in-memory byte window.
pub fn render_preview(window: &[u8], is_truncated: bool) -> FilePreview {
    let bytes = if is_truncated {
        trim_incomplete_tail(window)
    } else {
        window
    };

    let decoded = String::from_utf8_lossy(bytes);
    let preview: String = if !decoded.is_empty()
        && decoded.chars().all(|c| c == char::REPLACEMENT_CHARACTER)
    {
        BINARY_PREVIEW_SENTINEL.to_string()
    } else {
        decoded.chars().take(PREVIEW_MAX_CHARS).collect()
    };

    FilePreview {
        preview_size: preview.chars().count(),
        preview,
        is_truncated,
    }
}

/// Drop a multi-byte sequence that was cut by the end of the window.
///
/// Only an incomplete sequence at the very end is removed; invalid bytes
/// elsewhere are left for lossy decoding.
fn trim_incomplete_tail(window: &[u8]) -> &[u8] {
    // A UTF-8 sequence is at most 4 bytes, so only the last 3 can be a cut prefix.
    let tail_start = window.len().saturating_sub(3);
    for start in (tail_start..window.len()).rev() {
        match std::str::from_utf8(&window[start..]) {
            Ok(_) => return window,
            Err(e) if e.error_len().is_none() && e.valid_up_to() == 0 => {
                if window[start] & 0b1100_0000 != 0b1000_0000 {
                    return &window[..start];
                }
            }
            Err(_) => {}
        }
    }
    window
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn preview_of(content: &[u8]) -> FilePreview {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sample.bin");
        tokio::fs::write(&path, content).await.unwrap();
        preview_file(&path).await.unwrap()
    }

    #[tokio::test]
    async fn test_small_file_is_not_truncated() {
        let preview = preview_of(&[b'a'; 100]).await;
        assert!(!preview.is_truncated);
        assert_eq!(preview.preview, "a".repeat(100));
        assert_eq!(preview.preview_size, 100);
    }

    #[tokio::test]
    async fn test_large_file_is_truncated() {
        let preview = preview_of(&[b'a'; 5000]).await;
        assert!(preview.is_truncated);
        assert_eq!(preview.preview_size, PREVIEW_MAX_CHARS);
    }

    #[tokio::test]
    async fn test_window_sized_file_is_not_truncated() {
        let preview = preview_of(&[b'x'; PREVIEW_WINDOW_BYTES]).await;
        assert!(!preview.is_truncated);

        let preview = preview_of(&[b'x'; PREVIEW_WINDOW_BYTES + 1]).await;
        assert!(preview.is_truncated);
    }

    #[tokio::test]
    async fn test_char_limit_does_not_set_truncated() {
        // 1500 chars fit in the byte window but exceed the display limit
        let preview = preview_of(&[b'z'; 1500]).await;
        assert!(!preview.is_truncated);
        assert_eq!(preview.preview_size, PREVIEW_MAX_CHARS);
        assert_eq!(preview.preview.len(), PREVIEW_MAX_CHARS);
    }

    #[tokio::test]
    async fn test_binary_file_yields_printable_preview() {
        let content: Vec<u8> = (0..2000).map(|i| 0x80 | (i % 0x40) as u8).collect();
        let preview = preview_of(&content).await;
        assert!(!preview.is_truncated);
        assert_eq!(preview.preview, BINARY_PREVIEW_SENTINEL);
        assert_eq!(preview.preview_size, BINARY_PREVIEW_SENTINEL.len());
    }

    #[tokio::test]
    async fn test_mixed_content_uses_replacement_characters() {
        let mut content = b"header ".to_vec();
        content.extend_from_slice(&[0xff, 0xfe]);
        content.extend_from_slice(b" footer");
        let preview = preview_of(&content).await;
        assert!(preview.preview.starts_with("header "));
        assert!(preview.preview.contains(char::REPLACEMENT_CHARACTER));
        assert!(preview.preview.ends_with(" footer"));
    }

    #[tokio::test]
    async fn test_multibyte_text_counts_characters() {
        let text = "é".repeat(1200); // 2400 bytes, 1200 chars
        let preview = preview_of(text.as_bytes()).await;
        assert!(!preview.is_truncated);
        assert_eq!(preview.preview_size, PREVIEW_MAX_CHARS);
        assert_eq!(preview.preview, "é".repeat(PREVIEW_MAX_CHARS));
    }

    #[tokio::test]
    async fn test_empty_file() {
        let preview = preview_of(b"").await;
        assert_eq!(preview.preview, "");
        assert_eq!(preview.preview_size, 0);
        assert!(!preview.is_truncated);
    }

    #[test]
    fn test_cut_sequence_at_window_end_is_dropped() {
        // "€" is 3 bytes; keep only its first two at the end of the window
        let mut window = b"price: ".to_vec();
        window.extend_from_slice(&"€".as_bytes()[..2]);

        let cut = render_preview(&window, true);
        assert_eq!(cut.preview, "price: ");

        let complete = render_preview(&window, false);
        assert!(complete.preview.ends_with(char::REPLACEMENT_CHARACTER));
    }

    #[test]
    fn test_trim_keeps_valid_tail() {
        assert_eq!(trim_incomplete_tail("abc€".as_bytes()), "abc€".as_bytes());
        assert_eq!(trim_incomplete_tail(b""), b"");
        assert_eq!(trim_incomplete_tail(&[b'a', 0xff]), &[b'a', 0xff]);
    }
}
