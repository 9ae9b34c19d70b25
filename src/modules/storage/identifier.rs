//! System filename generation
//!
//! Every stored file gets a random name derived from a UUIDv4 token. The
//! client-supplied name only contributes its extension, and only when that
//! extension is a safe single-segment suffix.

use uuid::Uuid;

use crate::shared::validation::EXTENSION_REGEX;

/// Generate a collision-resistant, path-safe filename for an upload.
///
/// The result is 32 lowercase hex characters followed by the original
/// extension (if any), e.g. `3f2b...e1.pdf`.
pub fn generate_system_filename(original_filename: &str) -> String {
    let token = Uuid::new_v4().simple().to_string();
    format!("{}{}", token, safe_extension(original_filename))
}

/// Extract the extension of the final path component, including the dot.
///
/// Leading dots of the component are not treated as an extension separator,
/// so `.bashrc` has no extension while `archive.tar.gz` yields `.gz`.
pub fn extract_extension(original_filename: &str) -> &str {
    let basename = original_filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_filename);
    let stem_start = basename.len() - basename.trim_start_matches('.').len();

    match basename[stem_start..].rfind('.') {
        Some(idx) => &basename[stem_start + idx..],
        None => "",
    }
}

/// The extension if it is safe to append to a generated name, otherwise "".
fn safe_extension(original_filename: &str) -> &str {
    let ext = extract_extension(original_filename);
    if EXTENSION_REGEX.is_match(ext) {
        ext
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::path::{Component, Path};

    #[test]
    fn test_extract_extension() {
        assert_eq!(extract_extension("report.pdf"), ".pdf");
        assert_eq!(extract_extension("archive.tar.gz"), ".gz");
        assert_eq!(extract_extension("README"), "");
        assert_eq!(extract_extension(""), "");
        assert_eq!(extract_extension(".bashrc"), "");
        assert_eq!(extract_extension("..hidden.txt"), ".txt");
        assert_eq!(extract_extension("trailing."), ".");
        assert_eq!(extract_extension("dir.v2/notes"), "");
        assert_eq!(extract_extension("C:\\Users\\me\\photo.JPG"), ".JPG");
    }

    #[test]
    fn test_generated_name_keeps_extension() {
        let name = generate_system_filename("invoice.pdf");
        assert!(name.ends_with(".pdf"));
        assert_eq!(name.len(), 32 + ".pdf".len());
        assert!(name[..32].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generated_name_without_extension() {
        let name = generate_system_filename("Makefile");
        assert_eq!(name.len(), 32);

        let name = generate_system_filename("");
        assert_eq!(name.len(), 32);
    }

    #[test]
    fn test_unsafe_extension_is_dropped() {
        for original in ["x.p hp", "a.b;rm -rf", "evil.\u{0}", "trailing.", "a.тест"] {
            let name = generate_system_filename(original);
            assert_eq!(name.len(), 32, "unexpected suffix for {:?}: {}", original, name);
        }
    }

    #[test]
    fn test_generated_name_is_single_segment() {
        for original in ["../../etc/passwd", "/abs/path.txt", "a\\b\\..\\c.sh", "..", "."] {
            let name = generate_system_filename(original);
            let components: Vec<_> = Path::new(&name).components().collect();
            assert_eq!(components.len(), 1);
            assert!(matches!(components[0], Component::Normal(_)));
        }
    }

    #[test]
    fn test_generated_names_are_unique() {
        let names: HashSet<String> = (0..10_000)
            .map(|_| generate_system_filename("same.txt"))
            .collect();
        assert_eq!(names.len(), 10_000);
    }
}
