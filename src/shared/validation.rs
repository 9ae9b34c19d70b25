use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating file extensions appended to generated filenames
    /// Must be a dot followed by 1-32 ASCII alphanumerics, underscores or hyphens
    /// - Valid: ".pdf", ".tar_gz", ".JPG", ".x-icon"
    /// - Invalid: ".", ".p hp", ".a/b", ".тест", "pdf"
    pub static ref EXTENSION_REGEX: Regex = Regex::new(r"^\.[A-Za-z0-9_-]{1,32}$").unwrap();
}
