//! Storage key generation shared by the blob stores

/// Longest sanitized name kept in a storage key
const MAX_NAME_LEN: usize = 96;

/// Fresh, collision-free key derived from a display name hint
pub(crate) fn new_storage_key(suggested_name: &str) -> String {
    format!("{}-{}", uuid::Uuid::new_v4().simple(), sanitize(suggested_name))
}

/// Longest extension carried over when a name is shortened
const MAX_EXTENSION_LEN: usize = 10;

/// Reduce a name to `[A-Za-z0-9._-]`, never starting with a dot.
///
/// Names over the length limit lose characters from the stem; the extension
/// is kept.
pub(crate) fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        return "file".to_string();
    }
    if cleaned.len() <= MAX_NAME_LEN {
        return cleaned.to_string();
    }

    // Only ASCII is left, so byte offsets are char offsets
    let (stem, extension) = match cleaned.rfind('.') {
        Some(dot) if dot > 0 && cleaned.len() - dot <= MAX_EXTENSION_LEN + 1 => {
            cleaned.split_at(dot)
        }
        _ => (cleaned, ""),
    };
    let mut shortened = stem[..MAX_NAME_LEN - extension.len()].to_string();
    shortened.push_str(extension);
    shortened
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("Safety Certificate_2025-01-01.pdf"), "Safety_Certificate_2025-01-01.pdf");
        assert_eq!(sanitize("../../etc/passwd"), "_.._etc_passwd");
        assert_eq!(sanitize("   "), "file");
    }

    #[test]
    fn test_long_names_keep_extension() {
        let name = format!("{}_2025-01-01.pdf", "A".repeat(90));
        let sanitized = sanitize(&name);
        assert_eq!(sanitized.len(), MAX_NAME_LEN);
        assert!(sanitized.ends_with(".pdf"));
        assert!(sanitized.starts_with("AAAA"));

        let no_extension = "B".repeat(200);
        assert_eq!(sanitize(&no_extension).len(), MAX_NAME_LEN);
    }

    #[test]
    fn test_keys_are_unique() {
        assert_ne!(new_storage_key("a.pdf"), new_storage_key("a.pdf"));
        assert!(new_storage_key("a.pdf").ends_with("-a.pdf"));
    }
}
