use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("Invalid path: Path must be a non-empty string")]
    Empty,
    #[error("Invalid path: Directory traversal detected")]
    Traversal,
    #[error("Invalid path: Null byte detected")]
    NullByte,
}

/// Rejects empty paths, `..` segments and NUL bytes.
///
/// Separators are normalized to `/` for the checks only; the caller gets the
/// original string back so OS-native separators survive.
pub fn validate_path(path: &str) -> Result<&str, PathError> {
    if path.is_empty() {
        return Err(PathError::Empty);
    }

    let normalized = path.replace('\\', "/");

    if normalized.contains("/../") || normalized.ends_with("/..") {
        return Err(PathError::Traversal);
    }

    if normalized.contains('\0') {
        return Err(PathError::NullByte);
    }

    Ok(path)
}

// Last path component, used for tab and folder labels
pub fn display_name(path: &str) -> String {
    path.trim_end_matches(['/', '\\'])
        .rsplit(['/', '\\'])
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or(path)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_path_returned_as_is() {
        let path = "/home/user/doc.md";
        assert_eq!(validate_path(path), Ok(path));
    }

    #[test]
    fn test_empty_path() {
        let err = validate_path("").unwrap_err();
        assert_eq!(err, PathError::Empty);
        assert!(err.to_string().contains("Invalid path"));
    }

    #[test]
    fn test_directory_traversal() {
        let err = validate_path("/home/../etc/passwd").unwrap_err();
        assert_eq!(err.to_string(), "Invalid path: Directory traversal detected");
        assert_eq!(validate_path("/home/user/.."), Err(PathError::Traversal));
        assert_eq!(
            validate_path("C:\\Users\\..\\Windows"),
            Err(PathError::Traversal)
        );
    }

    #[test]
    fn test_dotted_names_are_not_traversal() {
        assert!(validate_path("/home/user/..notes/a.md").is_ok());
        assert!(validate_path("/home/user/v1..2.md").is_ok());
    }

    #[test]
    fn test_null_byte() {
        let err = validate_path("/home/user/doc\0.md").unwrap_err();
        assert_eq!(err.to_string(), "Invalid path: Null byte detected");
    }

    #[test]
    fn test_windows_path_returned_unchanged() {
        let path = "C:\\Users\\User\\Doc.md";
        assert_eq!(validate_path(path), Ok(path));
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("/home/user/notes"), "notes");
        assert_eq!(display_name("/home/user/notes/"), "notes");
        assert_eq!(display_name("C:\\Users\\User\\Doc.md"), "Doc.md");
        assert_eq!(display_name("notes"), "notes");
    }
}
