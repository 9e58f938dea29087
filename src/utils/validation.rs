use crate::utils::error::{PrebundleError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// JavaScript reserved words that cannot be used as a `--global-name`.
const RESERVED_WORDS: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete", "do",
    "else", "enum", "export", "extends", "false", "finally", "for", "function", "if", "import",
    "in", "instanceof", "new", "null", "return", "super", "switch", "this", "throw", "true", "try",
    "typeof", "var", "void", "while", "with", "yield", "let", "static", "await",
];

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(PrebundleError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(PrebundleError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(PrebundleError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PrebundleError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// Extensions are given bare (`js`, not `.js`).
pub fn validate_extension(field_name: &str, extension: &str) -> Result<()> {
    validate_non_empty_string(field_name, extension)?;

    if extension.starts_with('.') || extension.contains(['/', '\\']) {
        return Err(PrebundleError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: extension.to_string(),
            reason: "Extension must not contain a leading dot or path separators".to_string(),
        });
    }
    Ok(())
}

/// ASCII subset of the ECMAScript identifier grammar, plus dotted paths
/// (`a.b.c`) which esbuild accepts for `--global-name`.
pub fn validate_js_identifier(field_name: &str, value: &str) -> Result<()> {
    let invalid = |reason: String| PrebundleError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason,
    };

    if value.is_empty() {
        return Err(invalid("Identifier cannot be empty".to_string()));
    }

    for part in value.split('.') {
        let mut chars = part.chars();
        match chars.next() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
            _ => return Err(invalid(format!("'{}' is not a valid identifier", part))),
        }
        if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$') {
            return Err(invalid(format!("'{}' is not a valid identifier", part)));
        }
        if RESERVED_WORDS.contains(&part) {
            return Err(invalid(format!("'{}' is a reserved word", part)));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("paths.source", "./build/").is_ok());
        assert!(validate_path("paths.source", "").is_err());
        assert!(validate_path("paths.source", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("bundle.concurrency", 4, 1).is_ok());
        assert!(validate_positive_number("bundle.concurrency", 0, 1).is_err());
    }

    #[test]
    fn test_validate_extension() {
        assert!(validate_extension("bundle.extension", "js").is_ok());
        assert!(validate_extension("bundle.extension", "mjs").is_ok());
        assert!(validate_extension("bundle.extension", ".js").is_err());
        assert!(validate_extension("bundle.extension", "  ").is_err());
        assert!(validate_extension("bundle.extension", "a/js").is_err());
    }

    #[test]
    fn test_validate_js_identifier() {
        assert!(validate_js_identifier("bundle.global_name", "wsbundle").is_ok());
        assert!(validate_js_identifier("bundle.global_name", "$lib_2").is_ok());
        assert!(validate_js_identifier("bundle.global_name", "ws.bundle").is_ok());
        assert!(validate_js_identifier("bundle.global_name", "").is_err());
        assert!(validate_js_identifier("bundle.global_name", "2fast").is_err());
        assert!(validate_js_identifier("bundle.global_name", "ws-bundle").is_err());
        assert!(validate_js_identifier("bundle.global_name", "ws..bundle").is_err());
        assert!(validate_js_identifier("bundle.global_name", "class").is_err());
    }
}
