use crate::error::{LoadError, Result};
use crate::Document;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Read a whole corpus file. `.jsonl` files hold one document per line,
/// anything else is a JSON array of documents.
pub fn load_books<P: AsRef<Path>>(path: P) -> Result<Vec<Document>> {
    let path = path.as_ref();
    let origin = path.display().to_string();
    let raw = read_source(path).map_err(|cause| LoadError::SourceUnavailable {
        origin: origin.clone(),
        cause,
    })?;
    let books = if path.extension().and_then(|s| s.to_str()) == Some("jsonl") {
        parse_books_jsonl(&origin, &raw)?
    } else {
        parse_books(&origin, &raw)?
    };
    tracing::debug!(origin = %origin, num_docs = books.len(), "loaded corpus");
    Ok(books)
}

fn read_source(path: &Path) -> std::io::Result<String> {
    let mut f = File::open(path)?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    Ok(buf)
}

/// Parse a JSON array of `{title, text}` objects.
pub fn parse_books(origin: &str, raw: &str) -> Result<Vec<Document>> {
    if raw.trim().is_empty() {
        return Err(LoadError::EmptySource { origin: origin.to_string() });
    }
    serde_json::from_str(raw).map_err(|cause| LoadError::MalformedSource {
        origin: origin.to_string(),
        line: None,
        cause,
    })
}

/// Parse JSON Lines, one document object per non-blank line.
pub fn parse_books_jsonl(origin: &str, raw: &str) -> Result<Vec<Document>> {
    if raw.trim().is_empty() {
        return Err(LoadError::EmptySource { origin: origin.to_string() });
    }
    let mut books = Vec::new();
    for (i, line) in raw.lines().enumerate() {
        if line.trim().is_empty() { continue; }
        let doc: Document = serde_json::from_str(line).map_err(|cause| LoadError::MalformedSource {
            origin: origin.to_string(),
            line: Some(i + 1),
            cause,
        })?;
        books.push(doc);
    }
    Ok(books)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_array() {
        let books = parse_books("inline", r#"[{"title": "A", "text": "b c"}]"#).unwrap();
        assert_eq!(books, vec![Document::new("A", "b c")]);
    }

    #[test]
    fn empty_array_is_not_an_empty_source() {
        assert!(parse_books("inline", "[]").unwrap().is_empty());
    }

    #[test]
    fn whitespace_only_is_empty_source() {
        let err = parse_books("inline", " \n\t ").unwrap_err();
        assert!(matches!(err, LoadError::EmptySource { .. }));
        assert_eq!(err.to_string(), "The file is empty: inline");
    }

    #[test]
    fn rejects_non_array_and_missing_fields() {
        for raw in [r#"{"title": "A", "text": "b"}"#, r#"[{"title": "A"}]"#, "[1, 2]", "not json"] {
            let err = parse_books("inline", raw).unwrap_err();
            assert!(matches!(err, LoadError::MalformedSource { line: None, .. }), "{raw}");
        }
    }

    #[test]
    fn jsonl_reports_line() {
        let raw = "{\"title\": \"A\", \"text\": \"b\"}\n\n{\"title\": \"C\"}\n";
        let err = parse_books_jsonl("inline", raw).unwrap_err();
        assert!(matches!(err, LoadError::MalformedSource { line: Some(3), .. }));
        assert!(err.to_string().ends_with("(line 3)"));
    }
}
