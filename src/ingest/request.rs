//! Parsing of the ingest list.
//!
//! One work per line, prefixed with its type:
//!
//! ```text
//! # comment
//! movie: Seven Samurai
//! album: Kind of Blue
//! book: The Stranger
//! ```

use crate::domain::Category;

/// A work to look up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestRequest {
    pub category: Category,
    pub query: String,
}

/// Result of parsing one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    Request(IngestRequest),
    /// Blank line or comment
    Ignored,
    /// Line without a recognized type prefix
    Untyped(String),
}

/// Parse a single line of the ingest list
pub fn parse_line(line: &str) -> ParsedLine {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return ParsedLine::Ignored;
    }

    if let Some((prefix, query)) = line.split_once(':') {
        if let Ok(category) = prefix.parse::<Category>() {
            let query = query.trim();
            if !query.is_empty() {
                return ParsedLine::Request(IngestRequest {
                    category,
                    query: query.to_string(),
                });
            }
        }
    }

    ParsedLine::Untyped(line.to_string())
}

/// Parse the whole list, logging lines that lack a type
pub fn parse_requests(content: &str) -> Vec<IngestRequest> {
    content
        .lines()
        .filter_map(|line| match parse_line(line) {
            ParsedLine::Request(request) => Some(request),
            ParsedLine::Ignored => None,
            ParsedLine::Untyped(line) => {
                tracing::warn!("Skipping '{}': specify a type (e.g. 'movie: {}')", line, line);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prefixed_lines() {
        assert_eq!(
            parse_line("  Movie: Seven Samurai "),
            ParsedLine::Request(IngestRequest {
                category: Category::Movies,
                query: "Seven Samurai".to_string(),
            })
        );
        assert_eq!(
            parse_line("song: Blue in Green: Take 2"),
            ParsedLine::Request(IngestRequest {
                category: Category::Music,
                query: "Blue in Green: Take 2".to_string(),
            })
        );
    }

    #[test]
    fn test_ignored_and_untyped_lines() {
        assert_eq!(parse_line(""), ParsedLine::Ignored);
        assert_eq!(parse_line("# books to add"), ParsedLine::Ignored);
        assert_eq!(parse_line("Kind of Blue"), ParsedLine::Untyped("Kind of Blue".to_string()));
        assert_eq!(
            parse_line("Star Wars: A New Hope"),
            ParsedLine::Untyped("Star Wars: A New Hope".to_string())
        );
        assert_eq!(parse_line("book:"), ParsedLine::Untyped("book:".to_string()));
    }

    #[test]
    fn test_parse_requests_keeps_order() {
        let requests = parse_requests("book: Dune\n\nnope\nalbum: Blue Train\n");
        let queries: Vec<_> = requests.iter().map(|r| r.query.as_str()).collect();
        assert_eq!(queries, vec!["Dune", "Blue Train"]);
    }
}
