use crate::error::{BbsError, Result};
use crate::siteconfig::directives::{Directive, parse_directive};
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Site directive file parser
#[derive(Debug)]
pub struct ConfigParser;

impl ConfigParser {
    /// Parse a single directive file
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Vec<Directive>> {
        let file = std::fs::File::open(&path).map_err(|e| {
            BbsError::SiteConfigError(format!("Cannot open file {}: {}", path.as_ref().display(), e))
        })?;

        let reader = BufReader::new(file);
        Self::parse_reader(reader)
    }

    /// Parse directives from a reader
    pub fn parse_reader<R: BufRead>(reader: R) -> Result<Vec<Directive>> {
        let mut directives = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line =
                line.map_err(|e| BbsError::SiteConfigError(format!("Read error at line {}: {}", index + 1, e)))?;
            if let Some(directive) = Self::parse_line(&line, index + 1)? {
                directives.push(directive);
            }
        }

        Ok(directives)
    }

    /// Parse directives from a string
    pub fn parse_string(content: &str) -> Result<Vec<Directive>> {
        let mut directives = Vec::new();

        for (index, line) in content.lines().enumerate() {
            if let Some(directive) = Self::parse_line(line, index + 1)? {
                directives.push(directive);
            }
        }

        Ok(directives)
    }

    fn parse_line(line: &str, line_number: usize) -> Result<Option<Directive>> {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        parse_directive(line)
            .map(Some)
            .map_err(|e| BbsError::SiteConfigError(format!("Parse error at line {}: {}", line_number, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::siteconfig::SiteConfig;
    use std::io::Cursor;

    #[test]
    fn test_parse_string_basic() {
        let content = r#"
# Mirror of the forum
base_url: https://mirror.example.com/
resources_path: res/
timeout: 10
"#;

        let directives = ConfigParser::parse_string(content).unwrap();
        assert_eq!(directives.len(), 3);

        let config = SiteConfig::from_directives(directives);
        assert_eq!(config.base_url, "https://mirror.example.com/");
        assert_eq!(config.resources_path, "res/");
        assert_eq!(config.timeout, Some(10));
    }

    #[test]
    fn test_parse_string_http_headers() {
        let content = r#"
http_header(User-Agent): Mozilla/5.0 (compatible; BandBBS/1.0)
http_header(Cookie): xf_csrf=abc
"#;

        let config = SiteConfig::from_directives(ConfigParser::parse_string(content).unwrap());

        assert_eq!(config.http_headers.len(), 2);
        assert_eq!(
            config.http_headers.get("User-Agent"),
            Some(&"Mozilla/5.0 (compatible; BandBBS/1.0)".to_string())
        );
    }

    #[test]
    fn test_parse_reader() {
        let cursor = Cursor::new("icon_reply: https://cdn.example.com/r.svg\nicon_watch: https://cdn.example.com/w.svg\n");
        let directives = ConfigParser::parse_reader(cursor).unwrap();

        assert_eq!(directives.len(), 2);
        assert_eq!(directives[1], Directive::IconWatch("https://cdn.example.com/w.svg".to_string()));
    }

    #[test]
    fn test_parse_error_reports_line() {
        let err = ConfigParser::parse_string("# header\n\nwhat is this").unwrap_err();
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn test_parse_file_missing() {
        let result = ConfigParser::parse_file("/nonexistent/site.txt");
        assert!(matches!(result, Err(BbsError::SiteConfigError(_))));
    }
}
