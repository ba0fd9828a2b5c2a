use crate::{
    connection::ConnectionParams,
    result::{BatchError, Result},
};
use std::collections::HashMap;
use std::fs;

/// Property keys for database connection values
pub const KEY_URL: &str = "db.url";
pub const KEY_USER: &str = "db.user";
pub const KEY_PASSWORD: &str = "db.password";

/// Parse properties-style `key=value` text. Blank lines and lines starting
/// with `#` or `!` are ignored; the first `=` splits key from value and
/// whitespace around both is trimmed.
pub fn parse_properties(content: &str) -> Result<HashMap<String, String>> {
    let mut props = HashMap::new();

    for (line_no, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }
        match line.split_once('=') {
            Some((key, value)) => {
                props.insert(key.trim().to_string(), value.trim().to_string());
            }
            None => {
                return Err(BatchError::MalformedConfigLine {
                    line: line_no + 1,
                    content: line.to_string(),
                });
            }
        }
    }

    Ok(props)
}

fn required(props: &HashMap<String, String>, key: &str) -> Result<String> {
    props
        .get(key)
        .cloned()
        .ok_or_else(|| BatchError::MissingConfigKey(key.to_string()))
}

impl ConnectionParams {
    /// Build connection params from already-parsed properties
    pub fn from_properties(props: &HashMap<String, String>) -> Result<Self> {
        Ok(ConnectionParams {
            url: required(props, KEY_URL)?,
            user: required(props, KEY_USER)?,
            password: required(props, KEY_PASSWORD)?,
        })
    }

    /// Load connection params from a properties file carrying the keys
    /// `db.url`, `db.user`, `db.password`
    pub fn from_properties_file(path: &str) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path).map_err(BatchError::Io)?;
        let props = parse_properties(&content)?;
        Ok(Self::from_properties(&props)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let content = "# database settings\n\n! legacy comment\ndb.url = :memory:\ndb.user=admin\n";
        let props = parse_properties(content).unwrap();
        assert_eq!(props.len(), 2);
        assert_eq!(props["db.url"], ":memory:");
        assert_eq!(props["db.user"], "admin");
    }

    #[test]
    fn test_parse_splits_on_first_equals_only() {
        let props = parse_properties("db.password=a=b=c").unwrap();
        assert_eq!(props["db.password"], "a=b=c");
    }

    #[test]
    fn test_parse_reports_malformed_line_number() {
        let content = "db.url=:memory:\nthis line has no separator\n";
        match parse_properties(content) {
            Err(BatchError::MalformedConfigLine { line, content }) => {
                assert_eq!(line, 2);
                assert_eq!(content, "this line has no separator");
            }
            other => panic!("expected MalformedConfigLine, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_key_is_reported_by_name() {
        let props = parse_properties("db.url=:memory:\ndb.user=admin\n").unwrap();
        match ConnectionParams::from_properties(&props) {
            Err(BatchError::MissingConfigKey(key)) => assert_eq!(key, KEY_PASSWORD),
            other => panic!("expected MissingConfigKey, got {other:?}"),
        }
    }
}
