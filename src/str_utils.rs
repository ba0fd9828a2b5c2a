/// Utility functions for string processing, particularly SQL statement handling
use once_cell::sync::Lazy;
use regex::Regex;

// Regexes compiled once as lazy statics for performance
static PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\?").unwrap());
static TRANSACTION_KEYWORD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(BEGIN|COMMIT|ROLLBACK|START\s+TRANSACTION|END\s+TRANSACTION)\b").unwrap()
});

/// Check if a byte position in SQL is inside a string literal
/// (handles both single and double quotes, plus backslash escapes)
pub fn is_in_quotes(sql: &str, pos: usize) -> bool {
    let mut in_single_quote = false;
    let mut in_double_quote = false;
    let mut escaped = false;

    for (idx, ch) in sql.char_indices() {
        if idx >= pos {
            break;
        }
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '\'' if !in_double_quote => in_single_quote = !in_single_quote,
            '"' if !in_single_quote => in_double_quote = !in_double_quote,
            _ => {}
        }
    }

    in_single_quote || in_double_quote
}

/// Split multi-statement SQL into individual statements (respects quote boundaries)
pub fn split_sql_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut in_string = false;
    let mut string_char = '"';

    for ch in sql.chars() {
        match ch {
            '"' | '\'' if !in_string => {
                in_string = true;
                string_char = ch;
            }
            c if in_string && c == string_char => in_string = false,
            ';' if !in_string => {
                let trimmed = current.trim();
                if !trimmed.is_empty() {
                    statements.push(trimmed.to_string());
                }
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(ch);
    }

    let trimmed = current.trim();
    if !trimmed.is_empty() {
        statements.push(trimmed.to_string());
    }

    statements
}

/// Byte positions of `?` placeholders that sit outside string literals,
/// in order of appearance
fn placeholder_positions(sql: &str) -> Vec<usize> {
    PLACEHOLDER_REGEX
        .find_iter(sql)
        .map(|m| m.start())
        .filter(|&pos| !is_in_quotes(sql, pos))
        .collect()
}

/// Number of positional placeholders a statement expects
pub fn count_placeholders(sql: &str) -> usize {
    placeholder_positions(sql).len()
}

/// Rewrite `?` placeholders into backend-specific numbered form,
/// e.g. `$1, $2, ...` for PostgreSQL. Placeholders inside string literals
/// are left untouched.
pub fn number_placeholders(sql: &str, placeholder_gen: &dyn Fn(usize) -> String) -> String {
    let positions = placeholder_positions(sql);
    let mut rewritten = String::with_capacity(sql.len());
    let mut last = 0;

    for (ordinal, &pos) in positions.iter().enumerate() {
        rewritten.push_str(&sql[last..pos]);
        rewritten.push_str(&placeholder_gen(ordinal + 1));
        last = pos + 1;
    }
    rewritten.push_str(&sql[last..]);

    rewritten
}

/// Check whether SQL carries its own transaction control keywords.
/// Word-bounded so column or table names like `beginning` do not match.
pub fn contains_transaction_keywords(sql: &str) -> bool {
    TRANSACTION_KEYWORD_REGEX
        .find_iter(sql)
        .any(|m| !is_in_quotes(sql, m.start()))
}
