//! Tokenising and quoting of delimited point-file records.

/// Split a record into values.
///
/// Values are separated by commas and/or whitespace. A value that starts
/// with `"` or `'` runs to the matching quote and may contain separators.
/// Two commas with nothing between them yield an empty value.
pub(crate) fn split_record(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut after_token = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            } else {
                current.push(c);
            }
            continue;
        }
        match c {
            ',' => {
                if in_token || !after_token {
                    tokens.push(std::mem::take(&mut current));
                }
                in_token = false;
                after_token = false;
            }
            c if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                    after_token = true;
                }
            }
            '"' | '\'' if !in_token => {
                quote = Some(c);
                in_token = true;
                after_token = false;
            }
            c => {
                current.push(c);
                in_token = true;
                after_token = false;
            }
        }
    }
    if in_token {
        tokens.push(current);
    }
    tokens
}

/// Quote a value if it would not survive [`split_record`] unquoted.
pub(crate) fn quote_value(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || c == ',' || c == '"' || c == '\'');
    if !needs_quotes {
        value.to_string()
    } else if value.contains('"') {
        format!("'{value}'")
    } else {
        format!("\"{value}\"")
    }
}
