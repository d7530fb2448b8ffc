//! Parsing of `KEY=VALUE` dotenv-style files.

use std::collections::HashMap;

pub type EnvMap = HashMap<String, String>;

/// Parse `KEY=VALUE` lines.
///
/// Blank lines and `#` comments are skipped and an optional `export `
/// prefix is dropped. Single-quoted values are literal. Double-quoted values
/// understand `\"`, `\\` and `\n`. Unquoted values end at ` #`.
/// Later keys override earlier ones.
pub fn parse_env_file(content: &str) -> EnvMap {
    let mut env = EnvMap::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some((key, value)) = line.split_once('=') else {
            tracing::debug!("Ignoring malformed .env line: {}", line);
            continue;
        };

        env.insert(key.trim().to_string(), parse_value(value.trim()));
    }

    env
}

fn parse_value(value: &str) -> String {
    if let Some(inner) = value.strip_prefix('\'') {
        if let Some(end) = inner.find('\'') {
            return inner[..end].to_string();
        }
    }

    if let Some(inner) = value.strip_prefix('"') {
        let mut out = String::with_capacity(inner.len());
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            match c {
                '"' => return out,
                '\\' => match chars.next() {
                    Some('n') => out.push('\n'),
                    Some(other) => out.push(other),
                    None => out.push('\\'),
                },
                _ => out.push(c),
            }
        }
        // Unterminated quote: keep the text as written.
        return value.to_string();
    }

    match value.find(" #") {
        Some(comment) => value[..comment].trim_end().to_string(),
        None => value.to_string(),
    }
}
