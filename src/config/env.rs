//! Environment placeholder interpolation for parsed documents.
//!
//! String scalars may contain `${NAME}` or `${NAME:default}`. `${NAME}` fails
//! when `NAME` is unset; `${NAME:}` falls back to an empty string.
//! Use `$$` to escape a literal `$` (e.g., `$${HOME}` becomes `${HOME}`).

use super::ConfigError;
use crate::value::Value;

/// Replaces placeholders in every string scalar of `value` from the process environment.
///
/// Returns the number of substitutions made.
pub fn interpolate(value: &mut Value) -> Result<usize, ConfigError> {
    interpolate_with(value, &|name| std::env::var(name).ok())
}

/// Like [`interpolate`], resolving names through `lookup` instead of the process environment.
pub fn interpolate_with<F>(value: &mut Value, lookup: &F) -> Result<usize, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match value {
        Value::String(s) => resolve_string(s, lookup),
        Value::Sequence(items) => {
            let mut count = 0;
            for item in items.iter_mut() {
                count += interpolate_with(item, lookup)?;
            }
            Ok(count)
        }
        Value::Mapping(map) => {
            let mut count = 0;
            for item in map.values_mut() {
                count += interpolate_with(item, lookup)?;
            }
            Ok(count)
        }
        _ => Ok(0),
    }
}

fn resolve_string<F>(s: &mut String, lookup: &F) -> Result<usize, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if !s.contains('$') {
        return Ok(0);
    }

    let mut result = String::with_capacity(s.len());
    let mut substitutions = 0;
    let mut chars = s.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '$' {
            result.push(ch);
            continue;
        }
        match chars.peek() {
            Some('$') => {
                chars.next();
                result.push('$');
            }
            Some('{') => {
                chars.next();
                let body =
                    consume_until(&mut chars, '}').ok_or(ConfigError::UnclosedPlaceholder)?;
                result.push_str(&resolve_placeholder(&body, lookup)?);
                substitutions += 1;
            }
            _ => result.push('$'),
        }
    }

    *s = result;
    Ok(substitutions)
}

fn consume_until(chars: &mut std::iter::Peekable<std::str::Chars>, delim: char) -> Option<String> {
    let mut result = String::new();
    for ch in chars.by_ref() {
        if ch == delim {
            return Some(result);
        }
        result.push(ch);
    }
    None
}

fn resolve_placeholder<F>(body: &str, lookup: &F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let (name, default) = match body.split_once(':') {
        Some((name, default)) => (name, Some(default)),
        None => (body, None),
    };
    if name.is_empty() || name.contains('{') {
        return Err(ConfigError::InvalidPlaceholder(body.to_string()));
    }

    match (lookup(name), default) {
        (Some(value), _) => Ok(value),
        (None, Some(default)) => Ok(default.to_string()),
        (None, None) => Err(ConfigError::UnresolvedPlaceholder(name.to_string())),
    }
}
