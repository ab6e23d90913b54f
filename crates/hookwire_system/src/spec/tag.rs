//! Tag template interpolation.
//!
//! Templates use `%s` for sequential placeholders, `%N$s` for positional
//! placeholders (1-based) and `%%` for a literal percent sign. Anything else
//! after a `%` is copied through unchanged.

use crate::error::ConfigError;

enum Piece<'a> {
    Literal(&'a str),
    Percent,
    Placeholder(usize),
}

fn parse(template: &str) -> Vec<Piece<'_>> {
    let mut pieces = Vec::new();
    let mut next_sequential = 0;
    let mut rest = template;

    while let Some(at) = rest.find('%') {
        if at > 0 {
            pieces.push(Piece::Literal(&rest[..at]));
        }
        let after = &rest[at + 1..];

        if let Some(tail) = after.strip_prefix('%') {
            pieces.push(Piece::Percent);
            rest = tail;
        } else if let Some(tail) = after.strip_prefix('s') {
            pieces.push(Piece::Placeholder(next_sequential));
            next_sequential += 1;
            rest = tail;
        } else if let Some((index, tail)) = positional(after) {
            pieces.push(Piece::Placeholder(index));
            rest = tail;
        } else {
            pieces.push(Piece::Literal("%"));
            rest = after;
        }
    }

    if !rest.is_empty() {
        pieces.push(Piece::Literal(rest));
    }

    pieces
}

/// Parses `N$s` at the start of `input`, returning the 0-based index.
fn positional(input: &str) -> Option<(usize, &str)> {
    let digits = input.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let tail = input[digits..].strip_prefix("$s")?;
    let index: usize = input[..digits].parse().ok()?;

    index.checked_sub(1).map(|index| (index, tail))
}

/// Formats `template` with `modifiers`.
///
/// # Errors
///
/// Returns [`ConfigError::TagInterpolation`] if the template refers to more
/// modifiers than were supplied.
pub fn interpolate(template: &str, modifiers: &[String]) -> Result<String, ConfigError> {
    let pieces = parse(template);
    let expected = pieces
        .iter()
        .filter_map(|piece| match piece {
            Piece::Placeholder(index) => Some(index + 1),
            _ => None,
        })
        .max()
        .unwrap_or(0);

    if expected > modifiers.len() {
        return Err(ConfigError::TagInterpolation {
            template: template.to_string(),
            expected,
            given: modifiers.len(),
        });
    }

    let mut out = String::with_capacity(template.len());
    for piece in pieces {
        match piece {
            Piece::Literal(text) => out.push_str(text),
            Piece::Percent => out.push('%'),
            Piece::Placeholder(index) => out.push_str(&modifiers[index]),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mods(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn sequential_placeholders() {
        let tag = interpolate("save_%s_%s", &mods(&["post", "meta"])).unwrap();
        assert_eq!(tag, "save_post_meta");
    }

    #[test]
    fn positional_placeholders() {
        let tag = interpolate("%2$s_%1$s", &mods(&["a", "b"])).unwrap();
        assert_eq!(tag, "b_a");
    }

    #[test]
    fn literal_percent_and_unknown_directive() {
        let tag = interpolate("100%%_%d_%s", &mods(&["x"])).unwrap();
        assert_eq!(tag, "100%_%d_x");
    }

    #[test]
    fn too_few_modifiers_is_an_error() {
        let err = interpolate("%s_%s", &mods(&["only"])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::TagInterpolation {
                template: "%s_%s".into(),
                expected: 2,
                given: 1,
            }
        );
    }

    #[test]
    fn template_without_placeholders_ignores_modifiers() {
        assert_eq!(interpolate("init", &mods(&["unused"])).unwrap(), "init");
    }
}
