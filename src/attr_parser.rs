use std::str::FromStr;

use winnow::ascii::space0;
use winnow::combinator::{alt, delimited, eof, opt, separated};
use winnow::prelude::*;
use winnow::token::take_while;

use crate::diagram_ast::Attrs;
use crate::error::Error;

/// Parse `key=value, key="quoted value"` into an ordered attribute map.
pub fn parse_attrs(input: &str) -> Result<Attrs, Error> {
    let mut rest = input;
    attr_list(&mut rest).map_err(|_| {
        let context = rest.trim();
        let context = if context.chars().count() > 40 {
            format!("{}...", context.chars().take(40).collect::<String>())
        } else {
            context.to_string()
        };
        Error::AttrSyntax { context }
    })
}

impl FromStr for Attrs {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_attrs(s)
    }
}

fn attr_list(input: &mut &str) -> winnow::Result<Attrs> {
    space0.parse_next(input)?;
    let pairs: Vec<(String, String)> =
        separated(0.., attr_pair, (space0, ',', space0)).parse_next(input)?;
    space0.parse_next(input)?;
    opt(',').parse_next(input)?;
    space0.parse_next(input)?;
    eof.parse_next(input)?;
    Ok(pairs.into_iter().collect())
}

fn attr_pair(input: &mut &str) -> winnow::Result<(String, String)> {
    let key = key.parse_next(input)?;
    space0.parse_next(input)?;
    '='.parse_next(input)?;
    space0.parse_next(input)?;
    let value = value.parse_next(input)?;
    Ok((key.to_string(), value.to_string()))
}

fn key<'s>(input: &mut &'s str) -> winnow::Result<&'s str> {
    take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '_').parse_next(input)
}

fn value<'s>(input: &mut &'s str) -> winnow::Result<&'s str> {
    alt((quoted_value, bare_value)).parse_next(input)
}

fn quoted_value<'s>(input: &mut &'s str) -> winnow::Result<&'s str> {
    delimited('"', take_while(0.., |c: char| c != '"'), '"').parse_next(input)
}

fn bare_value<'s>(input: &mut &'s str) -> winnow::Result<&'s str> {
    take_while(1.., |c: char| c != ',' && c != '"' && !c.is_whitespace()).parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pairs(attrs: &Attrs) -> Vec<(&str, &str)> {
        attrs.iter().collect()
    }

    #[test]
    fn parse_key() {
        let mut input = "nodesep=1.5";
        assert_eq!(key(&mut input).unwrap(), "nodesep");
        assert_eq!(input, "=1.5");
    }

    #[test]
    fn parse_bare_value_stops_at_comma() {
        let mut input = "#2D3436,rest";
        assert_eq!(value(&mut input).unwrap(), "#2D3436");
        assert_eq!(input, ",rest");
    }

    #[test]
    fn parse_quoted_value_keeps_spaces() {
        let mut input = "\"Sans Serif, bold\" tail";
        assert_eq!(value(&mut input).unwrap(), "Sans Serif, bold");
        assert_eq!(input, " tail");
    }

    #[test]
    fn parse_empty_quoted_value() {
        let attrs = parse_attrs("label=\"\"").unwrap();
        assert_eq!(pairs(&attrs), vec![("label", "")]);
    }

    #[test]
    fn parse_list() {
        let attrs = parse_attrs("pad=2.0,splines=ortho, fontname=\"Arial\"").unwrap();
        assert_eq!(
            pairs(&attrs),
            vec![("pad", "2.0"), ("splines", "ortho"), ("fontname", "Arial")]
        );
    }

    #[test]
    fn parse_list_with_spacing_and_trailing_comma() {
        let attrs = parse_attrs("  margin = 30 ,  penwidth=2.0, ").unwrap();
        assert_eq!(pairs(&attrs), vec![("margin", "30"), ("penwidth", "2.0")]);
    }

    #[test]
    fn parse_empty_input() {
        assert!(parse_attrs("").unwrap().is_empty());
        assert!(parse_attrs("   ").unwrap().is_empty());
    }

    #[test]
    fn last_duplicate_wins() {
        let attrs = parse_attrs("color=red,style=bold,color=blue").unwrap();
        assert_eq!(pairs(&attrs), vec![("color", "blue"), ("style", "bold")]);
    }

    #[test]
    fn missing_value_is_error() {
        let err = parse_attrs("pad=").unwrap_err();
        assert!(matches!(err, Error::AttrSyntax { .. }), "got: {err}");
    }

    #[test]
    fn missing_equals_is_error() {
        let err = parse_attrs("pad 2.0").unwrap_err();
        assert!(err.to_string().contains("syntax error"), "got: {err}");
    }

    #[test]
    fn unterminated_quote_is_error() {
        assert!(parse_attrs("label=\"open").is_err());
    }

    #[test]
    fn from_str_delegates() {
        let attrs: Attrs = "rankdir=TB".parse().unwrap();
        assert_eq!(attrs.get("rankdir"), Some("TB"));
    }
}
