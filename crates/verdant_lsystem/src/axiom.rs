//! Axiom parsing and rendering.
//!
//! An axiom is the grammar state of one plant: an ordered sequence of
//! single-character symbols, each optionally carrying a numeric parameter
//! written as `symbol(value)`. `"T(2.5)[&T]"` is three elements: `T` with
//! parameter 2.5, `[`, `&`, `T`, `]`.
//!
//! Parsing fails fast on malformed text (see [`GrammarError`]); a bad axiom
//! is a definition bug, never a runtime condition.

use crate::error::GrammarError;

/// One symbol of an axiom, with its optional numeric parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxiomElement {
    /// The symbol character.
    pub symbol: char,
    /// Optional parameter (angle override, segment length, ...).
    pub parameter: Option<f32>,
}

impl AxiomElement {
    /// Creates a bare element with no parameter.
    #[must_use]
    pub const fn new(symbol: char) -> Self {
        Self { symbol, parameter: None }
    }

    /// Creates an element carrying a parameter.
    #[must_use]
    pub const fn with_parameter(symbol: char, parameter: f32) -> Self {
        Self { symbol, parameter: Some(parameter) }
    }
}

/// An ordered sequence of [`AxiomElement`]s.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Axiom {
    elements: Vec<AxiomElement>,
}

impl Axiom {
    /// Parses axiom text into elements.
    ///
    /// # Errors
    ///
    /// Returns a [`GrammarError`] for a parameter with no preceding symbol,
    /// an unterminated or non-numeric parameter, or a stray `)`.
    pub fn parse(text: &str) -> Result<Self, GrammarError> {
        let mut elements: Vec<AxiomElement> = Vec::with_capacity(text.len());
        let mut chars = text.char_indices();
        // True only directly after a bare symbol, i.e. where `(` may attach.
        let mut can_attach = false;

        while let Some((index, c)) = chars.next() {
            match c {
                '(' => {
                    if !can_attach {
                        return Err(GrammarError::ParameterWithoutSymbol { index });
                    }
                    let mut body = String::new();
                    let mut terminated = false;
                    for (_, p) in chars.by_ref() {
                        if p == ')' {
                            terminated = true;
                            break;
                        }
                        body.push(p);
                    }
                    if !terminated {
                        return Err(GrammarError::UnterminatedParameter { index });
                    }
                    let value: f32 = body
                        .trim()
                        .parse()
                        .map_err(|_| GrammarError::InvalidParameter { index, text: body.clone() })?;
                    if !value.is_finite() {
                        return Err(GrammarError::InvalidParameter { index, text: body });
                    }
                    // can_attach is still true here; the element exists.
                    let last = elements
                        .last_mut()
                        .ok_or(GrammarError::ParameterWithoutSymbol { index })?;
                    *last = AxiomElement::with_parameter(last.symbol, value);
                    can_attach = false;
                }
                ')' => return Err(GrammarError::UnmatchedDelimiter { index }),
                _ => {
                    elements.push(AxiomElement::new(c));
                    can_attach = true;
                }
            }
        }

        Ok(Self { elements })
    }

    /// Builds an axiom directly from elements.
    #[must_use]
    pub fn from_elements(elements: Vec<AxiomElement>) -> Self {
        Self { elements }
    }

    /// The elements in order.
    #[must_use]
    pub fn elements(&self) -> &[AxiomElement] {
        &self.elements
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True if the axiom has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl std::fmt::Display for Axiom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for element in &self.elements {
            write!(f, "{}", element.symbol)?;
            if let Some(parameter) = element.parameter {
                write!(f, "({parameter})")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_symbols() {
        let axiom = Axiom::parse("T[&T]").unwrap();
        assert_eq!(axiom.len(), 5);
        assert_eq!(axiom.elements()[0], AxiomElement::new('T'));
        assert_eq!(axiom.elements()[1], AxiomElement::new('['));
        assert_eq!(axiom.elements()[4], AxiomElement::new(']'));
    }

    #[test]
    fn test_parse_parameters() {
        let axiom = Axiom::parse("T(2.5)+(30)T").unwrap();
        assert_eq!(axiom.len(), 3);
        assert_eq!(axiom.elements()[0], AxiomElement::with_parameter('T', 2.5));
        assert_eq!(axiom.elements()[1], AxiomElement::with_parameter('+', 30.0));
        assert_eq!(axiom.elements()[2], AxiomElement::new('T'));
    }

    #[test]
    fn test_parameter_without_symbol_is_rejected() {
        assert_eq!(
            Axiom::parse("(1.0)T"),
            Err(GrammarError::ParameterWithoutSymbol { index: 0 })
        );
        // A second parameter cannot attach to the same symbol.
        assert_eq!(
            Axiom::parse("T(1)(2)"),
            Err(GrammarError::ParameterWithoutSymbol { index: 4 })
        );
    }

    #[test]
    fn test_unterminated_parameter_is_rejected() {
        assert_eq!(
            Axiom::parse("T(2.5"),
            Err(GrammarError::UnterminatedParameter { index: 1 })
        );
    }

    #[test]
    fn test_invalid_parameter_is_rejected() {
        assert!(matches!(
            Axiom::parse("T(abc)"),
            Err(GrammarError::InvalidParameter { index: 1, .. })
        ));
        assert!(matches!(
            Axiom::parse("T()"),
            Err(GrammarError::InvalidParameter { index: 1, .. })
        ));
    }

    #[test]
    fn test_stray_closing_delimiter_is_rejected() {
        assert_eq!(Axiom::parse("T)"), Err(GrammarError::UnmatchedDelimiter { index: 1 }));
    }

    #[test]
    fn test_display_round_trip() {
        let text = "T(2.5)[&(22.5)T]T";
        let axiom = Axiom::parse(text).unwrap();
        let rendered = axiom.to_string();
        assert_eq!(Axiom::parse(&rendered).unwrap(), axiom);
    }
}
