//! Weighted stochastic replacement rules.
//!
//! Every symbol of an axiom is rewritten simultaneously each generation.
//! A symbol's rule holds weighted alternatives whose probabilities sum to
//! at most 1; the remainder is the probability of copying the symbol
//! unchanged.
//!
//! ## Selection semantics
//!
//! One uniform draw `r` in `[0, 1)` is made per element. Alternatives are
//! walked in registration order with a threshold that starts at 1 and
//! drops by each alternative's probability; the first alternative whose
//! slice contains `r` (i.e. `r >= threshold`) is substituted. If `r`
//! falls below every threshold the element is copied as-is, parameter
//! included. With two 0.3 alternatives this yields: default on
//! `[0, 0.4)`, second-registered on `[0.4, 0.7)`, first-registered on
//! `[0.7, 1.0)`.

use std::collections::HashMap;

use rand::Rng;

use crate::axiom::Axiom;
use crate::error::GrammarError;

/// Function form of a replacement body: receives the element's parameter
/// and the full current axiom, returns replacement text.
pub type ReplacementFn = Box<dyn Fn(Option<f32>, &Axiom) -> String + Send + Sync>;

/// The body substituted for a symbol when its alternative is selected.
pub enum Replacement {
    /// Fixed replacement text, parsed as axiom syntax.
    Text(String),
    /// Context-sensitive replacement: a function of the element's
    /// parameter and the whole axiom (e.g. segment length scaling).
    Generator(ReplacementFn),
}

impl Replacement {
    /// Convenience constructor for a static text body.
    #[must_use]
    pub fn text(body: impl Into<String>) -> Self {
        Self::Text(body.into())
    }

    /// Convenience constructor for a context-sensitive body.
    #[must_use]
    pub fn generator(f: impl Fn(Option<f32>, &Axiom) -> String + Send + Sync + 'static) -> Self {
        Self::Generator(Box::new(f))
    }

    fn expand(&self, parameter: Option<f32>, axiom: &Axiom) -> String {
        match self {
            Self::Text(body) => body.clone(),
            Self::Generator(f) => f(parameter, axiom),
        }
    }
}

impl std::fmt::Debug for Replacement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(body) => f.debug_tuple("Text").field(body).finish(),
            Self::Generator(_) => f.debug_tuple("Generator").field(&"<fn>").finish(),
        }
    }
}

/// One weighted alternative of a symbol's rule.
#[derive(Debug)]
struct Alternative {
    probability: f32,
    replacement: Replacement,
}

/// Symbol -> weighted alternatives, applied one generation at a time.
#[derive(Debug, Default)]
pub struct Grammar {
    rules: HashMap<char, Vec<Alternative>>,
}

impl Grammar {
    /// Creates an empty grammar (identity rewrite).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one weighted alternative for `symbol`.
    ///
    /// Alternatives registered earlier occupy the *upper* end of the
    /// probability space (see module docs). The remainder below the last
    /// alternative is the "copy unchanged" outcome.
    ///
    /// # Errors
    ///
    /// [`GrammarError::InvalidProbability`] if `probability` is outside
    /// `[0, 1]`; [`GrammarError::ProbabilityOverflow`] if the symbol's
    /// alternatives would sum beyond 1.
    pub fn add_rule(
        &mut self,
        symbol: char,
        probability: f32,
        replacement: Replacement,
    ) -> Result<(), GrammarError> {
        if !(0.0..=1.0).contains(&probability) || !probability.is_finite() {
            return Err(GrammarError::InvalidProbability { symbol, probability });
        }
        let alternatives = self.rules.entry(symbol).or_default();
        let total: f32 =
            alternatives.iter().map(|a| a.probability).sum::<f32>() + probability;
        // Tolerate float dust so three 1/3 alternatives still register.
        if total > 1.0 + 1e-6 {
            return Err(GrammarError::ProbabilityOverflow { symbol, total });
        }
        alternatives.push(Alternative { probability, replacement });
        Ok(())
    }

    /// Builder-style [`Grammar::add_rule`].
    ///
    /// # Errors
    ///
    /// Same conditions as [`Grammar::add_rule`].
    pub fn with_rule(
        mut self,
        symbol: char,
        probability: f32,
        replacement: Replacement,
    ) -> Result<Self, GrammarError> {
        self.add_rule(symbol, probability, replacement)?;
        Ok(self)
    }

    /// Rewrites every element of `axiom` by one generation.
    ///
    /// # Errors
    ///
    /// Propagates [`GrammarError`] if a selected replacement body fails to
    /// parse as axiom syntax (a definition bug surfaced at rewrite time).
    pub fn rewrite<R: Rng + ?Sized>(
        &self,
        axiom: &Axiom,
        rng: &mut R,
    ) -> Result<Axiom, GrammarError> {
        let mut out = Vec::with_capacity(axiom.len() * 2);
        for element in axiom.elements() {
            match self.rules.get(&element.symbol) {
                Some(alternatives) => {
                    let r: f32 = rng.gen();
                    match select_alternative(alternatives, r) {
                        Some(chosen) => {
                            let body = alternatives[chosen]
                                .replacement
                                .expand(element.parameter, axiom);
                            let parsed = Axiom::parse(&body)?;
                            out.extend_from_slice(parsed.elements());
                        }
                        None => out.push(*element),
                    }
                }
                None => out.push(*element),
            }
        }
        Ok(Axiom::from_elements(out))
    }

    /// True if any rule is registered for `symbol`.
    #[must_use]
    pub fn has_rule(&self, symbol: char) -> bool {
        self.rules.contains_key(&symbol)
    }
}

/// Picks the alternative whose probability slice contains `r`, counting
/// slices from the top of the space downward in registration order.
fn select_alternative(alternatives: &[Alternative], r: f32) -> Option<usize> {
    let mut threshold = 1.0_f32;
    for (index, alternative) in alternatives.iter().enumerate() {
        threshold -= alternative.probability;
        if r >= threshold {
            return Some(index);
        }
    }
    None
}
