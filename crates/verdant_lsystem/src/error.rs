//! Error types for the L-system core.
//!
//! Malformed axioms and over-committed probability tables are definition
//! bugs, not runtime conditions: both fail fast and are never silently
//! recovered.

use thiserror::Error;

/// Errors raised while parsing axiom text or registering grammar rules.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GrammarError {
    /// A `(` appeared with no symbol in front of it to attach to.
    #[error("parameter at byte {index} has no preceding symbol")]
    ParameterWithoutSymbol {
        /// Byte offset of the offending `(`.
        index: usize,
    },

    /// A parameter was opened but the axiom ended before `)`.
    #[error("parameter opened at byte {index} is never terminated")]
    UnterminatedParameter {
        /// Byte offset of the opening `(`.
        index: usize,
    },

    /// The text between `(` and `)` is not a number.
    #[error("invalid parameter value {text:?} at byte {index}")]
    InvalidParameter {
        /// Byte offset of the opening `(`.
        index: usize,
        /// The rejected parameter text.
        text: String,
    },

    /// A `)` appeared outside any parameter.
    #[error("unmatched ')' at byte {index}")]
    UnmatchedDelimiter {
        /// Byte offset of the stray `)`.
        index: usize,
    },

    /// Registering this alternative would push the symbol's total
    /// probability mass beyond 1.
    #[error("alternatives for symbol '{symbol}' sum to {total}, which exceeds 1")]
    ProbabilityOverflow {
        /// The over-committed symbol.
        symbol: char,
        /// The rejected cumulative probability.
        total: f32,
    },

    /// A single alternative's probability is outside [0, 1].
    #[error("probability {probability} for symbol '{symbol}' is outside [0, 1]")]
    InvalidProbability {
        /// The symbol being registered.
        symbol: char,
        /// The rejected probability.
        probability: f32,
    },
}

/// Either failure mode of taking an axiom string all the way to a
/// structure: bad text or unbalanced branches.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DefinitionError {
    /// The axiom text or a replacement body failed to parse.
    #[error(transparent)]
    Grammar(#[from] GrammarError),
    /// The parsed axiom does not interpret into a valid branch tree.
    #[error(transparent)]
    Structure(#[from] StructureError),
}

/// Errors raised while interpreting an axiom into a branch structure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StructureError {
    /// A `]` appeared with no open branch to close.
    #[error("']' at axiom index {index} closes a branch that was never opened")]
    UnmatchedClosingBracket {
        /// Axiom element index of the stray `]`.
        index: usize,
    },

    /// The axiom ended with branches still open.
    #[error("axiom ended with {open} unclosed branch(es)")]
    UnclosedBranches {
        /// Number of branches left open.
        open: usize,
    },
}
