//! Error type shared by the codec, the automaton and the hashers

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("bit sequence of length {len} is not a whole number of bytes")]
    InvalidLength { len: usize },

    #[error("invalid hex digit {character:?} at position {position}")]
    InvalidDigit { character: char, position: usize },

    #[error("cannot hash empty input")]
    EmptyInput,

    #[error("rule {0} is outside 0..=255")]
    InvalidRule(u32),

    #[error("step count must be positive")]
    InvalidSteps,
}

pub type Result<T> = core::result::Result<T, Error>;
