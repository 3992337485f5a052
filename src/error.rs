use crate::domain::Sort;

/// Failures of the harness itself.
///
/// A disproved or undecided bound is not an error: those are reported through
/// [`Outcome`][crate::engine::Outcome].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("solver reported a satisfiable query but produced no model")]
    MissingModel,

    #[error("model could not evaluate `{term}` to a literal")]
    Evaluation { term: String },

    #[error("operation `{operation}` is not defined over sort `{sort}`")]
    UnsupportedSort { operation: &'static str, sort: Sort },

    #[error("sort mismatch: expected `{expected}`, found `{found}`")]
    SortMismatch { expected: Sort, found: Sort },

    #[error("bit-vector width {0} is outside 1..=64")]
    InvalidWidth(u32),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            Error::MissingModel.to_string(),
            "solver reported a satisfiable query but produced no model"
        );
        let err = Error::SortMismatch {
            expected: Sort::Signed(8),
            found: Sort::Unsigned(16),
        };
        assert_eq!(err.to_string(), "sort mismatch: expected `i8`, found `u16`");
    }
}
