use std::num::IntErrorKind;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum SelectionError {
    #[error("'{token}' is not a number")]
    InvalidFormat { token: String },
}

/// Validated 1-based indices in the order the user typed them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct Selection(Vec<usize>);

impl Selection {
    pub(crate) fn indices(&self) -> &[usize] {
        &self.0
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Parses comma separated indices against a result set of `result_count`
/// items. One malformed token fails the whole input; tokens that parse but
/// fall outside `1..=result_count` are dropped, including integers too large
/// for `i64`.
pub(crate) fn parse_selection(raw: &str, result_count: usize) -> Result<Selection, SelectionError> {
    let mut numbers = Vec::new();
    for token in raw.split(',') {
        let token = token.trim();
        match token.parse::<i64>() {
            Ok(value) => numbers.push(value),
            Err(err) if matches!(err.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {}
            Err(_) => {
                return Err(SelectionError::InvalidFormat {
                    token: token.to_string(),
                });
            }
        }
    }

    let mut indices = Vec::with_capacity(numbers.len());
    for value in numbers {
        let Ok(index) = usize::try_from(value) else {
            continue;
        };
        if (1..=result_count).contains(&index) && !indices.contains(&index) {
            indices.push(index);
        }
    }
    Ok(Selection(indices))
}
