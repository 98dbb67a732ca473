use nom_language::error::{VerboseError, VerboseErrorKind};

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum PathError {
    #[error("Invalid path syntax at position {position}: {message}")]
    InvalidSyntax { position: usize, message: String },
}

impl PathError {
    pub fn invalid_syntax(position: usize, message: impl Into<String>) -> Self {
        PathError::InvalidSyntax {
            position,
            message: message.into(),
        }
    }
}

pub(super) fn convert_verbose_error(input: &str, err: VerboseError<&str>) -> PathError {
    // The innermost error points closest to the offending character.
    let Some((fragment, kind)) = err.errors.first() else {
        return PathError::invalid_syntax(0, "invalid path syntax");
    };

    let message = match kind {
        VerboseErrorKind::Context(ctx) => ctx.to_string(),
        VerboseErrorKind::Char(c) => format!("expected '{c}'"),
        VerboseErrorKind::Nom(kind) => format!("parser error: {kind:?}"),
    };

    PathError::invalid_syntax(input.len() - fragment.len(), message)
}

const UNEXPECTED_SQ_BRACKET_MSG: &str = "malformed filter, expected '[key=value, ...]'; \
                                         write '~2' for a literal '[' at the start of a token";

pub(super) fn trailing_input_error(input: &str, rest: &str) -> PathError {
    let position = input.len().saturating_sub(rest.len());

    let message = match rest.chars().next() {
        Some('[') => UNEXPECTED_SQ_BRACKET_MSG.to_string(),
        Some('~') => "'~' must be escaped as '~0' ('~1' encodes '/', '~2' a leading '[')".to_string(),
        Some(c) => format!("unexpected character '{c}'"),
        None => "unexpected end of input".to_string(),
    };

    PathError::invalid_syntax(position, message)
}
