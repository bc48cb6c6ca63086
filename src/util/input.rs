// Input Gate
// Collects and validates the integers to encrypt before any key is generated

use std::io::BufRead;

use tracing::error;

use crate::errors::InputError;
use crate::rsa::message::Plaintext;

/// Prompt shown when no integers are given on the command line
pub const PROMPT: &str = "Enter one or more integers, separated by spaces, to encrypt";

/// Validate every token as a non-negative decimal integer
///
/// All tokens are checked before anything is returned, so a bad token
/// anywhere in the batch means nothing in it gets processed.
pub fn parse_tokens<I, S>(tokens: I) -> Result<Vec<Plaintext>, InputError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut values = Vec::new();

    for (position, token) in tokens.into_iter().enumerate() {
        let token = token.as_ref();
        match token.parse::<Plaintext>() {
            Ok(value) => values.push(value),
            Err(_) => {
                error!("Input must be a list of integers. Aborting program.");
                return Err(InputError::InvalidToken {
                    position,
                    token: token.to_string(),
                });
            }
        }
    }

    if values.is_empty() {
        return Err(InputError::EmptyInput);
    }

    Ok(values)
}

/// Read one line from `reader` and split it on whitespace
pub fn read_line_tokens<R: BufRead>(mut reader: R) -> Result<Vec<String>, InputError> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(line.split_whitespace().map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::bigint::RsaBigInt;
    use std::io::Cursor;

    #[test]
    fn test_parse_valid_tokens() {
        let values = parse_tokens(["5", "42", "0", "99999999999999999999999999"]).unwrap();
        assert_eq!(values.len(), 4);
        assert_eq!(values[1].as_biguint(), &RsaBigInt::from(42u8));
        assert_eq!(values[3].to_string(), "99999999999999999999999999");
    }

    #[test]
    fn test_invalid_token_aborts_whole_batch() {
        let err = parse_tokens(["5", "12a", "7"]).unwrap_err();
        match err {
            InputError::InvalidToken { position, token } => {
                assert_eq!(position, 1);
                assert_eq!(token, "12a");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_first_invalid_token_is_reported() {
        let err = parse_tokens(["x", "-1"]).unwrap_err();
        assert!(matches!(err, InputError::InvalidToken { position: 0, .. }));
    }

    #[test]
    fn test_empty_input() {
        let tokens: Vec<String> = Vec::new();
        assert!(matches!(parse_tokens(tokens), Err(InputError::EmptyInput)));
    }

    #[test]
    fn test_read_line_tokens() {
        let reader = Cursor::new("  12 34\t56  \n78 90\n");
        let tokens = read_line_tokens(reader).unwrap();
        assert_eq!(tokens, vec!["12", "34", "56"]);
    }

    #[test]
    fn test_read_line_at_eof() {
        let tokens = read_line_tokens(Cursor::new("")).unwrap();
        assert!(tokens.is_empty());
    }
}
