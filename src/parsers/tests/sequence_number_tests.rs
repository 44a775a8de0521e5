use crate::error::ExtractionFault;
use crate::parsers::parse_sequence_number;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_number() {
        assert_eq!(parse_sequence_number("17"), Ok(17));
    }

    #[test]
    fn test_thousands_separator() {
        assert_eq!(parse_sequence_number("1.234"), Ok(1234));
    }

    #[test]
    fn test_trailing_dot_and_whitespace() {
        assert_eq!(parse_sequence_number("  12. \n"), Ok(12));
    }

    #[test]
    fn test_not_a_number() {
        assert_eq!(
            parse_sequence_number("n/a"),
            Err(ExtractionFault::InvalidNumber {
                text: "n/a".to_string()
            })
        );
        assert!(parse_sequence_number("").is_err());
        assert!(parse_sequence_number("...").is_err());
    }
}
