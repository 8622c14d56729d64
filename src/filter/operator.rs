use super::types::FilterOp;

/// Outcome of scanning a raw query value for a comparison prefix.
///
/// When `valid` is false the `operator` and `value` are a best-effort split
/// kept for diagnostics only; callers must not use them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedOperator<'a> {
    pub value: &'a str,
    pub operator: &'a str,
    pub valid: bool,
}

impl<'a> ParsedOperator<'a> {
    /// The operator, if the prefix was a supported one.
    pub fn op(&self) -> Option<FilterOp> {
        if !self.valid {
            return None;
        }
        FilterOp::from_symbol(self.operator)
    }
}

fn is_operator_byte(b: u8) -> bool {
    matches!(b, b'>' | b'<' | b'=')
}

fn is_valid_pair(s: &str) -> bool {
    matches!(s, ">=" | "<=" | "<>")
}

/// Splits `">=10"` into `("10", ">=", true)`.
///
/// Longest match first: a two-byte operator prefix, then a one-byte
/// prefix, otherwise implicit equality over the whole input. A
/// single-byte input is always a bare value, even if it is `>` itself.
pub fn parse_operator(raw: &str) -> ParsedOperator<'_> {
    let bytes = raw.as_bytes();

    if bytes.len() == 1 {
        return ParsedOperator { value: raw, operator: "=", valid: true };
    }

    match bytes {
        [first, second, ..] if is_operator_byte(*first) && is_operator_byte(*second) => {
            // Operator bytes are ASCII so both splits land on char boundaries.
            let (operator, value) = raw.split_at(2);
            ParsedOperator { value, operator, valid: is_valid_pair(operator) }
        }
        [first, ..] if is_operator_byte(*first) => {
            let (operator, value) = raw.split_at(1);
            ParsedOperator { value, operator, valid: true }
        }
        _ => ParsedOperator { value: raw, operator: "=", valid: true },
    }
}
