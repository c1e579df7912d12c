use thiserror::Error;

/// Separator between denom tokens in a bond denom spec, e.g. `"urio,urst"`.
pub const BOND_DENOM_DELIMITER: char = ',';

/// Errors produced while parsing or validating a bond denom spec.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DenomError {
    #[error("bond denom spec {spec:?} contains an empty denom token")]
    EmptyToken { spec: String },

    #[error("invalid denom: {denom}")]
    InvalidDenom { denom: String },

    #[error("duplicate denom {denom} in bond denom spec")]
    DuplicateDenom { denom: String },
}

/// Parse a bond denom spec into its ordered list of eligible denoms.
///
/// The spec is a comma-separated list such as `"urio"` or `"urio,urst"`.
/// Insertion order is preserved: the first denom is the network's preferred
/// stake token. Every token must be a non-empty, syntactically valid denom
/// and may appear only once; a leading, trailing or doubled comma produces
/// an empty token and is rejected.
pub fn parse_bond_denom(spec: &str) -> Result<Vec<String>, DenomError> {
    // empty tokens invalidate the whole spec, before any per-token check
    if spec.split(BOND_DENOM_DELIMITER).any(|token| token.is_empty()) {
        return Err(DenomError::EmptyToken {
            spec: spec.to_string(),
        });
    }

    let mut denoms: Vec<String> = Vec::new();

    for token in spec.split(BOND_DENOM_DELIMITER) {
        if !is_valid_denom(token) {
            return Err(DenomError::InvalidDenom {
                denom: token.to_string(),
            });
        }
        if denoms.iter().any(|d| d == token) {
            return Err(DenomError::DuplicateDenom {
                denom: token.to_string(),
            });
        }
        denoms.push(token.to_string());
    }

    Ok(denoms)
}

/// Validate a bond denom spec without materializing the denom list.
pub fn validate_bond_denom(spec: &str) -> Result<(), DenomError> {
    parse_bond_denom(spec).map(|_| ())
}

/// Whether `denom` is one of the eligible stake denoms of `spec`.
///
/// An unparsable spec supports nothing; specs stored in params are always
/// validated first, so that case only arises on raw caller input.
pub fn is_supported(spec: &str, denom: &str) -> bool {
    parse_bond_denom(spec)
        .map(|denoms| denoms.iter().any(|d| d == denom))
        .unwrap_or(false)
}

/// Check a single denom token against the bank denom grammar:
/// 3-128 characters, leading ASCII letter, then letters, digits or
/// one of `/ : . _ -`.
pub fn is_valid_denom(denom: &str) -> bool {
    if denom.len() < 3 || denom.len() > 128 {
        return false;
    }

    let mut chars = denom.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }

    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | ':' | '.' | '_' | '-'))
}
