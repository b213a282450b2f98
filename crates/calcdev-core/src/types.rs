use crate::{
    Result,
    constants::ENDPOINT_NAMES,
    error::Error,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four logical endpoints of the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    /// Operand A.
    First,
    /// Operand B.
    Second,
    /// Operator token.
    Sign,
    /// Computed output.
    Result,
}

impl Endpoint {
    /// All endpoints in registration order.
    pub const ALL: [Endpoint; 4] = [
        Endpoint::First,
        Endpoint::Second,
        Endpoint::Sign,
        Endpoint::Result,
    ];

    /// Endpoint name as exposed to clients.
    #[must_use]
    pub fn name(self) -> &'static str {
        ENDPOINT_NAMES[self.index()]
    }

    /// State field written through this endpoint, if any.
    ///
    /// `result` is read-only and has no backing field.
    #[inline]
    #[must_use]
    pub fn field(self) -> Option<Field> {
        match self {
            Endpoint::First => Some(Field::OperandA),
            Endpoint::Second => Some(Field::OperandB),
            Endpoint::Sign => Some(Field::Operator),
            Endpoint::Result => None,
        }
    }

    /// Returns `true` if writes to this endpoint mutate state.
    #[inline]
    #[must_use]
    pub fn is_writable(self) -> bool {
        self.field().is_some()
    }

    /// Returns `true` if reads from this endpoint produce output.
    #[inline]
    #[must_use]
    pub fn is_readable(self) -> bool {
        matches!(self, Endpoint::Result)
    }

    /// Position of the endpoint in registration order (0-3).
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Endpoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ENDPOINT_NAMES
            .iter()
            .position(|&name| name == s)
            .map(|index| Endpoint::ALL[index])
            .ok_or_else(|| Error::UnknownEndpoint(s.to_string()))
    }
}

/// Writable state field of the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    OperandA,
    OperandB,
    Operator,
}

impl Field {
    /// Endpoint that writes this field.
    #[must_use]
    pub fn endpoint(self) -> Endpoint {
        match self {
            Field::OperandA => Endpoint::First,
            Field::OperandB => Endpoint::Second,
            Field::Operator => Endpoint::Sign,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Field::OperandA => write!(f, "operand A"),
            Field::OperandB => write!(f, "operand B"),
            Field::Operator => write!(f, "operator"),
        }
    }
}

/// How the read path treats an operand that fails to parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperandPolicy {
    /// Reject the computation with `MalformedOperand`.
    #[default]
    Strict,
    /// Substitute 0 for the malformed operand and compute anyway.
    ZeroFallback,
}

impl fmt::Display for OperandPolicy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OperandPolicy::Strict => write!(f, "strict"),
            OperandPolicy::ZeroFallback => write!(f, "zero_fallback"),
        }
    }
}

impl std::str::FromStr for OperandPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "strict" => Ok(OperandPolicy::Strict),
            "zero_fallback" | "zero-fallback" => Ok(OperandPolicy::ZeroFallback),
            other => Err(Error::Config(format!("Unknown operand policy: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("first", Endpoint::First)]
    #[case("second", Endpoint::Second)]
    #[case("sign", Endpoint::Sign)]
    #[case("result", Endpoint::Result)]
    fn test_endpoint_from_str(#[case] input: &str, #[case] expected: Endpoint) {
        let endpoint: Endpoint = input.parse().unwrap();
        assert_eq!(endpoint, expected);
        assert_eq!(endpoint.to_string(), input);
    }

    #[rstest]
    #[case("")]
    #[case("First")]
    #[case("third")]
    #[case("result ")]
    fn test_endpoint_from_str_invalid(#[case] input: &str) {
        assert!(matches!(
            input.parse::<Endpoint>(),
            Err(Error::UnknownEndpoint(_))
        ));
    }

    #[test]
    fn test_endpoint_fields() {
        assert_eq!(Endpoint::First.field(), Some(Field::OperandA));
        assert_eq!(Endpoint::Second.field(), Some(Field::OperandB));
        assert_eq!(Endpoint::Sign.field(), Some(Field::Operator));
        assert_eq!(Endpoint::Result.field(), None);

        for field in [Field::OperandA, Field::OperandB, Field::Operator] {
            assert_eq!(field.endpoint().field(), Some(field));
        }
    }

    #[test]
    fn test_endpoint_capabilities() {
        for endpoint in Endpoint::ALL {
            assert_ne!(endpoint.is_writable(), endpoint.is_readable());
        }
        assert!(Endpoint::Result.is_readable());
    }

    #[test]
    fn test_endpoint_index_matches_order() {
        for (i, endpoint) in Endpoint::ALL.iter().enumerate() {
            assert_eq!(endpoint.index(), i);
        }
    }

    #[test]
    fn test_endpoint_serialization() {
        let json = serde_json::to_string(&Endpoint::Sign).unwrap();
        assert_eq!(json, "\"sign\"");
        let back: Endpoint = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Endpoint::Sign);
    }

    #[rstest]
    #[case("strict", OperandPolicy::Strict)]
    #[case("zero_fallback", OperandPolicy::ZeroFallback)]
    #[case("zero-fallback", OperandPolicy::ZeroFallback)]
    fn test_operand_policy_from_str(#[case] input: &str, #[case] expected: OperandPolicy) {
        assert_eq!(input.parse::<OperandPolicy>().unwrap(), expected);
    }

    #[test]
    fn test_operand_policy_default_is_strict() {
        assert_eq!(OperandPolicy::default(), OperandPolicy::Strict);
        assert!("lenient".parse::<OperandPolicy>().is_err());
    }
}
