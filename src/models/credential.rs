use serde::{Deserialize, Serialize};

/// One worker account's login, as handed to the consuming bot.
///
/// Field declaration order matters: the destination payload is a JSON array
/// of `{"user": ..., "pass": ...}` objects and deployment tooling compares
/// it byte-for-byte against the previous value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPair {
    pub user: String,
    pub pass: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_user_before_pass() {
        let pair = CredentialPair {
            user: "a".into(),
            pass: "b".into(),
        };
        let json = serde_json::to_string(&pair).unwrap();
        assert_eq!(json, r#"{"user":"a","pass":"b"}"#);
    }

    #[test]
    fn test_roundtrip() {
        let pair = CredentialPair {
            user: "worker-1".into(),
            pass: "s3cret".into(),
        };
        let json = serde_json::to_string(&pair).unwrap();
        let parsed: CredentialPair = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, pair);
    }
}
