// SPDX-FileCopyrightText: 2022 Profian Inc. <opensource@profian.com>
// SPDX-License-Identifier: AGPL-3.0-only

use serde::{Deserialize, Serialize};

/// Body of value create and update requests.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Payload {
    pub id: i32,
    #[serde(alias = "Value")]
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize() {
        let expected = Payload {
            id: 42,
            value: "value42".into(),
        };
        assert_eq!(
            serde_json::from_str::<Payload>(r#"{"id":42,"value":"value42"}"#).unwrap(),
            expected
        );
        assert_eq!(
            serde_json::from_str::<Payload>(r#"{"id":42,"Value":"value42"}"#).unwrap(),
            expected
        );
        assert!(serde_json::from_str::<Payload>(r#"{"id":"42","value":"v"}"#).is_err());
    }
}
