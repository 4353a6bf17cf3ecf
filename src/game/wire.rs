use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier as emitted by the service. Integers and strings are folded into
/// one canonical key so `2` and `"2"` name the same node or player.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WireId(String);

impl WireId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric ids sort numerically, everything else lexically after them.
    pub fn sort_key(&self) -> (bool, i64, &str) {
        let numeric = self.0.parse::<i64>().ok();
        (numeric.is_none(), numeric.unwrap_or(0), self.0.as_str())
    }
}

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for WireId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for WireId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl<'de> Deserialize<'de> for WireId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Integer(i64),
            Float(f64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Integer(value) => Self(value.to_string()),
            Raw::Float(value) if value.fract() == 0.0 => Self((value as i64).to_string()),
            Raw::Float(value) => Self(value.to_string()),
            Raw::Text(value) => Self(value),
        })
    }
}

impl Serialize for WireId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0.parse::<i64>() {
            Ok(value) => serializer.serialize_i64(value),
            Err(_) => serializer.serialize_str(&self.0),
        }
    }
}

/// Sent with the service's snake_case field names; request files may use
/// either spelling.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviationRequest {
    #[serde(alias = "payoffMatrix")]
    pub payoff_matrix: BTreeMap<String, Vec<f64>>,
    #[serde(alias = "playerActions")]
    pub player_actions: BTreeMap<String, Vec<String>>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviationResponse {
    #[serde(default)]
    pub nodes: Vec<RawNode>,
    #[serde(default)]
    pub edges: Vec<RawEdge>,
    #[serde(default, alias = "nash_nodes")]
    pub nash_nodes: Vec<WireId>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNode {
    pub id: WireId,
    #[serde(default, alias = "profile_key", alias = "profile", alias = "label")]
    pub profile_key: String,
    #[serde(default)]
    pub payoffs: BTreeMap<WireId, f64>,
    #[serde(default)]
    pub x: Option<f32>,
    #[serde(default)]
    pub y: Option<f32>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEdge {
    #[serde(alias = "source")]
    pub from: WireId,
    #[serde(alias = "target")]
    pub to: WireId,
    #[serde(alias = "player_id", alias = "player")]
    pub player_id: WireId,
    #[serde(default)]
    pub action: String,
    #[serde(default, alias = "deviation_payoff")]
    pub deviation_payoff: f64,
    #[serde(default, alias = "base_payoff")]
    pub base_payoff: f64,
}
