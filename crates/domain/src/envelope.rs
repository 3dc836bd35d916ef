//! Feed envelopes — incremental change notifications pushed by the server.
//!
//! The wire form is loosely typed (`verb` is a free string, `data` any JSON).
//! [`Envelope::decode`] turns it into a typed change for one record type.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::EnvelopeError;
use crate::record::Record;

/// Kind of change an envelope describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verb {
    Created,
    Updated,
    Destroyed,
}

impl Verb {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Destroyed => "destroyed",
        }
    }
}

impl std::fmt::Display for Verb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verb {
    type Err = EnvelopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(Self::Created),
            "updated" => Ok(Self::Updated),
            "destroyed" => Ok(Self::Destroyed),
            other => Err(EnvelopeError::UnknownVerb(other.to_string())),
        }
    }
}

/// Envelope as it travels on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEnvelope {
    pub verb: String,
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RawEnvelope {
    #[must_use]
    pub fn created(id: impl Into<String>, data: Value) -> Self {
        Self {
            verb: Verb::Created.as_str().to_string(),
            id: id.into(),
            data: Some(data),
        }
    }

    #[must_use]
    pub fn updated(id: impl Into<String>, data: Value) -> Self {
        Self {
            verb: Verb::Updated.as_str().to_string(),
            id: id.into(),
            data: Some(data),
        }
    }

    #[must_use]
    pub fn destroyed(id: impl Into<String>) -> Self {
        Self {
            verb: Verb::Destroyed.as_str().to_string(),
            id: id.into(),
            data: None,
        }
    }
}

/// Servers may send numeric ids; they are normalised to strings.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

/// One envelope tagged with the topic it was published on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedMessage {
    #[serde(rename = "entityType")]
    pub topic: String,
    #[serde(flatten)]
    pub envelope: RawEnvelope,
}

impl FeedMessage {
    #[must_use]
    pub fn new(topic: impl Into<String>, envelope: RawEnvelope) -> Self {
        Self {
            topic: topic.into(),
            envelope,
        }
    }
}

/// A decoded change for record type `R`.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope<R: Record> {
    Created(R),
    /// `patch` holds the changed attributes (a full record is a valid patch).
    Updated {
        id: R::Id,
        patch: Value,
    },
    Destroyed(R::Id),
}

impl<R: Record> Envelope<R> {
    /// Decode a wire envelope.
    ///
    /// A `created` payload without an `id` field borrows the envelope id.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError`] for unknown verbs, missing data on
    /// `created`/`updated`, data that does not match `R`, or an id that
    /// does not decode into `R::Id`.
    pub fn decode(raw: RawEnvelope) -> Result<Self, EnvelopeError> {
        let verb: Verb = raw.verb.parse()?;
        match verb {
            Verb::Created => {
                let mut data = raw.data.ok_or(EnvelopeError::MissingData {
                    verb: verb.as_str(),
                })?;
                if let Value::Object(fields) = &mut data {
                    fields
                        .entry("id")
                        .or_insert_with(|| Value::String(raw.id.clone()));
                }
                serde_json::from_value(data)
                    .map(Self::Created)
                    .map_err(EnvelopeError::InvalidData)
            }
            Verb::Updated => {
                let patch = raw.data.ok_or(EnvelopeError::MissingData {
                    verb: verb.as_str(),
                })?;
                if !patch.is_object() {
                    return Err(EnvelopeError::InvalidData(serde::de::Error::custom(
                        "updated data must be an object",
                    )));
                }
                Ok(Self::Updated {
                    id: decode_id::<R>(raw.id)?,
                    patch,
                })
            }
            Verb::Destroyed => Ok(Self::Destroyed(decode_id::<R>(raw.id)?)),
        }
    }

    #[must_use]
    pub fn verb(&self) -> Verb {
        match self {
            Self::Created(_) => Verb::Created,
            Self::Updated { .. } => Verb::Updated,
            Self::Destroyed(_) => Verb::Destroyed,
        }
    }

    /// Identifier of the record the change targets.
    #[must_use]
    pub fn id(&self) -> &R::Id {
        match self {
            Self::Created(record) => record.id(),
            Self::Updated { id, .. } | Self::Destroyed(id) => id,
        }
    }
}

fn decode_id<R: Record>(raw: String) -> Result<R::Id, EnvelopeError> {
    serde_json::from_value(Value::String(raw)).map_err(EnvelopeError::InvalidId)
}

/// Merge `patch` into `record`, attribute by attribute.
///
/// The `id` attribute of the patch is ignored so a record keeps its identity.
///
/// # Errors
///
/// Returns [`EnvelopeError::InvalidData`] when the merged attributes no
/// longer describe a valid `R`.
pub fn apply_patch<R: Record>(record: &R, patch: &Value) -> Result<R, EnvelopeError> {
    let mut merged = serde_json::to_value(record).map_err(EnvelopeError::InvalidData)?;
    if let (Value::Object(target), Value::Object(changes)) = (&mut merged, patch) {
        for (key, value) in changes {
            if key != "id" {
                target.insert(key.clone(), value.clone());
            }
        }
    }
    serde_json::from_value(merged).map_err(EnvelopeError::InvalidData)
}
