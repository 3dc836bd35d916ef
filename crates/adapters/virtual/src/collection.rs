//! One server-side collection, stored as raw JSON objects.

use barrelhub_domain::envelope::RawEnvelope;
use barrelhub_domain::record::Record;
use serde_json::{Map, Value};

/// Records of one resource, in insertion order.
pub struct Collection {
    topic: &'static str,
    resource: &'static str,
    items: Vec<Map<String, Value>>,
}

impl Collection {
    /// Build a collection from typed records.
    pub fn from_records<R: Record>(records: &[R]) -> Self {
        let items = records
            .iter()
            .filter_map(|record| match serde_json::to_value(record) {
                Ok(Value::Object(fields)) => Some(fields),
                _ => None,
            })
            .collect();
        Self {
            topic: R::TOPIC,
            resource: R::RESOURCE,
            items,
        }
    }

    pub fn topic(&self) -> &'static str {
        self.topic
    }

    pub fn resource(&self) -> &'static str {
        self.resource
    }

    pub fn list(&self) -> Value {
        Value::Array(self.items.iter().cloned().map(Value::Object).collect())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Insert a record under `id`. Returns the envelope to broadcast.
    pub fn create(&mut self, id: &str, mut fields: Map<String, Value>) -> (Value, RawEnvelope) {
        fields.insert("id".to_string(), Value::String(id.to_string()));
        let data = Value::Object(fields.clone());
        self.items.push(fields);
        (data.clone(), RawEnvelope::created(id, data))
    }

    /// Merge `patch` into record `id`. `None` when the record does not exist.
    pub fn update(&mut self, id: &str, patch: &Map<String, Value>) -> Option<(Value, RawEnvelope)> {
        let index = self.position(id)?;
        let record = &mut self.items[index];
        let mut changes = Map::new();
        for (key, value) in patch {
            if key != "id" {
                record.insert(key.clone(), value.clone());
                changes.insert(key.clone(), value.clone());
            }
        }
        Some((
            Value::Object(record.clone()),
            RawEnvelope::updated(id, Value::Object(changes)),
        ))
    }

    /// Remove record `id`. `None` when the record does not exist.
    pub fn delete(&mut self, id: &str) -> Option<RawEnvelope> {
        let index = self.position(id)?;
        self.items.remove(index);
        Some(RawEnvelope::destroyed(id))
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.get("id").and_then(Value::as_str) == Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use barrelhub_domain::team::Team;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(fields) => fields,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn should_list_seeded_records() {
        let teams = Collection::from_records(&[Team::new("t1", "Red")]);
        assert_eq!(teams.topic(), "team");
        assert_eq!(teams.list(), json!([{"id": "t1", "name": "Red"}]));
    }

    #[test]
    fn should_emit_only_changed_attributes_on_update() {
        let mut teams = Collection::from_records(&[Team::new("t1", "Red")]);

        let (record, envelope) = teams
            .update("t1", &object(json!({"id": "x", "name": "Navy"})))
            .unwrap();

        assert_eq!(record, json!({"id": "t1", "name": "Navy"}));
        assert_eq!(envelope, RawEnvelope::updated("t1", json!({"name": "Navy"})));
    }

    #[test]
    fn should_return_none_when_deleting_missing_record() {
        let mut teams = Collection::from_records::<Team>(&[]);
        assert!(teams.delete("t1").is_none());
    }
}
