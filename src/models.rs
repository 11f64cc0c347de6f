use serde::{
    de::{MapAccess, Visitor},
    Deserialize, Deserializer, Serialize,
};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub description: String,
    pub schedule: String,
    pub max_participants: i64,
    #[serde(default)]
    pub participants: Vec<String>,
}

impl ActivityRecord {
    /// Remaining capacity. Not clamped: an oversubscribed activity goes negative.
    pub fn spots_left(&self) -> i64 {
        self.max_participants - self.participants.len() as i64
    }
}

/// Activities keyed by name, in the order the backend listed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityCatalog {
    entries: Vec<(String, ActivityRecord)>,
}

impl ActivityCatalog {
    pub fn new(entries: Vec<(String, ActivityRecord)>) -> Self {
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ActivityRecord)> {
        self.entries.iter().map(|(name, record)| (name.as_str(), record))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'de> Deserialize<'de> for ActivityCatalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CatalogVisitor;

        impl<'de> Visitor<'de> for CatalogVisitor {
            type Value = ActivityCatalog;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping activity names to activity details")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, record)) = map.next_entry::<String, ActivityRecord>()? {
                    entries.push((name, record));
                }
                Ok(ActivityCatalog { entries })
            }
        }

        deserializer.deserialize_map(CatalogVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub first_name: String,
    #[serde(default)]
    pub middle_name: Option<String>,
    pub last_name: String,
    pub dob: String,
    pub address_line_1: String,
    pub zip_code: String,
    pub city: String,
    pub state: String,
    pub country: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub activity: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CustomerForm {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub dob: String,
    pub address_line_1: String,
    pub zip_code: String,
    pub city: String,
    pub state: String,
    pub country: String,
}

impl CustomerForm {
    /// Creation payload. A blank middle name is sent as an explicit `null`.
    pub fn to_payload(&self) -> CustomerRecord {
        CustomerRecord {
            first_name: self.first_name.clone(),
            middle_name: Some(self.middle_name.clone()).filter(|name| !name.is_empty()),
            last_name: self.last_name.clone(),
            dob: self.dob.clone(),
            address_line_1: self.address_line_1.clone(),
            zip_code: self.zip_code.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            country: self.country.clone(),
        }
    }
}

/// Success body of the state-changing endpoints.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MessageBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// Failure body of any endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<Value>,
}

impl ErrorBody {
    /// The detail when it is plain text. Structured validation details are
    /// not user-facing and yield `None`.
    pub fn detail_text(&self) -> Option<&str> {
        match &self.detail {
            Some(Value::String(text)) if !text.is_empty() => Some(text),
            _ => None,
        }
    }
}
