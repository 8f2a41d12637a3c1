use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What the search controller needs from a result row.
///
/// Anything else on the record is opaque to the controller and only matters
/// to whoever renders it.
pub trait SearchRecord: Clone + Send + Sync + 'static {
    fn record_id(&self) -> &str;
    fn display_name(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub name: String,
    pub phone: String,
    pub relationship: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    /// Unique hospital identifier, e.g. `ELG2024001`
    pub uhid: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    pub last_visit: NaiveDate,
    pub age: u32,
    pub gender: Gender,
    pub address: String,
    pub emergency_contact: EmergencyContact,
}

impl Patient {
    /// Case-insensitive match on name, UHID or email; phone is matched as typed.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.name.to_lowercase().contains(&needle)
            || self.phone.contains(query)
            || self.uhid.to_lowercase().contains(&needle)
            || self.email.to_lowercase().contains(&needle)
    }
}

impl SearchRecord for Patient {
    fn record_id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}
