use serde::{Deserialize, Serialize};

/// Entry in the standardized skills taxonomy used for autocomplete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub skill_id: i64,
    #[serde(default)]
    pub skill_title: String,
    #[serde(default)]
    pub skill_type: String,
}
