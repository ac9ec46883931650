use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobRole {
    Tank,
    Heal,
    #[default]
    Dps,
}

/// A combat job. `id` is the three letter abbreviation (`PLD`, `WHM`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    pub name: String,
    pub role: JobRole,
}
