use serde::{Deserialize, Deserializer, Serialize};

/// Structured résumé, either supplied by the caller or extracted from free text by the model.
/// Every field defaults to empty so a sparse extraction still deserializes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeData {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub summary: String,
    pub experience: Vec<WorkExperience>,
    pub skills: Vec<String>,
    pub education: Vec<Education>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkExperience {
    pub title: String,
    pub company: String,
    pub duration: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    pub degree: String,
    pub field: String,
    pub institution: String,
    #[serde(deserialize_with = "string_or_number")]
    pub year: String,
}

/// Models write graduation years both as `"2019"` and `2019`; `null` reads as empty.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Text(String),
        Number(serde_json::Number),
        Null(()),
    }

    Ok(match Loose::deserialize(deserializer)? {
        Loose::Text(s) => s,
        Loose::Number(n) => n.to_string(),
        Loose::Null(()) => String::new(),
    })
}
