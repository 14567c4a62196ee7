use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Key the score is published under. Never part of a source record.
pub const SCORE_KEY: &str = "similarityScore";

const FIELD_COUNT: usize = 9;

/// Scraped fields the scoring and sorting code reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Id,
    Title,
    DescriptionText,
    JobFunction,
    Industries,
    CompanyName,
    Location,
    EmploymentType,
    SeniorityLevel,
}

impl Field {
    pub const ALL: [Field; FIELD_COUNT] = [
        Field::Id,
        Field::Title,
        Field::DescriptionText,
        Field::JobFunction,
        Field::Industries,
        Field::CompanyName,
        Field::Location,
        Field::EmploymentType,
        Field::SeniorityLevel,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Title => "title",
            Field::DescriptionText => "descriptionText",
            Field::JobFunction => "jobFunction",
            Field::Industries => "industries",
            Field::CompanyName => "companyName",
            Field::Location => "location",
            Field::EmploymentType => "employmentType",
            Field::SeniorityLevel => "seniorityLevel",
        }
    }
}

/// A scraped job posting as received from the caller.
///
/// The JSON object is kept exactly as it arrived and is what gets serialised
/// back out. Scoring reads text views derived once at construction: numbers
/// and booleans print as text, arrays join with ", ", and null, objects and
/// missing keys read as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct JobRecord {
    fields: Map<String, Value>,
    text: [String; FIELD_COUNT],
}

impl From<Map<String, Value>> for JobRecord {
    fn from(mut fields: Map<String, Value>) -> Self {
        // A stale score from an earlier export would collide with ours.
        fields.remove(SCORE_KEY);
        let text = Field::ALL.map(|f| fields.get(f.key()).map(value_to_text).unwrap_or_default());
        Self { fields, text }
    }
}

impl Serialize for JobRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

impl JobRecord {
    pub fn text(&self, field: Field) -> &str {
        &self.text[field as usize]
    }

    pub fn id(&self) -> &str {
        self.text(Field::Id)
    }

    pub fn title(&self) -> &str {
        self.text(Field::Title)
    }

    pub fn description(&self) -> &str {
        self.text(Field::DescriptionText)
    }

    pub fn job_function(&self) -> &str {
        self.text(Field::JobFunction)
    }

    pub fn industries(&self) -> &str {
        self.text(Field::Industries)
    }

    pub fn company(&self) -> &str {
        self.text(Field::CompanyName)
    }

    pub fn location(&self) -> &str {
        self.text(Field::Location)
    }

    pub fn employment_type(&self) -> &str {
        self.text(Field::EmploymentType)
    }

    pub fn seniority(&self) -> &str {
        self.text(Field::SeniorityLevel)
    }
}

/// A working copy of a record plus its fused relevance score.
/// Lives for one filter/sort cycle; never written back to the source corpus.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredRecord {
    #[serde(flatten)]
    pub record: JobRecord,
    pub similarity_score: f64,
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null | Value::Object(_) => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .filter(|v| !matches!(v, Value::Null | Value::Object(_)))
            .map(value_to_text)
            .collect::<Vec<_>>()
            .join(", "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> JobRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_missing_fields_read_as_empty() {
        let r = record(json!({ "title": "Welder" }));
        assert_eq!(r.title(), "Welder");
        assert_eq!(r.description(), "");
        assert_eq!(r.industries(), "");
        assert_eq!(r.id(), "");
    }

    #[test]
    fn test_scraper_field_names_map_to_text_views() {
        let r = record(json!({
            "id": "4021",
            "title": "Electrical Engineer II",
            "descriptionText": "Design power systems",
            "jobFunction": "Engineering",
            "industries": "Utilities",
            "companyName": "Grid Co",
            "location": "Austin, TX",
            "employmentType": "Full-time",
            "seniorityLevel": "Mid-Senior level",
            "link": "https://jobs.example/4021"
        }));
        assert_eq!(r.description(), "Design power systems");
        assert_eq!(r.job_function(), "Engineering");
        assert_eq!(r.company(), "Grid Co");
        assert_eq!(r.location(), "Austin, TX");
        assert_eq!(r.employment_type(), "Full-time");
        assert_eq!(r.seniority(), "Mid-Senior level");
    }

    #[test]
    fn test_loose_values_score_as_text() {
        let r = record(json!({
            "id": 98765,
            "industries": ["Utilities", null, "Energy"],
            "location": null,
            "companyName": { "name": "Grid" },
            "remote": true
        }));
        assert_eq!(r.id(), "98765");
        assert_eq!(r.industries(), "Utilities, Energy");
        assert_eq!(r.location(), "");
        assert_eq!(r.company(), "");
    }

    #[test]
    fn test_record_serialises_exactly_as_received() {
        let input = json!({
            "id": 98765,
            "title": "Welder",
            "location": null,
            "industries": ["Utilities", "Energy"],
            "companyName": { "name": "Grid" },
            "postedAt": "2025-12-01",
            "applicantsCount": 12
        });
        let r = record(input.clone());
        assert_eq!(serde_json::to_value(&r).unwrap(), input);
    }

    #[test]
    fn test_incoming_score_is_dropped() {
        let r = record(json!({ "title": "Welder", "similarityScore": 0.4 }));
        assert_eq!(serde_json::to_value(&r).unwrap(), json!({ "title": "Welder" }));

        let scored = ScoredRecord {
            record: r,
            similarity_score: 1.6,
        };
        let value = serde_json::to_value(&scored).unwrap();
        assert_eq!(value, json!({ "title": "Welder", "similarityScore": 1.6 }));
    }
}
