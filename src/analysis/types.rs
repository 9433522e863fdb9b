//! Enrichment result types.

use serde::{Deserialize, Serialize};

/// Overall sentiment of a text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub label: String,
    pub score: f64,
}

/// Opinion versus factual reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subjectivity {
    pub label: String,
    pub score: f64,
}

/// Kind of a named entity.
///
/// Model-specific tags are folded in on deserialization: `PER` is a person,
/// `LOC` and `GPE` are locations, anything unrecognized is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityLabel {
    #[serde(alias = "PER")]
    Person,
    Org,
    #[serde(alias = "LOC", alias = "GPE")]
    Location,
    #[serde(other)]
    Other,
}

/// A named entity with its character span in the analyzed text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    pub label: EntityLabel,
    #[serde(alias = "start_char")]
    pub start: usize,
    #[serde(alias = "end_char")]
    pub end: usize,
}

/// A direct quote attributed to a person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    pub person: String,
}

/// The first location entity, if any.
pub fn first_location(entities: &[Entity]) -> Option<&Entity> {
    entities.iter().find(|e| e.label == EntityLabel::Location)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_label_aliases() {
        let entities: Vec<Entity> = serde_json::from_str(
            r#"[
                {"text": "Ana", "label": "PER", "start_char": 0, "end_char": 3},
                {"text": "Rosario", "label": "LOC", "start": 10, "end": 17},
                {"text": "Chile", "label": "GPE", "start": 20, "end": 25},
                {"text": "ACME", "label": "ORG", "start": 30, "end": 34},
                {"text": "Monday", "label": "DATE", "start": 40, "end": 46}
            ]"#,
        )
        .expect("valid entities");
        let labels: Vec<_> = entities.iter().map(|e| e.label).collect();
        assert_eq!(
            labels,
            vec![
                EntityLabel::Person,
                EntityLabel::Location,
                EntityLabel::Location,
                EntityLabel::Org,
                EntityLabel::Other
            ]
        );
        assert_eq!(entities[0].end, 3);
    }

    #[test]
    fn test_entity_serializes_canonical_label() {
        let entity = Entity {
            text: "Ana".into(),
            label: EntityLabel::Person,
            start: 0,
            end: 3,
        };
        let value = serde_json::to_value(&entity).expect("serializable");
        assert_eq!(value["label"], "PERSON");
        assert_eq!(value["start"], 0);
    }

    #[test]
    fn test_first_location() {
        let entities = vec![
            Entity {
                text: "Ana".into(),
                label: EntityLabel::Person,
                start: 0,
                end: 3,
            },
            Entity {
                text: "Salta".into(),
                label: EntityLabel::Location,
                start: 10,
                end: 15,
            },
            Entity {
                text: "Jujuy".into(),
                label: EntityLabel::Location,
                start: 20,
                end: 25,
            },
        ];
        assert_eq!(first_location(&entities).map(|e| e.text.as_str()), Some("Salta"));
        assert!(first_location(&entities[..1]).is_none());
    }
}
