use reflective_core::ReflectiveError;
use reflective_core::persona::{PersonaGroup, PersonaRepository, Scalar, AttributeValue};
use reflective_infrastructure::FilePersonaRepository;
use std::fs;
use tempfile::TempDir;

const JSON_CATALOG: &str = r#"
[
  {
    "id": "p1",
    "title": "Weekend Gamer",
    "name": "Jordan",
    "age": 24,
    "location": "Seattle, Washington",
    "education": "Some college",
    "occupation": "Barista",
    "income": "$30,000 - $40,000",
    "personality_traits": {"openness": "High", "extraversion": 4},
    "values_and_beliefs": {"priorities": ["Fun", "Friends"]},
    "behavioral_patterns": {"daily_routine": "Early shifts, late-night raids"},
    "technology_usage": {"favorite_social_media": ["Twitch", "Discord"]},
    "communication_style": {"information_preferences": ["YouTube reviews"]}
  },
  {
    "id": "p2",
    "title": "Retired Teacher",
    "name": "Helen"
  }
]
"#;

#[tokio::test]
async fn test_load_json_catalog() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("personas.json");
    fs::write(&path, JSON_CATALOG).expect("Should write catalog");

    let repo = FilePersonaRepository::with_path(&path);
    let personas = repo.load_all().await.expect("Should load personas");

    assert_eq!(personas.len(), 2, "Should load 2 personas");
    assert_eq!(personas[0].id, "p1");
    assert_eq!(personas[0].age, Some(24));
    assert_eq!(
        personas[0].attribute(PersonaGroup::PersonalityTraits, "extraversion"),
        Some(&AttributeValue::Scalar(Scalar::Integer(4)))
    );
    assert!(personas[1].age.is_none(), "Optional fields default to None");
}

#[tokio::test]
async fn test_load_toml_catalog() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("personas.toml");
    fs::write(
        &path,
        r#"
[[persona]]
id = "p1"
title = "Night Owl"
name = "Sam"

[persona.technology_usage]
favorite_social_media = ["Tumblr"]

[[persona]]
id = "p2"
title = "Early Bird"
name = "Kim"
"#,
    )
    .expect("Should write catalog");

    let repo = FilePersonaRepository::with_path(&path);
    let catalog = repo.load_catalog().await.expect("Should load catalog");

    assert_eq!(catalog.len(), 2);
    let sam = catalog.get("p1").unwrap();
    assert_eq!(
        sam.attribute(PersonaGroup::TechnologyUsage, "favorite_social_media")
            .map(|value| value.render()),
        Some("Tumblr".to_string())
    );
}

#[tokio::test]
async fn test_missing_catalog_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let repo = FilePersonaRepository::with_path(temp_dir.path().join("absent.json"));

    let err = repo.load_all().await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_malformed_catalog_is_serialization_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("personas.json");
    fs::write(&path, r#"[{"id": "p1", "name": "No title"}]"#).unwrap();

    let repo = FilePersonaRepository::with_path(&path);
    let err = repo.load_all().await.unwrap_err();
    assert!(matches!(err, ReflectiveError::Serialization { .. }));
}

#[tokio::test]
async fn test_duplicate_titles_rejected_by_catalog() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("personas.json");
    fs::write(
        &path,
        r#"[{"id": "a", "title": "Same", "name": "One"}, {"id": "b", "title": "Same", "name": "Two"}]"#,
    )
    .unwrap();

    let repo = FilePersonaRepository::with_path(&path);
    assert_eq!(repo.load_all().await.unwrap().len(), 2);
    assert!(matches!(
        repo.load_catalog().await,
        Err(ReflectiveError::DataAccess(_))
    ));
}
