//! Character profiles: the counterpart of each conversation.
//!
//! A conversation identifier is the id of the character the user talks to.

use serde::{Deserialize, Serialize};

/// Personality selects the persona prompt.
///
/// Stored as a lowercase string; unknown values read back as `Warm`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(from = "String", into = "String")]
pub enum Personality {
    #[default]
    Warm,
    Playful,
    Caring,
}

impl Personality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Personality::Warm => "warm",
            Personality::Playful => "playful",
            Personality::Caring => "caring",
        }
    }
}

impl From<String> for Personality {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "playful" => Personality::Playful,
            "caring" => Personality::Caring,
            _ => Personality::Warm,
        }
    }
}

impl From<Personality> for String {
    fn from(value: Personality) -> Self {
        value.as_str().to_string()
    }
}

/// A chat character.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CharacterProfile {
    pub id: String,
    pub name: String,
    pub username: String,
    pub personality: Personality,
    pub age: u32,
    pub bio: String,
    pub category: String,
    pub interests: Vec<String>,
}

impl Default for CharacterProfile {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            username: String::new(),
            personality: Personality::Warm,
            age: 25,
            bio: String::new(),
            category: String::new(),
            interests: Vec::new(),
        }
    }
}

/// Checks a profile before it is saved. Returns the list of problems (empty when valid).
pub fn validate_character(character: &CharacterProfile) -> Vec<String> {
    let mut errors = Vec::new();
    if character.name.trim().is_empty() {
        errors.push("이름을 입력해주세요.".to_string());
    }
    if character.username.trim().is_empty() {
        errors.push("사용자명을 입력해주세요.".to_string());
    }
    if !(1..=100).contains(&character.age) {
        errors.push("올바른 나이를 입력해주세요.".to_string());
    }
    errors
}

/// Characters seeded into an empty character store.
pub fn default_characters() -> Vec<CharacterProfile> {
    vec![
        CharacterProfile {
            id: "jieun".to_string(),
            name: "송지은".to_string(),
            username: "jieun_love".to_string(),
            personality: Personality::Warm,
            age: 25,
            bio: "괜찮지 않아도 괜찮은 하루\n영화처럼, 음악처럼, 천천히".to_string(),
            category: "공감형".to_string(),
            interests: vec!["영화".to_string(), "음악".to_string(), "산책".to_string()],
        },
        CharacterProfile {
            id: "mina".to_string(),
            name: "신민아".to_string(),
            username: "mina_cute".to_string(),
            personality: Personality::Playful,
            age: 23,
            bio: "재밌는 거 좋아해".to_string(),
            category: "활발형".to_string(),
            interests: vec!["게임".to_string(), "운동".to_string(), "요리".to_string()],
        },
        CharacterProfile {
            id: "jisoo".to_string(),
            name: "한지수".to_string(),
            username: "jisoo_care".to_string(),
            personality: Personality::Caring,
            age: 26,
            bio: "잘 먹고 잘 쉬는 게 제일 중요해\n같이 천천히 가자".to_string(),
            category: "배려형".to_string(),
            interests: vec!["독서".to_string(), "요리".to_string(), "여행".to_string()],
        },
    ]
}
