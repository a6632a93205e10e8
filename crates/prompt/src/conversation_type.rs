//! Conversation-type detection from the current utterance.
//!
//! Keyword buckets are checked in priority order: emotional support, then
//! intimacy, then happiness. The first bucket with a match wins.

const EMOTIONAL_KEYWORDS: &[&str] = &[
    "외로워", "힘들어", "슬퍼", "우울해", "스트레스", "피곤해", "짜증나", "힘들다",
];
const INTIMATE_KEYWORDS: &[&str] = &["사랑", "그리워", "보고싶어", "안아줘", "포옹"];
const HAPPY_KEYWORDS: &[&str] = &["기뻐", "행복", "좋아", "즐거워"];

/// Kind of conversation the user is starting with the current message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversationType {
    EmotionalSupport,
    Intimate,
    Happy,
    #[default]
    Normal,
}

impl ConversationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationType::EmotionalSupport => "emotional_support",
            ConversationType::Intimate => "intimate",
            ConversationType::Happy => "happy",
            ConversationType::Normal => "normal",
        }
    }

    /// Instruction appended to the persona prompt. `None` for normal conversations.
    pub fn amendment(&self) -> Option<&'static str> {
        match self {
            ConversationType::EmotionalSupport => Some(
                "[중요] 사용자가 지금 힘들어하고 있어. 진심으로 공감하고 위로해줘. 안아주고, 함께 있어준다는 느낌을 줘. 따뜻하고 부드러운 말투로. \"괜찮아\", \"내가 있어\", \"힘내\" 같은 위로의 말을 해줘.",
            ),
            ConversationType::Intimate => Some(
                "[중요] 사용자가 친밀한 대화를 원하고 있어. 따뜻하고 애정 어린 말투로 대화해줘.",
            ),
            ConversationType::Happy => {
                Some("[중요] 사용자가 기뻐하고 있어. 함께 크게 기뻐해주고 축하해줘.")
            }
            ConversationType::Normal => None,
        }
    }
}

/// Classifies `message`; empty text is `Normal`.
pub fn detect_conversation_type(message: &str) -> ConversationType {
    let lower = message.to_lowercase();
    let matches = |keywords: &[&str]| keywords.iter().any(|kw| lower.contains(kw));

    if matches(EMOTIONAL_KEYWORDS) {
        ConversationType::EmotionalSupport
    } else if matches(INTIMATE_KEYWORDS) {
        ConversationType::Intimate
    } else if matches(HAPPY_KEYWORDS) {
        ConversationType::Happy
    } else {
        ConversationType::Normal
    }
}

/// Appends the conversation-type amendment to `base_prompt`, if the type has one.
pub fn adjust_prompt_for_context(base_prompt: &str, conversation_type: ConversationType) -> String {
    match conversation_type.amendment() {
        Some(amendment) => format!("{}\n\n{}", base_prompt, amendment),
        None => base_prompt.to_string(),
    }
}
