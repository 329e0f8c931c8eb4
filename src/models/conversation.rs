use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One question of the booking dialogue. Each variant owns one validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    Name,
    Email,
    Company,
    Phone,
    ProductInterest,
    Attendees,
    SelectedDay,
    SelectedTime,
    Notes,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Name => "name",
            FieldKind::Email => "email",
            FieldKind::Company => "company",
            FieldKind::Phone => "phone",
            FieldKind::ProductInterest => "productInterest",
            FieldKind::Attendees => "attendees",
            FieldKind::SelectedDay => "selectedDay",
            FieldKind::SelectedTime => "selectedTime",
            FieldKind::Notes => "notes",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub kind: FieldKind,
    pub prompt: &'static str,
}

pub static BOOKING_FIELDS: [FieldSpec; 9] = [
    FieldSpec {
        kind: FieldKind::Name,
        prompt: "What's your full name?",
    },
    FieldSpec {
        kind: FieldKind::Email,
        prompt: "What's your work email address?",
    },
    FieldSpec {
        kind: FieldKind::Company,
        prompt: "Which company are you with?",
    },
    FieldSpec {
        kind: FieldKind::Phone,
        prompt: "What's the best phone number to reach you?",
    },
    FieldSpec {
        kind: FieldKind::ProductInterest,
        prompt: "Which product would you like to see: Ayura or NexaKYC?",
    },
    FieldSpec {
        kind: FieldKind::Attendees,
        prompt: "How many people will attend the demo?",
    },
    FieldSpec {
        kind: FieldKind::SelectedDay,
        prompt: "Which day works best for you (Monday to Friday)?",
    },
    FieldSpec {
        kind: FieldKind::SelectedTime,
        prompt: "Which time would you prefer?",
    },
    FieldSpec {
        kind: FieldKind::Notes,
        prompt: "Anything you'd like us to prepare for the demo? Type \"none\" if not.",
    },
];

/// Progress through `BOOKING_FIELDS` for one chat session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DialogueState {
    pub is_active: bool,
    pub step_index: usize,
    pub answers: BTreeMap<FieldKind, String>,
}

impl DialogueState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn current_field(&self) -> Option<&'static FieldSpec> {
        if !self.is_active {
            return None;
        }
        BOOKING_FIELDS.get(self.step_index)
    }

    pub fn answer(&self, kind: FieldKind) -> Option<&str> {
        self.answers.get(&kind).map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
    pub timestamp: String,
}

impl ChatMessage {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Everything the chatbot remembers about one visitor.
#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    pub dialogue: DialogueState,
    pub display_name: Option<String>,
    pub transcript: Vec<ChatMessage>,
}
