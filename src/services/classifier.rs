//! Canned answers for messages that arrive outside a booking dialogue.
//!
//! Categories are tried in table order and the first regex hit wins. The only
//! state touched is the visitor's remembered first name.

use chrono::{DateTime, FixedOffset};
use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    CurrentTime,
    NameIntroduction,
    TimeOfDayGreeting,
    Greeting,
    Thanks,
    Founder,
    Mission,
    Vision,
    Values,
    Contact,
    Products,
    Company,
    Fallback,
}

static RULES: Lazy<Vec<(Category, Regex)>> = Lazy::new(|| {
    [
        (Category::CurrentTime, r"(?i)\bwhat(?:'s| is)? the time\b|\bwhat time is it\b"),
        (
            Category::NameIntroduction,
            r"(?i)\b(?:my name is|my name's|i am|i'm|im|call me)\s+([a-z][a-z'-]*)",
        ),
        (Category::TimeOfDayGreeting, r"(?i)\bgood\s+(morning|afternoon|evening)\b"),
        (Category::Greeting, r"(?i)^\s*(?:hi+|hello|hey+|howdy|greetings|yo)\b"),
        (Category::Thanks, r"(?i)\b(?:thanks|thank you|thx|ty|appreciate it)\b"),
        (Category::Founder, r"(?i)\b(?:founder|founded|ceo|who started|who created)\b"),
        (Category::Mission, r"(?i)\bmission\b"),
        (Category::Vision, r"(?i)\bvision\b"),
        (Category::Values, r"(?i)\b(?:values|culture|principles)\b"),
        (
            Category::Contact,
            r"(?i)\b(?:contact|email|phone|call you|reach you|address|office|located|location)\b",
        ),
        (Category::Products, r"(?i)\b(?:products?|ayura|nexakyc|kyc|offerings?|solutions?)\b"),
        (
            Category::Company,
            r"(?i)\b(?:trinexa|company|about you|who are you|what do you do)\b",
        ),
    ]
    .into_iter()
    .map(|(category, pattern)| (category, Regex::new(pattern).expect("valid classifier regex")))
    .collect()
});

// Words that follow "I am"/"I'm" without being a name.
const NOT_NAMES: &[&str] = &[
    "a", "an", "the", "not", "just", "here", "there", "fine", "good", "great", "ok", "okay",
    "sorry", "new", "back", "glad", "happy", "sure", "so", "very", "really", "still", "also",
    "done", "busy", "curious", "confused", "interested", "looking", "trying", "wondering",
    "calling", "asking", "writing", "using", "from", "with", "in", "at", "on",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub category: Category,
    pub captured: Option<String>,
}

pub fn classify(message: &str) -> Classification {
    for (category, re) in RULES.iter() {
        let Some(caps) = re.captures(message) else {
            continue;
        };
        let captured = caps.get(1).map(|m| m.as_str().to_string());

        if *category == Category::NameIntroduction {
            match captured.as_deref() {
                Some(word) if !NOT_NAMES.contains(&word.to_lowercase().as_str()) => {}
                _ => continue,
            }
        }

        return Classification {
            category: *category,
            captured,
        };
    }

    Classification {
        category: Category::Fallback,
        captured: None,
    }
}

fn capitalize(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().to_string() + &c.as_str().to_lowercase(),
    }
}

/// Produces the canned reply for `message`, remembering a first name when one is offered.
pub fn respond(message: &str, display_name: &mut Option<String>, now: DateTime<FixedOffset>) -> String {
    let classification = classify(message);
    let name_suffix = display_name
        .as_deref()
        .map(|n| format!(", {n}"))
        .unwrap_or_default();

    match classification.category {
        Category::CurrentTime => format!("It's currently {}.", now.format("%-I:%M %p")),
        Category::NameIntroduction => {
            let name = capitalize(classification.captured.as_deref().unwrap_or_default());
            let reply = format!(
                "Nice to meet you, {name}! I can tell you about Trinexa, our products Ayura and NexaKYC, or book you a demo."
            );
            *display_name = Some(name);
            reply
        }
        Category::TimeOfDayGreeting => {
            let part = classification.captured.as_deref().unwrap_or("day").to_lowercase();
            format!("Good {part}{name_suffix}! How can I help you today?")
        }
        Category::Greeting => format!(
            "Hello{name_suffix}! I'm the Trinexa assistant. Ask me about our company or products, or type \"book a demo\"."
        ),
        Category::Thanks => format!("You're welcome{name_suffix}! Anything else I can help with?"),
        Category::Founder => "Trinexa was founded by a team of AI researchers and fintech engineers who wanted to make trustworthy AI practical for regulated industries.".to_string(),
        Category::Mission => "Our mission is to help businesses adopt AI that is safe, explainable and genuinely useful.".to_string(),
        Category::Vision => "We envision a world where every organisation can rely on AI as confidently as it relies on its own people.".to_string(),
        Category::Values => "We value transparency, customer obsession, security by default and shipping things that work.".to_string(),
        Category::Contact => "You can reach us at hello@trinexa.ai or through the contact page. For a live walkthrough, type \"book a demo\".".to_string(),
        Category::Products => "We offer two products: Ayura, our conversational AI platform, and NexaKYC, automated identity verification and KYC compliance. Type \"book a demo\" to see either one.".to_string(),
        Category::Company => "Trinexa is an AI company building practical, compliant AI products for businesses. Ask me about our mission, our products or how to book a demo.".to_string(),
        Category::Fallback => format!(
            "I'm not sure I understood that{name_suffix}. You can ask about Trinexa and our products, or type \"book a demo\" to schedule a demo."
        ),
    }
}
