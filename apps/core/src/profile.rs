//! Chatbot variants.
//!
//! Each variant is a rule table, a response book and a set of optional
//! pipeline stages. The tables are constant data; order within each rule
//! list is precedence.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::brain::intent::NAME_PHRASE;
use crate::brain::{Emotion, Intent, IntentMatcher, RuleSpec, RuleTable, Sentiment, TemplateSet};
use crate::error::AppError;
use crate::responses::ResponseBook;

/// Which chatbot to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Stateless pattern matching
    Simple,
    /// Remembers your name and the conversation
    Enhanced,
    /// Adds sentiment, emotion and keyword analysis
    Nlp,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Simple, Variant::Enhanced, Variant::Nlp];

    pub fn bot_name(&self) -> &'static str {
        match self {
            Variant::Simple => "ChatBot",
            Variant::Enhanced => "Enhanced ChatBot",
            Variant::Nlp => "NLP ChatBot",
        }
    }

    /// File name prefix for saved transcripts
    pub fn transcript_prefix(&self) -> &'static str {
        match self {
            Variant::Nlp => "nlp_conversation",
            _ => "conversation",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bot_name())
    }
}

/// Optional pipeline stages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stages {
    pub capture_names: bool,
    pub recall: bool,
    pub sentiment: bool,
    pub emotions: bool,
    pub keywords: bool,
}

/// A compiled variant, ready to drive a session.
pub struct Profile {
    pub variant: Variant,
    pub matcher: IntentMatcher,
    pub book: ResponseBook,
    pub stages: Stages,
}

impl Profile {
    /// Compile and validate the tables for a variant.
    pub fn build(variant: Variant) -> Result<Self, AppError> {
        let (specs, book, stages) = match variant {
            Variant::Simple => (SIMPLE_RULES, SIMPLE_BOOK, Stages::default()),
            Variant::Enhanced => (
                ENHANCED_RULES,
                ENHANCED_BOOK,
                Stages {
                    capture_names: true,
                    recall: true,
                    ..Stages::default()
                },
            ),
            Variant::Nlp => (
                NLP_RULES,
                NLP_BOOK,
                Stages {
                    capture_names: true,
                    sentiment: true,
                    emotions: true,
                    keywords: true,
                    ..Stages::default()
                },
            ),
        };

        let table = RuleTable::compile(specs)?;
        book.validate()?;

        if stages.capture_names && book.name_provided.is_empty() {
            return Err(AppError::Config(format!(
                "{} captures names but has no name_provided responses",
                variant
            )));
        }
        if stages.recall && book.memory_reference.is_empty() {
            return Err(AppError::Config(format!(
                "{} recalls context but has no memory_reference responses",
                variant
            )));
        }

        Ok(Self {
            variant,
            matcher: IntentMatcher::new(table),
            book,
            stages,
        })
    }

    /// Templates for the goodbye said when the session closes.
    pub fn farewell_templates(&self) -> &'static [&'static str] {
        self.matcher
            .table()
            .get(Intent::Goodbye)
            .and_then(|rule| rule.templates)
            .map(|set| set.for_sentiment(Sentiment::Neutral))
            .filter(|list| !list.is_empty())
            .unwrap_or(self.book.default)
    }
}

// --- Shared patterns ---

const GREETING: &str = r"\b(hello|hi|hey|greetings|good morning|good afternoon|good evening)\b";
const HOW_ARE_YOU: &str = r"\b(how are you|how're you|how do you feel|what's up)\b";
const NAME_QUESTION: &str = r"\b(what's your name|your name|who are you|what are you called)\b";
const HELP: &str = r"\b(help|what can you do|commands|assist)\b";
const GOODBYE: &str = r"\b(bye|goodbye|see you|farewell|exit|quit)\b";
const WEATHER: &str = r"\b(weather|temperature|sunny|rainy|cloudy|hot|cold)\b";
const COMPLIMENT: &str =
    r"\b(good|great|awesome|amazing|wonderful|fantastic|nice|excellent)\b.*\b(bot|chatbot|you)\b";
const QUESTION: &str = r"\?";

// --- Simple ---

const SIMPLE_GREETINGS: &[&str] = &[
    "Hello! How can I help you today?",
    "Hi there! What's on your mind?",
    "Hey! Nice to meet you!",
    "Hello! I'm here to chat with you.",
];

const SIMPLE_HOW_ARE_YOU: &[&str] = &[
    "I'm doing great, thank you for asking!",
    "I'm fantastic! How are you?",
    "I'm doing well. How about you?",
    "All good here! Thanks for asking.",
];

const SIMPLE_NAME_QUESTIONS: &[&str] = &[
    "My name is ChatBot. What's yours?",
    "I'm ChatBot! Nice to meet you!",
    "You can call me ChatBot. What should I call you?",
];

const SIMPLE_HELP: &[&str] = &[
    "I can chat with you about various topics! Try asking me about myself, the weather, or just say hello!",
    "I'm here to have a conversation with you. Ask me anything!",
    "I can help with basic conversations. What would you like to talk about?",
];

const SIMPLE_GOODBYE: &[&str] = &[
    "Goodbye! It was nice chatting with you!",
    "See you later! Have a great day!",
    "Bye! Come back anytime for another chat!",
    "Farewell! Take care!",
];

const SIMPLE_WEATHER: &[&str] = &[
    "I don't have access to real weather data, but I hope it's nice where you are!",
    "I can't check the weather, but I hope you're having a beautiful day!",
    "Weather-wise, I'm not connected to any weather services, but I hope it's pleasant!",
];

const SIMPLE_DEFAULT: &[&str] = &[
    "That's interesting! Tell me more.",
    "I see. What else would you like to talk about?",
    "Hmm, I'm not sure how to respond to that. Can you rephrase?",
    "That's a good point. What do you think about it?",
    "I'd love to hear more about that!",
    "Could you elaborate on that?",
];

const SIMPLE_RULES: &[RuleSpec] = &[
    RuleSpec {
        intent: Intent::Greeting,
        pattern: GREETING,
        templates: Some(TemplateSet::Plain(SIMPLE_GREETINGS)),
    },
    RuleSpec {
        intent: Intent::HowAreYou,
        pattern: HOW_ARE_YOU,
        templates: Some(TemplateSet::Plain(SIMPLE_HOW_ARE_YOU)),
    },
    RuleSpec {
        intent: Intent::NameQuestion,
        pattern: NAME_QUESTION,
        templates: Some(TemplateSet::Plain(SIMPLE_NAME_QUESTIONS)),
    },
    RuleSpec {
        intent: Intent::Help,
        pattern: HELP,
        templates: Some(TemplateSet::Plain(SIMPLE_HELP)),
    },
    RuleSpec {
        intent: Intent::Goodbye,
        pattern: GOODBYE,
        templates: Some(TemplateSet::Plain(SIMPLE_GOODBYE)),
    },
    RuleSpec {
        intent: Intent::Weather,
        pattern: WEATHER,
        templates: Some(TemplateSet::Plain(SIMPLE_WEATHER)),
    },
];

const SIMPLE_BOOK: ResponseBook = ResponseBook {
    name_provided: &[],
    memory_reference: &[],
    emotions: &[],
    default: SIMPLE_DEFAULT,
    interrupt_farewell: "Goodbye! Thanks for chatting!",
};

// --- Enhanced ---

const ENHANCED_GREETINGS: &[&str] = &[
    "Hello{name}! How can I help you today?",
    "Hi there{name}! What's on your mind?",
    "Hey{name}! Nice to see you!",
    "Hello{name}! I'm here to chat with you.",
];

const ENHANCED_HOW_ARE_YOU: &[&str] = &[
    "I'm doing great, thank you for asking! How are you feeling today?",
    "I'm fantastic! How has your day been so far?",
    "I'm doing well. How about you? Anything interesting happening?",
    "All good here! Thanks for asking. What's new with you?",
];

const ENHANCED_NAME_QUESTIONS: &[&str] = &[
    "My name is Enhanced ChatBot. What's yours?",
    "I'm Enhanced ChatBot! What should I call you?",
    "You can call me Enhanced ChatBot. I'd love to know your name!",
];

const ENHANCED_NAME_PROVIDED: &[&str] = &[
    "Nice to meet you, {user_name}! I'll remember that.",
    "Great to meet you, {user_name}! How are you doing today?",
    "Hello {user_name}! That's a lovely name. I'm glad to know you!",
];

const ENHANCED_HELP: &[&str] = &[
    "I can chat with you about various topics! I also remember our conversation, so feel free to reference things we've talked about before.",
    "I'm here to have a conversation with you. I can remember what we discuss, so our chat can be more natural!",
    "I can help with conversations and I'll remember what we talk about. What interests you?",
];

const ENHANCED_GOODBYE: &[&str] = &[
    "Goodbye{name}! It was wonderful chatting with you!",
    "See you later{name}! Have a great day!",
    "Bye{name}! Thanks for the great conversation!",
    "Farewell{name}! I've enjoyed our chat!",
];

const ENHANCED_WEATHER: &[&str] = &[
    "I don't have access to real weather data, but I hope it's nice where you are! How's the weather on your end?",
    "I can't check the weather, but I hope you're having a beautiful day! What's it like outside?",
    "Weather-wise, I'm not connected to any weather services, but I'm curious - how's the weather where you are?",
];

const MEMORY_REFERENCE: &[&str] = &[
    "Yes, I remember we talked about that! {context}",
    "Right, you mentioned that earlier. {context}",
    "I recall our conversation about that. {context}",
];

const ENHANCED_DEFAULT: &[&str] = &[
    "That's interesting{name}! Tell me more about that.",
    "I see{name}. What else would you like to talk about?",
    "Hmm{name}, I'm not sure how to respond to that. Can you elaborate?",
    "That's a good point{name}. What's your take on it?",
    "I'd love to hear more about that{name}!",
    "Could you tell me more about that{name}?",
];

const ENHANCED_RULES: &[RuleSpec] = &[
    RuleSpec {
        intent: Intent::Greeting,
        pattern: GREETING,
        templates: Some(TemplateSet::Plain(ENHANCED_GREETINGS)),
    },
    RuleSpec {
        intent: Intent::HowAreYou,
        pattern: HOW_ARE_YOU,
        templates: Some(TemplateSet::Plain(ENHANCED_HOW_ARE_YOU)),
    },
    RuleSpec {
        intent: Intent::NameQuestion,
        pattern: NAME_QUESTION,
        templates: Some(TemplateSet::Plain(ENHANCED_NAME_QUESTIONS)),
    },
    RuleSpec {
        intent: Intent::Help,
        pattern: HELP,
        templates: Some(TemplateSet::Plain(ENHANCED_HELP)),
    },
    RuleSpec {
        intent: Intent::Goodbye,
        pattern: GOODBYE,
        templates: Some(TemplateSet::Plain(ENHANCED_GOODBYE)),
    },
    RuleSpec {
        intent: Intent::Weather,
        pattern: WEATHER,
        templates: Some(TemplateSet::Plain(ENHANCED_WEATHER)),
    },
];

const ENHANCED_BOOK: ResponseBook = ResponseBook {
    name_provided: ENHANCED_NAME_PROVIDED,
    memory_reference: MEMORY_REFERENCE,
    emotions: &[],
    default: ENHANCED_DEFAULT,
    interrupt_farewell: "Goodbye! Thanks for chatting!",
};

// --- NLP ---

const NLP_GREETING_POSITIVE: &[&str] = &[
    "Hello{name}! You seem to be in a great mood! How can I help you today?",
    "Hi there{name}! I can sense your positive energy. What's making you happy?",
    "Hey{name}! Your enthusiasm is contagious! What's on your mind?",
];

const NLP_GREETING_NEUTRAL: &[&str] = &[
    "Hello{name}! How can I help you today?",
    "Hi there{name}! What's on your mind?",
    "Hey{name}! Nice to see you!",
];

const NLP_GREETING_NEGATIVE: &[&str] = &[
    "Hello{name}. I sense you might be having a tough time. I'm here to listen.",
    "Hi{name}. How are you feeling? Sometimes it helps to talk.",
    "Hey{name}. I'm here for you. What's troubling you?",
];

const NLP_HOW_ARE_YOU_POSITIVE: &[&str] = &[
    "I'm doing fantastic! It's wonderful to chat with someone so upbeat!",
    "I'm great! Your positive attitude is really brightening my day!",
    "I'm doing excellent! How has your day been treating you?",
];

const NLP_HOW_ARE_YOU_NEUTRAL: &[&str] = &[
    "I'm doing well, thank you for asking! How are you?",
    "I'm good! How about you? How's your day going?",
    "I'm fine, thanks! What's been happening with you?",
];

const NLP_HOW_ARE_YOU_NEGATIVE: &[&str] = &[
    "I'm doing okay. More importantly, how are you holding up?",
    "I'm alright. I'm sorry if you're going through a difficult time.",
    "I'm here and ready to listen. How can I support you today?",
];

const NLP_COMPLIMENTS: &[&str] = &[
    "Thank you so much{name}! That's very kind of you to say.",
    "That's really sweet{name}! You've made my day brighter.",
    "I appreciate that{name}! You're pretty awesome yourself!",
];

const NLP_QUESTIONS: &[&str] = &[
    "That's a thoughtful question{name}! Let me think about that...",
    "Interesting question{name}! I'd love to explore that with you.",
    "Great question{name}! What's your take on it?",
];

const NLP_JOY: &[&str] = &[
    "That's wonderful{name}! I'm so happy to hear that!",
    "How exciting{name}! I love your enthusiasm!",
    "That's fantastic{name}! Your joy is infectious!",
];

const NLP_SADNESS: &[&str] = &[
    "I'm sorry you're feeling this way{name}. It's okay to feel sad sometimes.",
    "That sounds difficult{name}. Would you like to talk about it?",
    "I understand{name}. Sometimes life can be challenging.",
];

const NLP_ANGER: &[&str] = &[
    "I can sense your frustration{name}. Take a deep breath.",
    "That sounds really frustrating{name}. What's bothering you?",
    "I understand you're upset{name}. Let's work through this together.",
];

const NLP_FEAR: &[&str] = &[
    "It's natural to feel scared sometimes{name}. You're not alone.",
    "I understand your concerns{name}. What's making you anxious?",
    "Fear can be overwhelming{name}. What can I do to help?",
];

const NLP_GOODBYE: &[&str] = &[
    "Goodbye{name}! It's been wonderful chatting with you!",
    "Take care{name}! I've really enjoyed our conversation!",
    "Farewell{name}! Thanks for the great chat!",
];

const NLP_DEFAULT: &[&str] = &[
    "That's interesting{name}! Tell me more about your thoughts on that.",
    "I see{name}. What's your perspective on this?",
    "Fascinating{name}! I'd love to hear more about your experience.",
];

const NLP_NAME_PROVIDED: &[&str] = &["Nice to meet you, {user_name}! I'll remember that."];

const NLP_RULES: &[RuleSpec] = &[
    RuleSpec {
        intent: Intent::Greeting,
        pattern: GREETING,
        templates: Some(TemplateSet::BySentiment(&[
            (Sentiment::Positive, NLP_GREETING_POSITIVE),
            (Sentiment::Neutral, NLP_GREETING_NEUTRAL),
            (Sentiment::Negative, NLP_GREETING_NEGATIVE),
        ])),
    },
    RuleSpec {
        intent: Intent::HowAreYou,
        pattern: HOW_ARE_YOU,
        templates: Some(TemplateSet::BySentiment(&[
            (Sentiment::Positive, NLP_HOW_ARE_YOU_POSITIVE),
            (Sentiment::Neutral, NLP_HOW_ARE_YOU_NEUTRAL),
            (Sentiment::Negative, NLP_HOW_ARE_YOU_NEGATIVE),
        ])),
    },
    RuleSpec {
        intent: Intent::NameQuestion,
        pattern: NAME_QUESTION,
        templates: None,
    },
    RuleSpec {
        intent: Intent::NameResponse,
        pattern: NAME_PHRASE,
        templates: None,
    },
    RuleSpec {
        intent: Intent::Compliment,
        pattern: COMPLIMENT,
        templates: Some(TemplateSet::Plain(NLP_COMPLIMENTS)),
    },
    RuleSpec {
        intent: Intent::Question,
        pattern: QUESTION,
        templates: Some(TemplateSet::Plain(NLP_QUESTIONS)),
    },
    RuleSpec {
        intent: Intent::Goodbye,
        pattern: GOODBYE,
        templates: Some(TemplateSet::Plain(NLP_GOODBYE)),
    },
    RuleSpec {
        intent: Intent::Help,
        pattern: HELP,
        templates: None,
    },
];

const NLP_BOOK: ResponseBook = ResponseBook {
    name_provided: NLP_NAME_PROVIDED,
    memory_reference: &[],
    emotions: &[
        (Emotion::Joy, NLP_JOY),
        (Emotion::Sadness, NLP_SADNESS),
        (Emotion::Anger, NLP_ANGER),
        (Emotion::Fear, NLP_FEAR),
    ],
    default: NLP_DEFAULT,
    interrupt_farewell: "Goodbye! Thanks for the enlightening conversation!",
};
