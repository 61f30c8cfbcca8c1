//! Response templates: placeholder rendering, validation and selection.
//!
//! Templates may use `{name}` (rendered as `" Sam"` with a leading space, or
//! nothing), `{user_name}` (the bare name, or nothing) and `{context}`.
//! Any other placeholder is rejected when tables are built.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::brain::Emotion;
use crate::error::AppError;

const PLACEHOLDERS: &[&str] = &["name", "user_name", "context"];

/// Check that every `{...}` in a template is a known placeholder.
pub fn validate_template(template: &str) -> Result<(), AppError> {
    let mut rest = template;
    while let Some(open) = rest.find(['{', '}']) {
        if rest[open..].starts_with('}') {
            return Err(AppError::Config(format!(
                "Unbalanced '}}' in template: {:?}",
                template
            )));
        }
        let after = &rest[open + 1..];
        let close = after.find('}').ok_or_else(|| {
            AppError::Config(format!("Unclosed placeholder in template: {:?}", template))
        })?;
        let key = &after[..close];
        if !PLACEHOLDERS.contains(&key) {
            return Err(AppError::Config(format!(
                "Unknown placeholder {{{}}} in template: {:?}",
                key, template
            )));
        }
        rest = &after[close + 1..];
    }
    Ok(())
}

/// Values available to placeholders.
#[derive(Debug, Clone, Copy, Default)]
pub struct Substitutions<'a> {
    pub user_name: Option<&'a str>,
    pub context: Option<&'a str>,
}

impl<'a> Substitutions<'a> {
    pub fn new(user_name: Option<&'a str>) -> Self {
        Self {
            user_name,
            context: None,
        }
    }

    pub fn with_context(mut self, context: &'a str) -> Self {
        self.context = Some(context);
        self
    }

    fn lookup(&self, key: &str) -> Option<String> {
        match key {
            "name" => Some(self.user_name.map(|n| format!(" {}", n)).unwrap_or_default()),
            "user_name" => Some(self.user_name.unwrap_or_default().to_string()),
            "context" => Some(self.context.unwrap_or_default().to_string()),
            _ => None,
        }
    }
}

/// Fill placeholders in a single pass. Substituted values are never
/// re-scanned, so braces typed by the user come out verbatim.
pub fn render(template: &str, subs: &Substitutions<'_>) -> String {
    let mut out = String::with_capacity(template.len() + 16);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let key = &after[..close];
                match subs.lookup(key) {
                    Some(value) => out.push_str(&value),
                    None => {
                        debug_assert!(false, "unknown placeholder {{{}}}", key);
                        out.push('{');
                        out.push_str(key);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Source of randomness for choosing among templates.
pub trait TemplatePicker: Send {
    /// Index in `0..len`; `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;
}

/// Uniform random choice.
pub struct RandomPicker {
    rng: StdRng,
}

impl RandomPicker {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    #[cfg(test)]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplatePicker for RandomPicker {
    fn pick(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Always the first template. Makes replies predictable in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstPicker;

impl TemplatePicker for FirstPicker {
    fn pick(&mut self, _len: usize) -> usize {
        0
    }
}

/// Choose one template from a list, `None` if the list is empty.
pub fn choose(picker: &mut dyn TemplatePicker, templates: &[&'static str]) -> Option<&'static str> {
    if templates.is_empty() {
        return None;
    }
    let index = picker.pick(templates.len()).min(templates.len() - 1);
    Some(templates[index])
}

/// Response lists that are not attached to a rule.
#[derive(Debug, Clone, Copy)]
pub struct ResponseBook {
    /// Reply to a name declaration
    pub name_provided: &'static [&'static str],
    /// Reply to a recall request, filled with `{context}`
    pub memory_reference: &'static [&'static str],
    pub emotions: &'static [(Emotion, &'static [&'static str])],
    /// Used when nothing else applies; must not be empty.
    pub default: &'static [&'static str],
    /// Said when the session is interrupted
    pub interrupt_farewell: &'static str,
}

impl ResponseBook {
    pub fn emotion(&self, emotion: Emotion) -> &'static [&'static str] {
        self.emotions
            .iter()
            .find(|(e, _)| *e == emotion)
            .map(|(_, list)| *list)
            .unwrap_or(&[])
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.default.is_empty() {
            return Err(AppError::Config("Default response list is empty".to_string()));
        }

        let emotion_templates = self.emotions.iter().flat_map(|(_, list)| list.iter());
        self.name_provided
            .iter()
            .chain(self.memory_reference)
            .chain(emotion_templates)
            .chain(self.default)
            .chain(std::iter::once(&self.interrupt_farewell))
            .try_for_each(|template| validate_template(template))
    }
}
