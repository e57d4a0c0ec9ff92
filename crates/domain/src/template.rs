use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Variables handed to the renderer, keyed by placeholder name.
pub type TemplateData = HashMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateCategory {
    Transactional,
    Digest,
    Marketing,
}

impl TemplateCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transactional => "transactional",
            Self::Digest => "digest",
            Self::Marketing => "marketing",
        }
    }
}

#[derive(Error, Debug)]
#[error("Invalid template category: {0}")]
pub struct InvalidCategoryError(String);

impl std::str::FromStr for TemplateCategory {
    type Err = InvalidCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "transactional" => Ok(Self::Transactional),
            "digest" => Ok(Self::Digest),
            "marketing" => Ok(Self::Marketing),
            _ => Err(InvalidCategoryError(s.to_string())),
        }
    }
}

/// Subject line plus HTML and plain-text bodies, ready for delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
    pub text: String,
}

#[derive(Error, Debug, PartialEq)]
pub enum RenderError {
    #[error("Template payload is missing variables: {0:?}")]
    MissingVariables(Vec<String>),
}

/// An email template with `{{name}}` placeholders. `variables` declares the
/// names a payload must provide and must cover every placeholder the bodies
/// use. Rendering is pure: the same template and data always produce the
/// same output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailTemplate {
    pub id: ID,
    pub name: String,
    pub category: TemplateCategory,
    pub version: i64,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
    pub variables: Vec<String>,
}

impl EmailTemplate {
    pub fn new(name: &str, category: TemplateCategory) -> Self {
        Self {
            id: Default::default(),
            name: name.to_string(),
            category,
            version: 1,
            subject: String::new(),
            html_body: String::new(),
            text_body: String::new(),
            variables: Vec::new(),
        }
    }

    /// Placeholder names referenced by the subject or either body, in first
    /// occurrence order without duplicates.
    pub fn placeholders(&self) -> Vec<String> {
        let mut names = Vec::new();
        for source in &[&self.subject, &self.html_body, &self.text_body] {
            for name in extract_placeholders(source.as_str()) {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Placeholders used by the bodies but absent from the declared
    /// `variables` list. Non-empty means the template is invalid.
    pub fn undeclared_placeholders(&self) -> Vec<String> {
        self.placeholders()
            .into_iter()
            .filter(|name| !self.variables.contains(name))
            .collect()
    }

    /// Declared variables absent from the payload, reported before any
    /// rendering happens.
    pub fn missing_variables(&self, data: &TemplateData) -> Vec<String> {
        self.variables
            .iter()
            .filter(|name| !data.contains_key(*name))
            .cloned()
            .collect()
    }

    pub fn render(&self, data: &TemplateData) -> Result<RenderedEmail, RenderError> {
        let missing = self.missing_variables(data);
        if !missing.is_empty() {
            return Err(RenderError::MissingVariables(missing));
        }
        Ok(RenderedEmail {
            subject: substitute(&self.subject, data),
            html: substitute(&self.html_body, data),
            text: substitute(&self.text_body, data),
        })
    }
}

impl Entity for EmailTemplate {
    fn id(&self) -> &ID {
        &self.id
    }
}

fn extract_placeholders(source: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut rest = source;
    while let Some(start) = rest.find("{{") {
        rest = &rest[start + 2..];
        match rest.find("}}") {
            Some(end) => {
                let name = rest[..end].trim();
                if !name.is_empty() {
                    names.push(name.to_string());
                }
                rest = &rest[end + 2..];
            }
            None => break,
        }
    }
    names
}

fn substitute(source: &str, data: &TemplateData) -> String {
    let mut out = source.to_string();
    for (name, value) in data {
        out = out.replace(&format!("{{{{{}}}}}", name), value);
        // Tolerate a single space of padding inside the braces.
        out = out.replace(&format!("{{{{ {} }}}}", name), value);
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;

    fn template() -> EmailTemplate {
        EmailTemplate {
            id: Default::default(),
            name: "event-goes-live".into(),
            category: TemplateCategory::Transactional,
            version: 1,
            subject: "{{event_name}} is starting now".into(),
            html_body: "<p>Hi {{user_name}}, {{event_name}} starts at {{start_time}}. Join at {{venue}}.</p>".into(),
            text_body: "Hi {{user_name}}, {{event_name}} starts at {{start_time}}. Join at {{venue}}.".into(),
            variables: vec![
                "event_name".into(),
                "user_name".into(),
                "start_time".into(),
                "venue".into(),
            ],
        }
    }

    fn data() -> TemplateData {
        vec![
            ("event_name", "Rust Meetup"),
            ("user_name", "Ana"),
            ("start_time", "2023-11-15T18:00:00+00:00"),
            ("venue", "Oslo"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn extracts_placeholders_in_order() {
        let template = template();
        assert_eq!(
            template.placeholders(),
            vec!["event_name", "user_name", "start_time", "venue"]
        );
    }

    #[test]
    fn detects_undeclared_placeholders() {
        let mut template = template();
        template.variables = vec!["event_name".into(), "user_name".into()];
        assert_eq!(
            template.undeclared_placeholders(),
            vec!["start_time".to_string(), "venue".to_string()]
        );
    }

    #[test]
    fn reports_all_missing_variables() {
        let template = template();
        let mut data = data();
        data.remove("venue");
        data.remove("start_time");

        let err = template.render(&data).unwrap_err();
        assert_eq!(
            err,
            RenderError::MissingVariables(vec!["start_time".into(), "venue".into()])
        );
    }

    #[test]
    fn renders_subject_and_both_bodies() {
        let rendered = template().render(&data()).expect("To render");
        assert_eq!(rendered.subject, "Rust Meetup is starting now");
        assert!(rendered.html.contains("Hi Ana, Rust Meetup starts at"));
        assert!(rendered.text.contains("Join at Oslo"));
        assert!(!rendered.html.contains("{{"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let template = template();
        let data = data();
        assert_eq!(template.render(&data), template.render(&data));
    }
}
