use askama::Template;

use crate::cfp::types::{TOPICS, TalkLength, TalkLevel, ValidationErrors};
use crate::config::AppConfig;

/// Common context shared by all public pages.
pub struct PageContext {
    pub app_name: String,
    pub current_path: String,
}

impl PageContext {
    pub fn build(config: &AppConfig, current_path: &str) -> Self {
        Self {
            app_name: config.app_name.clone(),
            current_path: current_path.to_string(),
        }
    }
}

/// One `<option>` or radio button.
pub struct ChoiceOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

#[derive(Template)]
#[template(path = "cfp.html")]
pub struct CfpTemplate {
    pub ctx: PageContext,
    pub submit_endpoint: String,
    pub contact_email: String,
    pub talk_lengths: Vec<ChoiceOption>,
    pub talk_levels: Vec<ChoiceOption>,
    pub topics: Vec<&'static str>,
}

impl CfpTemplate {
    pub fn new(config: &AppConfig, submit_endpoint: &str) -> Self {
        let talk_lengths = TalkLength::ALL
            .into_iter()
            .map(|len| ChoiceOption {
                value: len.as_str(),
                label: len.label(),
                selected: len == TalkLength::default(),
            })
            .collect();
        let talk_levels = TalkLevel::ALL
            .into_iter()
            .map(|level| ChoiceOption {
                value: level.as_str(),
                label: level.label(),
                selected: level == TalkLevel::default(),
            })
            .collect();
        Self {
            ctx: PageContext::build(config, "/cfp"),
            submit_endpoint: submit_endpoint.to_string(),
            contact_email: config.contact_email.clone(),
            talk_lengths,
            talk_levels,
            topics: TOPICS.to_vec(),
        }
    }
}

pub struct FieldMessage {
    pub label: &'static str,
    pub message: String,
}

/// Answer page for a browser that posted the CFP form directly.
#[derive(Template)]
#[template(path = "cfp_result.html")]
pub struct CfpResultTemplate {
    pub ctx: PageContext,
    pub submission_id: Option<String>,
    pub message: String,
    pub field_errors: Vec<FieldMessage>,
    pub contact_email: String,
}

impl CfpResultTemplate {
    pub fn accepted(config: &AppConfig, submission_id: String) -> Self {
        Self {
            ctx: PageContext::build(config, "/cfp"),
            submission_id: Some(submission_id),
            message: "Your talk proposal has been received.".to_string(),
            field_errors: Vec::new(),
            contact_email: config.contact_email.clone(),
        }
    }

    pub fn rejected(config: &AppConfig, message: &str, errors: &ValidationErrors) -> Self {
        let field_errors = errors
            .iter()
            .map(|(field, message)| FieldMessage { label: field.label(), message: message.to_string() })
            .collect();
        Self {
            ctx: PageContext::build(config, "/cfp"),
            submission_id: None,
            message: message.to_string(),
            field_errors,
            contact_email: config.contact_email.clone(),
        }
    }
}
