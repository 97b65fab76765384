//! Alexa request/response envelopes, reduced to the fields the skill uses.

use serde_json::{json, Map, Value};

use crate::SkillError;

pub const APL_INTERFACE: &str = "Alexa.Presentation.APL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestKind {
    Launch,
    Intent(String),
    SessionEnded { reason: Option<String> },
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillRequest {
    pub kind: RequestKind,
    /// The device can render APL documents.
    pub supports_display: bool,
}

impl SkillRequest {
    pub fn launch(supports_display: bool) -> Self {
        Self {
            kind: RequestKind::Launch,
            supports_display,
        }
    }

    pub fn intent(name: impl Into<String>, supports_display: bool) -> Self {
        Self {
            kind: RequestKind::Intent(name.into()),
            supports_display,
        }
    }

    pub fn from_envelope(envelope: &Value) -> Result<Self, SkillError> {
        let request = envelope
            .get("request")
            .ok_or_else(|| SkillError::Envelope("missing `request`".to_string()))?;
        let request_type = request
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| SkillError::Envelope("missing `request.type`".to_string()))?;

        let kind = match request_type {
            "LaunchRequest" => RequestKind::Launch,
            "IntentRequest" => {
                let name = request
                    .pointer("/intent/name")
                    .and_then(Value::as_str)
                    .ok_or_else(|| {
                        SkillError::Envelope("missing `request.intent.name`".to_string())
                    })?;
                RequestKind::Intent(name.to_string())
            }
            "SessionEndedRequest" => RequestKind::SessionEnded {
                reason: request
                    .get("reason")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            },
            other => RequestKind::Other(other.to_string()),
        };

        let supports_display = envelope
            .pointer("/context/System/device/supportedInterfaces")
            .and_then(|interfaces| interfaces.get(APL_INTERFACE))
            .is_some();

        Ok(Self {
            kind,
            supports_display,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillResponse {
    pub speech: Option<String>,
    pub reprompt: Option<String>,
    pub directive: Option<Value>,
    pub keep_session_open: bool,
}

impl SkillResponse {
    /// Speak and close the session.
    pub fn tell(speech: impl Into<String>) -> Self {
        Self {
            speech: Some(speech.into()),
            ..Self::default()
        }
    }

    /// Speak, reprompt and keep listening.
    pub fn ask(speech: impl Into<String>, reprompt: impl Into<String>) -> Self {
        Self {
            speech: Some(speech.into()),
            reprompt: Some(reprompt.into()),
            directive: None,
            keep_session_open: true,
        }
    }

    pub fn with_directive(mut self, directive: Value) -> Self {
        self.directive = Some(directive);
        self
    }

    pub fn to_envelope(&self) -> Value {
        let mut response = Map::new();
        if let Some(speech) = &self.speech {
            response.insert("outputSpeech".to_string(), plain_text(speech));
        }
        if let Some(reprompt) = &self.reprompt {
            response.insert(
                "reprompt".to_string(),
                json!({ "outputSpeech": plain_text(reprompt) }),
            );
        }
        if let Some(directive) = &self.directive {
            response.insert("directives".to_string(), json!([directive]));
        }
        response.insert(
            "shouldEndSession".to_string(),
            Value::Bool(!self.keep_session_open),
        );

        json!({
            "version": "1.0",
            "response": response,
        })
    }
}

fn plain_text(text: &str) -> Value {
    json!({ "type": "PlainText", "text": text })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_intent_and_display_support() {
        let envelope = json!({
            "version": "1.0",
            "context": {
                "System": {
                    "device": {
                        "supportedInterfaces": { "Alexa.Presentation.APL": { "runtime": { "maxVersion": "2024.2" } } }
                    }
                }
            },
            "request": {
                "type": "IntentRequest",
                "intent": { "name": "DisplayGraphIntent" }
            }
        });

        let request = SkillRequest::from_envelope(&envelope).unwrap();
        assert_eq!(request, SkillRequest::intent("DisplayGraphIntent", true));
    }

    #[test]
    fn voice_only_devices_do_not_support_display() {
        let envelope = json!({
            "context": { "System": { "device": { "supportedInterfaces": {} } } },
            "request": { "type": "LaunchRequest" }
        });
        assert_eq!(
            SkillRequest::from_envelope(&envelope).unwrap(),
            SkillRequest::launch(false)
        );
    }

    #[test]
    fn session_end_keeps_reason() {
        let envelope = json!({
            "request": { "type": "SessionEndedRequest", "reason": "USER_INITIATED" }
        });
        let request = SkillRequest::from_envelope(&envelope).unwrap();
        assert_eq!(
            request.kind,
            RequestKind::SessionEnded {
                reason: Some("USER_INITIATED".to_string())
            }
        );
    }

    #[test]
    fn rejects_envelope_without_request() {
        assert!(SkillRequest::from_envelope(&json!({ "version": "1.0" })).is_err());
        assert!(SkillRequest::from_envelope(&json!({ "request": { "type": "IntentRequest" } }))
            .is_err());
    }

    #[test]
    fn writes_response_envelope() {
        let envelope = SkillResponse::ask("How can I help?", "Say show my glucose.")
            .with_directive(json!({ "type": "Alexa.Presentation.APL.RenderDocument" }))
            .to_envelope();

        assert_eq!(envelope["version"], "1.0");
        assert_eq!(envelope["response"]["outputSpeech"]["type"], "PlainText");
        assert_eq!(envelope["response"]["outputSpeech"]["text"], "How can I help?");
        assert_eq!(
            envelope["response"]["reprompt"]["outputSpeech"]["text"],
            "Say show my glucose."
        );
        assert_eq!(envelope["response"]["directives"].as_array().unwrap().len(), 1);
        assert_eq!(envelope["response"]["shouldEndSession"], false);
    }

    #[test]
    fn empty_response_only_ends_session() {
        let envelope = SkillResponse::default().to_envelope();
        assert_eq!(envelope["response"], json!({ "shouldEndSession": true }));
    }
}
