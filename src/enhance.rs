//! Text-enhancement collaborator contract
//!
//! Rewriting the description and additional information is delegated to an
//! external text-generation backend. This module owns what the rest of the
//! crate relies on: provider selection, credential validation and strict
//! parsing of the returned content. Talking to the backend is the job of a
//! [`TextEnhancer`] implementation supplied by the caller.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::record::PosterRecord;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provider {
    #[serde(rename = "openai")]
    OpenAi,
    #[serde(rename = "gemini")]
    Gemini,
}

impl Provider {
    /// Environment variable holding the API key.
    pub fn env_key(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OPENAI_API_KEY",
            Provider::Gemini => "GEMINI_API_KEY",
        }
    }

    fn placeholder_key(&self) -> &'static str {
        match self {
            Provider::OpenAi => "your_openai_api_key_here",
            Provider::Gemini => "your_gemini_api_key_here",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::OpenAi => f.write_str("OpenAI"),
            Provider::Gemini => f.write_str("Gemini"),
        }
    }
}

impl FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAi),
            "gemini" => Ok(Provider::Gemini),
            other => Err(Error::UpstreamConfigurationError(format!(
                "Unknown enhancement provider \"{}\"",
                other
            ))),
        }
    }
}

/// A validated API key for one provider
#[derive(Clone)]
pub struct Credentials {
    pub provider: Provider,
    key: String,
}

impl Credentials {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("provider", &self.provider)
            .field("key", &"<redacted>")
            .finish()
    }
}

/// Reads the key for `provider` through `lookup`, rejecting unset, blank and
/// template placeholder values.
pub fn credentials<F>(provider: Provider, lookup: F) -> Result<Credentials>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(provider.env_key()) {
        Some(key) if !key.trim().is_empty() && key.trim() != provider.placeholder_key() => Ok(Credentials {
            provider,
            key: key.trim().to_string(),
        }),
        _ => Err(Error::UpstreamConfigurationError(format!(
            "Please configure your {} API key ({})",
            provider,
            provider.env_key()
        ))),
    }
}

/// Credentials from the process environment.
pub fn credentials_from_env(provider: Provider) -> Result<Credentials> {
    credentials(provider, |key| std::env::var(key).ok())
}

/// What is sent to the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhanceRequest {
    pub description: String,
    pub additional_info: String,
    pub provider: Provider,
}

impl EnhanceRequest {
    pub fn from_record(record: &PosterRecord, provider: Provider) -> Self {
        Self {
            description: record.description.clone().unwrap_or_default(),
            additional_info: record.additional_info.clone().unwrap_or_default(),
            provider,
        }
    }
}

/// What the backend must answer: exactly these two string fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EnhanceResponse {
    pub description: String,
    pub additional_info: String,
}

impl EnhanceResponse {
    /// The record with both enhanced fields replaced.
    pub fn apply(&self, record: &PosterRecord) -> PosterRecord {
        PosterRecord {
            description: Some(self.description.clone()),
            additional_info: Some(self.additional_info.clone()),
            ..record.clone()
        }
    }
}

/// Parses raw backend content, tolerating a surrounding Markdown code fence.
pub fn parse_response(raw: &str) -> Result<EnhanceResponse> {
    let body = raw
        .replace("```json\n", "")
        .replace("```json", "")
        .replace("```\n", "")
        .replace("```", "");
    serde_json::from_str(body.trim()).map_err(|e| Error::UpstreamResponseMalformed(e.to_string()))
}

/// A text-generation backend
pub trait TextEnhancer {
    /// Sends `request` and returns the raw content of the answer.
    fn complete(&self, credentials: &Credentials, request: &EnhanceRequest) -> Result<String>;
}

/// Runs one enhancement round for `record`.
pub fn enhance(
    record: &PosterRecord,
    credentials: &Credentials,
    enhancer: &dyn TextEnhancer,
) -> Result<PosterRecord> {
    let request = EnhanceRequest::from_record(record, credentials.provider);
    let raw = enhancer.complete(credentials, &request)?;
    let response = parse_response(&raw)?;
    log::debug!("applied {} enhancement", credentials.provider);
    Ok(response.apply(record))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(value: Option<&'static str>) -> impl Fn(&str) -> Option<String> {
        move |_: &str| value.map(str::to_string)
    }

    #[test]
    fn missing_or_placeholder_keys_are_configuration_errors() {
        for value in [None, Some(""), Some("   "), Some("your_openai_api_key_here")] {
            let err = credentials(Provider::OpenAi, lookup(value)).unwrap_err();
            assert!(matches!(err, Error::UpstreamConfigurationError(_)), "{:?}", value);
            assert!(err.user_message().contains("OPENAI_API_KEY"));
        }
        let creds = credentials(Provider::Gemini, lookup(Some("abc123"))).unwrap();
        assert_eq!(creds.key(), "abc123");
        assert!(!format!("{:?}", creds).contains("abc123"));
    }

    #[test]
    fn fenced_json_is_accepted() {
        let raw = "```json\n{\"description\":\"New\",\"additionalInfo\":\"More\"}\n```";
        let resp = parse_response(raw).unwrap();
        assert_eq!(resp.description, "New");
        assert_eq!(resp.additional_info, "More");
    }

    #[test]
    fn non_conforming_content_is_malformed() {
        for raw in [
            "not json",
            r#"{"description":"x"}"#,
            r#"{"description":1,"additionalInfo":"y"}"#,
            r#"{"description":"x","additionalInfo":"y","extra":true}"#,
        ] {
            assert!(
                matches!(parse_response(raw), Err(Error::UpstreamResponseMalformed(_))),
                "{}",
                raw
            );
        }
    }

    #[test]
    fn provider_parsing_and_serde() {
        assert_eq!("OpenAI".parse::<Provider>().unwrap(), Provider::OpenAi);
        assert_eq!("gemini".parse::<Provider>().unwrap(), Provider::Gemini);
        assert!("claude".parse::<Provider>().is_err());
        let req = EnhanceRequest::from_record(&PosterRecord::default(), Provider::OpenAi);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["provider"], "openai");
        assert_eq!(json["additionalInfo"], "");
    }

    struct Canned(&'static str);

    impl TextEnhancer for Canned {
        fn complete(&self, _: &Credentials, request: &EnhanceRequest) -> Result<String> {
            assert_eq!(request.provider, Provider::Gemini);
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn enhance_replaces_both_fields_only() {
        let record = PosterRecord::seed();
        let creds = credentials(Provider::Gemini, lookup(Some("k"))).unwrap();
        let canned = Canned(r#"{"description":"Better","additionalInfo":"Sharper"}"#);
        let next = enhance(&record, &creds, &canned).unwrap();
        assert_eq!(next.description.as_deref(), Some("Better"));
        assert_eq!(next.additional_info.as_deref(), Some("Sharper"));
        assert_eq!(next.title, record.title);
    }
}
