use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Update channel a client is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Testing,
    Release,
}

impl Channel {
    pub fn url(self) -> &'static str {
        match self {
            Channel::Testing => "/testing",
            Channel::Release => "/release",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChannelResponse {
    /// `/testing` or `/release`
    #[schema(example = "/release")]
    pub url: String,
}

impl From<Channel> for ChannelResponse {
    fn from(channel: Channel) -> Self {
        Self {
            url: channel.url().to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ChannelQuery {
    /// Client module name, e.g. `insights-core`
    pub module: Option<String>,
}

impl ChannelQuery {
    /// The module name, if present and non-empty.
    pub fn module(&self) -> Option<&str> {
        self.module.as_deref().filter(|m| !m.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_urls() {
        assert_eq!(Channel::Testing.url(), "/testing");
        assert_eq!(Channel::Release.url(), "/release");
    }

    #[test]
    fn test_response_serializes_url() {
        let body = serde_json::to_string(&ChannelResponse::from(Channel::Testing)).unwrap();
        assert_eq!(body, r#"{"url":"/testing"}"#);
    }

    #[test]
    fn test_empty_module_is_missing() {
        let query = ChannelQuery {
            module: Some(String::new()),
        };
        assert_eq!(query.module(), None);
        assert_eq!(ChannelQuery::default().module(), None);
    }
}
