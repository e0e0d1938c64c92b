use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::services::{PageService, RenderService};
use crate::storage::PageStore;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pages: Arc<PageService>,
    pub static_dir: Arc<PathBuf>,
    pub user_header: Arc<str>,
}

impl AppState {
    /// Wire a page service over `store` using the render and auth settings of `config`
    pub fn new(config: &Config, store: Arc<dyn PageStore>) -> Self {
        let renderer = RenderService::new(config.link_prefix.clone());
        Self {
            pages: Arc::new(PageService::new(store, renderer)),
            static_dir: config.static_dir.clone(),
            user_header: Arc::from(config.user_header.as_str()),
        }
    }
}

/// Content types a stored document may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentType {
    #[serde(rename = "text/markdown")]
    Markdown,
    #[serde(rename = "text/html")]
    Html,
    #[serde(rename = "text/plain")]
    Plain,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Markdown => "text/markdown",
            ContentType::Html => "text/html",
            ContentType::Plain => "text/plain",
        }
    }
}

/// A stored unit of wiki content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub content_type: ContentType,
    pub content: String,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl Document {
    /// Markdown document with no metadata
    pub fn markdown(content: impl Into<String>) -> Self {
        Self {
            content_type: ContentType::Markdown,
            content: content.into(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.metadata.insert("title".to_string(), title.into());
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.metadata.get("title").map(String::as_str)
    }
}

/// Attribution record attached to every write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub author: String,
    pub message: String,
}

/// An inbound page operation, independent of the HTTP framework
#[derive(Debug, Clone, Default)]
pub struct PageRequest {
    pub path: String,
    pub format: Option<String>,
    pub body: Option<String>,
    pub actor: Option<String>,
}

impl PageRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}

/// JSON body accepted by update, create and preview
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageBody {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub content: String,
}

/// Page payload returned by read and preview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: String,
}

/// Plain message payload used for confirmations and errors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMessage {
    pub message: String,
}

impl ApiMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
