use std::sync::Arc;

use log::{debug, error, info, warn};

use crate::errors::WikiError;
use crate::services::RenderService;
use crate::storage::{PageStore, StorageError};
use crate::types::{ApiMessage, Commit, ContentType, Document, PageBody, PageContent, PageRequest};
use crate::utils::{containing_directory, normalize_path};

/// Query value that asks for raw page source instead of rendered HTML
pub const NO_RENDER: &str = "no-render";

/// Orchestrates page reads and writes against a storage backend.
///
/// Holds no per-request state; concurrent writers to one key are not
/// serialized here, the backend is responsible for detecting conflicts.
pub struct PageService {
    store: Arc<dyn PageStore>,
    renderer: RenderService,
}

impl PageService {
    pub fn new(store: Arc<dyn PageStore>, renderer: RenderService) -> Self {
        Self { store, renderer }
    }

    /// Read a page, rendered unless `format=no-render` was requested
    pub fn get(&self, req: &PageRequest) -> Result<PageContent, WikiError> {
        let key = normalize_path(&req.path);
        debug!("Reading page '{}' as key '{}'", req.path, key);

        let document = self.store.read(&key).map_err(|e| match e {
            StorageError::NotFound(_) => {
                warn!("Page not found: '{}'", key);
                WikiError::NotFound("Not found".to_string())
            }
            other => internal(&key, other),
        })?;

        let title = document.title().map(str::to_string);

        if req.format.as_deref() == Some(NO_RENDER) {
            info!("Serving raw page: '{}'", key);
            return Ok(PageContent {
                title,
                content: document.content,
            });
        }

        if document.content_type == ContentType::Markdown {
            info!("Serving rendered page: '{}'", key);
            return Ok(PageContent {
                title,
                content: self.renderer.render(&document.content),
            });
        }

        warn!(
            "Refusing to render '{}' with content type {}",
            key,
            document.content_type.as_str()
        );
        Err(WikiError::MethodNotAllowed(
            "Content-type is not allowed here".to_string(),
        ))
    }

    /// Replace the content of an existing page
    pub fn update(&self, req: &PageRequest) -> Result<ApiMessage, WikiError> {
        let actor = require_actor(req)?;
        let key = normalize_path(&req.path);

        self.store.read(&key).map_err(|e| match e {
            StorageError::NotFound(_) => {
                warn!("Update of missing page: '{}'", key);
                WikiError::NotFound("Not found, use POST to create.".to_string())
            }
            other => internal(&key, other),
        })?;

        let body = parse_body(req)?;
        let commit = Commit {
            author: actor.to_string(),
            message: format!("Updated page: {}", key),
        };
        self.store
            .write(&key, &Document::markdown(body.content), &commit)
            .map_err(|e| internal(&key, e))?;

        info!("{} updated page '{}'", actor, key);
        Ok(ApiMessage::new("Updated page."))
    }

    /// Create a page that does not exist yet
    pub fn create(&self, req: &PageRequest) -> Result<ApiMessage, WikiError> {
        let actor = require_actor(req)?;
        let key = normalize_path(&req.path);

        if self.store.exists(&key) {
            warn!("Create of existing page: '{}'", key);
            return Err(WikiError::MethodNotAllowed(
                "Page already exists, use PUT to edit.".to_string(),
            ));
        }

        let body = parse_body(req)?;
        self.store
            .make_containing_directory(containing_directory(&key))
            .map_err(|e| internal(&key, e))?;

        let commit = Commit {
            author: actor.to_string(),
            message: format!("Created new page: {}", key),
        };
        self.store
            .write(&key, &Document::markdown(body.content), &commit)
            .map_err(|e| internal(&key, e))?;

        info!("{} created page '{}'", actor, key);
        Ok(ApiMessage::new("Created page."))
    }

    /// Render submitted content without touching storage
    pub fn preview(&self, req: &PageRequest) -> Result<PageContent, WikiError> {
        let body = parse_body(req)?;
        Ok(PageContent {
            title: None,
            content: self.renderer.render(&body.content),
        })
    }
}

fn require_actor(req: &PageRequest) -> Result<&str, WikiError> {
    match req.actor.as_deref() {
        Some(actor) if !actor.is_empty() => Ok(actor),
        _ => {
            warn!("Unauthenticated write attempt on '{}'", req.path);
            Err(WikiError::Unauthorized)
        }
    }
}

fn parse_body(req: &PageRequest) -> Result<PageBody, WikiError> {
    let raw = req.body.as_deref().ok_or_else(WikiError::wrong_api_usage)?;
    serde_json::from_str(raw).map_err(|e| {
        warn!("Malformed page body: {}", e);
        WikiError::wrong_api_usage()
    })
}

fn internal(key: &str, err: StorageError) -> WikiError {
    error!("Storage failure on '{}': {}", key, err);
    WikiError::Internal(err.to_string())
}
