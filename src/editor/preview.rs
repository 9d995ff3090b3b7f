use crate::api::PreviewBackend;
use crate::error::PageError;
use crate::page::{field_selector, Page, FIELD_CSRF, FIELD_DESC, FIELD_TITLE};
use crate::util::RequestSeq;
use leptos::logging::error;
use std::rc::Rc;

pub(crate) const PREVIEW_LOADING: &str = "Loading...";
pub(crate) const PREVIEW_FAILED: &str = "Error loading preview";
pub(crate) const PREVIEW_UNAVAILABLE: &str = "Preview error";

/// Where the preview request body comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum PreviewSource {
    /// `csrf`, `title` and the editor text.
    Fields,
    /// Every control of the form with this id.
    Form(String),
}

/// Target of an asynchronous preview.
pub(crate) trait PreviewPane {
    fn set_html(&self, html: &str);
}

impl PreviewPane for web_sys::Element {
    fn set_html(&self, html: &str) {
        self.set_inner_html(html);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PreviewOutcome {
    Rendered,
    Failed,
    /// A newer render started before this response arrived.
    Stale,
}

/// Server-side markdown preview.
pub(crate) struct PreviewRenderer<B, P> {
    backend: Rc<B>,
    page: Rc<P>,
    source: PreviewSource,
    seq: RequestSeq,
}

impl<B: PreviewBackend + 'static, P: Page> PreviewRenderer<B, P> {
    pub fn new(backend: Rc<B>, page: Rc<P>, source: PreviewSource) -> Self {
        Self {
            backend,
            page,
            source,
            seq: RequestSeq::default(),
        }
    }

    pub fn source(&self) -> &PreviewSource {
        &self.source
    }

    /// Request body for `plain_text`, with `desc` always set to the editor text.
    pub fn request_fields(&self, plain_text: &str) -> Result<Vec<(String, String)>, PageError> {
        match &self.source {
            PreviewSource::Fields => {
                let mut fields = Vec::with_capacity(3);
                for name in [FIELD_CSRF, FIELD_TITLE] {
                    let value = self
                        .page
                        .field(name)
                        .ok_or_else(|| PageError::missing(field_selector(name)))?;
                    fields.push((name.to_string(), value));
                }
                fields.push((FIELD_DESC.to_string(), plain_text.to_string()));
                Ok(fields)
            }
            PreviewSource::Form(id) => {
                let mut fields = self
                    .page
                    .form_fields(id)
                    .ok_or_else(|| PageError::missing(format!("#{id}")))?;
                match fields.iter_mut().find(|(k, _)| k == FIELD_DESC) {
                    Some((_, v)) => *v = plain_text.to_string(),
                    None => fields.push((FIELD_DESC.to_string(), plain_text.to_string())),
                }
                Ok(fields)
            }
        }
    }

    /// Start rendering `plain_text` into `pane`.
    ///
    /// Returns the placeholder to show until the response arrives.
    pub fn render(&self, plain_text: &str, pane: Rc<dyn PreviewPane>) -> &'static str {
        let fields = match self.request_fields(plain_text) {
            Ok(fields) => fields,
            Err(e) => {
                error!("Preview error: {e}");
                return PREVIEW_UNAVAILABLE;
            }
        };

        let backend = self.backend.clone();
        let seq = self.seq.clone();
        let ticket = seq.next();
        leptos::task::spawn_local(async move {
            load_preview(backend.as_ref(), &seq, ticket, &fields, pane.as_ref()).await;
        });
        PREVIEW_LOADING
    }
}

/// Fetch one preview and apply it unless a newer request superseded it.
pub(crate) async fn load_preview<B: PreviewBackend>(
    backend: &B,
    seq: &RequestSeq,
    ticket: u64,
    fields: &[(String, String)],
    pane: &dyn PreviewPane,
) -> PreviewOutcome {
    let result = backend.render_preview(fields).await;
    if !seq.is_latest(ticket) {
        return PreviewOutcome::Stale;
    }

    match result {
        Ok(html) => {
            pane.set_html(&html);
            PreviewOutcome::Rendered
        }
        Err(e) => {
            error!("Preview error ({}): {e}", e.kind);
            pane.set_html(PREVIEW_FAILED);
            PreviewOutcome::Failed
        }
    }
}
