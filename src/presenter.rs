//! Presenter - Image or Placeholder
//!
//! Each mounted instance owns its render state exclusively. A load failure
//! moves it to `Failed` for good; only a fresh mount starts over.

use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::rc::{Rc, Weak};
use tracing::{debug, info, trace};

use crate::sources::Reference;

pub const PLACEHOLDER_TITLE: &str = "Image not found";
pub const PLACEHOLDER_HINT: &str = "Place the file in /public and update the URL.";
const PUBLIC_DIR: &str = "/public";
pub const PLACEHOLDER_ASPECT_RATIO: [u32; 2] = [9, 19];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderState {
    #[default]
    Pending,
    Displaying,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Loading {
    Lazy,
}

impl Loading {
    pub fn as_str(self) -> &'static str {
        match self {
            Loading::Lazy => "lazy",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderOutput {
    Image {
        src: String,
        alt: String,
        loading: Loading,
    },
    Placeholder {
        aria_label: String,
        title: String,
        hint: String,
        aspect_ratio: [u32; 2],
    },
}

impl RenderOutput {
    pub fn placeholder(label: &str) -> Self {
        RenderOutput::Placeholder {
            aria_label: format!("Image missing: {}", label),
            title: PLACEHOLDER_TITLE.to_string(),
            hint: PLACEHOLDER_HINT.to_string(),
            aspect_ratio: PLACEHOLDER_ASPECT_RATIO,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, RenderOutput::Placeholder { .. })
    }

    /// HTML fragment for the rendering surface
    pub fn to_html(&self) -> String {
        match self {
            RenderOutput::Image { src, alt, loading } => format!(
                r#"<img class="smart-image" src="{}" alt="{}" loading="{}">"#,
                escape_html(src),
                escape_html(alt),
                loading.as_str()
            ),
            RenderOutput::Placeholder { aria_label, title, hint, aspect_ratio } => format!(
                concat!(
                    r#"<div class="smart-image-placeholder" role="img" aria-label="{}" style="aspect-ratio: {} / {}">"#,
                    r#"<div><p class="title">{}</p><p class="hint">{}</p></div></div>"#
                ),
                escape_html(aria_label),
                aspect_ratio[0],
                aspect_ratio[1],
                escape_html(title),
                escape_html(hint).replace(PUBLIC_DIR, &format!("<code>{}</code>", PUBLIC_DIR))
            ),
        }
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[derive(Debug, Default)]
struct InstanceState {
    state: Cell<RenderState>,
    needs_render: Cell<bool>,
}

/// One-shot load-failure detector handed to the rendering surface.
///
/// Holds only a weak link to its instance: once the instance is unmounted,
/// firing is a no-op.
#[derive(Debug, Clone)]
pub struct LoadFailure {
    instance: Weak<InstanceState>,
}

impl LoadFailure {
    pub fn fire(&self) {
        let Some(instance) = self.instance.upgrade() else {
            trace!("load failure for unmounted image ignored");
            return;
        };
        if instance.state.get() == RenderState::Failed {
            trace!("repeated load failure ignored");
            return;
        }
        instance.state.set(RenderState::Failed);
        instance.needs_render.set(true);
        info!("image failed to load, switching to placeholder");
    }

    pub fn is_mounted(&self) -> bool {
        self.instance.strong_count() > 0
    }
}

/// A mounted image instance
#[derive(Debug)]
pub struct SmartImage {
    reference: Option<Reference>,
    label: String,
    instance: Rc<InstanceState>,
    detector: Option<LoadFailure>,
}

impl SmartImage {
    /// Fresh instance, always `Pending`. An empty reference counts as absent.
    pub fn mount<R: AsRef<str>>(reference: Option<R>, label: impl Into<String>) -> Self {
        Self {
            reference: reference.and_then(|r| Reference::new(r.as_ref())),
            label: label.into(),
            instance: Rc::new(InstanceState::default()),
            detector: None,
        }
    }

    pub fn state(&self) -> RenderState {
        self.instance.state.get()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn reference(&self) -> Option<&Reference> {
        self.reference.as_ref()
    }

    /// Whether a state transition asked for a re-render since the last one
    pub fn needs_render(&self) -> bool {
        self.instance.needs_render.get()
    }

    pub fn render(&mut self) -> RenderOutput {
        self.instance.needs_render.set(false);

        let reference = match &self.reference {
            Some(reference) if self.state() != RenderState::Failed => reference,
            _ => return RenderOutput::placeholder(&self.label),
        };

        if self.state() == RenderState::Pending {
            self.instance.state.set(RenderState::Displaying);
        }
        if self.detector.is_none() {
            debug!(reference = %reference, "registering load failure detector");
            self.detector = Some(LoadFailure {
                instance: Rc::downgrade(&self.instance),
            });
        }

        RenderOutput::Image {
            src: reference.to_string(),
            alt: self.label.clone(),
            loading: Loading::Lazy,
        }
    }

    /// The detector registered by the first image render, if any
    pub fn load_failure(&self) -> Option<LoadFailure> {
        self.detector.clone()
    }

    /// Discard the instance. Outstanding detectors become no-ops.
    pub fn unmount(self) {
        debug!(label = %self.label, state = ?self.state(), "unmounting image");
    }
}
