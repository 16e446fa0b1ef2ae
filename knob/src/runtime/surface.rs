//! Where artifacts end up. A surface is a set of named display slots; showing
//! something in a slot replaces whatever was there.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use chrono::Local;
use directories_next::{BaseDirs, UserDirs};
use indexmap::IndexMap;
use log::{debug, error, warn};

use super::events::{SurfaceEvent, SurfaceEventSender};
use super::render_fn::RenderError;
use crate::render::Artifact;

pub trait OutputSurface {
    fn display(&mut self, slot: &str, artifact: Artifact);
    fn display_error(&mut self, slot: &str, error: &RenderError);
}

pub type SharedSurface = Rc<RefCell<dyn OutputSurface>>;

#[derive(Clone, Debug, PartialEq)]
pub enum SlotContent {
    Artifact(Artifact),
    Error(String),
}

/// Keeps the latest content of each slot in memory
#[derive(Debug, Default)]
pub struct MemorySurface {
    slots: IndexMap<String, SlotContent>,
    display_count: usize,
    error_count: usize,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn content(&self, slot: &str) -> Option<&SlotContent> {
        self.slots.get(slot)
    }

    pub fn artifact(&self, slot: &str) -> Option<&Artifact> {
        match self.slots.get(slot) {
            Some(SlotContent::Artifact(artifact)) => Some(artifact),
            _ => None,
        }
    }

    pub fn error(&self, slot: &str) -> Option<&str> {
        match self.slots.get(slot) {
            Some(SlotContent::Error(message)) => Some(message),
            _ => None,
        }
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Total artifacts ever displayed, across slots
    pub fn display_count(&self) -> usize {
        self.display_count
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }
}

impl OutputSurface for MemorySurface {
    fn display(&mut self, slot: &str, artifact: Artifact) {
        self.display_count += 1;
        self.slots
            .insert(slot.to_string(), SlotContent::Artifact(artifact));
    }

    fn display_error(&mut self, slot: &str, error: &RenderError) {
        self.error_count += 1;
        self.slots
            .insert(slot.to_string(), SlotContent::Error(error.to_string()));
    }
}

/// Forwards everything as [`SurfaceEvent`]s
pub struct ChannelSurface {
    sender: SurfaceEventSender,
}

impl ChannelSurface {
    pub fn new(sender: SurfaceEventSender) -> Self {
        Self { sender }
    }

    fn send(&self, event: SurfaceEvent) {
        if self.sender.send(event).is_err() {
            warn!("Surface event receiver dropped");
        }
    }
}

impl OutputSurface for ChannelSurface {
    fn display(&mut self, slot: &str, artifact: Artifact) {
        self.send(SurfaceEvent::Displayed {
            slot: slot.to_string(),
            artifact,
        });
    }

    fn display_error(&mut self, slot: &str, error: &RenderError) {
        self.send(SurfaceEvent::Failed {
            slot: slot.to_string(),
            message: error.to_string(),
        });
    }
}

/// Writes `<dir>/<slot>.svg`, overwriting the previous render of that slot.
/// With `keep_history` every render is also saved under a timestamped name.
#[derive(Debug)]
pub struct FileSurface {
    dir: PathBuf,
    keep_history: bool,
    written: Vec<PathBuf>,
    last_error: Option<String>,
}

impl FileSurface {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            keep_history: false,
            written: vec![],
            last_error: None,
        }
    }

    pub fn keep_history(mut self, keep_history: bool) -> Self {
        self.keep_history = keep_history;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn slot_path(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{}.svg", slot))
    }

    /// Every file written so far, in order
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn write(&mut self, path: PathBuf, markup: &str) {
        let result = fs::create_dir_all(&self.dir)
            .and_then(|_| fs::write(&path, markup));

        match result {
            Ok(()) => {
                debug!("Wrote {}", path.display());
                self.written.push(path);
            }
            Err(e) => {
                error!("Failed to write {}: {}", path.display(), e);
                self.last_error = Some(e.to_string());
            }
        }
    }
}

impl OutputSurface for FileSurface {
    fn display(&mut self, slot: &str, artifact: Artifact) {
        self.last_error = None;
        self.write(self.slot_path(slot), artifact.markup());

        if self.keep_history {
            let stamp = Local::now().format("%Y%m%d-%H%M%S");
            let path = self.dir.join(format!(
                "{}-{}-{:04}.svg",
                slot,
                stamp,
                artifact.sequence()
            ));
            self.write(path, artifact.markup());
        }
    }

    fn display_error(&mut self, slot: &str, error: &RenderError) {
        error!("[{}] {}", slot, error);
        self.last_error = Some(error.to_string());
    }
}

/// `~/Pictures/Knob` where the platform has a pictures dir, `~/Knob/Images`
/// otherwise
pub fn default_output_dir() -> PathBuf {
    let primary_path = UserDirs::new().and_then(|ud| {
        ud.picture_dir().map(|p| p.to_path_buf().join("Knob"))
    });

    let fallback_path = BaseDirs::new()
        .map(|bd| bd.home_dir().to_path_buf().join("Knob").join("Images"));

    primary_path
        .or(fallback_path)
        .unwrap_or_else(|| PathBuf::from("knob-output"))
}
