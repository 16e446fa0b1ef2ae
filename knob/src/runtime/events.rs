use std::sync::mpsc;
use std::sync::mpsc::{Receiver, Sender};

use crate::render::Artifact;

#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceEvent {
    Displayed { slot: String, artifact: Artifact },
    Failed { slot: String, message: String },
}

impl SurfaceEvent {
    pub fn slot(&self) -> &str {
        match self {
            Self::Displayed { slot, .. } | Self::Failed { slot, .. } => slot,
        }
    }
}

pub type SurfaceEventSender = Sender<SurfaceEvent>;
pub type SurfaceEventReceiver = Receiver<SurfaceEvent>;

pub fn surface_channel() -> (SurfaceEventSender, SurfaceEventReceiver) {
    mpsc::channel()
}
