use indexmap::IndexMap;
use serde::Serialize;
use serde_json::json;

use super::scene::Scene;
use super::svg::to_svg;
use crate::control::ControlValue;

/// The immutable output of one render invocation: the scene, its SVG markup
/// and the arguments it was rendered with.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Artifact {
    render_fn: String,
    sequence: u64,
    tags: IndexMap<String, ControlValue>,
    #[serde(skip)]
    scene: Scene,
    markup: String,
}

impl Artifact {
    pub fn new(
        render_fn: &str,
        sequence: u64,
        tags: IndexMap<String, ControlValue>,
        scene: Scene,
    ) -> Self {
        let markup = to_svg(&scene);
        Self {
            render_fn: render_fn.to_string(),
            sequence,
            tags,
            scene,
            markup,
        }
    }

    pub fn render_fn(&self) -> &str {
        &self.render_fn
    }

    /// Position of the invocation that produced this artifact among all
    /// invocations of its handle, starting at 1
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn tag(&self, name: &str) -> Option<&ControlValue> {
        self.tags.get(name)
    }

    pub fn tags(&self) -> &IndexMap<String, ControlValue> {
        &self.tags
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Everything but the markup
    pub fn summary(&self) -> serde_json::Value {
        json!({
            "render_fn": self.render_fn,
            "sequence": self.sequence,
            "tags": self.tags,
        })
    }
}
