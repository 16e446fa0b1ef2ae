use crate::control::{ConfigError, ControlConfig, ControlRegistry};
use crate::framework::util::HashMap;

use super::dispatcher::Binding;
use super::render_fn::RenderFn;

pub struct SketchConfig {
    pub name: &'static str,
    pub display_name: &'static str,
    pub w: u32,
    pub h: u32,
}

pub trait Sketch {
    fn controls(&self) -> Result<Vec<ControlConfig>, ConfigError>;

    fn render_fn(&self) -> RenderFn;

    /// Binds every parameter to the control of the same name, skipping
    /// parameters that have no such control
    fn binding(&self, render_fn: &RenderFn, controls: &ControlRegistry) -> Binding {
        render_fn
            .params()
            .iter()
            .filter(|p| controls.has(p.name()))
            .fold(Binding::new(), |b, p| b.bind(p.name(), p.name()))
    }
}

type SketchFactory = Box<dyn Fn() -> Box<dyn Sketch> + 'static>;

pub struct SketchEntry {
    pub config: &'static SketchConfig,
    pub factory: SketchFactory,
}

impl SketchEntry {
    pub fn init(&self) -> Box<dyn Sketch> {
        (self.factory)()
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SketchCategory {
    pub title: String,
    pub enabled: bool,
    pub sketches: Vec<String>,
}

#[derive(Default)]
pub struct SketchRegistry {
    entries: HashMap<String, SketchEntry>,
    ordered_names: Vec<String>,
    categories: Vec<SketchCategory>,
}

impl SketchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(
        &mut self,
        config: &'static SketchConfig,
        factory: F,
    ) -> Result<(), String>
    where
        F: Fn() -> Box<dyn Sketch> + 'static,
    {
        let name = config.name.to_string();
        if self.entries.contains_key(&name) {
            return Err(format!("duplicate sketch registration: {}", name));
        }

        self.ordered_names.push(name.clone());
        self.entries.insert(
            name,
            SketchEntry {
                config,
                factory: Box::new(factory),
            },
        );

        Ok(())
    }

    pub fn define_category(
        &mut self,
        title: impl Into<String>,
        enabled: bool,
        sketches: Vec<String>,
    ) -> Result<(), String> {
        let title = title.into();

        for name in &sketches {
            if !self.entries.contains_key(name) {
                return Err(format!(
                    "category '{}' references unknown sketch '{}'",
                    title, name
                ));
            }
        }

        self.categories.push(SketchCategory {
            title,
            enabled,
            sketches,
        });

        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&SketchEntry> {
        self.entries.get(name)
    }

    /// Registration order
    pub fn sketch_names(&self) -> &[String] {
        &self.ordered_names
    }

    /// Sketches of enabled categories, in category order
    pub fn enabled_sketch_names(&self) -> Vec<&str> {
        self.categories
            .iter()
            .filter(|c| c.enabled)
            .flat_map(|c| c.sketches.iter().map(String::as_str))
            .collect()
    }

    pub fn first_sketch_name(&self) -> Option<&str> {
        self.ordered_names.first().map(String::as_str)
    }

    pub fn categories(&self) -> &[SketchCategory] {
        &self.categories
    }
}
