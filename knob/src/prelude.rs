#[allow(unused_imports)]
pub use crate::control::*;
pub use crate::framework::prelude::*;
pub use crate::register_sketches;
pub use crate::render::svg::to_svg;
pub use crate::render::{Artifact, Page, Scene, Shape, Style};
pub use crate::runtime::app::{SessionError, SketchSession, parse_assignment};
pub use crate::runtime::dispatcher::{
    Binding, DispatchError, HandleId, HandleStats, RenderDispatcher,
};
pub use crate::runtime::events::{
    SurfaceEvent, SurfaceEventReceiver, SurfaceEventSender, surface_channel,
};
pub use crate::runtime::interact::{Interactive, interact};
pub use crate::runtime::registry::{
    Sketch, SketchCategory, SketchConfig, SketchRegistry,
};
pub use crate::runtime::render_fn::{
    Args, ParamSpec, RenderError, RenderFn, ValueTransform,
};
pub use crate::runtime::surface::{
    ChannelSurface, FileSurface, MemorySurface, OutputSurface, SharedSurface,
    SlotContent, default_output_dir,
};
