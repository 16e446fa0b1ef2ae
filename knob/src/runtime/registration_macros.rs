/// Builds a [`crate::runtime::registry::SketchRegistry`] from sketch modules,
/// each exposing `SKETCH_CONFIG` and `init()`.
///
/// ```rust
/// let registry = knob::register_sketches! {
///     {
///         title: "Shapes",
///         enabled: true,
///         sketches: [square, ellipse]
///     },
/// }?;
/// ```
#[macro_export]
macro_rules! register_sketches {
    (
        $(
            {
                title: $title:expr,
                enabled: $enabled:expr,
                sketches: [$($module:ident),* $(,)?]
            }
        ),+ $(,)?
    ) => {{
        (|| -> Result<$crate::runtime::registry::SketchRegistry, String> {
            let mut __registry =
                $crate::runtime::registry::SketchRegistry::new();

            $(
                let mut __category_sketches = Vec::new();
                $(
                    __registry.register(
                        &$module::SKETCH_CONFIG,
                        || Box::new($module::init()),
                    )?;
                    __category_sketches
                        .push($module::SKETCH_CONFIG.name.to_string());
                )*

                __registry.define_category(
                    $title,
                    $enabled,
                    __category_sketches,
                )?;
            )+

            Ok(__registry)
        })()
    }};
}
