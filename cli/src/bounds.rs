use crate::commands::BoundsCmd;
use crate::scene;
use crate::tessellate::TessError;
use scrawl::math::Bounds;
use scrawl::tessellation::shape_kind;
use std::io::Write;

pub fn bounds(mut cmd: BoundsCmd) -> Result<(), TessError> {
    let primitives = scene::parse_scene(&cmd.input)?;

    let mut accumulated = Bounds::empty();
    let mut max_thickness = 0.0f32;
    for primitive in &primitives {
        let kind = shape_kind(primitive.kind).expect("validated at parse time");
        let thickness = (kind.add_to_bounds)(&mut accumulated, &primitive.params);
        max_thickness = max_thickness.max(thickness);
    }

    if accumulated.is_empty() {
        writeln!(&mut *cmd.output, "bounds: empty")?;
        return Ok(());
    }
    // The catalog reports unthickened extents; pad by the stroke.
    let padded = accumulated.expanded(max_thickness * 0.5);
    writeln!(
        &mut *cmd.output,
        "bounds: min ({}, {}) max ({}, {})",
        padded.min.x, padded.min.y, padded.max.x, padded.max.y
    )?;
    Ok(())
}
