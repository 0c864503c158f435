use crate::commands::HitTestCmd;
use crate::scene;
use crate::tessellate::TessError;
use scrawl::algorithms::CollisionGeometry;
use scrawl::math::vec2;
use scrawl::tessellation::shape_kind;
use std::io::Write;

pub fn hit_test(mut cmd: HitTestCmd) -> Result<(), TessError> {
    let primitives = scene::parse_scene(&cmd.input)?;
    let point = vec2(cmd.x, cmd.y);

    let mut any = false;
    for (i, primitive) in primitives.iter().enumerate() {
        let kind = shape_kind(primitive.kind).expect("validated at parse time");
        let list = (kind.create_shape_list)(&primitive.params);
        let geometry = CollisionGeometry::new(&list, cmd.density);
        if geometry.intersects_point(point) {
            writeln!(&mut *cmd.output, "hit: #{} ({})", i, primitive.kind)?;
            any = true;
        }
    }
    if !any {
        writeln!(&mut *cmd.output, "no hit")?;
    }
    Ok(())
}
