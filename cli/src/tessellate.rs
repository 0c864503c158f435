use crate::commands::TessellateCmd;
use crate::scene;
use scrawl::tessellation::create_geometry;
use std::io;
use std::io::Write;

#[derive(Debug)]
pub enum TessError {
    Io(io::Error),
    Scene(scene::SceneError),
    Tessellation(scrawl::tessellation::TessellationError),
}

impl std::convert::From<io::Error> for TessError {
    fn from(err: io::Error) -> Self {
        TessError::Io(err)
    }
}

impl std::convert::From<scene::SceneError> for TessError {
    fn from(err: scene::SceneError) -> Self {
        TessError::Scene(err)
    }
}

pub fn tessellate(mut cmd: TessellateCmd) -> Result<(), TessError> {
    let primitives = scene::parse_scene(&cmd.input)?;
    let list = scene::build_scene(&primitives);
    log::debug!(
        "scene: {} primitives, {} shapes, {} paths",
        primitives.len(),
        list.shapes.len(),
        list.paths.len()
    );

    let geometry = create_geometry(&list, cmd.density).map_err(TessError::Tessellation)?;

    if cmd.count {
        writeln!(
            &mut *cmd.output,
            "vertices: {}, indices: {}, triangles: {}",
            geometry.vertex_count(),
            geometry.indices.len(),
            geometry.indices.len() / 3
        )?;
        return Ok(());
    }

    write!(&mut *cmd.output, "layout: [")?;
    let mut is_first = true;
    for (name, components, offset) in geometry.layout.channels() {
        if !is_first {
            write!(&mut *cmd.output, ", ")?;
        }
        write!(&mut *cmd.output, "{}:{}@{}", name, components, offset)?;
        is_first = false;
    }
    writeln!(&mut *cmd.output, "]")?;

    write!(&mut *cmd.output, "vertices: [")?;
    let size = geometry.layout.vertex_size();
    let mut is_first = true;
    for vertex in geometry.vertices.chunks(size) {
        if !is_first {
            write!(&mut *cmd.output, ", ")?;
        }
        write!(&mut *cmd.output, "{:?}", vertex)?;
        is_first = false;
    }
    writeln!(&mut *cmd.output, "]")?;

    write!(&mut *cmd.output, "indices: [")?;
    let mut is_first = true;
    for index in &geometry.indices {
        if !is_first {
            write!(&mut *cmd.output, ", ")?;
        }
        write!(&mut *cmd.output, "{}", index)?;
        is_first = false;
    }
    writeln!(&mut *cmd.output, "]")?;

    Ok(())
}
