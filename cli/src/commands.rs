use std::io::Write;

pub struct TessellateCmd {
    pub input: String,
    pub output: Box<dyn Write>,
    pub density: f32,
    pub count: bool,
}

pub struct BoundsCmd {
    pub input: String,
    pub output: Box<dyn Write>,
}

pub struct HitTestCmd {
    pub input: String,
    pub output: Box<dyn Write>,
    pub density: f32,
    pub x: f32,
    pub y: f32,
}

pub fn get_density(matches: &clap::ArgMatches) -> f32 {
    match matches.value_of("DENSITY") {
        Some(value) => value.parse().unwrap_or(scrawl::tessellation::DEFAULT_DENSITY),
        None => scrawl::tessellation::DEFAULT_DENSITY,
    }
}
