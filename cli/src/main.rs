extern crate clap;
extern crate scrawl;

mod bounds;
mod commands;
mod hittest;
mod scene;
mod tessellate;

use clap::*;
use commands::*;

use std::fs::File;
use std::io::prelude::*;
use std::io::{stderr, stdout, Write};

fn main() {
    env_logger::init();

    let matches = App::new("Scrawl command-line interface")
        .version("0.1")
        .about("Shape list tessellator")
        .subcommand(
            SubCommand::with_name("tessellate")
                .about("Tessellates a scene of shape primitives")
                .arg(
                    Arg::with_name("DENSITY")
                        .short("d")
                        .long("density")
                        .help("Sets the tessellation density (subdivisions per unit arc length)")
                        .value_name("DENSITY")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("COUNT")
                        .short("c")
                        .long("count")
                        .help("Prints the number of triangles and vertices"),
                ),
        )
        .subcommand(SubCommand::with_name("bounds").about("Prints the bounds of a scene"))
        .subcommand(
            SubCommand::with_name("hittest")
                .about("Tests a point against the scene's collision geometry")
                .arg(
                    Arg::with_name("X")
                        .short("x")
                        .value_name("X")
                        .takes_value(true)
                        .required(true),
                )
                .arg(
                    Arg::with_name("Y")
                        .short("y")
                        .value_name("Y")
                        .takes_value(true)
                        .required(true),
                )
                .arg(
                    Arg::with_name("DENSITY")
                        .short("d")
                        .long("density")
                        .value_name("DENSITY")
                        .takes_value(true),
                ),
        )
        .arg(
            Arg::with_name("SCENE")
                .value_name("SCENE")
                .help("A JSON scene: an array of shape primitives")
                .takes_value(true)
                .required(false),
        )
        .arg(
            Arg::with_name("INPUT")
                .help("Sets the input file to use")
                .short("i")
                .long("input")
                .value_name("FILE")
                .takes_value(true)
                .required(false),
        )
        .arg(
            Arg::with_name("OUTPUT")
                .help("Sets the output file to use")
                .value_name("FILE")
                .short("o")
                .long("output")
                .takes_value(true)
                .required(false),
        )
        .get_matches();

    let mut input_buffer = matches.value_of("SCENE").unwrap_or("").to_string();

    if let Some(input_file) = matches.value_of("INPUT") {
        if let Ok(mut file) = File::open(input_file) {
            input_buffer.clear();
            file.read_to_string(&mut input_buffer).unwrap();
        } else {
            writeln!(&mut stderr(), "Cannot open file {}", input_file).unwrap();
            return;
        }
    }

    let mut output: Box<dyn Write> = Box::new(stdout());

    if let Some(output_file) = matches.value_of("OUTPUT") {
        if let Ok(file) = File::create(output_file) {
            output = Box::new(file);
        }
    }

    if let Some(tess_matches) = matches.subcommand_matches("tessellate") {
        let cmd = TessellateCmd {
            input: input_buffer,
            output,
            density: get_density(tess_matches),
            count: tess_matches.is_present("COUNT"),
        };
        if let Err(e) = tessellate::tessellate(cmd) {
            writeln!(&mut stderr(), "{:?}", e).unwrap();
        }
    } else if matches.subcommand_matches("bounds").is_some() {
        let cmd = BoundsCmd {
            input: input_buffer,
            output,
        };
        if let Err(e) = bounds::bounds(cmd) {
            writeln!(&mut stderr(), "{:?}", e).unwrap();
        }
    } else if let Some(hit_matches) = matches.subcommand_matches("hittest") {
        let cmd = HitTestCmd {
            input: input_buffer,
            output,
            density: get_density(hit_matches),
            x: hit_matches.value_of("X").unwrap().parse().unwrap_or(0.0),
            y: hit_matches.value_of("Y").unwrap().parse().unwrap_or(0.0),
        };
        if let Err(e) = hittest::hit_test(cmd) {
            writeln!(&mut stderr(), "{:?}", e).unwrap();
        }
    }
}
