use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use trial_summary::diagram::{self, DiagramEditor, Outcome};
use trial_summary::export;
use trial_summary::style::DiagramStyle;
use trial_summary::{Error, Result};

/// Standalone cart/port diagram editor (SVG/PNG/PDF)
#[derive(Parser, Debug)]
#[command(name = "trial-diagram")]
#[command(version)]
#[command(about = "Replay canvas events and save the cart/port diagram as SVG, PNG or PDF", long_about = None)]
struct Args {
    /// Canvas event script, one JSON event per line (use "-" for stdin)
    #[arg(value_name = "EVENTS")]
    input: PathBuf,

    /// Output file path (extension determines format: .svg, .png or .pdf)
    #[arg(short, long, value_name = "OUTPUT")]
    output: PathBuf,

    /// Built-in style (light, print, dark) or a TOML/YAML style file
    #[arg(short, long, value_name = "STYLE", default_value = "light")]
    style: String,

    /// Raster scale multiplier for PNG output
    #[arg(long, default_value_t = 1.0)]
    png_scale: f32,
}

fn main() -> ExitCode {
    trial_summary::log::init();
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let style = DiagramStyle::resolve(&args.style)?;

    let source = if args.input.to_str() == Some("-") {
        let mut buffer = String::new();
        std::io::Read::read_to_string(&mut std::io::stdin(), &mut buffer).map_err(Error::Stdin)?;
        buffer
    } else {
        std::fs::read_to_string(&args.input).map_err(|source| Error::Read {
            path: args.input.clone(),
            source,
        })?
    };

    let mut editor = DiagramEditor::new();
    let outcomes = diagram::replay(&mut editor, &source);

    let rejected = outcomes
        .iter()
        .filter(|o| matches!(o, Outcome::Rejected(_)))
        .count();
    if rejected > 0 {
        eprintln!("{rejected} point(s) outside the cart were not placed");
    }
    eprintln!(
        "generation {}, next point {}, {} point(s) placed",
        editor.canvas_generation(),
        editor.point_counter(),
        editor.points().len()
    );
    for point in editor.points() {
        eprintln!(
            "  {} at ({:.0}, {:.0})",
            point.number, point.position.x, point.position.y
        );
    }

    let svg = diagram::render_canvas(&editor, &style);
    let format = export::write_svg_as(&svg, &args.output, args.png_scale)?;
    eprintln!("{} saved to: {}", format.name(), args.output.display());

    Ok(())
}
