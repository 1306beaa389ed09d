use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use trial_summary::diagram::{self, DiagramEditor};
use trial_summary::export::{self, write_file};
use trial_summary::form::{FormData, FormFormat};
use trial_summary::style::DiagramStyle;
use trial_summary::{Error, REPORT_FILE_NAME, Result, Variant, render_with};

/// Render a clinical trial intake form to the printable text summary
#[derive(Parser, Debug)]
#[command(name = "trial-summary")]
#[command(version)]
#[command(about = "Render a clinical trial form (TOML, YAML or JSON) to a printable text summary", long_about = None)]
struct Args {
    /// Form file (use "-" for stdin)
    #[arg(
        value_name = "INPUT",
        required_unless_present_any = ["template", "completions"]
    )]
    input: Option<PathBuf>,

    /// Output text file
    #[arg(short, long, value_name = "OUTPUT", default_value = REPORT_FILE_NAME)]
    output: PathBuf,

    /// Print the summary to stdout instead of writing the output file
    #[arg(long)]
    preview: bool,

    /// Write an empty form in the format of the file extension and exit
    #[arg(long, value_name = "PATH")]
    template: Option<PathBuf>,

    /// Canvas event script (JSON lines); switches the summary to the diagram layout
    #[arg(long, value_name = "EVENTS", requires = "diagram_out")]
    diagram_events: Option<PathBuf>,

    /// Where to save the cart/port diagram (.svg, .png or .pdf)
    #[arg(long, value_name = "PATH", requires = "diagram_events")]
    diagram_out: Option<PathBuf>,

    /// Built-in diagram style (light, print, dark) or a TOML/YAML style file
    #[arg(long, value_name = "STYLE", default_value = "light")]
    style: String,

    /// Raster scale multiplier for PNG diagrams
    #[arg(long, default_value_t = 1.0)]
    png_scale: f32,

    /// Print shell completions and exit
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
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
    if let Some(shell) = args.completions {
        clap_complete::generate(
            shell,
            &mut Args::command(),
            "trial-summary",
            &mut std::io::stdout(),
        );
        return Ok(());
    }

    if let Some(ref template) = args.template {
        let format = FormFormat::from_path(template).unwrap_or(FormFormat::Toml);
        write_file(template, FormData::default().to_format(format)?)?;
        eprintln!("{} template saved to: {}", format, template.display());
        return Ok(());
    }

    let form = match args.input.as_deref() {
        Some(path) if path.to_str() == Some("-") => FormData::parse_any(&read_stdin()?)?,
        Some(path) => FormData::load(path)?,
        None => return Ok(()),
    };

    // The diagram layout points at an attached diagram, so it is only used
    // when that diagram is written.
    let variant = match (&args.diagram_events, &args.diagram_out) {
        (Some(events), Some(out)) => {
            let editor = replay_events(events)?;
            let style = DiagramStyle::resolve(&args.style)?;
            let svg = diagram::render_canvas(&editor, &style);
            let format = export::write_svg_as(&svg, out, args.png_scale)?;
            eprintln!("{} diagram saved to: {}", format.name(), out.display());
            Variant::Diagram
        }
        _ => Variant::Sketch,
    };

    let summary = render_with(&form, variant);

    if args.preview {
        print!("{summary}");
    } else {
        write_file(&args.output, &summary)?;
        eprintln!("Report saved to: {}", args.output.display());
    }

    Ok(())
}

fn replay_events(path: &Path) -> Result<DiagramEditor> {
    let source = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut editor = DiagramEditor::new();
    diagram::replay(&mut editor, &source);
    Ok(editor)
}

fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    std::io::Read::read_to_string(&mut std::io::stdin(), &mut buffer).map_err(Error::Stdin)?;
    Ok(buffer)
}
