use selkie_core::model::{Diagram, Object};
use selkie_core::{import_svg, import_svg_str, parse_shapes};
use selkie_render::{export_svg, export_svgz, render_to_string};
use std::fmt::Write as _;
use std::io::Read as _;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Import(selkie_core::Error),
    Render(selkie_render::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Import(err) => write!(f, "import failed: {err}"),
            CliError::Render(err) => write!(f, "export failed: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<selkie_core::Error> for CliError {
    fn from(value: selkie_core::Error) -> Self {
        Self::Import(value)
    }
}

impl From<selkie_render::Error> for CliError {
    fn from(value: selkie_render::Error) -> Self {
        Self::Render(value)
    }
}

#[derive(Debug, Clone, Copy)]
enum Command {
    Import,
    Dump,
    Export,
    Roundtrip,
}

#[derive(Debug)]
struct Args {
    command: Command,
    input: Option<String>,
    output: Option<String>,
}

fn usage() -> &'static str {
    "selkie-cli\n\
\n\
USAGE:\n\
  selkie-cli import [--out <path>] [<in.svg>|-]\n\
  selkie-cli dump [<in.svg>|-]\n\
  selkie-cli export <in.svg> <out.svg|out.svgz>\n\
  selkie-cli roundtrip [<in.svg>|-]\n\
\n\
NOTES:\n\
  - If <in.svg> is omitted or '-', input is read from stdin.\n\
  - import prints the resulting diagram's layers and objects.\n\
  - dump prints the raw shape tree plus any recovered import issues.\n\
  - export picks gzip compression when the output path ends in .svgz.\n\
  - roundtrip imports and prints the re-exported SVG to stdout.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut it = argv.iter().skip(1).peekable();
    let command = match it.next().map(String::as_str) {
        Some("--help" | "-h") | None => return Err(CliError::Usage(usage())),
        Some("import") => Command::Import,
        Some("dump") => Command::Dump,
        Some("export") => Command::Export,
        Some("roundtrip") => Command::Roundtrip,
        Some(_) => return Err(CliError::Usage(usage())),
    };

    let mut args = Args {
        command,
        input: None,
        output: None,
    };
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.output = Some(out.clone());
            }
            other if other.starts_with("--") => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_none() {
                    args.input = Some(path.to_string());
                } else if matches!(command, Command::Export) && args.output.is_none() {
                    args.output = Some(path.to_string());
                } else {
                    return Err(CliError::Usage(usage()));
                }
            }
        }
    }
    if matches!(command, Command::Export) && (args.input.is_none() || args.output.is_none()) {
        return Err(CliError::Usage(usage()));
    }
    Ok(args)
}

fn import_input(input: Option<&str>) -> Result<Diagram, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(import_svg_str(&buf)?)
        }
        // The file path goes straight to the importer so gzip detection works.
        Some(path) => Ok(import_svg(path)?),
    }
}

fn read_input_text(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn describe_object(object: &Object, indent: usize, out: &mut String) {
    let _ = writeln!(
        out,
        "{:indent$}{} at ({:.2}, {:.2})",
        "",
        object.type_name(),
        object.position.x,
        object.position.y,
        indent = indent * 2
    );
    for child in &object.children {
        describe_object(child, indent + 1, out);
    }
}

fn describe_diagram(diagram: &Diagram) -> String {
    let mut out = String::new();
    for layer in diagram.layers() {
        let _ = writeln!(
            out,
            "Layer {:?} ({} objects)",
            layer.name,
            layer.objects().len()
        );
        for object in layer.objects() {
            describe_object(object, 1, &mut out);
        }
    }
    out
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn run(args: Args) -> Result<(), CliError> {
    match args.command {
        Command::Import => {
            let diagram = import_input(args.input.as_deref())?;
            write_text(&describe_diagram(&diagram), args.output.as_deref())
        }
        Command::Dump => {
            let text = read_input_text(args.input.as_deref())?;
            let (shapes, issues) = parse_shapes(&text)?;
            let mut out = String::new();
            for shape in &shapes {
                shape.dump(0, &mut out);
            }
            for issue in &issues {
                let _ = writeln!(out, "issue: {issue}");
            }
            write_text(&out, None)
        }
        Command::Export => {
            let diagram = import_input(args.input.as_deref())?;
            let out = args.output.as_deref().unwrap_or_default();
            if out.ends_with(".svgz") {
                export_svgz(&diagram, out)?;
            } else {
                export_svg(&diagram, out)?;
            }
            Ok(())
        }
        Command::Roundtrip => {
            let diagram = import_input(args.input.as_deref())?;
            let svg = render_to_string(&diagram)?;
            write_text(&svg, None)
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
