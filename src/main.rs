use std::{fs::read_to_string, path::{Path, PathBuf}, process::ExitCode, rc::Rc, time::Instant};

use clap::{ArgAction, Parser};
use log::{info, LevelFilter};
use semant::{
    ast::{ast::Program, expressions::ExprKind},
    class_tree::builder::build_class_map,
    display_error,
    errors::{
        diagnostics::ErrorHandler,
        errors::{Error, ErrorImpl},
    },
    lexer::lexer::tokenize,
    parser::parser::parse,
    type_checker::{type_check, TypeAnnotations},
    Position,
};
use simple_logger::SimpleLogger;

#[derive(Parser)]
#[command(name = "semant")]
#[command(about = "Type checks a program made of one or more class files", long_about = None)]
#[command(version)]
struct Cli {
    /// Source files, checked together as one program
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Print the computed type of every expression
    #[arg(long)]
    dump_types: bool,
}

struct Source {
    name: Rc<String>,
    content: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if let Err(error) = SimpleLogger::new().with_level(level).init() {
        eprintln!("failed to initialise logging: {}", error);
    }

    let mut sources = Vec::new();
    match run(&cli, &mut sources) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(count) => {
            eprintln!("{} semantic error(s)", count);
            ExitCode::FAILURE
        }
        Err(error) => {
            report_error(&error, &sources);
            ExitCode::FAILURE
        }
    }
}

/// Runs the front end over every file and returns the number of semantic
/// errors. Lexing, parsing and hierarchy errors abort the run.
fn run(cli: &Cli, sources: &mut Vec<Source>) -> Result<usize, Error> {
    let start = Instant::now();
    let mut program = Program::new();

    for path in &cli.files {
        let source = load(path)?;
        let file_start = Instant::now();

        let tokens = tokenize(source.content.clone(), Some(source.name.to_string()));
        let file = Rc::clone(&source.name);
        sources.push(source);

        program = parse(tokens?, file, program)?;
        info!("Parsed {} in {:?}", path.display(), file_start.elapsed());
    }

    let build_start = Instant::now();
    let mut classes = build_class_map(&program)?;
    info!("Built class map of {} classes in {:?}", classes.len(), build_start.elapsed());

    let check_start = Instant::now();
    let mut errors = ErrorHandler::new();
    let annotations = type_check(&program, &mut classes, &mut errors);
    info!("Type checked in {:?}", check_start.elapsed());

    for diagnostic in errors.errors() {
        println!("{}", diagnostic);
    }

    if cli.dump_types {
        dump_types(&program, &annotations);
    }

    info!("Total time: {:?}", start.elapsed());

    Ok(errors.count())
}

fn load(path: &Path) -> Result<Source, Error> {
    let name = Rc::new(path.display().to_string());

    match read_to_string(path) {
        Ok(content) => Ok(Source { name, content }),
        Err(error) => Err(Error::new(
            ErrorImpl::FileReadError { path: name.to_string(), reason: error.to_string() },
            Position::new(0, 0, name),
        )),
    }
}

fn report_error(error: &Error, sources: &[Source]) {
    let file = &error.get_position().file;

    match sources.iter().find(|source| source.name == *file) {
        Some(source) => eprint!("{}", display_error(error, &source.content)),
        None => eprintln!("Error: {}", error),
    }
}

fn dump_types(program: &Program, annotations: &TypeAnnotations) {
    for id in program.exprs.ids() {
        let node = program.expr(id);
        let Some(ty) = annotations.type_of(id) else {
            continue;
        };

        let label = match &node.kind {
            ExprKind::ConstInt(value) => value.to_string(),
            ExprKind::ConstBool(value) => value.to_string(),
            ExprKind::ConstString(value) => format!("{:?}", value),
            ExprKind::Var { name, .. } => name.clone(),
            ExprKind::ArrayElem { name, .. } => format!("{}[]", name),
            ExprKind::Assign { name, .. } => format!("{} =", name),
            ExprKind::ArrayAssign { name, .. } => format!("{}[] =", name),
            ExprKind::Binary { op, .. } => op.symbol().to_string(),
            ExprKind::Unary { .. } => String::from("unary"),
            ExprKind::Dispatch { method, .. } => format!("{}()", method),
            ExprKind::New { class } => format!("new {}", class),
            ExprKind::NewArray { element, .. } => format!("new {}[]", element),
            ExprKind::Cast { target, .. } => match annotations.cast_direction(id) {
                Some(direction) => format!("cast {} ({:?})", target, direction),
                None => format!("cast {}", target),
            },
            ExprKind::InstanceOf { target, .. } => format!("instanceof {}", target),
        };

        println!("{:>5} {:<24} {}", node.line, label, ty);
    }
}
