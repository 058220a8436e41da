//! Datastore Forge CLI - author, validate and encode typed datastore schemas.
//!
//! Provides both human-friendly and agent-friendly (robot mode) interfaces.
#![forbid(unsafe_code)]

use std::io::{self, IsTerminal};

use clap::Parser;
use console::style;
use serde::Serialize;

use dsf::cli::{self, Cli, Commands};
use dsf::datastore::Datastore;
use dsf::document::Document;
use dsf::error::{DsError, Result};
use dsf::logging::init_logging;
use dsf::wire;

/// Build information embedded at compile time.
mod build_info {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    pub fn git_sha() -> &'static str {
        option_env!("VERGEN_GIT_SHA").unwrap_or("unknown")
    }

    pub fn build_timestamp() -> &'static str {
        option_env!("VERGEN_BUILD_TIMESTAMP").unwrap_or("unknown")
    }
}

fn main() {
    let cli = Cli::parse();

    // Handle no-color flag or non-TTY
    if cli.no_color || !io::stdout().is_terminal() {
        console::set_colors_enabled(false);
    }

    init_logging(cli.use_json(), cli.verbose, cli.quiet);

    // Run the command
    let result = run(&cli);

    // Handle errors
    if let Err(e) = result {
        output_error(&cli, &e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        None => print_quick_start(cli),
        Some(Commands::Validate(args)) => cmd_validate(cli, args),
        Some(Commands::Encode(args)) => cmd_encode(cli, args),
        Some(Commands::Decode(args)) => cmd_decode(cli, args),
        Some(Commands::Show(args)) => cmd_show(cli, args),
        Some(Commands::Version) => cmd_version(cli),
        Some(Commands::Completions(args)) => cmd_completions(cli, args),
    }
}

// === Quick Start (Robot Mode Optimized) ===

/// Prints quick-start help optimized for both humans and AI agents.
#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn print_quick_start(cli: &Cli) -> Result<()> {
    if cli.use_json() {
        print_robot_quick_start();
    } else {
        print_human_quick_start();
    }
    Ok(())
}

fn print_robot_quick_start() {
    let help = RobotQuickStart {
        tool: "dsf",
        version: build_info::VERSION,
        description: "Typed datastore schema authoring with YAML documents and CBOR wire images",
        authoring: RobotAuthoring {
            validate: "dsf validate <FILE> --robot",
            show_objects: "dsf show <FILE> --robot",
            encode_wire: "dsf encode <FILE> -o <OUT.cbor>",
            decode_wire: "dsf decode <OUT.cbor> --robot",
        },
        id_scheme: IdScheme {
            note: "Object id = BASE_ID | index; index is 1-255 within each kind",
            example: "unsignedInteger index 1 -> 0x0101, signedInteger index 1 -> 0x0301",
        },
        output_modes: OutputModes {
            human: "--format=text (default)",
            robot: "--robot or --format=json",
            compact: "--format=json-compact",
        },
    };

    println!("{}", serde_json::to_string_pretty(&help).unwrap());
}

fn print_human_quick_start() {
    println!(
        "{} {} - Datastore schema authoring\n",
        style("dsf").bold().cyan(),
        build_info::VERSION
    );

    println!("{}", style("QUICK START").bold().underlined());
    println!();

    println!(
        "  {}  Validate a document",
        style("dsf validate store.yaml").green()
    );
    println!(
        "  {}  List its objects",
        style("dsf show store.yaml").green()
    );
    println!(
        "  {}  Encode the wire image",
        style("dsf encode store.yaml -o store.cbor").green()
    );
    println!(
        "  {}  Inspect a wire image",
        style("dsf decode store.cbor").green()
    );
    println!();

    println!("{}", style("ROBOT MODE (for AI agents)").bold().underlined());
    println!();
    println!(
        "  {}  JSON output",
        style("dsf --robot <command>").cyan()
    );
    println!();

    println!("Run {} for full help", style("dsf --help").yellow());
}

// === Robot Mode JSON Structures ===

#[derive(Serialize)]
struct RobotQuickStart {
    tool: &'static str,
    version: &'static str,
    description: &'static str,
    authoring: RobotAuthoring,
    id_scheme: IdScheme,
    output_modes: OutputModes,
}

#[derive(Serialize)]
struct RobotAuthoring {
    validate: &'static str,
    show_objects: &'static str,
    encode_wire: &'static str,
    decode_wire: &'static str,
}

#[derive(Serialize)]
struct IdScheme {
    note: &'static str,
    example: &'static str,
}

#[derive(Serialize)]
struct OutputModes {
    human: &'static str,
    robot: &'static str,
    compact: &'static str,
}

// === Command Implementations ===

fn cmd_validate(cli: &Cli, args: &cli::ValidateArgs) -> Result<()> {
    let document = Document::load(&args.file)?;
    let store = Datastore::from_document(&document)?;

    if cli.use_json() {
        output_json(
            cli,
            &serde_json::json!({
                "ok": true,
                "file": args.file.display().to_string(),
                "name": store.name,
                "objects": store.object_count(),
            }),
        );
    } else if !cli.quiet {
        println!(
            "{} {} ({} objects)",
            style("Valid:").green().bold(),
            store.name,
            store.object_count()
        );
    }
    Ok(())
}

fn cmd_encode(cli: &Cli, args: &cli::EncodeArgs) -> Result<()> {
    let document = Document::load(&args.file)?;
    let store = Datastore::from_document(&document)?;
    let bytes = store.to_wire_bytes()?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.file.with_extension("cbor"));
    std::fs::write(&output, &bytes)?;

    if cli.use_json() {
        output_json(
            cli,
            &serde_json::json!({
                "ok": true,
                "output": output.display().to_string(),
                "objects": store.object_count(),
                "bytes": bytes.len(),
            }),
        );
    } else if !cli.quiet {
        println!(
            "Wrote {} ({} objects, {} bytes)",
            output.display(),
            store.object_count(),
            bytes.len()
        );
    }
    Ok(())
}

fn cmd_decode(cli: &Cli, args: &cli::DecodeArgs) -> Result<()> {
    let bytes = std::fs::read(&args.file)?;
    let objects = wire::decode_all(&bytes)?;

    if cli.use_json() {
        let listing: Vec<_> = objects
            .iter()
            .map(|o| {
                serde_json::json!({
                    "id": format!("{:#06x}", o.id()),
                    "kind": o.kind().name(),
                })
            })
            .collect();
        output_json(
            cli,
            &serde_json::json!({
                "file": args.file.display().to_string(),
                "objects": listing,
            }),
        );
    } else {
        for o in &objects {
            println!("{:#06x}  {}", o.id(), o.kind().name());
        }
        if !cli.quiet {
            println!("{} objects", objects.len());
        }
    }
    Ok(())
}

fn cmd_show(cli: &Cli, args: &cli::ShowArgs) -> Result<()> {
    let document = Document::load(&args.file)?;
    let store = Datastore::from_document(&document)?;

    if cli.use_json() {
        output_json(cli, &show_summary(&store, args.long));
    } else {
        println!("{}: {}", style("Datastore").bold(), store.name);
        if let Some(date) = store.last_modified {
            println!("{}: {}", style("Modified").bold(), date);
        }
        println!();
        print_collection(args.long, "buttons", store.buttons.iter().map(obj_line));
        print_collection(
            args.long,
            "buttonArrays",
            store.button_arrays.iter().map(obj_line),
        );
        print_collection(args.long, "floats", store.floats.iter().map(obj_line));
        print_collection(
            args.long,
            "floatArrays",
            store.float_arrays.iter().map(obj_line),
        );
        print_collection(
            args.long,
            "multiStates",
            store.multi_states.iter().map(obj_line),
        );
        print_collection(
            args.long,
            "signedIntegers",
            store.signed_integers.iter().map(obj_line),
        );
        print_collection(
            args.long,
            "intArrays",
            store.int_arrays.iter().map(obj_line),
        );
        print_collection(
            args.long,
            "unsignedIntegers",
            store.unsigned_integers.iter().map(obj_line),
        );
        print_collection(
            args.long,
            "uintArrays",
            store.uint_arrays.iter().map(obj_line),
        );
        println!("{} objects total", store.object_count());
    }
    Ok(())
}

/// One display line per object: id then name.
fn obj_line<T: Identified>(obj: &T) -> String {
    format!("{:#06x}  {}", obj.object_id(), obj.object_name())
}

/// Display access shared by every schema object type.
trait Identified {
    fn object_id(&self) -> u16;
    fn object_name(&self) -> &str;
}

impl<T: Identified> Identified for &T {
    fn object_id(&self) -> u16 {
        (**self).object_id()
    }
    fn object_name(&self) -> &str {
        (**self).object_name()
    }
}

macro_rules! impl_identified {
    ($($ty:ty),+ $(,)?) => {$(
        impl Identified for $ty {
            fn object_id(&self) -> u16 {
                self.id()
            }
            fn object_name(&self) -> &str {
                self.name()
            }
        }
    )+};
}

impl_identified!(
    dsf::model::Button,
    dsf::model::ButtonArray,
    dsf::model::Float,
    dsf::model::FloatArray,
    dsf::model::MultiState,
    dsf::model::SignedInteger,
    dsf::model::IntArray,
    dsf::model::UnsignedInteger,
    dsf::model::UintArray,
);

fn print_collection(long: bool, label: &str, lines: impl ExactSizeIterator<Item = String>) {
    if lines.len() == 0 {
        return;
    }
    if long {
        println!("{}:", style(label).bold());
        for line in lines {
            println!("  {line}");
        }
    } else {
        println!("{}: {}", style(label).bold(), lines.len());
    }
}

fn show_summary(store: &Datastore, long: bool) -> serde_json::Value {
    fn entry<I>(long: bool, items: I) -> serde_json::Value
    where
        I: ExactSizeIterator,
        I::Item: Identified,
    {
        if long {
            serde_json::Value::Array(
                items
                    .map(|o| {
                        serde_json::json!({
                            "id": format!("{:#06x}", o.object_id()),
                            "name": o.object_name(),
                        })
                    })
                    .collect(),
            )
        } else {
            serde_json::json!(items.len())
        }
    }

    serde_json::json!({
        "name": store.name,
        "lastModified": store.last_modified,
        "objects": store.object_count(),
        "buttons": entry(long, store.buttons.iter()),
        "buttonArrays": entry(long, store.button_arrays.iter()),
        "floats": entry(long, store.floats.iter()),
        "floatArrays": entry(long, store.float_arrays.iter()),
        "multiStates": entry(long, store.multi_states.iter()),
        "signedIntegers": entry(long, store.signed_integers.iter()),
        "intArrays": entry(long, store.int_arrays.iter()),
        "unsignedIntegers": entry(long, store.unsigned_integers.iter()),
        "uintArrays": entry(long, store.uint_arrays.iter()),
    })
}

#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn cmd_version(cli: &Cli) -> Result<()> {
    if cli.use_json() {
        output_json(
            cli,
            &serde_json::json!({
                "version": build_info::VERSION,
                "git_sha": build_info::git_sha(),
                "build_timestamp": build_info::build_timestamp(),
            }),
        );
    } else {
        println!("dsf {}", build_info::VERSION);
        println!("git: {}", build_info::git_sha());
        println!("built: {}", build_info::build_timestamp());
    }
    Ok(())
}

#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn cmd_completions(_cli: &Cli, args: &cli::CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    clap_complete::generate(args.shell, &mut Cli::command(), "dsf", &mut io::stdout());
    Ok(())
}

// === Utility Functions ===

fn output_json<T: Serialize>(cli: &Cli, data: &T) {
    let json = if cli.use_compact_json() {
        serde_json::to_string(data).unwrap()
    } else {
        serde_json::to_string_pretty(data).unwrap()
    };
    println!("{json}");
}

fn output_error(cli: &Cli, error: &DsError) {
    if cli.use_json() {
        let json = serde_json::json!({
            "error": true,
            "message": error.to_string(),
            "suggestion": error.suggestion(),
            "recoverable": error.is_user_recoverable(),
        });
        eprintln!("{}", serde_json::to_string_pretty(&json).unwrap());
    } else {
        eprintln!("{}: {}", style("Error").red().bold(), error);
        if let Some(suggestion) = error.suggestion() {
            eprintln!("{}: {}", style("Hint").yellow(), suggestion);
        }
    }
}
