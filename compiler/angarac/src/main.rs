//! Angara Compiler CLI (§6): drives the module resolver, type checker, and
//! C backend over a root source file, then links a native executable.

use angara_diagnostic::ErrorCode;
use angarac::{Config, ConfigLayer, Driver, NullParser};
use std::path::PathBuf;

fn main() {
    angarac::tracing_setup::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let command = args[1].as_str();
    match command {
        "build" => {
            if args.len() < 3 {
                eprintln!("Usage: angarac build <root-source-path> [flags]");
                std::process::exit(1);
            }
            build(&args[2], &args[3..]);
        }
        "explain" => {
            if args.len() < 3 {
                eprintln!("Usage: angarac explain <ERROR_CODE>");
                eprintln!("Example: angarac explain E2001");
                std::process::exit(1);
            }
            explain(&args[2]);
        }
        "help" | "--help" | "-h" => print_usage(),
        "version" | "--version" => println!("angarac {}", env!("CARGO_PKG_VERSION")),
        _ => {
            // Shorthand: `angarac path/to/main.an [flags]` builds directly.
            if PathBuf::from(command).extension().is_some_and(|ext| ext.eq_ignore_ascii_case(angarac::resolve::SOURCE_EXT)) {
                build(command, &args[2..]);
            } else {
                eprintln!("Unknown command: {command}");
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
        }
    }
}

fn print_usage() {
    println!("Angara Compiler");
    println!();
    println!("Usage: angarac <command> [options]");
    println!();
    println!("Commands:");
    println!("  build <root.an>     Compile and link a root module into a native executable");
    println!("  explain <CODE>      Print a longer explanation for an error code (e.g. E2001)");
    println!("  help                Show this help message");
    println!("  version             Show version information");
    println!();
    println!("Build flags:");
    println!("  --verbose, -v               Print module resolution as it happens");
    println!("  --runtime-dir <path>        Directory holding angara_runtime.{{c,h}}");
    println!("  --native-module-dir <path>  Directory searched for native (.so/.dylib) modules");
    println!("  --user-module-dir <path>    Directory searched for source (.an) modules");
    println!("  --cc <compiler>             System C compiler to invoke (default: cc)");
    println!();
    println!("Environment:");
    println!("  ANGARAC_RUNTIME_DIR, ANGARAC_NATIVE_MODULE_DIR, ANGARAC_USER_MODULE_DIR, ANGARAC_CC");
    println!("  ANGARAC_LOG, ANGARAC_LOG_TREE");
    println!();
    println!("Examples:");
    println!("  angarac build main.an");
    println!("  angarac main.an --cc clang");
    println!("  angarac explain E4005");
}

fn build(root_path: &str, flags: &[String]) {
    let cli = parse_build_flags(flags);
    let config = Config::resolve(&cli);
    let mut parser = NullParser;
    let mut driver = Driver::new(config, &mut parser);

    match driver.build(&PathBuf::from(root_path)) {
        Ok(executable) => {
            println!("{}", executable.display());
        }
        Err(err) => {
            eprintln!("error[{}]: {err}", err.error_code().as_str());
            std::process::exit(1);
        }
    }
}

fn parse_build_flags(flags: &[String]) -> ConfigLayer {
    let mut layer = ConfigLayer::default();
    let mut iter = flags.iter();
    while let Some(flag) = iter.next() {
        match flag.as_str() {
            "--verbose" | "-v" => layer.verbose = Some(true),
            "--runtime-dir" => layer.runtime_dir = iter.next().map(PathBuf::from),
            "--native-module-dir" => layer.native_module_dir = iter.next().map(PathBuf::from),
            "--user-module-dir" => layer.user_module_dir = iter.next().map(PathBuf::from),
            "--cc" => layer.cc = iter.next().cloned(),
            other => eprintln!("warning: ignoring unrecognized flag `{other}`"),
        }
    }
    layer
}

fn explain(code_str: &str) {
    let Some(code) = ErrorCode::parse(code_str) else {
        eprintln!("Unknown error code: {code_str}");
        eprintln!();
        eprintln!("Error codes have the format EXXXX where X is a digit.");
        eprintln!("Examples: E1001, E2001, E4005");
        std::process::exit(1);
    };
    println!("{}: {}", code.as_str(), code.explain());
}
