use std::{env, fs::File, io::BufWriter, path::PathBuf, process};

use log::info;

use vmil_translator::{driver, sources, Bootstrap, Options, TranslateError};

fn print_usage(program: &str) {
    eprintln!("Usage: {} [options] <file.vm | directory>...", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -o, --output <file>   Write assembly to <file>");
    eprintln!("  --bootstrap           Always emit bootstrap code");
    eprintln!("  --no-bootstrap        Never emit bootstrap code");
    eprintln!("  --entry <name>        Function the bootstrap calls (default Sys.init)");
    eprintln!("  --stack-base <n>      Initial stack pointer (default 256)");
    eprintln!("  --no-comments         Do not echo VM commands as comments");
    eprintln!("  --strict-calls        Fail when a called function is never defined");
    eprintln!("  -h, --help            Show this help");
}

fn fail(message: &str) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

fn option_value(args: &[String], i: usize) -> &str {
    match args.get(i + 1) {
        Some(v) => v.as_str(),
        None => fail(&format!("{} requires a value", args[i])),
    }
}

fn translate(inputs: &[PathBuf], output: Option<PathBuf>, options: &Options) -> Result<PathBuf, TranslateError> {
    let files = sources::discover(inputs)?;
    let units = sources::load_all(&files)?;
    let output = match output {
        Some(path) => path,
        None => sources::default_output(inputs)?,
    };

    let file = File::create(&output).map_err(|source| TranslateError::Io {
        path: output.clone(),
        source,
    })?;
    driver::run(&units, options, BufWriter::new(file))?;
    Ok(output)
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("vmil-translator");

    let mut options = Options::default();
    let mut output = None;
    let mut inputs = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-o" | "--output" => {
                output = Some(PathBuf::from(option_value(&args, i)));
                i += 2;
            }
            "--entry" => {
                options.entry_point = option_value(&args, i).to_string();
                i += 2;
            }
            "--stack-base" => {
                options.stack_base = option_value(&args, i)
                    .parse()
                    .unwrap_or_else(|_| fail(&format!("invalid stack base '{}'", option_value(&args, i))));
                i += 2;
            }
            "--bootstrap" => {
                options.bootstrap = Bootstrap::Always;
                i += 1;
            }
            "--no-bootstrap" => {
                options.bootstrap = Bootstrap::Never;
                i += 1;
            }
            "--no-comments" => {
                options.annotate = false;
                i += 1;
            }
            "--strict-calls" => {
                options.strict_calls = true;
                i += 1;
            }
            "-h" | "--help" => {
                print_usage(program);
                process::exit(0);
            }
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option '{}'", arg);
                print_usage(program);
                process::exit(1);
            }
            arg => {
                inputs.push(PathBuf::from(arg));
                i += 1;
            }
        }
    }

    if inputs.is_empty() {
        print_usage(program);
        process::exit(1);
    }

    match translate(&inputs, output, &options) {
        Ok(path) => info!("wrote {}", path.display()),
        Err(err) => fail(&err.to_string()),
    }
}
