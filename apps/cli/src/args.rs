use std::env;
use std::path::PathBuf;

#[derive(Debug, Default)]
pub struct CliArgs {
    pub data_dir: Option<PathBuf>,
}

pub fn parse_args() -> Result<CliArgs, String> {
    let mut args = env::args().skip(1);
    let mut parsed = CliArgs::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--data-dir" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --data-dir".to_string())?;
                parsed.data_dir = Some(PathBuf::from(value));
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            _ => {
                return Err(format!("unknown argument: {arg}"));
            }
        }
    }

    Ok(parsed)
}

pub fn print_help() {
    println!(
        "ChatAI CLI\n\n\
Usage:\n  chatai [--data-dir <path>]\n\n\
Options:\n  --data-dir <path>  Override the data directory for this run only\n  -h, --help         Show this help message\n\n\
Environment:\n  CHATAI_API_KEY   Credential imported into settings on first launch\n  CHATAI_DATA_DIR  Default data directory (falls back to ~/.chatai)\n"
    );
}
