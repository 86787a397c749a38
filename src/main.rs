use checkenv::ProviderRegistry;
use checkenv::cli;
use std::io;

fn main() {
    cli::init_logging();

    let args: Vec<String> = std::env::args().collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let registry = ProviderRegistry::default();

    let code = cli::run(&args, &registry, &mut io::stdout().lock(), &mut io::stderr());
    std::process::exit(code);
}
