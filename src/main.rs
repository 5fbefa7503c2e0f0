fn main() {
    if let Err(e) = probity::cli::run_cli() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
