#[cfg(feature = "cli")]
fn main() -> anyhow::Result<()> {
    travel_parser_rs::cli::run()
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Build with --features cli");
    std::process::exit(1);
}
