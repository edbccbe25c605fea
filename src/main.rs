fn main() {
    std::process::exit(probe_cli::run());
}
