fn main() {
    if let Err(err) = cfm_editor::run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
