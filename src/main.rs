fn main() {
    if let Err(err) = field_profiler::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
