fn main() {
    if let Err(err) = netsuite_workbench::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
