fn main() {
    if let Err(err) = lolikit::entry() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
