//! Short binary name (`loli`) that forwards to the `lolikit` library.
//! Keeping the alias as a real binary avoids shell alias requirements.

fn main() {
    if let Err(err) = lolikit::entry() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
