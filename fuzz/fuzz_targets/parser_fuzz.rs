//! Parser fuzz target: feed arbitrary bytes to the Go source parser and, when it
//! parses, through extraction and rendering. Nothing may panic; malformed input
//! must come back as a parse error.
//! Build with: cargo fuzz run parser_fuzz (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    let s = match std::str::from_utf8(data) {
        Ok(x) => x,
        Err(_) => return,
    };
    if let Ok(unit) = pbgo_trans::parse(s) {
        let extraction = pbgo_trans::extract(&unit, &pbgo_trans::ExtractOptions::default());
        let _ = pbgo_trans::render(&extraction.structs, "fuzz_trans");
    }
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run parser_fuzz");
}
