//! Compiles a signed-number grammar once and runs it over several inputs.
//!
//! Run with: `cargo run --example number`

use peglet::prelude::*;

fn main() {
    let number = tuple(vec![
        optional(choice(vec![ch('+'), ch('-')])),
        many1(range('0', '9')),
    ])
    .text()
    .tag("number");

    let grammar = number.compile().expect("grammar compiles");

    for input in ["42", "-7", "+1234", "abc", ""] {
        match grammar.parse_str(input) {
            Ok(value) => println!("{input:>6} => {} ({:?})", value.to_text(), value.tag()),
            Err(failure) => println!("{input:>6} => failed: {failure}"),
        }
    }
}
