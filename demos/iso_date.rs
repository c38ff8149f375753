//! Parses ISO dates into tagged fields and prints the result as JSON.
//!
//! Run with: `cargo run --example iso_date`

use peglet::prelude::*;

fn main() {
    let digit = || range('0', '9');
    let dash = || ch('-').skip();

    let date = tuple(vec![
        times(4, digit()).text().tag("year"),
        dash(),
        times(2, digit()).text().tag("month"),
        dash(),
        times(2, digit()).text().tag("day"),
    ]);

    let grammar = date.compile().expect("grammar compiles");

    for input in ["2026-08-30", "1999-12-31", "2026-8-30"] {
        match grammar.parse_str(input) {
            Ok(value) => {
                let json = serde_json::to_string_pretty(&value).expect("value serializes");
                println!("{input}:\n{json}\n");
            }
            Err(failure) => println!("{input}: failed: {failure}\n"),
        }
    }
}
