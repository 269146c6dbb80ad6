//! Example: Basic usage of the retrace matcher

use retrace_engine::build::*;
use retrace_engine::{utf16, Flags, Input, Matcher, Pattern};

fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // (\w+)@(\w+), roughly: capture the two halves of a toy address
    let word = plus(class(&[('a', 'z'), ('A', 'Z'), ('0', '9')]));
    let pattern = Pattern::new(
        vec![seq(vec![cap(1, word.clone()), ch('@'), cap(2, word)])],
        Flags::default(),
    )
    .expect("pattern is well formed");

    let units = utf16("mail me at someone@example today");
    let mut matcher = Matcher::new(&pattern);

    match matcher.find(&Input::new(&units), 0).into_match() {
        Some(m) => {
            println!("matched {:?} at {}..{}", m.group_text(0, &units), m.start, m.end);
            println!("  user:   {:?}", m.group_text(1, &units));
            println!("  domain: {:?}", m.group_text(2, &units));
        }
        None => println!("no match"),
    }
}
