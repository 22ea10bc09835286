use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

const SETUPS: [&str; 3] = [
    "Have you heard what's trending about {topic}? Let's cartoonify it!",
    "Breaking news from the doodle universe: {topic}!",
    "Today's wacky headline reads '{topic}', so naturally we drew it.",
];

const PUNCHLINES: [&str; 5] = [
    "Our hero tried to google '{topic}' and the search bar laughed back.",
    "In this universe, {topic} comes with a free cartoon sound effect.",
    "{topic} is now officially a snack flavour. Crunchy, meme-y goodness!",
    "Scientists confirm {topic} is best understood while wearing clown shoes.",
    "Remember: if {topic} knocks, offer it a sketchbook and two crayons.",
];

const CLOSERS: [&str; 3] = [
    "Stick around tomorrow when we animate an even weirder trend!",
    "Like, sub, and bring popcorn for tomorrow's doodle drop!",
    "Tune in tomorrow: our crayons don't sleep and neither do the trends!",
];

const WRAP_WIDTH: usize = 35;

/// FNV-1a, 64 bit. Seeds must be stable across processes and releases, which
/// rules out the standard library's hasher.
pub fn fnv1a_64(input: &str) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    let mut hash = OFFSET_BASIS;
    for byte in input.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}

/// Return the narrated lines for a video. All randomness is seeded from the
/// topic, so the same topic always yields the same script.
pub fn generate_script(topic: &str) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(fnv1a_64(topic));

    let setup = SETUPS.choose(&mut rng).unwrap();
    let first_punch = PUNCHLINES.choose(&mut rng).unwrap();
    let second_punch = PUNCHLINES.choose(&mut rng).unwrap();
    let closer = CLOSERS.choose(&mut rng).unwrap();

    let mut script = vec![
        wrap_line(&setup.replace("{topic}", topic)),
        wrap_line(&first_punch.replace("{topic}", topic)),
        wrap_line(&second_punch.replace("{topic}", topic)),
        wrap_line(closer),
    ];

    // keep the bookends stable, vary the middle order
    script[1..3].shuffle(&mut rng);
    script
}

fn wrap_line(text: &str) -> String {
    wrap_text(text, WRAP_WIDTH).join("\n")
}

fn wrap_text(s: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in s.split_whitespace() {
        if current.len() + word.len() + 1 > width && !current.is_empty() {
            lines.push(current.clone());
            current.clear();
            current.push_str(word);
        } else {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_topic_yields_same_script() {
        assert_eq!(generate_script("Cats"), generate_script("Cats"));
    }

    #[test]
    fn script_has_four_lines() {
        assert_eq!(generate_script("Moon Landing").len(), 4);
    }

    #[test]
    fn topic_is_substituted_into_the_script() {
        let script = generate_script("Space Hamsters");
        let joined = script.join(" ").replace('\n', " ");
        assert!(joined.contains("Space Hamsters"));
    }

    #[test]
    fn lines_are_wrapped_to_width() {
        for line in generate_script("A Very Long Trending Topic About Nothing") {
            for part in line.split('\n') {
                // a single overlong word may exceed the width, these templates have none
                assert!(part.len() <= WRAP_WIDTH, "line too wide: {part}");
            }
        }
    }

    #[test]
    fn wrap_text_splits_on_word_boundaries() {
        let lines = wrap_text("one two three four five", 9);
        assert_eq!(lines, vec!["one two", "three", "four five"]);
    }

    #[test]
    fn fnv1a_is_stable() {
        // reference value for the canonical FNV-1a 64 test vector
        assert_eq!(fnv1a_64(""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(fnv1a_64("a"), 0xaf63_dc4c_8601_ec8c);
    }
}
