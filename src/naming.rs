//! Identifier helpers used by the code generator.
//!
//! Output of these functions ends up in generated class and field names, so
//! their behaviour must stay stable for existing diagrams.

/// Uppercase the first character, leave the rest untouched.
pub fn capitalize_first_letter(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lowercase `s`, then replace each run of non-alphanumerics together with
/// the character that follows it by that character uppercased.
///
/// Matches the slug pattern `[^a-zA-Z0-9]+(.)`: the run is greedy, and when
/// it reaches the end of the input it gives back characters so that its last
/// one becomes the "following" character. Line terminators never qualify as
/// the following character.
pub fn camel_case(s: &str) -> String {
    let chars: Vec<char> = s.to_lowercase().chars().collect();
    let mut out = String::with_capacity(chars.len());
    let mut i = 0;

    while i < chars.len() {
        if is_word_char(chars[i]) {
            out.push(chars[i]);
            i += 1;
            continue;
        }

        let mut end = i;
        while end < chars.len() && !is_word_char(chars[end]) {
            end += 1;
        }

        let follower = if end < chars.len() {
            Some(end)
        } else {
            // Backtrack inside the run, keeping at least one separator.
            (i + 1..end).rev().find(|&k| !is_line_terminator(chars[k]))
        };

        match follower {
            Some(k) => {
                out.extend(chars[k].to_uppercase());
                i = k + 1;
            }
            None => {
                out.push(chars[i]);
                i += 1;
            }
        }
    }

    out
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}
