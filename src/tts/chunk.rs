//! Splitting paragraph text into request-sized pieces.
//!
//! The Google Translate speech endpoint rejects text longer than about 100
//! characters, so long paragraphs are cut at the most natural boundary that
//! fits: sentence or clause punctuation first, then whitespace, and only as a
//! last resort in the middle of a word.  Neighbouring pieces are merged back
//! together greedily so each request carries as much text as allowed.

/// Characters that end a clause when followed by whitespace or end of text.
const CLAUSE_ENDINGS: &[char] = &['.', '!', '?', ';', ':', ',', '…', '。', '、', '؟'];

/// Split `text` into chunks of at most `max_chars` characters.
///
/// Chunk boundaries never fall inside a word unless the word alone is longer
/// than `max_chars`.  Blank input yields no chunks.
///
/// ```
/// use article_narrator::tts::split_for_speech;
///
/// let chunks = split_for_speech("Hello world. This is a test.", 15);
/// assert_eq!(chunks, vec!["Hello world.", "This is a test."]);
/// ```
pub fn split_for_speech(text: &str, max_chars: usize) -> Vec<String> {
    let max = max_chars.max(1);
    let text = text.trim();

    if text.is_empty() {
        return Vec::new();
    }
    if char_len(text) <= max {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();

    for clause in clauses(text) {
        for part in fit(clause, max) {
            if current.is_empty() {
                current = part;
            } else if char_len(&current) + 1 + char_len(&part) <= max {
                current.push(' ');
                current.push_str(&part);
            } else {
                chunks.push(std::mem::replace(&mut current, part));
            }
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Cut after every clause ending that is followed by whitespace or the end
/// of the text.  `3.5` stays in one piece.
fn clauses(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !CLAUSE_ENDINGS.contains(&c) {
            continue;
        }
        let at_boundary = chars.peek().map_or(true, |&(_, next)| next.is_whitespace());
        if at_boundary {
            let end = i + c.len_utf8();
            pieces.push(text[start..end].trim());
            start = end;
        }
    }
    pieces.push(text[start..].trim());

    pieces.into_iter().filter(|p| !p.is_empty()).collect()
}

/// Break one clause into parts of at most `max` characters on whitespace,
/// hard-splitting words that are longer than `max` on their own.
fn fit(clause: &str, max: usize) -> Vec<String> {
    if char_len(clause) <= max {
        return vec![clause.to_string()];
    }

    let mut parts = Vec::new();
    let mut current = String::new();

    for word in clause.split_whitespace() {
        if char_len(word) > max {
            if !current.is_empty() {
                parts.push(std::mem::take(&mut current));
            }
            let chars: Vec<char> = word.chars().collect();
            parts.extend(chars.chunks(max).map(|c| c.iter().collect::<String>()));
            continue;
        }

        if current.is_empty() {
            current.push_str(word);
        } else if char_len(&current) + 1 + char_len(word) <= max {
            current.push(' ');
            current.push_str(word);
        } else {
            parts.push(std::mem::replace(&mut current, word.to_string()));
        }
    }

    if !current.is_empty() {
        parts.push(current);
    }

    parts
}
