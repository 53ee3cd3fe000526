/// Keep only the trailing `max_chars` characters of `text`.
#[must_use]
pub fn tail_text(text: &str, max_chars: usize) -> String {
    if max_chars == 0 {
        return String::new();
    }
    let Some((clip_idx, _)) = text.char_indices().nth_back(max_chars - 1) else {
        return text.to_string();
    };
    text[clip_idx..].to_string()
}

/// Decode captured process output, replacing invalid UTF-8, then tail-truncate it.
#[must_use]
pub fn decode_tail(bytes: &[u8], max_chars: usize) -> String {
    tail_text(&String::from_utf8_lossy(bytes), max_chars)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tail_text_keeps_last_characters_of_long_input() {
        let input: String = (0..5000).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
        let tail = tail_text(&input, 2000);
        assert_eq!(tail.chars().count(), 2000);
        assert_eq!(tail, input[3000..]);
    }

    #[test]
    fn tail_text_returns_input_unchanged_when_it_fits() {
        assert_eq!(tail_text("hello", 5), "hello");
        assert_eq!(tail_text("hello", 1000), "hello");
        assert_eq!(tail_text("", 3), "");
    }

    #[test]
    fn tail_text_preserves_utf8_char_boundaries() {
        let input = "hello-\u{C548}\u{B155}\u{D558}\u{C138}\u{C694}";
        assert_eq!(tail_text(input, 3), "\u{D558}\u{C138}\u{C694}");
        assert_eq!(tail_text(input, 6), "-\u{C548}\u{B155}\u{D558}\u{C138}\u{C694}");
    }

    #[test]
    fn decode_tail_replaces_invalid_sequences() {
        let bytes = [b'o', b'k', 0xff, 0xfe, b'!'];
        let decoded = decode_tail(&bytes, 100);
        assert_eq!(decoded, "ok\u{FFFD}\u{FFFD}!");
        assert_eq!(decode_tail(&bytes, 2), "\u{FFFD}!");
    }
}
