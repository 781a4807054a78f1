/// Removes HTML-like tags (`<` up to the next `>`) and trims the result.
///
/// An unmatched `<` and everything after it are kept as text. Any `<` left in
/// the output has no `>` after it, so stripping twice is the same as once.
pub fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        match rest[open..].find('>') {
            Some(close) => rest = &rest[open + close + 1..],
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);

    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_simple_tags() {
        assert_eq!(strip_tags("<p>2+2=?</p>"), "2+2=?");
    }

    #[test]
    fn test_strips_tags_with_attributes() {
        assert_eq!(
            strip_tags(r#"<span style="color:red">A bat</span> costs <b>$1.10</b>"#),
            "A bat costs $1.10"
        );
    }

    #[test]
    fn test_keeps_unmatched_open_bracket() {
        assert_eq!(strip_tags("is 3 < 4?"), "is 3 < 4?");
    }

    #[test]
    fn test_keeps_lone_close_bracket() {
        assert_eq!(strip_tags("5 > 4"), "5 > 4");
    }

    #[test]
    fn test_nested_open_brackets_consume_to_first_close() {
        assert_eq!(strip_tags("<<a>b>"), "b>");
    }

    #[test]
    fn test_multibyte_text_survives() {
        assert_eq!(strip_tags("<i>café</i> ¿cuánto?"), "café ¿cuánto?");
    }

    #[test]
    fn test_stripping_is_idempotent() {
        let samples = [
            "<p>2+2=?</p>",
            "<<a>b>",
            "x < y <z",
            "<div><br/>Line one<br>Line two</div>",
            "plain text",
            "",
            "  <p> padded </p>  ",
        ];
        for sample in samples {
            let once = strip_tags(sample);
            assert_eq!(strip_tags(&once), once, "not idempotent for {sample:?}");
        }
    }
}
