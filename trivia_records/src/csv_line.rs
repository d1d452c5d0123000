//! Quoted-field handling for single CSV lines.
//!
//! Both the fact source and the feedback logs are one record per line, with
//! fields optionally wrapped in double quotes and internal quotes doubled.
//! A quoted field may contain a newline, so one record can span several
//! physical lines; [`join_records`] stitches them back together.

/// Split one line into fields.
///
/// Commas inside quotes belong to the field; `""` inside quotes is a literal
/// quote. Quote characters themselves are not part of the field value.
pub fn split(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }

    fields.push(current);
    fields
}

/// True when `text` ends inside a quoted field.
///
/// Doubled quotes count twice, so only an unmatched opening quote leaves the
/// count odd.
pub fn has_open_quote(text: &str) -> bool {
    text.chars().filter(|&c| c == '"').count() % 2 == 1
}

/// Group physical lines into logical records.
///
/// A line that leaves a quote open is joined with the following lines,
/// separated by `\n`, until the quote closes. Each record is paired with the
/// 1-based number of its first physical line.
pub fn join_records<I, S>(lines: I) -> Vec<(usize, String)>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut records = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for (index, line) in lines.into_iter().enumerate() {
        let line = line.as_ref();
        let (start, text) = match pending.take() {
            Some((start, mut text)) => {
                text.push('\n');
                text.push_str(line);
                (start, text)
            }
            None => (index + 1, line.to_string()),
        };

        if has_open_quote(&text) {
            pending = Some((start, text));
        } else {
            records.push((start, text));
        }
    }

    // An unterminated quote at end of input is left for the parser to reject.
    records.extend(pending);
    records
}

/// Wrap a field in double quotes, doubling any quotes inside it.
pub fn quote(field: &str) -> String {
    let mut out = String::with_capacity(field.len() + 2);
    out.push('"');
    for c in field.chars() {
        if c == '"' {
            out.push('"');
        }
        out.push(c);
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_plain_fields() {
        assert_eq!(split("1,abc,True"), vec!["1", "abc", "True"]);
    }

    #[test]
    fn test_split_keeps_commas_inside_quotes() {
        assert_eq!(
            split(r#"7,"Roma, a cidade eterna",Verdadeiro"#),
            vec!["7", "Roma, a cidade eterna", "Verdadeiro"]
        );
    }

    #[test]
    fn test_split_unescapes_doubled_quotes() {
        assert_eq!(
            split(r#""ele disse ""olá""",x"#),
            vec![r#"ele disse "olá""#, "x"]
        );
    }

    #[test]
    fn test_split_trailing_empty_field() {
        assert_eq!(split(r#""a","""#), vec!["a", ""]);
        assert_eq!(split("a,"), vec!["a", ""]);
    }

    #[test]
    fn test_quote() {
        assert_eq!(quote(""), r#""""#);
        assert_eq!(quote("plain"), r#""plain""#);
        assert_eq!(quote(r#"say "hi""#), r#""say ""hi""""#);
    }

    #[test]
    fn test_open_quote_detection() {
        assert!(!has_open_quote(r#""a","b""#));
        assert!(has_open_quote(r#""2025-06-01 12:00:00","A Terra"#));
        assert!(!has_open_quote(r#""ele disse ""olá""""#));
    }

    #[test]
    fn test_join_records_spans_quoted_newlines() {
        let lines = [
            "header",
            r#""a","primeira"#,
            r#"segunda",x"#,
            r#""b","simples",y"#,
        ];
        let records = join_records(lines);

        assert_eq!(records.len(), 3);
        assert_eq!(records[1], (2, "\"a\",\"primeira\nsegunda\",x".to_string()));
        assert_eq!(records[2].0, 4);
        assert_eq!(split(&records[1].1), vec!["a", "primeira\nsegunda", "x"]);
    }

    #[test]
    fn test_join_records_keeps_unterminated_tail() {
        let records = join_records(["ok", r#""sem fim"#, "resto"]);
        assert_eq!(
            records,
            vec![(1, "ok".to_string()), (2, "\"sem fim\nresto".to_string())]
        );
    }

    #[test]
    fn test_quote_then_split_recovers_field() {
        let original = r#"a, "b", c"#;
        let line = format!("{},{}", quote(original), quote("tail"));
        assert_eq!(split(&line), vec![original, "tail"]);
    }
}
