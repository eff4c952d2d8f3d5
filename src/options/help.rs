//! Help text rendering for a single option.
//!
//! The help template is split into words, `%<index>` placeholders are
//! replaced with the option's current values, and the result is greedily
//! wrapped to a column with a hanging indent:
//!
//! ```text
//! -r, --repo <url>         Specifies the url of the repository to download the libraries from.
//!                          Current default: maven.google.com
//! ```

use super::CliOption;
use std::collections::VecDeque;

/// Marks the start of a placeholder in a help template.
pub const PLACEHOLDER: char = '%';

/// Renders the help entry for `option`.
///
/// - `start_indent` - spaces before the labels.
/// - `text_indent` - column of the help text, relative to `start_indent`.
/// - `wrap_column` - lines are wrapped at this column. Words are never split
///   unless a word alone cannot fit on a line.
///
/// Placeholders read the option's current values, so rendering after the
/// command line was parsed shows what the user passed.
pub fn render(
    option: &CliOption,
    start_indent: usize,
    text_indent: usize,
    wrap_column: usize,
) -> String {
    let mut formatted = header(option, start_indent);

    let text_col = start_indent + text_indent;
    let mut col = formatted.chars().count();
    if col < text_col {
        formatted.push_str(&" ".repeat(text_col - col));
        col = text_col;
    }

    let wrap = wrap_column.max(text_col + 1);
    let usable = wrap - text_col;

    let mut words: VecDeque<String> = help_words(option).into();
    while let Some(word) = words.front_mut() {
        let len = word.chars().count();
        if col >= wrap {
            col = new_line(&mut formatted, text_col);
        } else if len > usable || (len == usable && col == text_col) {
            // Too long for any line: fill the current one and carry the rest.
            // A word of exactly the usable width only fits a fresh line.
            let split = word
                .char_indices()
                .nth(wrap - col)
                .map_or(word.len(), |(i, _)| i);
            formatted.push_str(&word[..split]);
            col += word[..split].chars().count();
            word.drain(..split);
            if word.is_empty() {
                words.pop_front();
            }
        } else if len < wrap - col {
            formatted.push_str(word);
            formatted.push(' ');
            col += len + 1;
            words.pop_front();
        } else {
            col = new_line(&mut formatted, text_col);
        }
    }

    formatted
}

/// Labels and argument names, ie `  -d, --out-dir <path> `.
fn header(option: &CliOption, start_indent: usize) -> String {
    let mut header = " ".repeat(start_indent);

    let short = option.short_label();
    let long = option.long_label();
    match (short.is_empty(), long.is_empty()) {
        (false, false) => {
            header.push_str(short);
            header.push_str(", ");
            header.push_str(long);
        }
        (false, true) => header.push_str(short),
        (true, false) => header.push_str(long),
        (true, true) => {}
    }

    for label in option.arg_labels() {
        header.push_str(" <");
        header.push_str(label);
        header.push('>');
    }

    header.push(' ');
    header
}

fn new_line(formatted: &mut String, indent: usize) -> usize {
    formatted.push('\n');
    formatted.push_str(&" ".repeat(indent));
    indent
}

/// Splits the help template into words with placeholders substituted.
///
/// Words left empty by substitution are dropped.
pub fn help_words(option: &CliOption) -> Vec<String> {
    let values = option.values();
    let words = option.help_template().split_whitespace();
    if values.is_empty() {
        return words.map(str::to_string).collect();
    }

    let max_digits = digit_count(values.len());
    words
        .map(|word| substitute(word, values, max_digits))
        .filter(|word| !word.is_empty())
        .collect()
}

/// Replaces every placeholder in `word`.
///
/// A placeholder is `%` followed by at most `max_digits` decimal digits. A
/// bare `%` or an index past the end of `values` is removed. Substituted
/// text is not scanned again.
pub fn substitute(word: &str, values: &[String], max_digits: usize) -> String {
    let mut out = String::with_capacity(word.len());
    let mut rest = word;

    while let Some(pos) = rest.find(PLACEHOLDER) {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + PLACEHOLDER.len_utf8()..];
        let digits = after
            .bytes()
            .take(max_digits)
            .take_while(u8::is_ascii_digit)
            .count();
        let (index, tail) = after.split_at(digits);
        if let Some(value) = index.parse::<usize>().ok().and_then(|i| values.get(i)) {
            out.push_str(value);
        }
        rest = tail;
    }

    out.push_str(rest);
    out
}

/// Number of decimal digits in `n`, ie `ceil(log10(n + 1))`.
fn digit_count(mut n: usize) -> usize {
    let mut digits = 0;
    while n > 0 {
        n /= 10;
        digits += 1;
    }
    digits
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo_option() -> CliOption {
        CliOption::new(
            "-r",
            "--repo",
            1,
            "Specifies the url of the repository to download the libraries from. Current default: %0",
        )
        .with_defaults(&["maven.google.com"])
        .with_arg_labels(&["url"])
    }

    fn values(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_digit_count() {
        assert_eq!(digit_count(0), 0);
        assert_eq!(digit_count(1), 1);
        assert_eq!(digit_count(9), 1);
        assert_eq!(digit_count(10), 2);
        assert_eq!(digit_count(120), 3);
    }

    #[test]
    fn test_placeholder_replaced_by_value() {
        assert_eq!(substitute("%0", &values(&["X"]), 1), "X");
        assert_eq!(substitute("(%0)", &values(&["X"]), 1), "(X)");
        assert_eq!(substitute("%0/%1", &values(&["a", "b"]), 1), "a/b");
    }

    #[test]
    fn test_bare_placeholder_removed() {
        assert_eq!(substitute("%", &values(&["X"]), 1), "");
        assert_eq!(substitute("100%!", &values(&["X"]), 1), "100!");
    }

    #[test]
    fn test_out_of_range_placeholder_removed() {
        assert_eq!(substitute("%9", &values(&["a", "b"]), 1), "");
        assert_eq!(substitute("%2", &values(&["a", "b"]), 1), "");
    }

    #[test]
    fn test_digit_budget_limits_index() {
        // One value means one digit: "%12" reads index 1, leaving "2"
        assert_eq!(substitute("%12", &values(&["a"]), 1), "2");
        let many: Vec<String> = (0..12).map(|i| format!("v{i}")).collect();
        assert_eq!(substitute("%11", &many, 2), "v11");
    }

    #[test]
    fn test_substituted_text_is_not_rescanned() {
        assert_eq!(substitute("%0", &values(&["%0"]), 1), "%0");
    }

    #[test]
    fn test_template_untouched_without_values() {
        let opt = CliOption::new("-x", "", 0, "keep %0 as is");
        assert_eq!(help_words(&opt), values(&["keep", "%0", "as", "is"]));
    }

    #[test]
    fn test_substitution_result_is_one_word() {
        let opt = CliOption::new("-x", "", 1, "Default: %0").with_defaults(&["two words"]);
        assert_eq!(help_words(&opt), values(&["Default:", "two words"]));
    }

    #[test]
    fn test_header_and_alignment() {
        let out = render(&repo_option(), 2, 25, 200);
        assert!(out.starts_with("  -r, --repo <url> "));
        assert_eq!(out.find("Specifies"), Some(27));
        assert!(out.ends_with("Current default: maven.google.com "));
        assert!(!out.contains('\n'));
    }

    #[test]
    fn test_single_label_headers() {
        let short = CliOption::new("-x", "", 0, "text");
        let long = CliOption::new("", "--only", 0, "text");
        assert!(render(&short, 0, 10, 80).starts_with("-x "));
        assert!(render(&long, 0, 10, 80).starts_with("--only "));
    }

    #[test]
    fn test_long_header_continues_on_same_line() {
        let opt = CliOption::new("-x", "--extremely-long-option-name", 0, "text");
        assert_eq!(render(&opt, 0, 5, 80), "-x, --extremely-long-option-name text ");
    }

    #[test]
    fn test_wrapped_lines_respect_column() {
        let out = render(&repo_option(), 0, 25, 60);
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.chars().count() <= 60, "line too long: {line:?}");
        }
        for line in &lines[1..] {
            assert!(line.starts_with(&" ".repeat(25)));
            assert!(!line[25..].starts_with(' '));
        }
    }

    #[test]
    fn test_long_word_is_hard_split_to_column() {
        let word = "x".repeat(50);
        let opt = CliOption::new("-l", "", 0, &word);
        let out = render(&opt, 0, 10, 30);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0].chars().count(), 30);
        assert_eq!(lines[1].chars().count(), 30);
        assert_eq!(lines[2].trim_end(), format!("{}{}", " ".repeat(10), "x".repeat(10)));
        let letters: usize = lines.iter().map(|l| l.matches('x').count()).sum();
        assert_eq!(letters, 50);
    }

    #[test]
    fn test_word_exactly_usable_width_terminates() {
        let opt = CliOption::new("-l", "", 0, &"y".repeat(20));
        let out = render(&opt, 0, 10, 30);
        assert_eq!(out, format!("-l{}{}", " ".repeat(8), "y".repeat(20)));
    }

    #[test]
    fn test_word_of_usable_width_mid_line_moves_to_next_line() {
        let opt = CliOption::new("-l", "", 0, &format!("ab {}", "y".repeat(20)));
        let out = render(&opt, 0, 10, 30);
        assert_eq!(
            out,
            format!(
                "-l{}ab \n{}{}",
                " ".repeat(8),
                " ".repeat(10),
                "y".repeat(20)
            )
        );
    }

    #[test]
    fn test_multibyte_words_split_on_char_boundary() {
        let opt = CliOption::new("-u", "", 0, &"é".repeat(25));
        let out = render(&opt, 0, 4, 14);
        for line in out.lines() {
            assert!(line.chars().count() <= 14);
        }
        assert_eq!(out.matches('é').count(), 25);
    }

    #[test]
    fn test_render_is_idempotent() {
        let opt = repo_option();
        assert_eq!(render(&opt, 0, 25, 50), render(&opt, 0, 25, 50));
    }

    #[test]
    fn test_render_reflects_bound_values() {
        let mut opt = repo_option();
        let mut tokens = vec!["--repo".to_string(), "custom.repo".to_string()];
        opt.matches(&mut tokens).unwrap();
        assert!(render(&opt, 0, 25, 200).contains("Current default: custom.repo"));
    }

    #[test]
    fn test_degenerate_column_still_terminates() {
        let out = render(&repo_option(), 0, 25, 10);
        let joined: String = out.split_whitespace().collect();
        assert!(joined.contains("maven.google.com"));
    }
}
