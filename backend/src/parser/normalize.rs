//! Line normalization for spreadsheet exports.
//!
//! Spreadsheet tools pad rows with trailing separators and leave blank lines
//! at the end of a sheet. Normalizing never fails; malformed input is left for
//! the header check to reject.

/// Whitespace as browsers trim it: Unicode white space plus the byte order
/// mark (U+FEFF).
pub fn is_blank(c: char) -> bool {
    c.is_whitespace() || c == '\u{FEFF}'
}

/// Trim [`is_blank`] characters from both ends.
pub fn trim_blank(value: &str) -> &str {
    value.trim_matches(is_blank)
}

/// Trim [`is_blank`] characters from the end.
pub fn trim_blank_end(value: &str) -> &str {
    value.trim_end_matches(is_blank)
}

/// Canonical CSV text after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    text: String,
}

/// Clean raw CSV text.
///
/// - trims the whole text
/// - strips trailing runs of `,` / `;` from every line
/// - removes lines that are blank (or only separators)
///
/// Line terminators (`\n` or `\r\n`) of kept lines are preserved.
pub fn normalize(raw: &str) -> NormalizedText {
    let mut kept: Vec<String> = Vec::new();

    for line in trim_blank(raw).split('\n') {
        let (body, cr) = match line.strip_suffix('\r') {
            Some(body) => (body, "\r"),
            None => (line, ""),
        };
        let body = body.trim_end_matches(&[',', ';'][..]);
        if trim_blank(body).is_empty() {
            continue;
        }
        kept.push(format!("{}{}", body, cr));
    }

    // The last kept line keeps its '\r' when the lines after it were dropped.
    let mut text = kept.join("\n");
    if text.ends_with('\r') {
        text.pop();
    }

    NormalizedText { text }
}

impl NormalizedText {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Lines split on the `\r\n` pair.
    pub fn crlf_lines(&self) -> impl Iterator<Item = &str> {
        self.text.split("\r\n")
    }

    /// Lines split on bare `\n`; a line may keep a trailing `\r`.
    pub fn lf_lines(&self) -> impl Iterator<Item = &str> {
        self.text.split('\n')
    }

    /// Row 1 of the file.
    ///
    /// Taken from the `\r\n` split only. In a file with bare `\n` endings
    /// the whole text is row 1, which then fails the header check.
    pub fn header_line(&self) -> &str {
        self.crlf_lines().next().unwrap_or("")
    }

    /// Every line after the header, from the `\n` split.
    ///
    /// Lines keep their trailing `\r`; the row parser strips it.
    pub fn data_lines(&self) -> Vec<&str> {
        if self.text.is_empty() {
            return Vec::new();
        }
        self.lf_lines().skip(1).collect()
    }
}

impl std::fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}
