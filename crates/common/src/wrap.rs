use console::measure_text_width;

/// Reflow `text` so that no line is wider than `width` columns.
///
/// Lines are broken at whitespace where possible; the whitespace at a break
/// is replaced by the line break. Whitespace at the end of a line that would
/// overflow is dropped rather than moved to a line of its own. A word that
/// cannot fit on a line of its own is split between characters, keeping
/// combining marks with their base character and ANSI escape sequences with
/// the character they precede or follow. Existing line breaks are kept, and
/// an empty string comes back unchanged.
pub fn wrap(text: &str, width: usize) -> String {
    if text.is_empty() {
        return String::new();
    }

    let width = width.max(1);
    let mut wrapped = String::with_capacity(text.len() + text.len() / width);

    for (index, line) in text.split('\n').enumerate() {
        if index > 0 {
            wrapped.push('\n');
        }
        wrap_line(line, width, &mut wrapped);
    }

    wrapped
}

fn wrap_line(line: &str, width: usize, out: &mut String) {
    let mut column = 0;
    let mut pending_space = "";

    for segment in Segments::new(line) {
        let word = match segment {
            Segment::Space(space) => {
                pending_space = space;
                continue;
            }
            Segment::Word(word) => word,
        };

        let space_width = measure_text_width(pending_space);
        let word_width = measure_text_width(word);

        if column + space_width + word_width <= width {
            out.push_str(pending_space);
            out.push_str(word);
            column += space_width + word_width;
        } else if column > 0 {
            out.push('\n');
            column = 0;
            push_breaking(word, width, &mut column, out);
        } else {
            // Only leading indentation can be pending at the start of a row
            push_breaking(pending_space, width, &mut column, out);
            if column > 0 && column + word_width > width {
                out.push('\n');
                column = 0;
            }
            push_breaking(word, width, &mut column, out);
        }

        pending_space = "";
    }

    // Trailing whitespace is kept only while it fits
    if column + measure_text_width(pending_space) <= width {
        out.push_str(pending_space);
    }
}

/// Append `chunk`, starting a new line whenever the next character would overflow.
///
/// Zero-width pieces (escape sequences, combining marks) never start a line.
fn push_breaking(chunk: &str, width: usize, column: &mut usize, out: &mut String) {
    let mut unit_start = 0;
    let mut unit_width = 0;
    let mut index = 0;

    while index < chunk.len() {
        let rest = &chunk[index..];
        let (len, atom_width) = if rest.starts_with('\x1b') {
            (escape_len(rest), 0)
        } else {
            let Some(ch) = rest.chars().next() else {
                break;
            };
            let len = ch.len_utf8();
            (len, measure_text_width(&rest[..len]))
        };

        if atom_width > 0 && unit_width > 0 {
            place_unit(&chunk[unit_start..index], unit_width, width, column, out);
            unit_start = index;
            unit_width = 0;
        }

        unit_width += atom_width;
        index += len;
    }

    place_unit(&chunk[unit_start..], unit_width, width, column, out);
}

fn place_unit(unit: &str, unit_width: usize, width: usize, column: &mut usize, out: &mut String) {
    if *column > 0 && *column + unit_width > width {
        out.push('\n');
        *column = 0;
    }
    out.push_str(unit);
    *column += unit_width;
}

/// Byte length of the escape sequence at the start of `s`, which begins with ESC.
fn escape_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    match bytes.get(1) {
        // CSI: parameters up to a final byte in `@..=~`
        Some(b'[') => bytes[2..]
            .iter()
            .position(|b| (0x40..=0x7e).contains(b))
            .map_or(bytes.len(), |i| i + 3),
        // OSC: terminated by BEL or ESC \
        Some(b']') => {
            let body = &s[2..];
            let bel = body.find('\x07').map(|i| i + 3);
            let st = body.find("\x1b\\").map(|i| i + 4);
            match (bel, st) {
                (Some(a), Some(b)) => a.min(b),
                (Some(end), None) | (None, Some(end)) => end,
                (None, None) => bytes.len(),
            }
        }
        Some(_) => s[1..].chars().next().map_or(1, |c| 1 + c.len_utf8()),
        None => 1,
    }
}

enum Segment<'a> {
    Word(&'a str),
    Space(&'a str),
}

/// Splits a line into alternating runs of whitespace and non-whitespace
struct Segments<'a> {
    rest: &'a str,
}

impl<'a> Segments<'a> {
    const fn new(line: &'a str) -> Self {
        Self { rest: line }
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.rest.chars().next()?;
        let is_space = first.is_whitespace();
        let end = self
            .rest
            .find(|c: char| c.is_whitespace() != is_space)
            .unwrap_or(self.rest.len());

        let (run, rest) = self.rest.split_at(end);
        self.rest = rest;

        Some(if is_space {
            Segment::Space(run)
        } else {
            Segment::Word(run)
        })
    }
}
