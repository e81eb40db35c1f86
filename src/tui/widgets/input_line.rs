//! Single-line text editor with a byte-indexed cursor that always sits on
//! a char boundary.

use textwrap::core::display_width;

fn char_width(c: char) -> usize {
    let mut buf = [0u8; 4];
    display_width(c.encode_utf8(&mut buf))
}

/// Editable input line for the panel's message form.
#[derive(Debug, Default)]
pub struct InputLine {
    content: String,
    cursor: usize,
}

impl InputLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_char(&mut self, c: char) {
        self.content.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.content.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        if let Some(next) = self.next_boundary() {
            self.content.drain(self.cursor..next);
        }
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.cursor = prev;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = self.next_boundary() {
            self.cursor = next;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.content.len();
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    pub fn text(&self) -> &str {
        &self.content
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor
    }

    /// Slice of the content that fits in `width` display columns, scrolled
    /// so the cursor cell stays visible, plus the cursor's byte offset
    /// within that slice. Wide (CJK, emoji) chars count as two columns.
    pub fn window(&self, width: usize) -> (&str, usize) {
        if width == 0 {
            return ("", 0);
        }

        // Past the end the cursor still needs one blank cell
        let cursor_cell = self.content[self.cursor..]
            .chars()
            .next()
            .map_or(1, char_width);

        let mut start = 0;
        while start < self.cursor
            && display_width(&self.content[start..self.cursor]) + cursor_cell > width
        {
            start += self.content[start..]
                .chars()
                .next()
                .map_or(0, char::len_utf8);
        }

        let mut used = display_width(&self.content[start..self.cursor]);
        let mut end = self.cursor;
        for c in self.content[self.cursor..].chars() {
            let w = char_width(c);
            if end > self.cursor && used + w > width {
                break;
            }
            used += w;
            end += c.len_utf8();
        }

        (&self.content[start..end], self.cursor - start)
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.content[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
    }

    fn next_boundary(&self) -> Option<usize> {
        self.content[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
    }
}
