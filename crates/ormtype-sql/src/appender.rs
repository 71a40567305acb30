//! Append-only SQL text sink.

/// A buffer SQL fragments are appended to.
pub trait SqlAppender {
    fn append_sql(&mut self, fragment: &str);

    fn append_char(&mut self, c: char) {
        let mut buf = [0_u8; 4];
        self.append_sql(c.encode_utf8(&mut buf));
    }
}

impl SqlAppender for String {
    fn append_sql(&mut self, fragment: &str) {
        self.push_str(fragment);
    }

    fn append_char(&mut self, c: char) {
        self.push(c);
    }
}
