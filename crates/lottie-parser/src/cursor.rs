//! Pull-style JSON token cursor.
//!
//! The cursor exposes the document as a discriminated current state plus
//! typed advance operations: values are retrieved with `get_int`,
//! `get_double`, `get_string`, `get_bool`, structures are traversed with
//! `enter_object`/`enter_array`, and unwanted data is dropped with the skip
//! family. `peek_type` looks ahead without consuming. Because the Lottie
//! grammar is known up front, this is cheaper than building a DOM.
//!
//! Calling the wrong retrieval method for the current state (or hitting
//! malformed JSON) moves the cursor to a terminal error state; from then on
//! every operation is a no-op returning a zero value, and `is_valid`
//! reports the failure. The caller checks it once, after the walk.
//!
//! Two deliberate tolerances support the recursive-descent idiom of the
//! builders: `next_object_key` returns "no more keys" without consuming
//! when the current state is a sibling close (exiting-array) or the opener
//! of the next element (entering-object) left behind by a caller that fully
//! drained an inner node, and `next_array_value` does the same for a
//! leftover exiting-object. These are contracts, not bugs.

use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonType {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

/// A scalar looked at through [`TokenCursor::peek_value`].
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue<'a> {
    Null,
    Bool(bool),
    Number(f64),
    String(Cow<'a, str>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Span {
    start: usize,
    end: usize,
    escaped: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    Error,
    /// The root value has been fully consumed.
    End,
    HasNull,
    HasBool(bool),
    HasNumber(f64),
    HasString(Span),
    HasKey(Span),
    EnteringObject,
    ExitingObject,
    EnteringArray,
    ExitingArray,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Object,
    Array,
}

/// What the lexer should produce on the next advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    Value,
    KeyOrClose,
    ValueOrClose,
    CommaOrCloseObject,
    CommaOrCloseArray,
    Done,
}

pub struct TokenCursor<'a> {
    buf: &'a [u8],
    pos: usize,
    state: State,
    stack: Vec<Scope>,
    expect: Expect,
}

impl<'a> TokenCursor<'a> {
    /// Binds to the document and positions the cursor on the first token.
    pub fn new(buf: &'a [u8]) -> Self {
        let mut cursor = TokenCursor {
            buf,
            pos: 0,
            state: State::End,
            stack: Vec::new(),
            expect: Expect::Value,
        };
        cursor.parse_next();
        cursor
    }

    pub fn is_valid(&self) -> bool {
        self.state != State::Error
    }

    /// Forces the terminal error state. Used by builders on semantic
    /// protocol violations the cursor itself cannot see.
    pub fn invalidate(&mut self) {
        self.state = State::Error;
    }

    /// The scalar under the cursor, without consuming it. `None` outside
    /// the has-value and has-key states.
    pub fn peek_value(&mut self) -> Option<ScalarValue<'a>> {
        match self.state {
            State::HasNull => Some(ScalarValue::Null),
            State::HasBool(b) => Some(ScalarValue::Bool(b)),
            State::HasNumber(n) => Some(ScalarValue::Number(n)),
            State::HasString(span) | State::HasKey(span) => {
                Some(ScalarValue::String(self.resolve(span)))
            }
            _ => None,
        }
    }

    pub fn peek_type(&self) -> Option<JsonType> {
        match self.state {
            State::HasNull => Some(JsonType::Null),
            State::HasBool(_) => Some(JsonType::Bool),
            State::HasNumber(_) => Some(JsonType::Number),
            State::HasString(_) | State::HasKey(_) => Some(JsonType::String),
            State::EnteringArray => Some(JsonType::Array),
            State::EnteringObject => Some(JsonType::Object),
            _ => None,
        }
    }

    pub fn enter_object(&mut self) -> bool {
        if self.state != State::EnteringObject {
            self.invalidate();
            return false;
        }
        self.parse_next();
        true
    }

    pub fn enter_array(&mut self) -> bool {
        if self.state != State::EnteringArray {
            self.invalidate();
            return false;
        }
        self.parse_next();
        true
    }

    pub fn next_object_key(&mut self) -> Option<Cow<'a, str>> {
        match self.state {
            State::HasKey(span) => {
                let key = self.resolve(span);
                self.parse_next();
                Some(key)
            }
            // Nested-exit overshoot: a caller drained an inner node and is
            // re-entering the outer key loop. Report "no more keys" without
            // consuming so the outer loop sees its own close.
            State::ExitingArray | State::EnteringObject => None,
            State::ExitingObject => {
                self.parse_next();
                None
            }
            _ => {
                self.invalidate();
                None
            }
        }
    }

    pub fn next_array_value(&mut self) -> bool {
        match self.state {
            State::ExitingArray => {
                self.parse_next();
                false
            }
            // Same overshoot tolerance as next_object_key.
            State::ExitingObject => false,
            State::Error | State::End | State::HasKey(_) => {
                self.invalidate();
                false
            }
            _ => true,
        }
    }

    pub fn get_int(&mut self) -> i32 {
        match self.state {
            State::HasNumber(n) if n.fract() == 0.0 && n >= i32::MIN as f64 && n <= i32::MAX as f64 => {
                self.parse_next();
                n as i32
            }
            _ => {
                self.invalidate();
                0
            }
        }
    }

    pub fn get_double(&mut self) -> f64 {
        match self.state {
            State::HasNumber(n) => {
                self.parse_next();
                n
            }
            _ => {
                self.invalidate();
                0.0
            }
        }
    }

    pub fn get_bool(&mut self) -> bool {
        match self.state {
            State::HasBool(b) => {
                self.parse_next();
                b
            }
            _ => {
                self.invalidate();
                false
            }
        }
    }

    pub fn get_null(&mut self) {
        match self.state {
            State::HasNull => self.parse_next(),
            _ => self.invalidate(),
        }
    }

    /// Returns the current string value. Borrows the input buffer when the
    /// string carries no escapes; decodes into an owned copy otherwise.
    /// Retaining the value beyond dispatch requires copying it out.
    pub fn get_string(&mut self) -> Cow<'a, str> {
        match self.state {
            State::HasString(span) => {
                let s = self.resolve(span);
                self.parse_next();
                s
            }
            _ => {
                self.invalidate();
                Cow::Borrowed("")
            }
        }
    }

    /// Drains the current value, whatever its kind.
    pub fn skip_value(&mut self) {
        self.skip_out(0);
    }

    /// Drains to the close of an object that has already been entered.
    pub fn skip_object(&mut self) {
        self.skip_out(1);
    }

    /// Drains to the close of an array that has already been entered.
    pub fn skip_array(&mut self) {
        self.skip_out(1);
    }

    /// Drops whatever value follows an unrecognized key.
    pub fn skip(&mut self) {
        match self.peek_type() {
            Some(JsonType::Array) => {
                self.enter_array();
                self.skip_array();
            }
            Some(JsonType::Object) => {
                self.enter_object();
                self.skip_object();
            }
            _ => self.skip_value(),
        }
    }

    fn skip_out(&mut self, mut depth: i32) {
        loop {
            match self.state {
                State::EnteringArray | State::EnteringObject => depth += 1,
                State::ExitingArray | State::ExitingObject => depth -= 1,
                State::Error | State::End => return,
                _ => {}
            }
            self.parse_next();
            if depth <= 0 {
                return;
            }
        }
    }

    fn resolve(&mut self, span: Span) -> Cow<'a, str> {
        let buf = self.buf;
        let bytes = &buf[span.start..span.end];
        if !span.escaped {
            match std::str::from_utf8(bytes) {
                Ok(s) => Cow::Borrowed(s),
                Err(_) => {
                    self.invalidate();
                    Cow::Borrowed("")
                }
            }
        } else {
            match decode_escaped(bytes) {
                Some(s) => Cow::Owned(s),
                None => {
                    self.invalidate();
                    Cow::Borrowed("")
                }
            }
        }
    }

    // Lexer ------------------------------------------------------------

    fn parse_next(&mut self) {
        match self.expect {
            Expect::Done => self.state = State::End,
            Expect::Value => self.lex_value(),
            Expect::KeyOrClose => self.lex_key_or_close(),
            Expect::ValueOrClose => {
                self.skip_ws();
                if self.peek_byte() == Some(b']') {
                    self.pos += 1;
                    self.close_scope(State::ExitingArray, Scope::Array);
                } else {
                    self.lex_value();
                }
            }
            Expect::CommaOrCloseObject => {
                self.skip_ws();
                match self.peek_byte() {
                    Some(b',') => {
                        self.pos += 1;
                        self.lex_key();
                    }
                    Some(b'}') => {
                        self.pos += 1;
                        self.close_scope(State::ExitingObject, Scope::Object);
                    }
                    _ => self.invalidate(),
                }
            }
            Expect::CommaOrCloseArray => {
                self.skip_ws();
                match self.peek_byte() {
                    Some(b',') => {
                        self.pos += 1;
                        self.lex_value();
                    }
                    Some(b']') => {
                        self.pos += 1;
                        self.close_scope(State::ExitingArray, Scope::Array);
                    }
                    _ => self.invalidate(),
                }
            }
        }
        if self.state == State::Error {
            self.expect = Expect::Done;
        }
    }

    fn lex_key_or_close(&mut self) {
        self.skip_ws();
        if self.peek_byte() == Some(b'}') {
            self.pos += 1;
            self.close_scope(State::ExitingObject, Scope::Object);
        } else {
            self.lex_key();
        }
    }

    fn lex_key(&mut self) {
        self.skip_ws();
        if self.peek_byte() != Some(b'"') {
            self.invalidate();
            return;
        }
        let Some(span) = self.lex_string() else {
            self.invalidate();
            return;
        };
        self.skip_ws();
        if self.peek_byte() != Some(b':') {
            self.invalidate();
            return;
        }
        self.pos += 1;
        self.state = State::HasKey(span);
        self.expect = Expect::Value;
    }

    fn lex_value(&mut self) {
        self.skip_ws();
        match self.peek_byte() {
            Some(b'{') => {
                self.pos += 1;
                self.stack.push(Scope::Object);
                self.state = State::EnteringObject;
                self.expect = Expect::KeyOrClose;
            }
            Some(b'[') => {
                self.pos += 1;
                self.stack.push(Scope::Array);
                self.state = State::EnteringArray;
                self.expect = Expect::ValueOrClose;
            }
            Some(b'"') => match self.lex_string() {
                Some(span) => {
                    self.state = State::HasString(span);
                    self.after_scalar();
                }
                None => self.invalidate(),
            },
            Some(b't') => self.lex_literal(b"true", State::HasBool(true)),
            Some(b'f') => self.lex_literal(b"false", State::HasBool(false)),
            Some(b'n') => self.lex_literal(b"null", State::HasNull),
            Some(b'-') | Some(b'0'..=b'9') => self.lex_number(),
            _ => self.invalidate(),
        }
    }

    fn lex_literal(&mut self, word: &[u8], state: State) {
        if self.buf[self.pos..].starts_with(word) {
            self.pos += word.len();
            self.state = state;
            self.after_scalar();
        } else {
            self.invalidate();
        }
    }

    fn lex_number(&mut self) {
        let start = self.pos;
        while let Some(b) = self.peek_byte() {
            if matches!(b, b'-' | b'+' | b'.' | b'e' | b'E' | b'0'..=b'9') {
                self.pos += 1;
            } else {
                break;
            }
        }
        let text = &self.buf[start..self.pos];
        match std::str::from_utf8(text).ok().and_then(|s| s.parse::<f64>().ok()) {
            Some(n) => {
                self.state = State::HasNumber(n);
                self.after_scalar();
            }
            None => self.invalidate(),
        }
    }

    /// Scans a string starting at the opening quote; returns the span of
    /// its raw contents. Escapes are validated structurally here and
    /// decoded lazily in `resolve`.
    fn lex_string(&mut self) -> Option<Span> {
        debug_assert_eq!(self.peek_byte(), Some(b'"'));
        self.pos += 1;
        let start = self.pos;
        let mut escaped = false;
        loop {
            match self.peek_byte()? {
                b'"' => {
                    let span = Span {
                        start,
                        end: self.pos,
                        escaped,
                    };
                    self.pos += 1;
                    return Some(span);
                }
                b'\\' => {
                    escaped = true;
                    self.pos += 2;
                    if self.pos > self.buf.len() {
                        return None;
                    }
                }
                _ => self.pos += 1,
            }
        }
    }

    fn after_scalar(&mut self) {
        self.expect = match self.stack.last() {
            Some(Scope::Object) => Expect::CommaOrCloseObject,
            Some(Scope::Array) => Expect::CommaOrCloseArray,
            None => Expect::Done,
        };
    }

    fn close_scope(&mut self, state: State, scope: Scope) {
        if self.stack.pop() != Some(scope) {
            self.invalidate();
            return;
        }
        self.state = state;
        self.after_scalar();
    }

    fn skip_ws(&mut self) {
        while let Some(b) = self.peek_byte() {
            if matches!(b, b' ' | b'\t' | b'\n' | b'\r') {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn peek_byte(&self) -> Option<u8> {
        self.buf.get(self.pos).copied()
    }
}

fn decode_escaped(bytes: &[u8]) -> Option<String> {
    let mut out = String::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b != b'\\' {
            // Copy a run of plain bytes, validating UTF-8 per run.
            let run_start = i;
            while i < bytes.len() && bytes[i] != b'\\' {
                i += 1;
            }
            out.push_str(std::str::from_utf8(&bytes[run_start..i]).ok()?);
            continue;
        }
        i += 1;
        match bytes.get(i)? {
            b'"' => out.push('"'),
            b'\\' => out.push('\\'),
            b'/' => out.push('/'),
            b'b' => out.push('\u{8}'),
            b'f' => out.push('\u{c}'),
            b'n' => out.push('\n'),
            b'r' => out.push('\r'),
            b't' => out.push('\t'),
            b'u' => {
                let hi = hex4(bytes, i + 1)?;
                i += 4;
                let ch = if (0xD800..0xDC00).contains(&hi) {
                    // Surrogate pair: a second \uXXXX must follow.
                    if bytes.get(i + 1) != Some(&b'\\') || bytes.get(i + 2) != Some(&b'u') {
                        return None;
                    }
                    let lo = hex4(bytes, i + 3)?;
                    i += 6;
                    if !(0xDC00..0xE000).contains(&lo) {
                        return None;
                    }
                    let c = 0x10000 + ((hi - 0xD800) << 10) + (lo - 0xDC00);
                    char::from_u32(c)?
                } else {
                    char::from_u32(hi)?
                };
                out.push(ch);
            }
            _ => return None,
        }
        i += 1;
    }
    Some(out)
}

fn hex4(bytes: &[u8], at: usize) -> Option<u32> {
    let chunk = bytes.get(at..at + 4)?;
    let s = std::str::from_utf8(chunk).ok()?;
    u32::from_str_radix(s, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_a_flat_object() {
        let doc = br#"{"a": 1, "b": "two", "c": true, "d": null}"#;
        let mut c = TokenCursor::new(doc);
        assert_eq!(c.peek_type(), Some(JsonType::Object));
        assert!(c.enter_object());

        assert_eq!(c.next_object_key().as_deref(), Some("a"));
        assert_eq!(c.get_int(), 1);
        assert_eq!(c.next_object_key().as_deref(), Some("b"));
        assert_eq!(c.get_string(), "two");
        assert_eq!(c.next_object_key().as_deref(), Some("c"));
        assert!(c.get_bool());
        assert_eq!(c.next_object_key().as_deref(), Some("d"));
        c.get_null();
        assert_eq!(c.next_object_key(), None);
        assert!(c.is_valid());
    }

    #[test]
    fn walks_nested_arrays() {
        let doc = br#"{"v": [[1, 2], [3, 4]]}"#;
        let mut c = TokenCursor::new(doc);
        c.enter_object();
        assert_eq!(c.next_object_key().as_deref(), Some("v"));
        assert!(c.enter_array());
        let mut pairs = Vec::new();
        while c.next_array_value() {
            c.enter_array();
            let mut pair = Vec::new();
            while c.next_array_value() {
                pair.push(c.get_double());
            }
            pairs.push(pair);
        }
        assert_eq!(pairs, vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        assert_eq!(c.next_object_key(), None);
        assert!(c.is_valid());
    }

    #[test]
    fn next_object_key_tolerates_nested_exit_overshoot() {
        // Drain the inner object, then keep calling next_object_key as the
        // builders do: the leftover entering-object of the next element must
        // read as "no more keys" without being consumed.
        let doc = br#"{"items": [{"x": 1}, {"x": 2}]}"#;
        let mut c = TokenCursor::new(doc);
        c.enter_object();
        assert_eq!(c.next_object_key().as_deref(), Some("items"));
        c.enter_array();

        assert!(c.next_array_value());
        c.enter_object();
        assert_eq!(c.next_object_key().as_deref(), Some("x"));
        c.get_int();
        assert_eq!(c.next_object_key(), None);

        // State is now the second element's entering-object.
        assert_eq!(c.next_object_key(), None);
        assert_eq!(c.next_object_key(), None);
        assert!(c.is_valid());

        assert!(c.next_array_value());
        c.enter_object();
        assert_eq!(c.next_object_key().as_deref(), Some("x"));
        assert_eq!(c.get_int(), 2);
        assert_eq!(c.next_object_key(), None);
        assert!(!c.next_array_value());
        assert_eq!(c.next_object_key(), None);
        assert!(c.is_valid());
    }

    #[test]
    fn next_array_value_tolerates_exiting_object_overshoot() {
        let doc = br#"[{"x": 1}]"#;
        let mut c = TokenCursor::new(doc);
        c.enter_array();
        assert!(c.next_array_value());
        c.enter_object();
        assert_eq!(c.next_object_key().as_deref(), Some("x"));
        c.get_int();
        // Without consuming the close, ask the array for more: the leftover
        // exiting-object must read as "done" without being eaten.
        assert!(!c.next_array_value());
        assert!(c.is_valid());
    }

    #[test]
    fn skip_drops_any_value_shape() {
        let doc = br#"{"a": {"deep": [1, {"x": 2}]}, "b": [true, [null]], "c": 3, "d": "s", "keep": 7}"#;
        let mut c = TokenCursor::new(doc);
        c.enter_object();
        while let Some(key) = c.next_object_key() {
            if key == "keep" {
                assert_eq!(c.get_int(), 7);
            } else {
                c.skip();
            }
        }
        assert!(c.is_valid());
    }

    #[test]
    fn wrong_getter_poisons_the_cursor() {
        let doc = br#"{"a": "text"}"#;
        let mut c = TokenCursor::new(doc);
        c.enter_object();
        c.next_object_key();
        assert_eq!(c.get_int(), 0);
        assert!(!c.is_valid());
        // Everything afterwards is a no-op returning zero values.
        assert_eq!(c.get_double(), 0.0);
        assert_eq!(c.next_object_key(), None);
        assert_eq!(c.peek_type(), None);
    }

    #[test]
    fn malformed_json_poisons_the_cursor() {
        let mut c = TokenCursor::new(br#"{"a": 1,,}"#);
        c.enter_object();
        c.next_object_key();
        c.get_int();
        c.next_object_key();
        assert!(!c.is_valid());

        let mut c = TokenCursor::new(b"{invalid");
        c.enter_object();
        assert!(!c.is_valid());
    }

    #[test]
    fn decodes_escaped_strings() {
        // Simple escapes, a surrogate-pair escape, and raw multibyte UTF-8.
        let doc = r#"{"n": "a\"b\\c\nd", "u": "A\uD83D\uDE00", "plain": "héllo"}"#.as_bytes();
        let mut c = TokenCursor::new(doc);
        c.enter_object();
        c.next_object_key();
        assert_eq!(c.get_string(), "a\"b\\c\nd");
        c.next_object_key();
        assert_eq!(c.get_string(), "A\u{1F600}");
        c.next_object_key();
        assert_eq!(c.get_string(), "h\u{e9}llo");
        assert!(c.is_valid());
    }

    #[test]
    fn peek_value_does_not_consume() {
        let doc = br#"{"a": 1.5, "b": "s"}"#;
        let mut c = TokenCursor::new(doc);
        c.enter_object();
        c.next_object_key();
        assert_eq!(c.peek_value(), Some(ScalarValue::Number(1.5)));
        assert_eq!(c.get_double(), 1.5);
        assert_eq!(c.peek_value(), Some(ScalarValue::String(Cow::Borrowed("b"))));
        c.next_object_key();
        assert_eq!(c.get_string(), "s");
        assert_eq!(c.next_object_key(), None);
        assert!(c.is_valid());
    }

    #[test]
    fn borrows_unescaped_strings() {
        let doc = br#"{"k": "plain"}"#;
        let mut c = TokenCursor::new(doc);
        c.enter_object();
        c.next_object_key();
        assert!(matches!(c.get_string(), Cow::Borrowed("plain")));
    }

    #[test]
    fn numbers_cover_the_json_grammar() {
        let doc = br#"[0, -1, 2.5, 1e3, -1.5E-2]"#;
        let mut c = TokenCursor::new(doc);
        c.enter_array();
        let mut vals = Vec::new();
        while c.next_array_value() {
            vals.push(c.get_double());
        }
        assert_eq!(vals, vec![0.0, -1.0, 2.5, 1000.0, -0.015]);
        assert!(c.is_valid());
    }

    #[test]
    fn get_int_rejects_fractional_numbers() {
        let mut c = TokenCursor::new(b"[1.5]");
        c.enter_array();
        c.next_array_value();
        assert_eq!(c.get_int(), 0);
        assert!(!c.is_valid());
    }

    #[test]
    fn empty_containers() {
        let mut c = TokenCursor::new(br#"{"o": {}, "a": []}"#);
        c.enter_object();
        assert_eq!(c.next_object_key().as_deref(), Some("o"));
        c.enter_object();
        assert_eq!(c.next_object_key(), None);
        assert_eq!(c.next_object_key().as_deref(), Some("a"));
        c.enter_array();
        assert!(!c.next_array_value());
        assert_eq!(c.next_object_key(), None);
        assert!(c.is_valid());
    }
}
