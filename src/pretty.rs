//! Human readable rendering: indented JSON, optionally syntax highlighted.
//!
//! Layout comes from `serde_json`'s `PrettyFormatter` (two space indent,
//! `"key": value`), so with colors off the output is exactly
//! `serde_json::to_writer_pretty`. Highlighting is a `Formatter` that wraps
//! the pretty one and paints each scalar token.

use serde::Serialize;

/// Write `value` as indented JSON to `buf`.
///
/// On error `buf` may hold a partial rendering.
pub fn write_pretty<T>(buf: &mut Vec<u8>, value: &T, colors: bool) -> serde_json::Result<()>
where
    T: Serialize + ?Sized,
{
    #[cfg(feature = "pretty")]
    {
        if colors {
            let mut ser = serde_json::Serializer::with_formatter(&mut *buf, highlight::Highlighter::new());
            return value.serialize(&mut ser);
        }
    }
    #[cfg(not(feature = "pretty"))]
    let _ = colors;

    serde_json::to_writer_pretty(buf, value)
}

#[cfg(feature = "pretty")]
mod highlight {
    use colored::Colorize;
    use serde_json::ser::{CharEscape, CompactFormatter, Formatter, PrettyFormatter};
    use std::io;

    /// Token classes that get their own color.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Token {
        Key,
        String,
        Number,
        Literal,
    }

    /// Pretty layout with painted scalars. Strings are collected whole
    /// (quotes and escapes included) before painting so a token never
    /// spans two color runs.
    pub(super) struct Highlighter {
        layout: PrettyFormatter<'static>,
        in_key: bool,
        string: Option<Vec<u8>>,
    }

    impl Highlighter {
        pub(super) fn new() -> Self {
            Highlighter {
                layout: PrettyFormatter::with_indent(b"  "),
                in_key: false,
                string: None,
            }
        }

        fn paint<W>(&self, writer: &mut W, token: Token, raw: &[u8]) -> io::Result<()>
        where
            W: ?Sized + io::Write,
        {
            let text = String::from_utf8_lossy(raw);
            let painted = match token {
                Token::Key => text.blue().bold(),
                Token::String => text.green(),
                Token::Number => text.yellow(),
                Token::Literal => text.magenta(),
            };
            write!(writer, "{}", painted)
        }

        /// Scalars inside a string (integer map keys) stay in the string;
        /// everything else is painted on its own.
        fn scalar<W, F>(&mut self, writer: &mut W, token: Token, write: F) -> io::Result<()>
        where
            W: ?Sized + io::Write,
            F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
        {
            if let Some(string) = self.string.as_mut() {
                return write(string);
            }
            let mut raw = Vec::new();
            write(&mut raw)?;
            self.paint(writer, token, &raw)
        }
    }

    macro_rules! painted_numbers {
        ($($method:ident: $ty:ty),* $(,)?) => {
            $(
                fn $method<W>(&mut self, writer: &mut W, value: $ty) -> io::Result<()>
                where
                    W: ?Sized + io::Write,
                {
                    self.scalar(writer, Token::Number, |out| CompactFormatter.$method(out, value))
                }
            )*
        };
    }

    impl Formatter for Highlighter {
        fn write_null<W>(&mut self, writer: &mut W) -> io::Result<()>
        where
            W: ?Sized + io::Write,
        {
            self.scalar(writer, Token::Literal, |out| CompactFormatter.write_null(out))
        }

        fn write_bool<W>(&mut self, writer: &mut W, value: bool) -> io::Result<()>
        where
            W: ?Sized + io::Write,
        {
            self.scalar(writer, Token::Literal, |out| CompactFormatter.write_bool(out, value))
        }

        painted_numbers! {
            write_i8: i8, write_i16: i16, write_i32: i32, write_i64: i64, write_i128: i128,
            write_u8: u8, write_u16: u16, write_u32: u32, write_u64: u64, write_u128: u128,
            write_f32: f32, write_f64: f64,
        }

        fn begin_string<W>(&mut self, _writer: &mut W) -> io::Result<()>
        where
            W: ?Sized + io::Write,
        {
            self.string = Some(vec![b'"']);
            Ok(())
        }

        fn end_string<W>(&mut self, writer: &mut W) -> io::Result<()>
        where
            W: ?Sized + io::Write,
        {
            let mut raw = self.string.take().unwrap_or_default();
            raw.push(b'"');
            let token = if self.in_key { Token::Key } else { Token::String };
            self.paint(writer, token, &raw)
        }

        fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
        where
            W: ?Sized + io::Write,
        {
            match self.string.as_mut() {
                Some(string) => string.extend_from_slice(fragment.as_bytes()),
                None => writer.write_all(fragment.as_bytes())?,
            }
            Ok(())
        }

        fn write_char_escape<W>(&mut self, writer: &mut W, char_escape: CharEscape) -> io::Result<()>
        where
            W: ?Sized + io::Write,
        {
            match self.string.as_mut() {
                Some(string) => CompactFormatter.write_char_escape(string, char_escape),
                None => CompactFormatter.write_char_escape(writer, char_escape),
            }
        }

        fn begin_array<W>(&mut self, writer: &mut W) -> io::Result<()>
        where
            W: ?Sized + io::Write,
        {
            self.layout.begin_array(writer)
        }

        fn end_array<W>(&mut self, writer: &mut W) -> io::Result<()>
        where
            W: ?Sized + io::Write,
        {
            self.layout.end_array(writer)
        }

        fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
        where
            W: ?Sized + io::Write,
        {
            self.layout.begin_array_value(writer, first)
        }

        fn end_array_value<W>(&mut self, writer: &mut W) -> io::Result<()>
        where
            W: ?Sized + io::Write,
        {
            self.layout.end_array_value(writer)
        }

        fn begin_object<W>(&mut self, writer: &mut W) -> io::Result<()>
        where
            W: ?Sized + io::Write,
        {
            self.layout.begin_object(writer)
        }

        fn end_object<W>(&mut self, writer: &mut W) -> io::Result<()>
        where
            W: ?Sized + io::Write,
        {
            self.layout.end_object(writer)
        }

        fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
        where
            W: ?Sized + io::Write,
        {
            self.in_key = true;
            self.layout.begin_object_key(writer, first)
        }

        fn end_object_key<W>(&mut self, writer: &mut W) -> io::Result<()>
        where
            W: ?Sized + io::Write,
        {
            self.in_key = false;
            self.layout.end_object_key(writer)
        }

        fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
        where
            W: ?Sized + io::Write,
        {
            self.layout.begin_object_value(writer)
        }

        fn end_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
        where
            W: ?Sized + io::Write,
        {
            self.layout.end_object_value(writer)
        }
    }
}
