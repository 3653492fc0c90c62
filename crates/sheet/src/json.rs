//! JSON emission for extraction results.
//!
//! Three composable output styles, matching the CLI flags:
//! - compact (default serde_json rendering),
//! - pretty: objects and the outermost array put one entry per line with
//!   two-space indentation, while arrays nested inside another array stay
//!   on a single line (`[ "a", 1 ]`),
//! - highlighted: ANSI colors around tokens (keys yellow, strings red,
//!   null magenta, booleans green, integers cyan, floats blue).
//!
//! Implemented as a serde_json [`Formatter`] so output streams directly to
//! the writer.

use crate::cell::ValueFormats;
use crate::error::Result;
use crate::extract::Tables;
use serde::Serialize;
use serde_json::ser::{CompactFormatter, Formatter};
use serde_json::{Map, Value};
use std::io::{self, Write};

/// Output styling options.
#[derive(Debug, Clone, Default)]
pub struct JsonOptions {
    pub pretty: bool,
    pub color: bool,
    pub formats: ValueFormats,
}

/// Convert an extraction result into a JSON value, applying the configured
/// date/time patterns to date and time cells.
#[must_use]
pub fn tables_to_json(tables: &Tables, formats: &ValueFormats) -> Value {
    let mut map = Map::new();
    for (name, grid) in tables {
        let value = match grid {
            Some(rows) => Value::Array(
                rows.iter()
                    .map(|row| {
                        Value::Array(row.iter().map(|cell| cell.to_json(formats)).collect())
                    })
                    .collect(),
            ),
            None => Value::Null,
        };
        map.insert(name.clone(), value);
    }
    Value::Object(map)
}

/// Serialize `value` to `writer` in the configured style, without a
/// trailing newline.
pub fn write_json<W: Write>(writer: W, value: &Value, options: &JsonOptions) -> Result<()> {
    let styler = Styler::new(options.pretty, options.color);
    let mut ser = serde_json::Serializer::with_formatter(writer, styler);
    value.serialize(&mut ser)?;
    Ok(())
}

/// Serialize an extraction result.
pub fn write_tables<W: Write>(writer: W, tables: &Tables, options: &JsonOptions) -> Result<()> {
    write_json(writer, &tables_to_json(tables, &options.formats), options)
}

/// Serialize a sheet-name listing.
pub fn write_sheet_names<W: Write>(
    writer: W,
    names: &[String],
    options: &JsonOptions,
) -> Result<()> {
    let value = Value::Array(names.iter().map(|n| Value::String(n.clone())).collect());
    write_json(writer, &value, options)
}

const RESET: &str = "\u{1b}[0m";
const RED: &str = "\u{1b}[31m";
const GREEN: &str = "\u{1b}[32m";
const YELLOW: &str = "\u{1b}[33m";
const BLUE: &str = "\u{1b}[34m";
const MAGENTA: &str = "\u{1b}[35m";
const CYAN: &str = "\u{1b}[36m";

/// serde_json formatter implementing the pretty and highlight styles.
///
/// Indentation bookkeeping: `nesting` tracks the overall container depth,
/// `array_level` how many arrays are currently open (only the outermost one
/// breaks lines), `frames` whether each open container has seen a value
/// (empty containers close as `[ ]` / `{ }`).
struct Styler {
    pretty: bool,
    color: bool,
    nesting: usize,
    array_level: usize,
    frames: Vec<bool>,
    in_key: bool,
}

impl Styler {
    fn new(pretty: bool, color: bool) -> Self {
        Styler {
            pretty,
            color,
            nesting: 0,
            array_level: 0,
            frames: Vec::new(),
            in_key: false,
        }
    }

    fn indent<W: ?Sized + Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b"\n")?;
        for _ in 0..self.nesting {
            writer.write_all(b"  ")?;
        }
        Ok(())
    }

    fn escape<W: ?Sized + Write>(&self, writer: &mut W, code: &str) -> io::Result<()> {
        if self.color {
            writer.write_all(code.as_bytes())?;
        }
        Ok(())
    }

    fn mark_value(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            *frame = true;
        }
    }
}

impl Formatter for Styler {
    fn write_null<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.escape(writer, MAGENTA)?;
        CompactFormatter.write_null(writer)?;
        self.escape(writer, RESET)
    }

    fn write_bool<W>(&mut self, writer: &mut W, value: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.escape(writer, GREEN)?;
        CompactFormatter.write_bool(writer, value)?;
        self.escape(writer, RESET)
    }

    fn write_i64<W>(&mut self, writer: &mut W, value: i64) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.escape(writer, CYAN)?;
        CompactFormatter.write_i64(writer, value)?;
        self.escape(writer, RESET)
    }

    fn write_u64<W>(&mut self, writer: &mut W, value: u64) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.escape(writer, CYAN)?;
        CompactFormatter.write_u64(writer, value)?;
        self.escape(writer, RESET)
    }

    fn write_f64<W>(&mut self, writer: &mut W, value: f64) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.escape(writer, BLUE)?;
        CompactFormatter.write_f64(writer, value)?;
        self.escape(writer, RESET)
    }

    fn begin_string<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.escape(writer, if self.in_key { YELLOW } else { RED })?;
        writer.write_all(b"\"")
    }

    fn end_string<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b"\"")?;
        self.escape(writer, RESET)
    }

    fn begin_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.array_level += 1;
        if self.pretty {
            self.nesting += 1;
            self.frames.push(false);
        }
        writer.write_all(b"[")
    }

    fn end_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if self.pretty {
            self.nesting -= 1;
            let had_values = self.frames.pop().unwrap_or(false);
            if had_values && self.array_level <= 1 {
                self.indent(writer)?;
            } else {
                writer.write_all(b" ")?;
            }
        }
        self.array_level -= 1;
        writer.write_all(b"]")
    }

    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if !first {
            writer.write_all(b",")?;
        }
        if self.pretty {
            self.mark_value();
            if self.array_level > 1 {
                writer.write_all(b" ")?;
            } else {
                self.indent(writer)?;
            }
        }
        Ok(())
    }

    fn begin_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if self.pretty {
            self.nesting += 1;
            self.frames.push(false);
        }
        writer.write_all(b"{")
    }

    fn end_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if self.pretty {
            self.nesting -= 1;
            let had_entries = self.frames.pop().unwrap_or(false);
            if had_entries {
                self.indent(writer)?;
            } else {
                writer.write_all(b" ")?;
            }
        }
        writer.write_all(b"}")
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.in_key = true;
        if !first {
            writer.write_all(b",")?;
        }
        if self.pretty {
            self.mark_value();
            self.indent(writer)?;
        }
        Ok(())
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.in_key = false;
        if self.pretty {
            writer.write_all(b" : ")
        } else {
            writer.write_all(b":")
        }
    }
}
