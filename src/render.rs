//! Purpose: Turn a decoded `Value` into the text the CLI prints.
//! Exports: `Layout`, `render`.
//! Role: One walker for both pretty (two-space indent) and single-line output.
//! Invariants: Without color the output is JSON that decodes back to the same tree.
//! Notes: Scalars reuse `Value`'s `Serialize` impl, so `80` stays `80` and strings escape like serde_json.
use jsonwalk::Value;
use serde::Serialize;

#[derive(Clone, Copy, Debug)]
pub struct Layout {
    pub pretty: bool,
    pub color: bool,
}

pub fn render(value: &Value, layout: Layout) -> String {
    let mut printer = Printer {
        layout,
        depth: 0,
        out: String::new(),
    };
    printer.value(value);
    printer.out
}

#[derive(Clone, Copy)]
enum Tone {
    Key,
    Text,
    Number,
    Literal,
    Punct,
}

impl Tone {
    fn sgr(self) -> &'static str {
        match self {
            Tone::Key => "1;34",
            Tone::Text => "32",
            Tone::Number => "36",
            Tone::Literal => "35",
            Tone::Punct => "2",
        }
    }
}

struct Printer {
    layout: Layout,
    depth: usize,
    out: String,
}

impl Printer {
    fn value(&mut self, value: &Value) {
        match value {
            Value::Null | Value::Bool(_) => self.scalar(Tone::Literal, value),
            Value::Number(_) => self.scalar(Tone::Number, value),
            Value::String(_) => self.scalar(Tone::Text, value),
            Value::Array(items) => self.block("[", "]", items.iter(), |printer, item| {
                printer.value(item);
            }),
            Value::Object(members) => self.block("{", "}", members.iter(), |printer, (key, item)| {
                printer.scalar(Tone::Key, key.as_str());
                printer.paint(Tone::Punct, ":");
                if printer.layout.pretty {
                    printer.out.push(' ');
                }
                printer.value(item);
            }),
        }
    }

    fn block<I, F>(&mut self, open: &str, close: &str, members: I, mut member: F)
    where
        I: ExactSizeIterator,
        F: FnMut(&mut Self, I::Item),
    {
        self.paint(Tone::Punct, open);
        if members.len() == 0 {
            self.paint(Tone::Punct, close);
            return;
        }
        self.depth += 1;
        for (idx, item) in members.enumerate() {
            if idx > 0 {
                self.paint(Tone::Punct, ",");
            }
            self.line_break();
            member(self, item);
        }
        self.depth -= 1;
        self.line_break();
        self.paint(Tone::Punct, close);
    }

    fn scalar<T: Serialize + ?Sized>(&mut self, tone: Tone, value: &T) {
        let text = serde_json::to_string(value).unwrap_or_else(|_| "null".to_string());
        self.paint(tone, &text);
    }

    fn line_break(&mut self) {
        if self.layout.pretty {
            self.out.push('\n');
            self.out.push_str(&"  ".repeat(self.depth));
        }
    }

    fn paint(&mut self, tone: Tone, text: &str) {
        if self.layout.color {
            self.out.push_str("\u{1b}[");
            self.out.push_str(tone.sgr());
            self.out.push('m');
            self.out.push_str(text);
            self.out.push_str("\u{1b}[0m");
        } else {
            self.out.push_str(text);
        }
    }
}
