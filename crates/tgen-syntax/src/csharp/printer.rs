//! Canonical C# printer
//!
//! Output shape is fixed: `using` lines, a blank line, a block-scoped
//! namespace holding the classes, members separated by one blank line.

use crate::model::{
    ClassDeclaration, CompilationUnit, Expression, ImportDeclaration, MethodBody,
    MethodDeclaration, Statement,
};
use serde::{Deserialize, Serialize};

/// Line terminator used by the printer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// `\r\n`
    #[default]
    CrLf,
    /// `\n`
    Lf,
}

impl LineEnding {
    /// Terminator text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CrLf => "\r\n",
            Self::Lf => "\n",
        }
    }
}

impl std::str::FromStr for LineEnding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "crlf" => Ok(Self::CrLf),
            "lf" => Ok(Self::Lf),
            other => Err(format!("unknown line ending: {other}")),
        }
    }
}

/// Printer formatting options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintOptions {
    /// Spaces per indentation level
    pub indent_width: usize,
    /// Line terminator
    pub line_ending: LineEnding,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            indent_width: 4,
            line_ending: LineEnding::default(),
        }
    }
}

/// Render a unit to text
#[must_use]
pub(crate) fn render_compilation_unit(unit: &CompilationUnit, options: PrintOptions) -> String {
    let mut printer = Printer::new(options);
    printer.unit(unit);
    printer.finish()
}

struct Printer {
    out: String,
    depth: usize,
    options: PrintOptions,
}

impl Printer {
    fn new(options: PrintOptions) -> Self {
        Self {
            out: String::new(),
            depth: 0,
            options,
        }
    }

    fn finish(self) -> String {
        self.out
    }

    fn line(&mut self, content: &str) {
        if !content.is_empty() {
            self.out
                .extend(std::iter::repeat(' ').take(self.depth * self.options.indent_width));
            self.out.push_str(content);
        }
        self.out.push_str(self.options.line_ending.as_str());
    }

    fn blank(&mut self) {
        self.line("");
    }

    fn open(&mut self) {
        self.line("{");
        self.depth += 1;
    }

    fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.line("}");
    }

    fn unit(&mut self, unit: &CompilationUnit) {
        for import in &unit.imports {
            self.line(&using_line(import));
        }

        let has_body = unit.namespace.is_some() || !unit.classes.is_empty();
        if !unit.imports.is_empty() && has_body {
            self.blank();
        }

        match &unit.namespace {
            Some(namespace) => {
                self.line(&format!("namespace {namespace}"));
                self.open();
                self.classes(&unit.classes);
                self.close();
            }
            None => self.classes(&unit.classes),
        }
    }

    fn classes(&mut self, classes: &[ClassDeclaration]) {
        for (i, class) in classes.iter().enumerate() {
            if i > 0 {
                self.blank();
            }
            self.class(class);
        }
    }

    fn class(&mut self, class: &ClassDeclaration) {
        for attribute in &class.attributes {
            self.line(&format!("[{attribute}]"));
        }

        let mut header = join_modifiers(&class.modifiers);
        header.push_str("class ");
        header.push_str(&class.name);
        self.line(&header);

        self.open();
        for (i, method) in class.methods.iter().enumerate() {
            if i > 0 {
                self.blank();
            }
            self.method(method);
        }
        self.close();
    }

    fn method(&mut self, method: &MethodDeclaration) {
        for attribute in &method.attributes {
            self.line(&format!("[{attribute}]"));
        }

        let parameters = method
            .parameters
            .iter()
            .map(|p| {
                if p.ty.is_empty() {
                    p.name.clone()
                } else {
                    format!("{} {}", p.ty, p.name)
                }
            })
            .collect::<Vec<_>>()
            .join(", ");

        let signature = format!(
            "{}{} {}({})",
            join_modifiers(&method.modifiers),
            method.return_type,
            method.name,
            parameters
        );

        match &method.body {
            MethodBody::Block(statements) => {
                self.line(&signature);
                self.open();
                for statement in statements {
                    self.line(&statement_text(statement));
                }
                self.close();
            }
            MethodBody::Opaque(raw) if raw.is_empty() => self.line(&format!("{signature};")),
            MethodBody::Opaque(raw) if raw.starts_with("=>") => {
                self.line(&format!("{signature} {raw}"));
            }
            MethodBody::Opaque(raw) => {
                self.line(&signature);
                for raw_line in dedent(raw) {
                    self.line(&raw_line);
                }
            }
        }
    }
}

fn using_line(import: &ImportDeclaration) -> String {
    let mut line = String::new();
    if import.is_global {
        line.push_str("global ");
    }
    line.push_str("using ");
    if import.is_static {
        line.push_str("static ");
    }
    if let Some(alias) = &import.alias {
        line.push_str(alias);
        line.push_str(" = ");
    }
    line.push_str(&import.path);
    line.push(';');
    line
}

/// Strip the indentation shared by all lines after the first
///
/// A verbatim body starts right after its signature, so the first line carries
/// no indentation while the rest keep their original column.
fn dedent(raw: &str) -> Vec<String> {
    let mut lines = raw.lines();
    let Some(first) = lines.next() else {
        return Vec::new();
    };
    let rest: Vec<&str> = lines.collect();

    let shared = rest
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.chars().take_while(|c| c.is_whitespace()).count())
        .min()
        .unwrap_or(0);

    std::iter::once(first.trim().to_string())
        .chain(rest.iter().map(|l| {
            if l.trim().is_empty() {
                String::new()
            } else {
                l.chars().skip(shared).collect::<String>().trim_end().to_string()
            }
        }))
        .collect()
}

fn join_modifiers(modifiers: &[crate::model::Modifier]) -> String {
    modifiers.iter().fold(String::new(), |mut acc, m| {
        acc.push_str(m.keyword());
        acc.push(' ');
        acc
    })
}

fn statement_text(statement: &Statement) -> String {
    match statement {
        Statement::Expression(expression) => format!("{};", expression_text(expression)),
    }
}

fn expression_text(expression: &Expression) -> String {
    match expression {
        Expression::Invocation { callee, arguments } => {
            let arguments = arguments
                .iter()
                .map(expression_text)
                .collect::<Vec<_>>()
                .join(", ");
            format!("{}({})", callee.join("."), arguments)
        }
        Expression::StringLiteral(value) => quote(value),
        Expression::Identifier(name) => name.clone(),
    }
}

/// Regular (non-verbatim) C# string literal
fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", u32::from(c))),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
