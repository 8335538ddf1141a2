use anyhow::{Context, Result};
use lsp_types::Range;
use regex::Regex;

use crate::document::{line_range, utf16_col};
use crate::scan::{LineKind, ScannedLine};
use crate::symbol::{Symbol, SymbolKind, SymbolTable};

/// Primitive type keywords of the language.
const PRIMITIVES: &str = "int|long|float|double|bool|string|char";

/// Control keywords that the method pattern's identifier captures must never
/// be. The regex crate has no lookahead, so these are rejected after the
/// match instead of inside it.
const KEYWORDS: &[&str] = &[
    "class", "return", "if", "else", "while", "for", "switch", "case", "do", "new", "break",
    "continue",
];

/// The compiled pattern set shared by the symbol extractor and the lint
/// rules. Compiling here is the engine's only fallible step.
pub struct Patterns {
    class_decl: Regex,
    method_decl: Regex,
    field_decl: Regex,
    var_decl: Regex,
    parameter: Regex,
    pub(crate) var_naming: Regex,
    pub(crate) return_token: Regex,
    pub(crate) return_line: Regex,
    pub(crate) control_flow: Regex,
    pub(crate) case_label: Regex,
    pub(crate) else_keyword: Regex,
}

impl Patterns {
    pub fn new() -> Result<Self> {
        Ok(Self {
            class_decl: Regex::new(
                r"^\s*(?:(?:public|private|protected|abstract|final)\s+)*class\s+([A-Za-z_][A-Za-z0-9_]*)(?:\s*:\s*([A-Za-z_][A-Za-z0-9_]*))?",
            )
            .context("compiling class declaration pattern")?,
            method_decl: Regex::new(
                r"^\s*(?:(?:public|private|protected|static|final|abstract|native)\s+)*([A-Za-z_][A-Za-z0-9_]*)\s+([A-Za-z_][A-Za-z0-9_]*)\s*\(",
            )
            .context("compiling method declaration pattern")?,
            field_decl: Regex::new(&format!(
                r"^\s*(?:(?:public|private|protected|static|final)\s+)*({PRIMITIVES})\s+([A-Za-z_][A-Za-z0-9_]*)(?:\s*=\s*[^;]*)?\s*;"
            ))
            .context("compiling field declaration pattern")?,
            var_decl: Regex::new(&format!(
                r"^\s*(?:final\s+)?({PRIMITIVES})\s+([A-Za-z_][A-Za-z0-9_]*)(?:\s*=\s*[^;]*)?\s*;"
            ))
            .context("compiling variable declaration pattern")?,
            parameter: Regex::new(&format!(
                r"(?:{PRIMITIVES})\s+([A-Za-z_][A-Za-z0-9_]*)\s*(?:,|\))"
            ))
            .context("compiling parameter pattern")?,
            var_naming: Regex::new(&format!(
                r"\b(?:{PRIMITIVES})\s+([A-Za-z_][A-Za-z0-9_]*)\s*(?:=|;)"
            ))
            .context("compiling variable naming pattern")?,
            return_token: Regex::new(r"\breturn\b").context("compiling return pattern")?,
            return_line: Regex::new(r"\breturn\b[^;]*;\s*$")
                .context("compiling return statement pattern")?,
            control_flow: Regex::new(r"\b(?:if|for|while|switch|do)\s*[({]")
                .context("compiling control flow pattern")?,
            case_label: Regex::new(r"\b(?:case\s+.+|default)\s*:")
                .context("compiling case label pattern")?,
            else_keyword: Regex::new(r"\belse\b").context("compiling else pattern")?,
        })
    }

    /// Match a class or method declaration on one scrubbed line. Class wins
    /// over method; first match wins over anything later on the line.
    pub fn match_decl(&self, line: &ScannedLine<'_>) -> Option<LineDecl> {
        if let Some(caps) = self.class_decl.captures(&line.code) {
            let name = caps.get(1).expect("class name group");
            return Some(LineDecl::Class {
                name: name.as_str().to_string(),
                supertype: caps.get(2).map(|m| m.as_str().to_string()),
                name_span: capture_span(&line.code, &name),
                decl_end: caps.get(0).expect("whole match").end(),
            });
        }

        self.method_decl_at(&line.code, 0)
    }

    /// Match a method declared after a class head on the same line
    /// (`class Box { int get() { ... } }`). Scans past the class body's
    /// opening brace; `from` is the byte offset where the class head ended.
    pub fn match_trailing_method(&self, code: &str, from: usize) -> Option<LineDecl> {
        let body = code[from..].find('{').map(|i| from + i + 1)?;
        self.method_decl_at(code, body)
    }

    fn method_decl_at(&self, code: &str, base: usize) -> Option<LineDecl> {
        let caps = self.method_decl.captures(&code[base..])?;
        let return_type = caps.get(1).expect("return type group");
        let name = caps.get(2).expect("method name group");
        if KEYWORDS.contains(&return_type.as_str()) || KEYWORDS.contains(&name.as_str()) {
            return None;
        }

        Some(LineDecl::Method {
            name: name.as_str().to_string(),
            return_type: return_type.as_str().to_string(),
            name_span: (
                utf16_col(code, base + name.start()),
                utf16_col(code, base + name.end()),
            ),
            params: self
                .match_parameters(code, base + caps.get(0).expect("whole match").end()),
        })
    }

    /// Parse the same-line parameter list. `after_open` is the byte offset
    /// just past the opening parenthesis.
    fn match_parameters(&self, code: &str, after_open: usize) -> Vec<ParamDecl> {
        let section_end = code[after_open..]
            .find(')')
            .map(|i| after_open + i + 1)
            .unwrap_or(code.len());
        let section = &code[after_open..section_end];

        self.parameter
            .captures_iter(section)
            .map(|caps| {
                let name = caps.get(1).expect("parameter name group");
                let start = after_open + name.start();
                let end = after_open + name.end();
                ParamDecl {
                    name: name.as_str().to_string(),
                    span: (utf16_col(code, start), utf16_col(code, end)),
                }
            })
            .collect()
    }

    pub fn match_field(&self, line: &ScannedLine<'_>) -> Option<TypedDecl> {
        typed_decl(&self.field_decl, &line.code)
    }

    pub fn match_variable(&self, line: &ScannedLine<'_>) -> Option<TypedDecl> {
        typed_decl(&self.var_decl, &line.code)
    }
}

fn typed_decl(pattern: &Regex, code: &str) -> Option<TypedDecl> {
    let caps = pattern.captures(code)?;
    let ty = caps.get(1).expect("type group");
    let name = caps.get(2).expect("name group");
    Some(TypedDecl {
        ty: ty.as_str().to_string(),
        name: name.as_str().to_string(),
        name_span: capture_span(code, &name),
    })
}

fn capture_span(code: &str, capture: &regex::Match<'_>) -> (u32, u32) {
    (
        utf16_col(code, capture.start()),
        utf16_col(code, capture.end()),
    )
}

/// A class or method declaration recognized on one line.
#[derive(Debug, Clone)]
pub enum LineDecl {
    Class {
        name: String,
        supertype: Option<String>,
        name_span: (u32, u32),
        /// Byte offset just past the declaration head, where a same-line
        /// class body may begin.
        decl_end: usize,
    },
    Method {
        name: String,
        return_type: String,
        name_span: (u32, u32),
        params: Vec<ParamDecl>,
    },
}

#[derive(Debug, Clone)]
pub struct ParamDecl {
    pub name: String,
    pub span: (u32, u32),
}

/// A field or local variable declaration: `type name [= init];`.
#[derive(Debug, Clone)]
pub struct TypedDecl {
    pub ty: String,
    pub name: String,
    pub name_span: (u32, u32),
}

#[derive(Debug, Clone)]
enum Scope {
    Class(String),
    Method(String),
    Block,
}

/// Mutable nesting state threaded through one top-to-bottom pass.
///
/// A recognized class/method declaration becomes the pending scope and takes
/// effect immediately; the next `{` binds it to a stack frame, and the
/// matching `}` pops it and restores the previous enclosing class/method.
/// Created fresh per pass; nothing survives a call.
pub struct ScanContext {
    scopes: Vec<Scope>,
    pending: Option<Scope>,
    current_class: Option<String>,
    current_method: Option<String>,
}

impl ScanContext {
    pub fn new() -> Self {
        Self {
            scopes: Vec::new(),
            pending: None,
            current_class: None,
            current_method: None,
        }
    }

    pub fn enclosing_class(&self) -> Option<&str> {
        self.current_class.as_deref()
    }

    pub fn enclosing_method(&self) -> Option<&str> {
        self.current_method.as_deref()
    }

    /// Record a recognized declaration line.
    pub fn note_decl(&mut self, decl: &LineDecl) {
        match decl {
            LineDecl::Class { name, .. } => {
                self.current_class = Some(name.clone());
                self.current_method = None;
                self.pending = Some(Scope::Class(name.clone()));
            }
            LineDecl::Method { name, .. } => {
                self.current_method = Some(name.clone());
                self.pending = Some(Scope::Method(name.clone()));
            }
        }
    }

    /// Walk the braces of a scrubbed line, opening and closing scopes.
    pub fn observe_braces(&mut self, line: &ScannedLine<'_>) {
        for ch in line.code.chars() {
            match ch {
                '{' => {
                    let scope = self.pending.take().unwrap_or(Scope::Block);
                    self.scopes.push(scope);
                }
                '}' => {
                    // A dangling declaration never got its body; drop it.
                    self.pending = None;
                    self.scopes.pop();
                    self.recompute();
                }
                _ => {}
            }
        }
    }

    /// Re-derive the enclosing class/method from the remaining stack.
    fn recompute(&mut self) {
        self.current_class = None;
        self.current_method = None;
        for scope in self.scopes.iter().rev() {
            match scope {
                Scope::Method(name) if self.current_method.is_none() => {
                    self.current_method = Some(name.clone());
                }
                Scope::Class(name) => {
                    self.current_class = Some(name.clone());
                    break;
                }
                _ => {}
            }
        }
    }
}

impl Default for ScanContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Single-pass, top-to-bottom symbol extraction over the scrubbed lines.
pub struct SymbolExtractor<'p> {
    patterns: &'p Patterns,
}

impl<'p> SymbolExtractor<'p> {
    pub fn new(patterns: &'p Patterns) -> Self {
        Self { patterns }
    }

    pub fn extract(&self, lines: &[ScannedLine<'_>]) -> SymbolTable {
        let mut context = ScanContext::new();
        let mut symbols = Vec::new();

        for (index, line) in lines.iter().enumerate() {
            if line.kind != LineKind::Code {
                continue;
            }
            let line_no = index as u32;

            if let Some(decl) = self.patterns.match_decl(line) {
                match &decl {
                    LineDecl::Class {
                        name,
                        supertype,
                        name_span,
                        decl_end,
                    } => {
                        symbols.push(symbol_at(
                            name,
                            line_no,
                            *name_span,
                            SymbolKind::Class {
                                supertype: supertype.clone(),
                            },
                        ));
                        context.note_decl(&decl);
                        // A class head and a member on one line: keep
                        // scanning past the body brace.
                        if let Some(method) =
                            self.patterns.match_trailing_method(&line.code, *decl_end)
                        {
                            self.emit_method(&method, line_no, &context, &mut symbols);
                            context.note_decl(&method);
                        }
                    }
                    LineDecl::Method { .. } => {
                        self.emit_method(&decl, line_no, &context, &mut symbols);
                        context.note_decl(&decl);
                    }
                }
            } else if let Some(method) = context.enclosing_method() {
                if let Some(var) = self.patterns.match_variable(line) {
                    symbols.push(symbol_at(
                        &var.name,
                        line_no,
                        var.name_span,
                        SymbolKind::Variable {
                            method: method.to_string(),
                            var_type: var.ty,
                        },
                    ));
                }
            } else if let Some(class) = context.enclosing_class() {
                if let Some(field) = self.patterns.match_field(line) {
                    symbols.push(symbol_at(
                        &field.name,
                        line_no,
                        field.name_span,
                        SymbolKind::Field {
                            class: class.to_string(),
                            field_type: field.ty,
                        },
                    ));
                }
            }

            context.observe_braces(line);
        }

        SymbolTable::new(symbols)
    }

    fn emit_method(
        &self,
        decl: &LineDecl,
        line_no: u32,
        context: &ScanContext,
        symbols: &mut Vec<Symbol>,
    ) {
        let LineDecl::Method {
            name,
            return_type,
            name_span,
            params,
        } = decl
        else {
            return;
        };

        symbols.push(symbol_at(
            name,
            line_no,
            *name_span,
            SymbolKind::Method {
                class: context.enclosing_class().map(str::to_string),
                return_type: return_type.clone(),
            },
        ));
        for param in params {
            symbols.push(symbol_at(
                &param.name,
                line_no,
                param.span,
                SymbolKind::Parameter {
                    method: name.clone(),
                },
            ));
        }
    }
}

fn symbol_at(name: &str, line: u32, span: (u32, u32), kind: SymbolKind) -> Symbol {
    let range: Range = line_range(line, span.0, span.1);
    Symbol {
        name: name.to_string(),
        range,
        selection_range: range,
        kind,
    }
}
