//! PowerShell structure extractor
//!
//! This module implements the line-oriented scanner that turns raw script
//! lines into a nested tree of classes, functions, parameters, and variable
//! assignments. All matching is regular-expression based over single lines;
//! block extent comes from brace-depth tracking. The scan is best-effort:
//! malformed or truncated blocks degrade to partial structure instead of
//! failing the file.

use crate::config::ParseOptions;
use crate::models::{Node, NodeKind};
use crate::parsers::ParserError;
use regex::Regex;
use std::path::Path;

/// Control-flow keywords that disqualify a method-like line
///
/// Without this exclusion every `if ($x) {` inside a class body would be
/// picked up as a method. Matching is case-insensitive, as PowerShell is.
const CONTROL_KEYWORDS: &[&str] = &[
    "if", "elseif", "else", "while", "for", "foreach", "do", "switch", "try", "catch", "finally",
];

fn is_control_keyword(ident: &str) -> bool {
    CONTROL_KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(ident))
}

/// Net `{`/`}` balance of one line
fn brace_delta(line: &str) -> i32 {
    let mut delta = 0;
    for ch in line.chars() {
        match ch {
            '{' => delta += 1,
            '}' => delta -= 1,
            _ => {}
        }
    }
    delta
}

/// Net `(`/`)` balance of one line
fn paren_delta(line: &str) -> i32 {
    let mut delta = 0;
    for ch in line.chars() {
        match ch {
            '(' => delta += 1,
            ')' => delta -= 1,
            _ => {}
        }
    }
    delta
}

/// A parameter extracted from a signature or `param(` block
struct ParsedParameter {
    /// Raw variable name, used for deduplication against assignments
    name: String,

    /// Display label, `name : Type` when a type annotation was captured
    display: String,
}

/// Result of scanning one function body
struct BodyScan {
    body: Vec<String>,
    parameters: Vec<ParsedParameter>,
    variables: Vec<String>,
}

/// Line-oriented extractor for PowerShell-style scripts
///
/// Stateless across calls: all working state lives inside a single
/// [`extract`](Self::extract) invocation, so one instance may be shared
/// between threads parsing independent files.
pub struct ScriptStructureExtractor {
    class_start: Regex,
    function_start: Regex,
    typed_method: Regex,
    bare_method: Regex,
    param_block: Regex,
    attribute: Regex,
    parameter: Regex,
    assignment: Regex,
}

impl ScriptStructureExtractor {
    /// Create an extractor, compiling all line patterns
    pub fn new() -> Result<Self, ParserError> {
        let init = |pattern: &str| {
            Regex::new(pattern).map_err(|e| ParserError::InitError(e.to_string()))
        };

        Ok(Self {
            class_start: init(r"^class\s+([A-Za-z_][A-Za-z0-9_]*)")?,
            function_start: init(r"^function\s+([A-Za-z_][A-Za-z0-9_-]*)")?,
            typed_method: init(r"^\[([A-Za-z_][A-Za-z0-9_.\[\]]*)\]\s*([A-Za-z_][A-Za-z0-9_]*)\s*\(")?,
            bare_method: init(r"^([A-Za-z][A-Za-z0-9_]*)\s*\(.*\)\s*\{?\s*$")?,
            param_block: init(r"(?i)\bparam\s*\(")?,
            attribute: init(r"(?i)^\[(?:parameter|cmdletbinding)[^\]]*\]")?,
            parameter: init(r"^(?:\[([^\]]+)\]\s*)?\$([A-Za-z_][A-Za-z0-9_]*)")?,
            assignment: init(r"^\$([A-Za-z_][A-Za-z0-9_]*)\s*=")?,
        })
    }

    /// Extract the structural outline from a script's lines
    ///
    /// Single forward pass. Class context is tracked by brace depth; function
    /// bodies are collected by a look-ahead sub-scan that does not advance the
    /// main index, so structural starts inside a body are still detected.
    pub fn extract(&self, lines: &[&str], path: &Path, options: &ParseOptions) -> Vec<Node> {
        let mut roots: Vec<Node> = Vec::new();
        let mut current_class: Option<usize> = None;
        let mut class_depth: i32 = 0;
        let mut class_opened = false;

        for (i, line) in lines.iter().enumerate() {
            let trimmed = line.trim();

            if let Some(caps) = self.class_start.captures(trimmed) {
                roots.push(Node::new(&caps[1], path, NodeKind::Class, 1));
                current_class = Some(roots.len() - 1);
                class_depth = 0;
                class_opened = false;
            } else {
                let in_class = current_class.is_some();
                if let Some(display) = self.match_function_start(trimmed, in_class) {
                    let level = if in_class { 2 } else { 1 };
                    let scan = self.scan_function_body(lines, i, options);
                    let func = build_function_node(display, path, level, line, scan, options);
                    match current_class {
                        Some(idx) => roots[idx].children.push(func),
                        None => roots.push(func),
                    }
                }
            }

            // Brace tracking runs for every line while a class is open; it
            // bounds how long the class stays current for method detection.
            if current_class.is_some() {
                class_depth += brace_delta(line);
                if line.contains('{') {
                    class_opened = true;
                }
                if class_opened && class_depth <= 0 {
                    current_class = None;
                }
            }
        }

        roots
    }

    /// Test whether a trimmed line opens a function, returning its display name
    ///
    /// Three candidate forms: a `function` declaration (any context), a
    /// bracketed return type followed by an identifier and `(` (class context
    /// only), and a bare `Identifier(...)` line (class context only). The
    /// class-only forms reject control-flow keywords.
    fn match_function_start(&self, trimmed: &str, in_class: bool) -> Option<String> {
        if let Some(caps) = self.function_start.captures(trimmed) {
            return Some(caps[1].to_string());
        }

        if !in_class {
            return None;
        }

        if let Some(caps) = self.typed_method.captures(trimmed) {
            let name = &caps[2];
            if is_control_keyword(name) {
                return None;
            }
            return Some(format!("[{}] {}", &caps[1], name));
        }

        if let Some(caps) = self.bare_method.captures(trimmed) {
            let name = &caps[1];
            if is_control_keyword(name) {
                return None;
            }
            return Some(name.to_string());
        }

        None
    }

    /// Collect a function body starting at its signature line
    ///
    /// The brace counter is seeded from the signature line and the scan stops
    /// when it returns to zero after having been positive. An unterminated
    /// body runs to end-of-input and keeps whatever was found.
    fn scan_function_body(&self, lines: &[&str], start: usize, options: &ParseOptions) -> BodyScan {
        let signature = lines[start];
        let mut depth = brace_delta(signature);
        let mut opened = signature.contains('{');

        let mut body = Vec::new();
        let mut parameters = Vec::new();
        let mut variables: Vec<String> = Vec::new();

        // A parenthesized list on the signature line supersedes param() blocks
        let have_inline = signature.contains('(');
        if options.parse_parameter_types && have_inline {
            for part in split_inline_list(signature).split(',') {
                if let Some(param) = self.extract_parameter(part.trim()) {
                    parameters.push(param);
                }
            }
        }

        let mut in_param_block = false;
        let mut param_block_seen = false;
        let mut param_depth: i32 = 0;

        let mut j = start + 1;
        while j < lines.len() {
            if opened && depth <= 0 {
                break;
            }
            let line = lines[j];
            let trimmed = line.trim();
            body.push(line.to_string());

            if options.parse_parameter_types && !have_inline {
                if in_param_block {
                    if let Some(param) = self.extract_parameter(trimmed) {
                        parameters.push(param);
                    }
                    param_depth += paren_delta(trimmed);
                    if param_depth <= 0 {
                        in_param_block = false;
                    }
                } else if !param_block_seen {
                    if let Some(m) = self.param_block.find(trimmed) {
                        param_block_seen = true;
                        let after = trimmed[m.end()..].trim_start();
                        if let Some(param) = self.extract_parameter(after) {
                            parameters.push(param);
                        }
                        param_depth = 1 + paren_delta(after);
                        if param_depth > 0 {
                            in_param_block = true;
                        }
                    }
                }
            }

            if options.parse_variable_assignments {
                if let Some(caps) = self.assignment.captures(trimmed) {
                    let name = caps[1].to_string();
                    let known = parameters.iter().any(|p| p.name == name)
                        || variables.contains(&name);
                    if !known {
                        variables.push(name);
                    }
                }
            }

            depth += brace_delta(line);
            if line.contains('{') {
                opened = true;
            }
            j += 1;
        }

        BodyScan {
            body,
            parameters,
            variables,
        }
    }

    /// Extract one `[Type] $name` parameter from a text fragment
    ///
    /// Attribute decorations (`[Parameter(...)]`, `[CmdletBinding(...)]`) are
    /// stripped before matching so they are never mistaken for types.
    fn extract_parameter(&self, text: &str) -> Option<ParsedParameter> {
        let mut rest = text;
        while let Some(m) = self.attribute.find(rest) {
            rest = rest[m.end()..].trim_start();
        }

        let caps = self.parameter.captures(rest)?;
        let name = caps[2].to_string();
        let display = match caps.get(1) {
            Some(ty) => format!("{} : {}", name, ty.as_str()),
            None => name.clone(),
        };
        Some(ParsedParameter { name, display })
    }
}

/// Slice the parameter list text out of a signature line
///
/// Spans from the first `(` to the last `)`; a missing closer takes the rest
/// of the line (truncated lists are parsed as far as they go).
fn split_inline_list(signature: &str) -> &str {
    let open = match signature.find('(') {
        Some(i) => i,
        None => return "",
    };
    match signature.rfind(')') {
        Some(close) if close > open => &signature[open + 1..close],
        _ => &signature[open + 1..],
    }
}

/// Assemble a function node from its body scan
fn build_function_node(
    display: String,
    path: &Path,
    level: usize,
    signature: &str,
    scan: BodyScan,
    options: &ParseOptions,
) -> Node {
    let mut func = Node::new(display, path, NodeKind::Function, level);
    func.lines.push(signature.to_string());
    if !options.show_function_names {
        func.lines.extend(scan.body);
    }

    if options.expand_function_details {
        if options.show_parameters && !scan.parameters.is_empty() {
            let mut container = Node::new(
                format!("Parameters ({})", scan.parameters.len()),
                path,
                NodeKind::Container,
                level + 1,
            );
            for param in &scan.parameters {
                container
                    .children
                    .push(Node::new(param.display.clone(), path, NodeKind::Parameter, level + 2));
            }
            func.children.push(container);
        }

        if options.show_variables && !scan.variables.is_empty() {
            let mut names = scan.variables;
            names.sort();
            let mut container = Node::new(
                format!("Variables ({})", names.len()),
                path,
                NodeKind::Container,
                level + 1,
            );
            for name in names {
                container
                    .children
                    .push(Node::new(name, path, NodeKind::Variable, level + 2));
            }
            func.children.push(container);
        }
    }

    func
}
