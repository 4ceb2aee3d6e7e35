//! Declaration boundary scanner.
//!
//! Finds top-level function and arrow-function declarations in raw source
//! text and cuts out their exact spans. There is no parser here: a
//! declaration starts at a column-0 line matching one of
//!
//! ```text
//! [export] [async] function[*] NAME(
//! [export] const|let NAME = [async] (PARAMS) =>
//! [export] const|let NAME = [async] PARAM =>
//! ```
//!
//! and a block body ends at the next line that consists of a closing brace,
//! optionally followed by `)` and `;`. Brace depth inside the body is never
//! counted, so nested object literals and braces in strings do not move the
//! end.
//!
//! Arrow functions without braces end at the first `;`-terminated line, a
//! blank line, or the next column-0 statement.

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::{Captures, Regex};
use tracing::debug;

static DECLARATION_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?m)^(?P<export>export\s+)?(?:",
        r"(?P<fn_async>async\s+)?function\b\s*(?P<generator>\*)?\s*(?P<function_name>[^\s(*]+)\s*\(",
        r"|",
        r"(?:const|let)\s+(?P<variable_name>[^\s=]+)\s*=\s*(?P<arrow_async>async\b\s*)?",
        r"(?:\((?P<params>[^)]*)\)|(?P<bare_param>[A-Za-z_$][\w$]*))\s*=>",
        r")",
    ))
    .expect("declaration pattern is valid")
});

static BLOCK_END_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\}\)?;?[ \t]*\r?$").expect("block end pattern is valid"));

/// The body of an extracted declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclarationBody {
    /// Everything after the opening brace, through the closing brace
    Block(String),
    /// The expression of a brace-less arrow function, without a trailing `;`
    Expression(String),
}

/// The exact span of one function or arrow-function declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationBlock {
    pub name: String,
    /// Source text from the declaring keyword through the end of the body,
    /// with any leading `export` removed
    pub text: String,
    pub is_async: bool,
    pub is_generator: bool,
    /// Parameter list exactly as written, without the surrounding parens
    pub parameter_list_text: String,
    pub body: DeclarationBody,
}

/// Extract every bounded declaration from `file_text`, keyed by name in
/// file order.
///
/// Declarations whose end cannot be found are skipped. When a name is
/// declared twice the later body wins but keeps the first position.
pub fn extract_declarations(file_text: &str) -> IndexMap<String, DeclarationBlock> {
    let mut declarations = IndexMap::new();
    let mut covered_until = 0;

    for caps in DECLARATION_START.captures_iter(file_text) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() < covered_until {
            continue;
        }

        match bound_declaration(file_text, &caps) {
            Some((declaration, end)) => {
                debug!(
                    name = %declaration.name,
                    length = declaration.text.len(),
                    "extracted declaration"
                );
                covered_until = end;
                declarations.insert(declaration.name.clone(), declaration);
            }
            None => {
                let name = caps
                    .name("function_name")
                    .or_else(|| caps.name("variable_name"))
                    .map_or("<unknown>", |m| m.as_str());
                debug!(name, offset = whole.start(), "no end line for declaration, skipping");
            }
        }
    }

    declarations
}

/// Work out the full span of the declaration matched by `caps`.
///
/// Returns the declaration and the byte offset just past its span.
fn bound_declaration(text: &str, caps: &Captures<'_>) -> Option<(DeclarationBlock, usize)> {
    let whole = caps.get(0)?;
    let keyword_start = caps.name("export").map_or(whole.start(), |m| m.end());

    if let Some(name) = caps.name("function_name") {
        // The match ends just past the opening paren of the parameter list
        let open_paren = whole.end() - 1;
        let close_paren = matching_paren(text, open_paren)?;
        let parameter_list_text = text[open_paren + 1..close_paren].to_string();
        let open_brace = close_paren + text[close_paren..].find('{')?;
        let close_brace = block_end(text, open_brace)?;

        let declaration = DeclarationBlock {
            name: name.as_str().to_string(),
            text: text[keyword_start..=close_brace].to_string(),
            is_async: caps.name("fn_async").is_some(),
            is_generator: caps.name("generator").is_some(),
            parameter_list_text,
            body: DeclarationBody::Block(text[open_brace + 1..=close_brace].to_string()),
        };
        return Some((declaration, close_brace + 1));
    }

    let name = caps.name("variable_name")?.as_str().to_string();
    let parameter_list_text = caps
        .name("params")
        .or_else(|| caps.name("bare_param"))
        .map_or(String::new(), |m| m.as_str().to_string());
    let is_async = caps.name("arrow_async").is_some();

    let after_arrow = whole.end();
    let body_start = after_arrow + text[after_arrow..].len() - text[after_arrow..].trim_start().len();
    if body_start >= text.len() {
        return None;
    }

    if text[body_start..].starts_with('{') {
        let close_brace = block_end(text, body_start)?;
        let declaration = DeclarationBlock {
            name,
            text: text[keyword_start..=close_brace].to_string(),
            is_async,
            is_generator: false,
            parameter_list_text,
            body: DeclarationBody::Block(text[body_start + 1..=close_brace].to_string()),
        };
        return Some((declaration, close_brace + 1));
    }

    let expression_end = expression_end(text, body_start);
    let expression = text[body_start..expression_end]
        .trim_end()
        .trim_end_matches(';')
        .trim_end()
        .to_string();
    if expression.is_empty() {
        return None;
    }

    let declaration = DeclarationBlock {
        name,
        text: text[keyword_start..expression_end].trim_end().to_string(),
        is_async,
        is_generator: false,
        parameter_list_text,
        body: DeclarationBody::Expression(expression),
    };
    Some((declaration, expression_end))
}

/// Index of the `)` closing the `(` at `open`.
fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, ch) in text[open..].char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// Index of the `}` that closes the block opened at `open_brace`.
///
/// A body that opens and closes on the header's own line ends there;
/// otherwise the body ends at the next line consisting of a closing brace.
fn block_end(text: &str, open_brace: usize) -> Option<usize> {
    let line_end = text[open_brace..]
        .find('\n')
        .map_or(text.len(), |i| open_brace + i);
    let rest_of_line = &text[open_brace..line_end];
    if let Some(last_close) = rest_of_line.rfind('}') {
        let block = &rest_of_line[..=last_close];
        let tail = rest_of_line[last_close + 1..]
            .trim_start_matches([')', ';', ' ', '\t'])
            .trim_end();
        let balanced = block.matches('{').count() == block.matches('}').count();
        // Only a trailing comment may follow a block closed on its own line.
        if balanced && (tail.is_empty() || tail.starts_with("//") || tail.starts_with("/*")) {
            return Some(open_brace + last_close);
        }
    }

    let end_line = BLOCK_END_LINE.find(&text[line_end..])?;
    Some(line_end + end_line.start())
}

/// Byte offset just past the last line of a brace-less arrow body starting
/// at `start`.
fn expression_end(text: &str, start: usize) -> usize {
    let mut position = start;
    let mut first = true;

    for line in text[start..].split_inclusive('\n') {
        let content = line.trim_end();
        if !first {
            let starts_statement = line
                .chars()
                .next()
                .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$');
            if content.is_empty() || starts_statement {
                break;
            }
        }
        first = false;

        let line_end = position + line.trim_end_matches(['\n', '\r']).len();
        position += line.len();
        if content.ends_with(';') {
            return line_end;
        }
        if position >= text.len() {
            return line_end;
        }
    }

    // Back up over the newline that ended the last consumed line
    text[..position].trim_end_matches(['\n', '\r']).len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn only(text: &str) -> DeclarationBlock {
        let declarations = extract_declarations(text);
        assert_eq!(declarations.len(), 1, "expected one declaration in {text:?}");
        declarations.into_values().next().unwrap()
    }

    #[test]
    fn test_exported_function() {
        let decl = only("export function greet(name, greeting = \"hi\") {\n  return `${greeting} ${name}`;\n}\n");
        assert_eq!(decl.name, "greet");
        assert_eq!(decl.parameter_list_text, "name, greeting = \"hi\"");
        assert!(!decl.is_async);
        assert!(!decl.is_generator);
        assert!(decl.text.starts_with("function greet("));
        assert!(decl.text.ends_with('}'));
        assert_eq!(
            decl.body,
            DeclarationBody::Block("\n  return `${greeting} ${name}`;\n}".to_string())
        );
    }

    #[test]
    fn test_async_function() {
        let decl = only("export async function load(url) {\n  return await fetch(url);\n}\n");
        assert!(decl.is_async);
        assert_eq!(decl.text, "async function load(url) {\n  return await fetch(url);\n}");
    }

    #[test]
    fn test_generator_function() {
        let decl = only("export function* ids() {\n  yield 1;\n}\n");
        assert_eq!(decl.name, "ids");
        assert!(decl.is_generator);
        assert_eq!(decl.parameter_list_text, "");
    }

    #[test]
    fn test_generator_star_attached_to_name() {
        let decl = only("function *walk(node) {\n  yield node;\n}\n");
        assert_eq!(decl.name, "walk");
        assert!(decl.is_generator);
    }

    #[test]
    fn test_arrow_without_parameters() {
        let decl = only("export const now = () => {\n  return Date.now();\n}\n");
        assert_eq!(decl.name, "now");
        assert_eq!(decl.parameter_list_text, "");
        assert_eq!(decl.text, "const now = () => {\n  return Date.now();\n}");
    }

    #[test]
    fn test_async_arrow_with_parameters() {
        let decl = only("export const fileContentFromUrl = async (url, options) => {\n  return url;\n};\n");
        assert_eq!(decl.name, "fileContentFromUrl");
        assert!(decl.is_async);
        assert_eq!(decl.parameter_list_text, "url, options");
        // Trailing semicolon belongs to the end line but not to the span
        assert!(decl.text.ends_with('}'));
    }

    #[test]
    fn test_let_arrow_with_bare_parameter() {
        let decl = only("let double = x => {\n  return x * 2;\n}\n");
        assert_eq!(decl.name, "double");
        assert_eq!(decl.parameter_list_text, "x");
    }

    #[test]
    fn test_async_identifier_prefix_is_not_async() {
        let decl = only("const asyncThing = value => {\n  return value;\n}\n");
        assert_eq!(decl.name, "asyncThing");
        assert!(!decl.is_async);
        assert_eq!(decl.parameter_list_text, "value");
    }

    #[test]
    fn test_expression_arrow() {
        let decl = only("export const foo = () => 1;\n");
        assert_eq!(decl.name, "foo");
        assert_eq!(decl.body, DeclarationBody::Expression("1".to_string()));
        assert_eq!(decl.text, "const foo = () => 1;");
    }

    #[test]
    fn test_multiline_expression_arrow() {
        let text = "export const sum = (a, b) =>\n  a +\n  b;\nexport const one = () => 1;\n";
        let declarations = extract_declarations(text);
        assert_eq!(
            declarations["sum"].body,
            DeclarationBody::Expression("a +\n  b".to_string())
        );
        assert_eq!(
            declarations["one"].body,
            DeclarationBody::Expression("1".to_string())
        );
    }

    #[test]
    fn test_expression_without_semicolon_stops_at_next_statement() {
        let text = "export const a = () => 1\nexport const b = () => 2\n";
        let declarations = extract_declarations(text);
        assert_eq!(declarations["a"].body, DeclarationBody::Expression("1".to_string()));
        assert_eq!(declarations["b"].body, DeclarationBody::Expression("2".to_string()));
    }

    #[test]
    fn test_nested_object_literal_does_not_end_block() {
        let text = "export function config() {\n  const options = {\n    retries: 2,\n  };\n  return options;\n}\n\nexport function other() {\n  return 2;\n}\n";
        let declarations = extract_declarations(text);
        assert_eq!(declarations.len(), 2);
        assert!(declarations["config"].text.contains("return options;"));
        assert!(!declarations["config"].text.contains("other"));
    }

    #[test]
    fn test_braces_inside_strings_are_tolerated() {
        let text = "export function render() {\n  const open = \"{\";\n  return open + \"}\";\n}\n";
        let decl = only(text);
        assert!(decl.text.ends_with("return open + \"}\";\n}"));
    }

    #[test]
    fn test_closing_paren_and_semicolon_end_line() {
        let text = "const wrapped = (value) => {\n  return value;\n});\n";
        let decl = only(text);
        assert_eq!(decl.text, "const wrapped = (value) => {\n  return value;\n}");
    }

    #[test]
    fn test_single_line_block() {
        let text = "export function one() { return 1; }\nexport function two() {\n  return 2;\n}\n";
        let declarations = extract_declarations(text);
        assert_eq!(declarations["one"].text, "function one() { return 1; }");
        assert_eq!(declarations["two"].text, "function two() {\n  return 2;\n}");
    }

    #[test]
    fn test_single_line_block_with_trailing_comment() {
        let text = "export function a() { return 1; } // one\n\nexport function b() {\n  return 2;\n}\n";
        let declarations = extract_declarations(text);
        assert_eq!(declarations.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(declarations["a"].text, "function a() { return 1; }");
        assert_eq!(declarations["b"].text, "function b() {\n  return 2;\n}");
    }

    #[test]
    fn test_unbounded_declaration_is_skipped() {
        let text = "export function broken() {\n  return 1;\n  // never closed at column 0\n  }";
        assert!(extract_declarations(text).is_empty());
    }

    #[test]
    fn test_indented_declarations_are_not_top_level() {
        let text = "export function outer() {\n  function inner() {\n    return 1;\n  }\n  return inner();\n}\n";
        let declarations = extract_declarations(text);
        assert_eq!(declarations.keys().collect::<Vec<_>>(), vec!["outer"]);
    }

    #[test]
    fn test_declarations_keep_file_order() {
        let text = "function b() {\n}\nconst a = () => {\n}\nexport async function c() {\n}\n";
        let names: Vec<_> = extract_declarations(text).into_keys().collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_non_function_constants_are_ignored() {
        let text = "export const LIMIT = 10;\nconst table = { a: 1 };\n";
        assert!(extract_declarations(text).is_empty());
    }

    #[test]
    fn test_multiline_parameter_list() {
        let text = "export function configure(\n  host,\n  port = 80\n) {\n  return host + port;\n}\n";
        let decl = only(text);
        assert_eq!(decl.parameter_list_text, "\n  host,\n  port = 80\n");
    }
}
