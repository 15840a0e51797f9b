//! Restricted arithmetic evaluator.
//!
//! Grammar (lowest to highest precedence):
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/' | '%') unary)*
//! unary   := ('+' | '-') unary | power
//! power   := primary ('^' unary)?
//! primary := number | constant | function '(' args ')' | '(' expr ')'
//! ```
//!
//! Only the identifiers in [`FUNCTIONS`] and [`CONSTANTS`] are accepted.
//! Anything else is rejected as a security error before evaluation.

use crate::extract::Params;
use crate::tools::{ToolContext, ToolOutput};
use crate::types::{AppError, Result};
use serde_json::json;

/// Allowed functions and their arity
pub const FUNCTIONS: &[(&str, usize)] = &[
    ("sqrt", 1),
    ("sin", 1),
    ("cos", 1),
    ("tan", 1),
    ("asin", 1),
    ("acos", 1),
    ("atan", 1),
    ("log", 1),
    ("ln", 1),
    ("log10", 1),
    ("exp", 1),
    ("abs", 1),
    ("floor", 1),
    ("ceil", 1),
    ("round", 1),
    ("pow", 2),
    ("min", 2),
    ("max", 2),
];

pub const CONSTANTS: &[(&str, f64)] = &[
    ("pi", std::f64::consts::PI),
    ("e", std::f64::consts::E),
    ("tau", std::f64::consts::TAU),
];

/// Longest expression accepted, in characters.
pub const MAX_EXPRESSION_LEN: usize = 512;

/// Deepest nesting of parentheses, signs and exponents.
pub const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Op(char),
    LParen,
    RParen,
    Comma,
}

fn tokenize(input: &str) -> Result<Vec<Token>> {
    let chars: Vec<char> = input.chars().collect();
    if chars.len() > MAX_EXPRESSION_LEN {
        return Err(AppError::ToolExecution(format!(
            "Expression is too long ({} characters, limit {MAX_EXPRESSION_LEN})",
            chars.len()
        )));
    }
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let text: String = chars[start..i].iter().collect();
                let n = text
                    .parse::<f64>()
                    .map_err(|_| AppError::ToolExecution(format!("Invalid number: {text}")))?;
                tokens.push(Token::Number(n));
            }
            c if c.is_ascii_alphabetic() => {
                let start = i;
                while i < chars.len() && chars[i].is_ascii_alphanumeric() {
                    i += 1;
                }
                let ident: String = chars[start..i].iter().collect::<String>().to_lowercase();
                let known = FUNCTIONS.iter().any(|(f, _)| *f == ident)
                    || CONSTANTS.iter().any(|(k, _)| *k == ident);
                if !known {
                    return Err(AppError::Security(format!(
                        "Disallowed token in expression: '{ident}'"
                    )));
                }
                tokens.push(Token::Ident(ident));
            }
            '+' | '-' | '*' | '/' | '^' | '%' => {
                tokens.push(Token::Op(c));
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            ',' => {
                tokens.push(Token::Comma);
                i += 1;
            }
            other => {
                return Err(AppError::Security(format!(
                    "Disallowed character in expression: '{other}'"
                )));
            }
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn descend(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(AppError::ToolExecution(format!(
                "Expression is nested too deeply (limit {MAX_DEPTH})"
            )));
        }
        Ok(())
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn expect(&mut self, want: Token) -> Result<()> {
        match self.next() {
            Some(ref t) if *t == want => Ok(()),
            Some(t) => Err(malformed(&format!("expected {want:?}, found {t:?}"))),
            None => Err(malformed(&format!("expected {want:?} at end of input"))),
        }
    }

    fn expr(&mut self) -> Result<f64> {
        let mut value = self.term()?;
        while let Some(Token::Op(op @ ('+' | '-'))) = self.peek().cloned() {
            self.pos += 1;
            let rhs = self.term()?;
            value = if op == '+' { value + rhs } else { value - rhs };
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<f64> {
        let mut value = self.unary()?;
        while let Some(Token::Op(op @ ('*' | '/' | '%'))) = self.peek().cloned() {
            self.pos += 1;
            let rhs = self.unary()?;
            value = match op {
                '*' => value * rhs,
                _ if rhs == 0.0 => {
                    return Err(AppError::ToolExecution("Division by zero".to_string()))
                }
                '/' => value / rhs,
                _ => value % rhs,
            };
        }
        Ok(value)
    }

    // Every recursive path passes through here.
    fn unary(&mut self) -> Result<f64> {
        self.descend()?;
        let value = match self.peek() {
            Some(Token::Op('-')) => {
                self.pos += 1;
                self.unary().map(|v| -v)
            }
            Some(Token::Op('+')) => {
                self.pos += 1;
                self.unary()
            }
            _ => self.power(),
        };
        self.depth -= 1;
        value
    }

    fn power(&mut self) -> Result<f64> {
        let base = self.primary()?;
        if let Some(Token::Op('^')) = self.peek() {
            self.pos += 1;
            let exponent = self.unary()?;
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<f64> {
        match self.next() {
            Some(Token::Number(n)) => Ok(n),
            Some(Token::LParen) => {
                self.descend()?;
                let value = self.expr()?;
                self.expect(Token::RParen)?;
                self.depth -= 1;
                Ok(value)
            }
            Some(Token::Ident(name)) => {
                if let Some((_, value)) = CONSTANTS.iter().find(|(k, _)| *k == name) {
                    return Ok(*value);
                }
                let arity = FUNCTIONS
                    .iter()
                    .find(|(f, _)| *f == name)
                    .map(|(_, a)| *a)
                    .ok_or_else(|| AppError::Security(format!("Disallowed token: '{name}'")))?;
                self.expect(Token::LParen)?;
                let mut args = vec![self.expr()?];
                while let Some(Token::Comma) = self.peek() {
                    self.pos += 1;
                    args.push(self.expr()?);
                }
                self.expect(Token::RParen)?;
                if args.len() != arity {
                    return Err(AppError::ToolExecution(format!(
                        "{name} takes {arity} argument(s), got {}",
                        args.len()
                    )));
                }
                Ok(apply(&name, &args))
            }
            Some(t) => Err(malformed(&format!("unexpected {t:?}"))),
            None => Err(malformed("unexpected end of expression")),
        }
    }
}

fn apply(name: &str, args: &[f64]) -> f64 {
    let x = args[0];
    match name {
        "sqrt" => x.sqrt(),
        "sin" => x.sin(),
        "cos" => x.cos(),
        "tan" => x.tan(),
        "asin" => x.asin(),
        "acos" => x.acos(),
        "atan" => x.atan(),
        "log" | "ln" => x.ln(),
        "log10" => x.log10(),
        "exp" => x.exp(),
        "abs" => x.abs(),
        "floor" => x.floor(),
        "ceil" => x.ceil(),
        "round" => x.round(),
        "pow" => x.powf(args[1]),
        "min" => x.min(args[1]),
        "max" => x.max(args[1]),
        _ => f64::NAN,
    }
}

fn malformed(detail: &str) -> AppError {
    AppError::ToolExecution(format!("Could not parse expression: {detail}"))
}

/// Evaluate an arithmetic expression under the restricted grammar.
pub fn evaluate(expression: &str) -> Result<f64> {
    let tokens = tokenize(expression)?;
    if tokens.is_empty() {
        return Err(malformed("empty expression"));
    }

    let mut parser = Parser::new(tokens);
    let value = parser.expr()?;
    if let Some(extra) = parser.peek() {
        return Err(malformed(&format!("unexpected {extra:?}")));
    }
    if !value.is_finite() {
        return Err(AppError::ToolExecution(
            "Result is not a finite number (check the function domain)".to_string(),
        ));
    }
    Ok(value)
}

/// Render whole numbers without a trailing `.0`.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let s = format!("{value:.10}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

pub fn run(_ctx: &ToolContext, params: &Params) -> Result<ToolOutput> {
    let expression = params
        .text("expression")
        .ok_or_else(|| AppError::Parameter("No expression given".to_string()))?;
    let result = evaluate(expression)?;
    Ok(ToolOutput::new(
        json!({ "expression": expression, "result": result }),
        format!(
            "🧮 **Calculation Result:**\n`{} = {}`",
            expression,
            format_number(result)
        ),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence() {
        assert_eq!(evaluate("2 + 3 * 4").unwrap(), 14.0);
        assert_eq!(evaluate("(2 + 3) * 4").unwrap(), 20.0);
        assert_eq!(evaluate("2 ^ 3 ^ 2").unwrap(), 512.0);
        assert_eq!(evaluate("-2 ^ 2").unwrap(), -4.0);
        assert_eq!(evaluate("10 % 4").unwrap(), 2.0);
    }

    #[test]
    fn test_functions_and_constants() {
        assert_eq!(evaluate("sqrt(16)").unwrap(), 4.0);
        assert_eq!(evaluate("pow(2, 10)").unwrap(), 1024.0);
        assert_eq!(evaluate("max(3, 7) - min(3, 7)").unwrap(), 4.0);
        assert!((evaluate("cos(pi)").unwrap() + 1.0).abs() < 1e-12);
        assert!((evaluate("ln(e)").unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_division_by_zero() {
        let err = evaluate("1/0").unwrap_err();
        assert!(matches!(err, AppError::ToolExecution(_)));
        assert!(evaluate("5 % 0").is_err());
    }

    #[test]
    fn test_disallowed_tokens_are_security_errors() {
        assert!(matches!(
            evaluate("__import__('os')").unwrap_err(),
            AppError::Security(_)
        ));
        assert!(matches!(
            evaluate("system(1)").unwrap_err(),
            AppError::Security(_)
        ));
        assert!(matches!(evaluate("2 = 2").unwrap_err(), AppError::Security(_)));
    }

    #[test]
    fn test_malformed_input() {
        assert!(evaluate("2 +").is_err());
        assert!(evaluate("(1 + 2").is_err());
        assert!(evaluate("1 2").is_err());
        assert!(evaluate("").is_err());
        assert!(evaluate("sqrt(1, 2)").is_err());
    }

    #[test]
    fn test_deep_nesting_is_rejected() {
        let nested = format!("{}1{}", "(".repeat(20), ")".repeat(20));
        assert_eq!(evaluate(&nested).unwrap(), 1.0);

        let deep = format!("{}1{}", "(".repeat(200), ")".repeat(200));
        let err = evaluate(&deep).unwrap_err();
        assert!(matches!(err, AppError::ToolExecution(ref m) if m.contains("nested too deeply")));

        let signs = format!("{}1", "-".repeat(200));
        assert!(matches!(evaluate(&signs).unwrap_err(), AppError::ToolExecution(_)));

        let tower = vec!["2"; 150].join("^");
        assert!(matches!(evaluate(&tower).unwrap_err(), AppError::ToolExecution(_)));
    }

    #[test]
    fn test_long_expression_is_rejected() {
        let long = vec!["1"; 400].join("+");
        let err = evaluate(&long).unwrap_err();
        assert!(matches!(err, AppError::ToolExecution(ref m) if m.contains("too long")));

        let fits = vec!["1"; 100].join("+");
        assert_eq!(evaluate(&fits).unwrap(), 100.0);
    }

    #[test]
    fn test_domain_errors() {
        assert!(evaluate("sqrt(-1)").is_err());
        assert!(evaluate("ln(0)").is_err());
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(120.0), "120");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(-3.0), "-3");
    }
}
