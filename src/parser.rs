// ABOUTME: Recursive-descent parser building a module AST from the lexer's token stream

use crate::ast::{is_reserved_name, Case, Expr, Function, Module, Param, TestSpec, TypeName};
use crate::error::AislError;
use crate::lexer::{tokenize, Token};

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, pos: 0 }
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&Token::Eof)
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens.get(self.pos).cloned().unwrap_or(Token::Eof);
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn unexpected(&self, what: &str) -> AislError {
        AislError::Parse(format!("expected {what}, got {:?}", self.peek()))
    }

    fn expect_lparen(&mut self) -> Result<(), AislError> {
        if matches!(self.peek(), Token::LParen) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected("'('"))
        }
    }

    fn expect_rparen(&mut self) -> Result<(), AislError> {
        if matches!(self.peek(), Token::RParen) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected("')'"))
        }
    }

    fn expect_symbol(&mut self) -> Result<String, AislError> {
        match self.advance() {
            Token::Symbol(s) => Ok(s),
            other => Err(AislError::Parse(format!("expected symbol, got {other:?}"))),
        }
    }

    fn expect_exact_symbol(&mut self, text: &str) -> Result<(), AislError> {
        let s = self.expect_symbol()?;
        if s == text {
            Ok(())
        } else {
            Err(AislError::Parse(format!("expected '{text}', got '{s}'")))
        }
    }

    fn expect_string(&mut self) -> Result<String, AislError> {
        match self.advance() {
            Token::StringLit(s) => Ok(s),
            other => Err(AislError::Parse(format!(
                "expected string literal, got {other:?}"
            ))),
        }
    }

    fn expect_type(&mut self) -> Result<TypeName, AislError> {
        let s = self.expect_symbol()?;
        TypeName::from_keyword(&s).ok_or_else(|| AislError::Parse(format!("unknown type: {s}")))
    }

    fn expect_non_reserved_name(&mut self) -> Result<String, AislError> {
        let name = self.expect_symbol()?;
        if is_reserved_name(&name) {
            return Err(AislError::Parse(format!(
                "'{name}' is a reserved type keyword; use a descriptive name instead"
            )));
        }
        Ok(name)
    }

    /// Consumes a fully-parenthesized form without interpreting it; used for
    /// `(mock ...)` clauses, which are parsed but ignored by the runner.
    fn skip_balanced(&mut self) -> Result<(), AislError> {
        let mut depth: i32 = 1;
        loop {
            match self.advance() {
                Token::LParen | Token::LBracket | Token::LBrace => depth += 1,
                Token::RParen | Token::RBracket | Token::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                Token::Eof => return Err(AislError::Parse("unexpected end of input".to_string())),
                _ => {}
            }
        }
    }

    // ---- expressions ----

    fn parse_expr(&mut self) -> Result<Expr, AislError> {
        match self.peek().clone() {
            Token::IntLit(i) => {
                self.advance();
                Ok(Expr::LitInt(i))
            }
            Token::FloatLit(f) => {
                self.advance();
                Ok(Expr::LitFloat(f))
            }
            Token::DecimalLit(s) => {
                self.advance();
                Ok(Expr::LitDecimal(s))
            }
            Token::StringLit(s) => {
                self.advance();
                Ok(Expr::LitString(s))
            }
            Token::BoolLit(b) => {
                self.advance();
                Ok(Expr::LitBool(b))
            }
            Token::Symbol(s) => {
                self.advance();
                if s == "unit" {
                    Ok(Expr::LitUnit)
                } else {
                    Ok(Expr::Var(s))
                }
            }
            Token::LBracket => self.parse_array_literal(),
            Token::LBrace => self.parse_map_literal(),
            Token::LParen => self.parse_paren_expr(),
            other => Err(AislError::Parse(format!(
                "unexpected token in expression: {other:?}"
            ))),
        }
    }

    fn parse_array_literal(&mut self) -> Result<Expr, AislError> {
        self.advance(); // '['
        let mut items = Vec::new();
        while !matches!(self.peek(), Token::RBracket) {
            items.push(self.parse_expr()?);
        }
        self.advance(); // ']'
        Ok(Expr::LitArray(items))
    }

    fn parse_map_literal(&mut self) -> Result<Expr, AislError> {
        self.advance(); // '{'
        let mut pairs = Vec::new();
        while !matches!(self.peek(), Token::RBrace) {
            let key = self.parse_expr()?;
            let value = self.parse_expr()?;
            pairs.push((key, value));
        }
        self.advance(); // '}'
        Ok(Expr::LitMap(pairs))
    }

    fn parse_body_until_rparen(&mut self) -> Result<Vec<Expr>, AislError> {
        let mut body = Vec::new();
        while !matches!(self.peek(), Token::RParen) {
            body.push(self.parse_expr()?);
        }
        self.expect_rparen()?;
        Ok(body)
    }

    fn parse_paren_expr(&mut self) -> Result<Expr, AislError> {
        self.advance(); // '('
        let head = self.expect_symbol()?;
        match head.as_str() {
            "set" => {
                let name = self.expect_non_reserved_name()?;
                let ty = self.expect_type()?;
                let value = self.parse_expr()?;
                self.expect_rparen()?;
                Ok(Expr::Set(name, ty, Box::new(value)))
            }
            "ret" | "return" => {
                let value = self.parse_expr()?;
                self.expect_rparen()?;
                Ok(Expr::Return(Box::new(value)))
            }
            "if" => {
                let cond = self.parse_expr()?;
                let mut items = Vec::new();
                while !matches!(self.peek(), Token::RParen) {
                    items.push(self.parse_expr()?);
                }
                self.expect_rparen()?;
                let else_body = match items.last() {
                    Some(Expr::Call(name, _)) if name == "else" => {
                        let Some(Expr::Call(_, args)) = items.pop() else {
                            unreachable!()
                        };
                        Some(args)
                    }
                    _ => None,
                };
                Ok(Expr::If(Box::new(cond), items, else_body))
            }
            "cond" => {
                let mut branches = Vec::new();
                while !matches!(self.peek(), Token::RParen) {
                    self.expect_lparen()?;
                    let cond = self.parse_expr()?;
                    let body = self.parse_body_until_rparen()?;
                    branches.push((cond, body));
                }
                self.expect_rparen()?;
                if branches.is_empty() {
                    return Err(AislError::Parse("cond with no branches".to_string()));
                }
                Ok(Expr::Cond(branches))
            }
            "while" => {
                let cond = self.parse_expr()?;
                let body = self.parse_body_until_rparen()?;
                Ok(Expr::While(Box::new(cond), body))
            }
            "loop" => {
                let body = self.parse_body_until_rparen()?;
                Ok(Expr::Loop(body))
            }
            "for-each" => {
                let var = self.expect_non_reserved_name()?;
                let ty = self.expect_type()?;
                let coll = self.parse_expr()?;
                let body = self.parse_body_until_rparen()?;
                Ok(Expr::ForEach(var, ty, Box::new(coll), body))
            }
            "break" => {
                self.expect_rparen()?;
                Ok(Expr::Break)
            }
            "continue" => {
                self.expect_rparen()?;
                Ok(Expr::Continue)
            }
            "label" => {
                let name = self.expect_symbol()?;
                self.expect_rparen()?;
                Ok(Expr::Label(name))
            }
            "goto" => {
                let name = self.expect_symbol()?;
                self.expect_rparen()?;
                Ok(Expr::Goto(name))
            }
            "ifnot" => {
                let cond = self.parse_expr()?;
                let label = self.expect_symbol()?;
                self.expect_rparen()?;
                Ok(Expr::IfNot(Box::new(cond), label))
            }
            "and" => {
                let l = self.parse_expr()?;
                let r = self.parse_expr()?;
                self.expect_rparen()?;
                Ok(Expr::And(Box::new(l), Box::new(r)))
            }
            "or" => {
                let l = self.parse_expr()?;
                let r = self.parse_expr()?;
                self.expect_rparen()?;
                Ok(Expr::Or(Box::new(l), Box::new(r)))
            }
            "try" => {
                let mut body = Vec::new();
                loop {
                    if matches!(self.peek(), Token::LParen) {
                        if let Some(Token::Symbol(s)) = self.tokens.get(self.pos + 1) {
                            if s == "catch" {
                                break;
                            }
                        }
                    }
                    if matches!(self.peek(), Token::RParen) {
                        return Err(AislError::Parse(
                            "try block missing required catch clause".to_string(),
                        ));
                    }
                    body.push(self.parse_expr()?);
                }
                self.expect_lparen()?;
                self.expect_exact_symbol("catch")?;
                let catch_var = self.expect_non_reserved_name()?;
                let catch_ty = self.expect_type()?;
                let catch_body = self.parse_body_until_rparen()?;
                self.expect_rparen()?;
                Ok(Expr::Try(body, catch_var, catch_ty, catch_body))
            }
            name => {
                let mut args = Vec::new();
                while !matches!(self.peek(), Token::RParen) {
                    args.push(self.parse_expr()?);
                }
                self.expect_rparen()?;
                Ok(Expr::Call(name.to_string(), args))
            }
        }
    }

    // ---- module-level items ----

    fn parse_function(&mut self) -> Result<Function, AislError> {
        let name = self.expect_symbol()?;
        let mut params = Vec::new();
        loop {
            match self.peek() {
                Token::Symbol(s) if s == "->" => break,
                Token::Symbol(_) => {
                    let pname = self.expect_non_reserved_name()?;
                    let pty = self.expect_type()?;
                    params.push(Param { name: pname, ty: pty });
                }
                _ => return Err(self.unexpected("parameter name or '->'")),
            }
        }
        self.expect_exact_symbol("->")?;
        let return_type = self.expect_type()?;
        let body = self.parse_body_until_rparen()?;
        Ok(Function {
            name,
            params,
            return_type,
            body,
        })
    }

    fn parse_case(&mut self) -> Result<Case, AislError> {
        let description = self.expect_string()?;
        let mut inputs = None;
        let mut expect = None;
        while !matches!(self.peek(), Token::RParen) {
            self.expect_lparen()?;
            let tag = self.expect_symbol()?;
            match tag.as_str() {
                "input" => {
                    let mut exprs = Vec::new();
                    while !matches!(self.peek(), Token::RParen) {
                        exprs.push(self.parse_expr()?);
                    }
                    self.expect_rparen()?;
                    inputs = Some(exprs);
                }
                "expect" => {
                    let e = self.parse_expr()?;
                    self.expect_rparen()?;
                    expect = Some(e);
                }
                "mock" => self.skip_balanced()?,
                other => {
                    return Err(AislError::Parse(format!(
                        "unexpected clause in test case: {other}"
                    )))
                }
            }
        }
        self.expect_rparen()?;
        Ok(Case {
            description,
            inputs: inputs.unwrap_or_default(),
            expect: expect
                .ok_or_else(|| AislError::Parse("test case missing (expect ...)".to_string()))?,
        })
    }

    fn parse_test_spec(&mut self) -> Result<TestSpec, AislError> {
        let function = self.expect_symbol()?;
        let mut cases = Vec::new();
        while !matches!(self.peek(), Token::RParen) {
            self.expect_lparen()?;
            self.expect_exact_symbol("case")?;
            cases.push(self.parse_case()?);
        }
        self.expect_rparen()?;
        Ok(TestSpec { function, cases })
    }

    fn parse_module(&mut self) -> Result<Module, AislError> {
        self.expect_lparen()?;
        self.expect_exact_symbol("module")?;
        let name = self.expect_symbol()?;
        let mut module = Module {
            name,
            ..Module::default()
        };
        while !matches!(self.peek(), Token::RParen) {
            self.expect_lparen()?;
            let tag = self.expect_symbol()?;
            match tag.as_str() {
                "import" => {
                    let imported = self.expect_symbol()?;
                    self.expect_rparen()?;
                    module.imports.push(imported);
                }
                "fn" => module.functions.push(self.parse_function()?),
                "test-spec" => module.test_specs.push(self.parse_test_spec()?),
                "meta-note" => {
                    let text = self.expect_string()?;
                    self.expect_rparen()?;
                    module.meta_note = Some(text);
                }
                other => {
                    return Err(AislError::Parse(format!(
                        "unexpected module item: {other}"
                    )))
                }
            }
        }
        self.expect_rparen()?;
        Ok(module)
    }
}

pub fn parse(source: &str) -> Result<Module, AislError> {
    let tokens = tokenize(source)?;
    let mut parser = Parser::new(tokens);
    let module = parser.parse_module()?;
    if !matches!(parser.peek(), Token::Eof) {
        return Err(AislError::Parse(format!(
            "unexpected trailing tokens starting at {:?}",
            parser.peek()
        )));
    }
    Ok(module)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_factorial_module() {
        let src = r#"(module t (fn fact n int -> int
          (if (eq n 0) (ret 1))
          (ret (mul n (fact (sub n 1)))))
        (fn main -> int (ret (fact 5))))"#;
        let module = parse(src).unwrap();
        assert_eq!(module.name, "t");
        assert_eq!(module.functions.len(), 2);
        assert_eq!(module.functions[0].name, "fact");
        assert_eq!(module.functions[0].params.len(), 1);
        assert_eq!(module.functions[0].params[0].name, "n");
        assert_eq!(module.functions[0].params[0].ty, TypeName::Int);
    }

    #[test]
    fn parses_if_with_else() {
        let src = r#"(module t (fn f -> int (if true (ret 1) (else (ret 2)))))"#;
        let module = parse(src).unwrap();
        match &module.functions[0].body[0] {
            Expr::If(_, then_body, Some(else_body)) => {
                assert_eq!(then_body.len(), 1);
                assert_eq!(else_body.len(), 1);
            }
            other => panic!("expected If, got {other:?}"),
        }
    }

    #[test]
    fn parses_try_catch() {
        let src = r#"(module t (fn f -> int
          (try (set x int (div 10 0))
               (catch e string (print "caught: ") (println e)))
          (ret 0)))"#;
        let module = parse(src).unwrap();
        match &module.functions[0].body[0] {
            Expr::Try(body, var, ty, catch_body) => {
                assert_eq!(body.len(), 1);
                assert_eq!(var, "e");
                assert_eq!(*ty, TypeName::String);
                assert_eq!(catch_body.len(), 2);
            }
            other => panic!("expected Try, got {other:?}"),
        }
    }

    #[test]
    fn try_without_catch_is_parse_error() {
        let src = r#"(module t (fn f -> int (try (set x int 1))))"#;
        assert!(parse(src).is_err());
    }

    #[test]
    fn cond_with_no_branches_is_parse_error() {
        let src = r#"(module t (fn f -> int (cond)))"#;
        assert!(parse(src).is_err());
    }

    #[test]
    fn reserved_type_name_as_param_is_parse_error() {
        let src = r#"(module t (fn f int int -> int (ret 1)))"#;
        let err = parse(src).unwrap_err();
        assert!(matches!(err, AislError::Parse(_)));
    }

    #[test]
    fn parses_array_and_map_literals() {
        let src = r#"(module t (fn f -> array (ret [1 2 3])) (fn g -> map (ret {"a" 1 "b" 2})))"#;
        let module = parse(src).unwrap();
        match &module.functions[0].body[0] {
            Expr::Return(inner) => assert!(matches!(**inner, Expr::LitArray(_))),
            other => panic!("unexpected: {other:?}"),
        }
        match &module.functions[1].body[0] {
            Expr::Return(inner) => assert!(matches!(**inner, Expr::LitMap(_))),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn parses_test_spec_with_mock_ignored() {
        let src = r#"(module t
          (fn add a int b int -> int (ret (add a b)))
          (test-spec add
            (case "pos" (input 2 3) (expect 5) (mock (foo (bar 1 2))))
            (case "neg" (input -5 -3) (expect -8))))"#;
        let module = parse(src).unwrap();
        assert_eq!(module.test_specs.len(), 1);
        assert_eq!(module.test_specs[0].cases.len(), 2);
        assert_eq!(module.test_specs[0].cases[0].inputs.len(), 2);
    }

    #[test]
    fn parses_import_and_meta_note() {
        let src = r#"(module t (import util) (meta-note "hello") (fn main -> int (ret 0)))"#;
        let module = parse(src).unwrap();
        assert_eq!(module.imports, vec!["util".to_string()]);
        assert_eq!(module.meta_note, Some("hello".to_string()));
    }

    #[test]
    fn trailing_tokens_are_a_parse_error() {
        let src = r#"(module t (fn main -> int (ret 0))) (extra)"#;
        assert!(parse(src).is_err());
    }
}
