//! A small textual front-end for `stepscript`, so the CLI's `--file` flag
//! means something. Demo programs are built directly as [`crate::ast`] values
//! (see `programs/`) and never go through this parser; this exists purely
//! for hand-written `stepscript` source loaded from disk.

use crate::ast::{BinOp, Expr, FunctionDef, Program, RecordDef, Stmt, StmtKind, UnOp};

#[derive(Debug, Clone, PartialEq)]
enum Tok {
    Ident(String),
    Int(i64),
    Float(f64),
    Str(String),
    True,
    False,
    NoneLit,
    Fn,
    Record,
    Global,
    Let,
    If,
    Else,
    While,
    Return,
    Doc,
    And,
    Or,
    Not,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Colon,
    Semicolon,
    Dot,
    Assign,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Eof,
}

#[derive(Debug, thiserror::Error)]
#[error("stepscript parse error at line {line}: {msg}")]
pub struct ParseError {
    pub line: u32,
    pub msg: String,
}

fn lex(src: &str) -> Result<Vec<(Tok, u32)>, ParseError> {
    let mut out = Vec::new();
    let mut line: u32 = 1;
    let chars: Vec<char> = src.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            '\n' => {
                line += 1;
                i += 1;
            }
            c if c.is_whitespace() => i += 1,
            '#' => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            '(' => {
                out.push((Tok::LParen, line));
                i += 1;
            }
            ')' => {
                out.push((Tok::RParen, line));
                i += 1;
            }
            '{' => {
                out.push((Tok::LBrace, line));
                i += 1;
            }
            '}' => {
                out.push((Tok::RBrace, line));
                i += 1;
            }
            '[' => {
                out.push((Tok::LBracket, line));
                i += 1;
            }
            ']' => {
                out.push((Tok::RBracket, line));
                i += 1;
            }
            ',' => {
                out.push((Tok::Comma, line));
                i += 1;
            }
            ':' => {
                out.push((Tok::Colon, line));
                i += 1;
            }
            ';' => {
                out.push((Tok::Semicolon, line));
                i += 1;
            }
            '.' => {
                out.push((Tok::Dot, line));
                i += 1;
            }
            '+' => {
                out.push((Tok::Plus, line));
                i += 1;
            }
            '-' => {
                out.push((Tok::Minus, line));
                i += 1;
            }
            '*' => {
                out.push((Tok::Star, line));
                i += 1;
            }
            '/' => {
                out.push((Tok::Slash, line));
                i += 1;
            }
            '%' => {
                out.push((Tok::Percent, line));
                i += 1;
            }
            '=' if chars.get(i + 1) == Some(&'=') => {
                out.push((Tok::Eq, line));
                i += 2;
            }
            '=' => {
                out.push((Tok::Assign, line));
                i += 1;
            }
            '!' if chars.get(i + 1) == Some(&'=') => {
                out.push((Tok::NotEq, line));
                i += 2;
            }
            '<' if chars.get(i + 1) == Some(&'=') => {
                out.push((Tok::LtEq, line));
                i += 2;
            }
            '<' => {
                out.push((Tok::Lt, line));
                i += 1;
            }
            '>' if chars.get(i + 1) == Some(&'=') => {
                out.push((Tok::GtEq, line));
                i += 2;
            }
            '>' => {
                out.push((Tok::Gt, line));
                i += 1;
            }
            '"' => {
                let mut s = String::new();
                i += 1;
                while i < chars.len() && chars[i] != '"' {
                    s.push(chars[i]);
                    i += 1;
                }
                if i >= chars.len() {
                    return Err(ParseError { line, msg: "unterminated string literal".into() });
                }
                i += 1;
                out.push((Tok::Str(s), line));
            }
            c if c.is_ascii_digit() => {
                let start = i;
                let mut is_float = false;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    if chars[i] == '.' {
                        is_float = true;
                    }
                    i += 1;
                }
                let text: String = chars[start..i].iter().collect();
                if is_float {
                    let v: f64 = text
                        .parse()
                        .map_err(|_| ParseError { line, msg: format!("bad float literal '{text}'") })?;
                    out.push((Tok::Float(v), line));
                } else {
                    let v: i64 = text
                        .parse()
                        .map_err(|_| ParseError { line, msg: format!("bad int literal '{text}'") })?;
                    out.push((Tok::Int(v), line));
                }
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                let tok = match word.as_str() {
                    "fn" => Tok::Fn,
                    "record" => Tok::Record,
                    "global" => Tok::Global,
                    "let" => Tok::Let,
                    "if" => Tok::If,
                    "else" => Tok::Else,
                    "while" => Tok::While,
                    "return" => Tok::Return,
                    "doc" => Tok::Doc,
                    "and" => Tok::And,
                    "or" => Tok::Or,
                    "not" => Tok::Not,
                    "true" => Tok::True,
                    "false" => Tok::False,
                    "none" => Tok::NoneLit,
                    _ => Tok::Ident(word),
                };
                out.push((tok, line));
            }
            other => {
                return Err(ParseError { line, msg: format!("unexpected character '{other}'") });
            }
        }
    }
    out.push((Tok::Eof, line));
    Ok(out)
}

struct Parser {
    toks: Vec<(Tok, u32)>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Tok {
        &self.toks[self.pos].0
    }

    fn line(&self) -> u32 {
        self.toks[self.pos].1
    }

    fn advance(&mut self) -> Tok {
        let tok = self.toks[self.pos].0.clone();
        if self.pos + 1 < self.toks.len() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, want: &Tok) -> Result<(), ParseError> {
        if self.peek() == want {
            self.advance();
            Ok(())
        } else {
            Err(ParseError {
                line: self.line(),
                msg: format!("expected {want:?}, found {:?}", self.peek()),
            })
        }
    }

    fn expect_ident(&mut self) -> Result<String, ParseError> {
        match self.advance() {
            Tok::Ident(name) => Ok(name),
            other => Err(ParseError { line: self.line(), msg: format!("expected identifier, found {other:?}") }),
        }
    }

    fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut program = Program::default();
        while *self.peek() != Tok::Eof {
            match self.peek() {
                Tok::Record => program.records.push(self.parse_record()?),
                Tok::Fn => program.functions.push(self.parse_function()?),
                Tok::Global => {
                    self.advance();
                    let name = self.expect_ident()?;
                    self.expect(&Tok::Assign)?;
                    let expr = self.parse_expr()?;
                    self.expect(&Tok::Semicolon)?;
                    program.globals.push((name, expr));
                }
                other => {
                    return Err(ParseError { line: self.line(), msg: format!("expected a top-level item, found {other:?}") });
                }
            }
        }
        Ok(program)
    }

    fn parse_doc(&mut self) -> Result<Option<String>, ParseError> {
        if *self.peek() == Tok::Doc {
            self.advance();
            match self.advance() {
                Tok::Str(s) => Ok(Some(s)),
                other => Err(ParseError { line: self.line(), msg: format!("expected a doc string, found {other:?}") }),
            }
        } else {
            Ok(None)
        }
    }

    fn parse_record(&mut self) -> Result<RecordDef, ParseError> {
        self.expect(&Tok::Record)?;
        let name = self.expect_ident()?;
        self.expect(&Tok::LBrace)?;
        let mut fields = Vec::new();
        while *self.peek() != Tok::RBrace {
            fields.push(self.expect_ident()?);
            if *self.peek() == Tok::Comma {
                self.advance();
            }
        }
        self.expect(&Tok::RBrace)?;
        let doc = self.parse_doc()?;
        Ok(RecordDef { name, fields, doc })
    }

    fn parse_function(&mut self) -> Result<FunctionDef, ParseError> {
        self.expect(&Tok::Fn)?;
        let name = self.expect_ident()?;
        self.expect(&Tok::LParen)?;
        let mut params = Vec::new();
        while *self.peek() != Tok::RParen {
            params.push(self.expect_ident()?);
            if *self.peek() == Tok::Comma {
                self.advance();
            }
        }
        self.expect(&Tok::RParen)?;
        let doc = self.parse_doc()?;
        let body = self.parse_block()?;
        Ok(FunctionDef { name, params, body, doc })
    }

    fn parse_block(&mut self) -> Result<Vec<Stmt>, ParseError> {
        self.expect(&Tok::LBrace)?;
        let mut stmts = Vec::new();
        while *self.peek() != Tok::RBrace {
            stmts.push(self.parse_stmt()?);
        }
        self.expect(&Tok::RBrace)?;
        Ok(stmts)
    }

    fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        let line = self.line();
        match self.peek().clone() {
            Tok::If => {
                self.advance();
                let cond = self.parse_expr()?;
                let then_branch = self.parse_block()?;
                let else_branch = if *self.peek() == Tok::Else {
                    self.advance();
                    self.parse_block()?
                } else {
                    Vec::new()
                };
                Ok(Stmt::new(line, StmtKind::If(cond, then_branch, else_branch)))
            }
            Tok::While => {
                self.advance();
                let cond = self.parse_expr()?;
                let body = self.parse_block()?;
                Ok(Stmt::new(line, StmtKind::While(cond, body)))
            }
            Tok::Return => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(&Tok::Semicolon)?;
                Ok(Stmt::new(line, StmtKind::Return(expr)))
            }
            Tok::Let => {
                self.advance();
                let name = self.expect_ident()?;
                self.expect(&Tok::Assign)?;
                let expr = self.parse_expr()?;
                self.expect(&Tok::Semicolon)?;
                Ok(Stmt::new(line, StmtKind::Let(name, expr)))
            }
            _ => self.parse_assign_or_expr_stmt(line),
        }
    }

    fn parse_assign_or_expr_stmt(&mut self, line: u32) -> Result<Stmt, ParseError> {
        let target = self.parse_expr()?;
        if *self.peek() == Tok::Assign {
            self.advance();
            let value = self.parse_expr()?;
            self.expect(&Tok::Semicolon)?;
            return Ok(Stmt::new(line, assign_stmt(target, value)?));
        }
        self.expect(&Tok::Semicolon)?;
        Ok(Stmt::new(line, StmtKind::Expr(target)))
    }

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_and()?;
        while *self.peek() == Tok::Or {
            self.advance();
            let rhs = self.parse_and()?;
            lhs = Expr::BinOp(BinOp::Or, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_equality()?;
        while *self.peek() == Tok::And {
            self.advance();
            let rhs = self.parse_equality()?;
            lhs = Expr::BinOp(BinOp::And, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_equality(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_comparison()?;
        loop {
            let op = match self.peek() {
                Tok::Eq => BinOp::Eq,
                Tok::NotEq => BinOp::NotEq,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_comparison()?;
            lhs = Expr::BinOp(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_additive()?;
        loop {
            let op = match self.peek() {
                Tok::Lt => BinOp::Lt,
                Tok::LtEq => BinOp::LtEq,
                Tok::Gt => BinOp::Gt,
                Tok::GtEq => BinOp::GtEq,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_additive()?;
            lhs = Expr::BinOp(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_multiplicative()?;
        loop {
            let op = match self.peek() {
                Tok::Plus => BinOp::Add,
                Tok::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_multiplicative()?;
            lhs = Expr::BinOp(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Tok::Star => BinOp::Mul,
                Tok::Slash => BinOp::Div,
                Tok::Percent => BinOp::Mod,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_unary()?;
            lhs = Expr::BinOp(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        match self.peek() {
            Tok::Minus => {
                self.advance();
                Ok(Expr::UnOp(UnOp::Neg, Box::new(self.parse_unary()?)))
            }
            Tok::Not => {
                self.advance();
                Ok(Expr::UnOp(UnOp::Not, Box::new(self.parse_unary()?)))
            }
            _ => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.peek() {
                Tok::LBracket => {
                    self.advance();
                    let index = self.parse_expr()?;
                    self.expect(&Tok::RBracket)?;
                    expr = Expr::Index(Box::new(expr), Box::new(index));
                }
                Tok::Dot => {
                    self.advance();
                    let field = self.expect_ident()?;
                    expr = Expr::Field(Box::new(expr), field);
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match self.advance() {
            Tok::Int(i) => Ok(Expr::IntLit(i)),
            Tok::Float(f) => Ok(Expr::FloatLit(f)),
            Tok::Str(s) => Ok(Expr::StrLit(s)),
            Tok::True => Ok(Expr::BoolLit(true)),
            Tok::False => Ok(Expr::BoolLit(false)),
            Tok::NoneLit => Ok(Expr::NoneLit),
            Tok::LParen => {
                let mut items = Vec::new();
                if *self.peek() != Tok::RParen {
                    items.push(self.parse_expr()?);
                    let mut saw_comma = false;
                    while *self.peek() == Tok::Comma {
                        saw_comma = true;
                        self.advance();
                        if *self.peek() == Tok::RParen {
                            break;
                        }
                        items.push(self.parse_expr()?);
                    }
                    self.expect(&Tok::RParen)?;
                    if saw_comma {
                        return Ok(Expr::TupleLit(items));
                    }
                    return Ok(items.into_iter().next().expect("checked non-empty above"));
                }
                self.expect(&Tok::RParen)?;
                Ok(Expr::TupleLit(Vec::new()))
            }
            Tok::LBracket => {
                let mut items = Vec::new();
                while *self.peek() != Tok::RBracket {
                    items.push(self.parse_expr()?);
                    if *self.peek() == Tok::Comma {
                        self.advance();
                    }
                }
                self.expect(&Tok::RBracket)?;
                Ok(Expr::ListLit(items))
            }
            Tok::LBrace => {
                let mut pairs = Vec::new();
                while *self.peek() != Tok::RBrace {
                    let key = match self.advance() {
                        Tok::Str(s) => s,
                        Tok::Ident(s) => s,
                        other => return Err(ParseError { line: self.line(), msg: format!("expected a dict key, found {other:?}") }),
                    };
                    self.expect(&Tok::Colon)?;
                    let value = self.parse_expr()?;
                    pairs.push((key, value));
                    if *self.peek() == Tok::Comma {
                        self.advance();
                    }
                }
                self.expect(&Tok::RBrace)?;
                Ok(Expr::DictLit(pairs))
            }
            Tok::Ident(name) => {
                if *self.peek() == Tok::LParen {
                    self.advance();
                    let mut args = Vec::new();
                    while *self.peek() != Tok::RParen {
                        args.push(self.parse_expr()?);
                        if *self.peek() == Tok::Comma {
                            self.advance();
                        }
                    }
                    self.expect(&Tok::RParen)?;
                    Ok(Expr::Call(name, args))
                } else if *self.peek() == Tok::LBrace {
                    self.advance();
                    let mut fields = Vec::new();
                    while *self.peek() != Tok::RBrace {
                        let field = self.expect_ident()?;
                        self.expect(&Tok::Colon)?;
                        let value = self.parse_expr()?;
                        fields.push((field, value));
                        if *self.peek() == Tok::Comma {
                            self.advance();
                        }
                    }
                    self.expect(&Tok::RBrace)?;
                    Ok(Expr::RecordLit { type_name: name, fields })
                } else {
                    Ok(Expr::Var(name))
                }
            }
            other => Err(ParseError { line: self.line(), msg: format!("unexpected token {other:?}") }),
        }
    }
}

fn assign_stmt(target: Expr, value: Expr) -> Result<StmtKind, ParseError> {
    match target {
        Expr::Var(name) if name.ends_with("_g") => Ok(StmtKind::AssignGlobal(name, value)),
        Expr::Var(name) => Ok(StmtKind::Assign(name, value)),
        Expr::Index(base, index) => Ok(StmtKind::IndexAssign(*base, *index, value)),
        Expr::Field(base, field) => Ok(StmtKind::FieldAssign(*base, field, value)),
        other => Err(ParseError { line: 0, msg: format!("cannot assign to {other:?}") }),
    }
}

/// Parse `stepscript` source into a [`Program`].
pub fn parse(src: &str) -> Result<Program, ParseError> {
    let toks = lex(src)?;
    let mut parser = Parser { toks, pos: 0 };
    parser.parse_program()
}
