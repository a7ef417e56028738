//! AST and recursive-descent parser for the ALG surface language.

use std::fmt;

use crate::lexer::{Token, TokenKind};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Program {
    pub functions: Vec<Func>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Func {
    pub name: String,
    pub body: Vec<Stmt>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VarType {
    Int,
    Long,
    String,
    Char,
}

impl VarType {
    fn from_keyword(kw: &str) -> Option<VarType> {
        Some(match kw {
            "int" => VarType::Int,
            "long" => VarType::Long,
            "string" => VarType::String,
            "char" => VarType::Char,
            _ => return None,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Stmt {
    VarDecl {
        vtype: VarType,
        name: String,
    },
    Assign {
        name: String,
        expr: Expr,
    },
    While {
        cond: Expr,
        body: Vec<Stmt>,
    },
    If {
        cond: Expr,
        then_body: Vec<Stmt>,
        else_body: Option<Vec<Stmt>>,
    },
    Break,
    PrintInt(Expr),
    PrintStr(String),
    PrintChar(Expr),
    Call {
        name: String,
        args: Vec<Expr>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BinOpKind {
    Add,
    Sub,
    Mul,
    Le,
    Eq,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    IntLit(i64),
    Var(String),
    BinOp {
        op: BinOpKind,
        a: Box<Expr>,
        b: Box<Expr>,
    },
    Call {
        name: String,
        args: Vec<Expr>,
    },
}

#[derive(Debug)]
pub struct ParseError {
    pub msg: String,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}:{}", self.msg, self.line, self.col)
    }
}

impl std::error::Error for ParseError {}

pub struct Parser {
    tokens: Vec<Token>,
    i: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, i: 0 }
    }

    fn err(&self, msg: impl Into<String>) -> ParseError {
        let (line, col) = match self.tokens.get(self.i).or_else(|| self.tokens.last()) {
            Some(t) => (t.line, t.col),
            None => (1, 1),
        };
        ParseError {
            msg: msg.into(),
            line,
            col,
        }
    }

    fn cur(&self) -> Result<&Token, ParseError> {
        self.tokens
            .get(self.i)
            .ok_or_else(|| self.err("unexpected end of input"))
    }

    fn at_end(&self) -> bool {
        self.i >= self.tokens.len()
    }

    /// True when the current token's spelling matches `value`.
    fn peek_is(&self, value: &str) -> bool {
        self.tokens.get(self.i).is_some_and(|t| t.value == value)
    }

    fn eat_kind(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        let t = self.cur()?;
        if t.kind != kind {
            return Err(self.err(format!("expected {kind:?}, found {:?}", t.value)));
        }
        let t = t.clone();
        self.i += 1;
        Ok(t)
    }

    fn eat_value(&mut self, value: &str) -> Result<Token, ParseError> {
        let t = self.cur()?;
        if t.value != value {
            return Err(self.err(format!("expected {value:?}, found {:?}", t.value)));
        }
        let t = t.clone();
        self.i += 1;
        Ok(t)
    }

    pub fn parse(mut self) -> Result<Program, ParseError> {
        let mut functions = Vec::new();
        while !self.at_end() {
            functions.push(self.parse_func()?);
        }
        Ok(Program { functions })
    }

    fn parse_func(&mut self) -> Result<Func, ParseError> {
        self.eat_value("func")?;
        let name = self.eat_kind(TokenKind::Ident)?.value;
        self.eat_value("(")?;
        self.eat_value(")")?;
        let body = self.parse_block()?;
        Ok(Func { name, body })
    }

    fn parse_block(&mut self) -> Result<Vec<Stmt>, ParseError> {
        self.eat_value("{")?;
        let mut body = Vec::new();
        while !self.peek_is("}") {
            body.push(self.parse_stmt()?);
        }
        self.eat_value("}")?;
        Ok(body)
    }

    fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        let t = self.cur()?.clone();
        if t.kind == TokenKind::Keyword {
            if let Some(vtype) = VarType::from_keyword(&t.value) {
                self.i += 1;
                let name = self.eat_kind(TokenKind::Ident)?.value;
                self.eat_value(";")?;
                return Ok(Stmt::VarDecl { vtype, name });
            }
            match t.value.as_str() {
                "break" => {
                    self.i += 1;
                    self.eat_value(";")?;
                    return Ok(Stmt::Break);
                }
                "if" => {
                    self.i += 1;
                    self.eat_value("(")?;
                    let cond = self.parse_expr()?;
                    self.eat_value(")")?;
                    let then_body = self.parse_block()?;
                    let else_body = if self.peek_is("else") {
                        self.eat_value("else")?;
                        Some(self.parse_block()?)
                    } else {
                        None
                    };
                    return Ok(Stmt::If {
                        cond,
                        then_body,
                        else_body,
                    });
                }
                "while" => {
                    self.i += 1;
                    self.eat_value("(")?;
                    let cond = self.parse_expr()?;
                    self.eat_value(")")?;
                    let body = self.parse_block()?;
                    return Ok(Stmt::While { cond, body });
                }
                "printInt" => {
                    self.i += 1;
                    self.eat_value("(")?;
                    let e = self.parse_expr()?;
                    self.eat_value(")")?;
                    self.eat_value(";")?;
                    return Ok(Stmt::PrintInt(e));
                }
                "print" => {
                    // print("...") is a string print; print(expr) a char
                    self.i += 1;
                    self.eat_value("(")?;
                    if self.cur()?.kind == TokenKind::Str {
                        let s = self.eat_kind(TokenKind::Str)?.value;
                        self.eat_value(")")?;
                        self.eat_value(";")?;
                        return Ok(Stmt::PrintStr(s));
                    }
                    let e = self.parse_expr()?;
                    self.eat_value(")")?;
                    self.eat_value(";")?;
                    return Ok(Stmt::PrintChar(e));
                }
                _ => return Err(self.err(format!("unexpected keyword {:?}", t.value))),
            }
        }
        if t.kind == TokenKind::Ident {
            let name = self.eat_kind(TokenKind::Ident)?.value;
            // procedure call or assignment
            if self.peek_is("(") {
                let args = self.parse_call_args()?;
                self.eat_value(";")?;
                return Ok(Stmt::Call { name, args });
            }
            self.eat_value("=")?;
            let expr = self.parse_expr()?;
            self.eat_value(";")?;
            return Ok(Stmt::Assign { name, expr });
        }
        Err(self.err(format!("unexpected token {:?}", t.value)))
    }

    fn parse_call_args(&mut self) -> Result<Vec<Expr>, ParseError> {
        self.eat_value("(")?;
        let mut args = Vec::new();
        if !self.peek_is(")") {
            args.push(self.parse_expr()?);
            while self.peek_is(",") {
                self.eat_value(",")?;
                args.push(self.parse_expr()?);
            }
        }
        self.eat_value(")")?;
        Ok(args)
    }

    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        let t = self.cur()?.clone();
        match t.kind {
            TokenKind::Int => {
                self.i += 1;
                let value = t
                    .value
                    .parse::<i64>()
                    .map_err(|_| self.err(format!("integer literal out of range: {}", t.value)))?;
                Ok(Expr::IntLit(value))
            }
            TokenKind::Keyword if t.value == "true" => {
                self.i += 1;
                Ok(Expr::IntLit(1))
            }
            TokenKind::Ident => {
                self.i += 1;
                if t.value == "EOF" {
                    return Ok(Expr::IntLit(0));
                }
                if self.peek_is("(") {
                    let args = self.parse_call_args()?;
                    return Ok(Expr::Call {
                        name: t.value,
                        args,
                    });
                }
                Ok(Expr::Var(t.value))
            }
            // A string literal in expression position only occurs inside
            // print(); it carries no value of its own.
            TokenKind::Str => {
                self.i += 1;
                Ok(Expr::IntLit(0))
            }
            _ => Err(self.err(format!("expected a term, found {:?}", t.value))),
        }
    }

    fn parse_mul(&mut self) -> Result<Expr, ParseError> {
        let mut e = self.parse_term()?;
        while self.peek_is("*") {
            self.eat_value("*")?;
            e = Expr::BinOp {
                op: BinOpKind::Mul,
                a: Box::new(e),
                b: Box::new(self.parse_term()?),
            };
        }
        Ok(e)
    }

    fn parse_add(&mut self) -> Result<Expr, ParseError> {
        let mut e = self.parse_mul()?;
        loop {
            let op = if self.peek_is("+") {
                BinOpKind::Add
            } else if self.peek_is("-") {
                BinOpKind::Sub
            } else {
                break;
            };
            self.i += 1;
            e = Expr::BinOp {
                op,
                a: Box::new(e),
                b: Box::new(self.parse_mul()?),
            };
        }
        Ok(e)
    }

    /// Additive expression with at most one trailing `<=` or `==`.
    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        let e = self.parse_add()?;
        let op = if self.peek_is("<=") {
            BinOpKind::Le
        } else if self.peek_is("==") {
            BinOpKind::Eq
        } else {
            return Ok(e);
        };
        self.i += 1;
        Ok(Expr::BinOp {
            op,
            a: Box::new(e),
            b: Box::new(self.parse_add()?),
        })
    }
}
