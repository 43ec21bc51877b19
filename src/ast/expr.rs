use crate::ast::{Select, Window};

/// Binary operators, as the grammar records them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    And,
    Or,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    Is,
    IsNot,
    Add,
    Sub,
    Mul,
    Div,
    /// Modulo (%)
    Rem,
    BitAnd,
    BitOr,
    ShiftLeft,
    ShiftRight,
    Concat,
    Like,
    Match,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::And => "AND",
            BinaryOp::Or => "OR",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "=",
            BinaryOp::Ne => "!=",
            BinaryOp::Is => "IS",
            BinaryOp::IsNot => "IS NOT",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::ShiftLeft => "<<",
            BinaryOp::ShiftRight => ">>",
            BinaryOp::Concat => "||",
            BinaryOp::Like => "LIKE",
            BinaryOp::Match => "MATCH",
        }
    }
}

impl std::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-x`
    Neg,
    /// `+x`
    Pos,
    /// `~x`
    BitNot,
    /// `NOT x`
    Not,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Pos => "+",
            UnaryOp::BitNot => "~",
            UnaryOp::Not => "NOT",
        }
    }
}

impl std::fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Conflict action carried by `RAISE(...)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaiseAction {
    Rollback,
    Abort,
    Fail,
    Ignore,
}

impl RaiseAction {
    pub fn as_str(self) -> &'static str {
        match self {
            RaiseAction::Rollback => "ROLLBACK",
            RaiseAction::Abort => "ABORT",
            RaiseAction::Fail => "FAIL",
            RaiseAction::Ignore => "IGNORE",
        }
    }
}

/// Integer literal payload.
///
/// Literals that fit a non-negative 32-bit integer carry the value; anything
/// larger keeps its source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntLiteral {
    Value(i32),
    Text(String),
}

impl IntLiteral {
    /// Classify an INTEGER token (decimal or `0x` hex).
    pub fn from_token(text: &str) -> Self {
        match parse_int32(text) {
            Some(v) => IntLiteral::Value(v),
            None => IntLiteral::Text(text.to_string()),
        }
    }
}

fn parse_int32(text: &str) -> Option<i32> {
    let bytes = text.as_bytes();
    if bytes.len() > 2
        && bytes[0] == b'0'
        && (bytes[1] == b'x' || bytes[1] == b'X')
        && bytes[2].is_ascii_hexdigit()
    {
        let digits = text[2..].trim_start_matches('0');
        if digits.len() > 8 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let value = if digits.is_empty() {
            0
        } else {
            u32::from_str_radix(digits, 16).ok()?
        };
        return i32::try_from(value).ok();
    }
    let digits = text.trim_start_matches('0');
    if digits.len() > 10 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.is_empty() {
        return Some(0);
    }
    digits.parse::<i64>().ok().and_then(|v| i32::try_from(v).ok())
}

/// Right-hand side of an IN expression.
#[derive(Debug, Clone, PartialEq)]
pub enum InRhs {
    Values(Vec<Expr>),
    Select(Box<Select>),
}

/// A function call, including aggregate and window calls.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    /// `None` for `f(*)`.
    pub args: Option<Vec<Expr>>,
    pub distinct: bool,
    /// Embedded `f(x ORDER BY y)`; sort flags are not kept.
    pub order_by: Option<Vec<Expr>>,
    /// OVER clause or FILTER-only marker.
    pub window: Option<Box<Window>>,
}

impl FunctionCall {
    pub fn new(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self {
            name: name.into(),
            args: Some(args),
            distinct: false,
            order_by: None,
            window: None,
        }
    }

    /// True when the call carries a real window (not just FILTER).
    pub fn is_window_call(&self) -> bool {
        self.window.as_ref().is_some_and(|w| !w.is_filter_only())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Integer(IntLiteral),
    Float(String),
    String(String),
    /// Raw `x'..'` token.
    Blob(String),
    Null,
    Boolean(bool),
    Name(String),
    /// `*`
    Star,
    Dot {
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `?`, `?NNN`, `:name`, `@name`, `$name`
    Parameter(String),
    Cast {
        expr: Box<Expr>,
        type_name: String,
    },
    /// WHEN/THEN pairs flattened into `list`, optionally followed by ELSE.
    Case {
        operand: Option<Box<Expr>>,
        list: Vec<Expr>,
    },
    /// `list` holds the low and high bounds.
    Between {
        expr: Box<Expr>,
        list: Vec<Expr>,
    },
    In {
        expr: Box<Expr>,
        rhs: InRhs,
    },
    Exists(Box<Select>),
    Subquery(Box<Select>),
    Collate {
        expr: Box<Expr>,
        collation: String,
    },
    Function(FunctionCall),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    IsNull(Box<Expr>),
    NotNull(Box<Expr>),
    /// `x IS [NOT] TRUE|FALSE`
    Truth {
        negated: bool,
        value: bool,
        operand: Box<Expr>,
    },
    Raise {
        action: RaiseAction,
        message: Option<String>,
    },
    /// Row value `(a, b, ...)`.
    Vector(Vec<Expr>),
    /// Expression tagged with the source text it was parsed from.
    Span {
        text: String,
        expr: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Operator without a dedicated variant, kept by its numeric code.
    Unknown {
        op: i32,
    },
}

impl Expr {
    pub fn name(name: impl Into<String>) -> Self {
        Expr::Name(name.into())
    }

    pub fn int(value: i32) -> Self {
        Expr::Integer(IntLiteral::Value(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::String(value.into())
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn function(call: FunctionCall) -> Self {
        Expr::Function(call)
    }
}
