// SPDX-License-Identifier: MIT

//! Abstract Syntax Tree for condition expressions

/// A condition expression that passed validation
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Literal value
    Literal(Literal),
    /// Workflow variable reference, e.g. `__v0`
    Variable(String),
    /// Property access: object.property
    Member {
        object: Box<Expression>,
        property: String,
    },
    /// Indexing on a workflow variable: __v0[0], __v1['key']
    Index { variable: String, key: IndexKey },
    /// Whitelisted method call: receiver.method(arg?)
    MethodCall {
        receiver: Box<Expression>,
        method: String,
        args: Vec<Expression>,
    },
    /// Comparison expression: left op right
    Compare {
        left: Box<Expression>,
        op: CompareOp,
        right: Box<Expression>,
    },
    /// Logical AND
    And(Box<Expression>, Box<Expression>),
    /// Logical OR
    Or(Box<Expression>, Box<Expression>),
    /// Logical NOT
    Not(Box<Expression>),
    /// Unary minus
    Negate(Box<Expression>),
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// ===
    StrictEq,
    /// !==
    StrictNotEq,
    /// ==
    Eq,
    /// !=
    NotEq,
    /// >
    Gt,
    /// >=
    Gte,
    /// <
    Lt,
    /// <=
    Lte,
}

/// Literal values in expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// String contents as written between the quotes
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
    Undefined,
}

/// Key inside `[...]` on a workflow variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexKey {
    Position(u32),
    Key(String),
}

impl Expression {
    /// Workflow variables referenced anywhere in the expression, in order of appearance
    pub fn variables(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_variables(&mut out);
        out
    }

    fn collect_variables<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expression::Literal(_) => {}
            Expression::Variable(name) | Expression::Index { variable: name, .. } => {
                out.push(name)
            }
            Expression::Member { object, .. } => object.collect_variables(out),
            Expression::MethodCall { receiver, args, .. } => {
                receiver.collect_variables(out);
                for arg in args {
                    arg.collect_variables(out);
                }
            }
            Expression::Compare { left, right, .. }
            | Expression::And(left, right)
            | Expression::Or(left, right) => {
                left.collect_variables(out);
                right.collect_variables(out);
            }
            Expression::Not(inner) | Expression::Negate(inner) => inner.collect_variables(out),
        }
    }
}

impl std::fmt::Display for CompareOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompareOp::StrictEq => write!(f, "==="),
            CompareOp::StrictNotEq => write!(f, "!=="),
            CompareOp::Eq => write!(f, "=="),
            CompareOp::NotEq => write!(f, "!="),
            CompareOp::Gt => write!(f, ">"),
            CompareOp::Gte => write!(f, ">="),
            CompareOp::Lt => write!(f, "<"),
            CompareOp::Lte => write!(f, "<="),
        }
    }
}
