// ABOUTME: Module AST types produced by the parser and walked by the evaluator

/// A type annotation, as it may appear on a parameter, `set`, `for-each`
/// variable, or `catch` variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeName {
    Int,
    Float,
    Decimal,
    String,
    Bool,
    Unit,
    Array,
    Map,
    Json,
    Regex,
    Process,
    Socket,
    Channel,
    Function,
}

impl TypeName {
    pub fn from_keyword(s: &str) -> Option<Self> {
        Some(match s {
            "int" => TypeName::Int,
            "float" => TypeName::Float,
            "decimal" => TypeName::Decimal,
            "string" => TypeName::String,
            "bool" => TypeName::Bool,
            "unit" => TypeName::Unit,
            "array" => TypeName::Array,
            "map" => TypeName::Map,
            "json" => TypeName::Json,
            "regex" => TypeName::Regex,
            "process" => TypeName::Process,
            "socket" => TypeName::Socket,
            "channel" => TypeName::Channel,
            "function" => TypeName::Function,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TypeName::Int => "int",
            TypeName::Float => "float",
            TypeName::Decimal => "decimal",
            TypeName::String => "string",
            TypeName::Bool => "bool",
            TypeName::Unit => "unit",
            TypeName::Array => "array",
            TypeName::Map => "map",
            TypeName::Json => "json",
            TypeName::Regex => "regex",
            TypeName::Process => "process",
            TypeName::Socket => "socket",
            TypeName::Channel => "channel",
            TypeName::Function => "function",
        }
    }
}

/// Reserved type keywords may not be used as a variable/parameter/for-each/catch name.
pub fn is_reserved_name(s: &str) -> bool {
    TypeName::from_keyword(s).is_some()
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    LitInt(i64),
    LitFloat(f64),
    LitDecimal(String),
    LitString(String),
    LitBool(bool),
    LitUnit,
    LitArray(Vec<Expr>),
    LitMap(Vec<(Expr, Expr)>),
    Var(String),
    Call(String, Vec<Expr>),
    If(Box<Expr>, Vec<Expr>, Option<Vec<Expr>>),
    Cond(Vec<(Expr, Vec<Expr>)>),
    While(Box<Expr>, Vec<Expr>),
    Loop(Vec<Expr>),
    ForEach(String, TypeName, Box<Expr>, Vec<Expr>),
    Break,
    Continue,
    Set(String, TypeName, Box<Expr>),
    Return(Box<Expr>),
    Label(String),
    Goto(String),
    IfNot(Box<Expr>, String),
    Try(Vec<Expr>, String, TypeName, Vec<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: TypeName,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: TypeName,
    pub body: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    pub description: String,
    pub inputs: Vec<Expr>,
    pub expect: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestSpec {
    pub function: String,
    pub cases: Vec<Case>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Module {
    pub name: String,
    pub imports: Vec<String>,
    pub functions: Vec<Function>,
    pub test_specs: Vec<TestSpec>,
    pub meta_note: Option<String>,
}
