//! The instruction set a method body is made of (spec.md §4.2).
//!
//! Stack-effect opcodes (`ldloc`, `add`, `call`, ...) are flat and dispatched
//! by the interpreter's main loop one at a time. Structured control flow
//! (`if`/`while`/`try`) is nested instead: each carries its own `Block` of
//! instructions rather than relying purely on label arithmetic, so a method
//! body reads the same way the source it was emitted from did. Label
//! branches (`br`, `brtrue`, ...) still exist alongside this for the cases
//! that need them (loop exits compiled as gotos, `switch`-like dispatch).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::module::TypeReference;
use crate::overload::CallTarget;

/// A literal value carried directly on `ldc`. Producer-side spelling
/// variants (`ldc.i4`, `ldi4`, `ldtrue`, `ldnull`, ...) all fold down into
/// this one opcode before the interpreter ever sees them; `ldstr` is the
/// only other literal-loading opcode, kept separate since strings are
/// heap-allocated rather than an inline scalar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConstValue {
    Null,
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
}

/// A comparison operator, shared between `Ceq`/`Clt`/... instructions and
/// `Condition::Binary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// A small, non-recursive operand a condition can compare — deliberately
/// narrower than a full instruction sequence so conditions stay inspectable
/// without interpreting a nested block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValueExpr {
    Local(String),
    Arg(String),
    Field(String),
    StaticField { declaring_type: String, name: String },
    ConstInt(i64),
    ConstFloat(f64),
    ConstBool(bool),
    ConstStr(String),
    ConstNull,
}

/// The four shapes a structured condition can take (spec.md §9): an always
/// true condition (`empty`, e.g. a `while { ... break; }`), a two-operand
/// comparison, a single truthy operand, or an arbitrary instruction block
/// whose final stack value is the condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Condition {
    Empty,
    Binary {
        op: CompareOp,
        left: ValueExpr,
        right: ValueExpr,
    },
    Expression(ValueExpr),
    Block(Block),
}

/// A straight-line sequence of instructions forming a nested scope. `break`
/// and `continue` inside a block affect the nearest enclosing `While`.
pub type Block = Vec<Instr>;

/// `catch` clause of a `try`. An absent `exception_type` catches anything;
/// an absent `variable` discards the caught value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchClause {
    #[serde(default)]
    pub exception_type: Option<TypeReference>,
    #[serde(default)]
    pub variable: Option<String>,
    pub body: Block,
}

/// One instruction in a method body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Instr {
    // --- stack / constants ---
    Nop,
    Dup,
    Pop,
    LdStr(String),
    Ldc(ConstValue),

    // --- locals / args / fields ---
    LdLoc(String),
    StLoc(String),
    LdArg(String),
    StArg(String),
    LdFld(String),
    StFld(String),
    LdSFld { declaring_type: String, field: String },
    StSFld { declaring_type: String, field: String },

    // --- arithmetic ---
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Neg,
    Not,

    // --- comparisons (push bool) ---
    Ceq,
    Cne,
    Clt,
    Cle,
    Cgt,
    Cge,

    // --- object / array ---
    NewObj(CallTarget),
    NewArr(TypeReference),
    LdElem,
    StElem,
    CastClass(TypeReference),
    IsInst(TypeReference),

    // --- calls / returns ---
    Call(CallTarget),
    CallVirt(CallTarget),
    Ret,

    // --- structured control flow ---
    If {
        condition: Condition,
        then_block: Block,
        #[serde(default)]
        else_block: Option<Block>,
    },
    While {
        condition: Condition,
        body: Block,
    },
    Break,
    Continue,
    Try {
        body: Block,
        #[serde(default)]
        catch: Option<CatchClause>,
        #[serde(default)]
        finally: Option<Block>,
    },
    Throw,

    // --- label branches ---
    Label(String),
    Br(String),
    BrTrue(String),
    BrFalse(String),
    Beq(String),
    Bne(String),
    Bgt(String),
    Bge(String),
    Blt(String),
    Ble(String),
}

impl Instr {
    /// The label this instruction defines, if it's a `Label` marker. Used
    /// to build a method's `label_map` when a producer doesn't supply one
    /// directly.
    pub fn label_name(&self) -> Option<&str> {
        match self {
            Instr::Label(name) => Some(name),
            _ => None,
        }
    }
}

/// Build a `name -> instruction index` map by scanning for `Label` markers.
/// Mirrors what a producer's `label_map` field already gives you, for the
/// case where only the flat instruction stream is available.
pub fn build_label_map(instructions: &[Instr]) -> HashMap<String, usize> {
    instructions
        .iter()
        .enumerate()
        .filter_map(|(idx, instr)| instr.label_name().map(|name| (name.to_string(), idx)))
        .collect()
}
