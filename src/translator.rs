use log::debug;

use crate::ast::{Arity, ArithOp, Command};
use crate::error::SemanticError;
use crate::labels::{self, ComparisonLabels};
use crate::segment::{self, Address, FRAME_REGISTERS};
use crate::session::Session;

/// Words saved below the callee's arguments: return address plus the four bases.
pub const FRAME_SIZE: u16 = 5;

macro_rules! svec {
    ($($x:expr),* $(,)?) => (vec![$($x.to_string()),*]);
}

fn at_c(arg: u32) -> String {
    format!("@{arg}", arg = arg)
}

fn at_s(arg: &str) -> String {
    format!("@{arg}", arg = arg)
}

fn def(label: &str) -> String {
    format!("({})", label)
}

/// Push D onto the stack.
fn push_d() -> Vec<String> {
    svec![
        "@SP",
        "M=M+1",
        "A=M-1", // Don't need to refetch SP; this is safe
        "M=D"
    ]
}

/// D = value at the address.
fn load(address: &Address) -> Vec<String> {
    match address {
        Address::Immediate(value) => svec![at_c(u32::from(*value)), "D=A"],
        Address::Direct(addr) => svec![at_c(u32::from(*addr)), "D=M"],
        Address::Static(sym) => svec![at_s(sym), "D=M"],
        Address::Indirect { base, offset } => svec![
            at_s(base),
            "D=M",
            at_c(u32::from(*offset)),
            "A=D+A", // A = SEG+arg
            "D=M"
        ],
    }
}

fn push(address: &Address) -> Vec<String> {
    let mut lines = load(address);
    lines.extend(push_d());
    lines
}

fn pop(address: &Address) -> Result<Vec<String>, SemanticError> {
    let target = match address {
        Address::Immediate(_) => return Err(SemanticError::PopConstant),
        Address::Direct(addr) => at_c(u32::from(*addr)),
        Address::Static(sym) => at_s(sym),
        Address::Indirect { base, offset } => {
            return Ok(svec![
                at_s(base),
                "D=M",
                at_c(u32::from(*offset)),
                "D=D+A", // D = SEG+arg
                "@R13",
                "M=D", // Park the target address; A is needed for SP
                "@SP",
                "AM=M-1", // SP--, A <- new SP (val to be popped)
                "D=M",
                "@R13",
                "A=M", // At the target address...
                "M=D"  // ... store the popped val
            ]);
        }
    };
    Ok(svec!["@SP", "AM=M-1", "D=M", target, "M=D"])
}

fn unary(op: ArithOp) -> Vec<String> {
    let comp = match op {
        ArithOp::Neg => "M=-M",
        _ => "M=!M",
    };
    svec!["@SP", "A=M-1", comp]
}

// i.e. no conditions or jumps, just pop and run
fn binary(op: ArithOp) -> Vec<String> {
    let comp = match op {
        ArithOp::Add => "M=D+M",
        ArithOp::Sub => "M=M-D",
        ArithOp::And => "M=D&M",
        _ => "M=D|M",
    };
    svec![
        "@SP",
        "AM=M-1", // SP--, looking at top of stack now
        "D=M",    // Right arg in D
        "A=A-1",  // Looking at second arg of stack, will overwrite
        comp
    ]
}

fn compare(op: ArithOp, labels: &ComparisonLabels) -> Vec<String> {
    let jump = match op {
        ArithOp::Eq => "D;JEQ",
        ArithOp::Gt => "D;JGT",
        _ => "D;JLT",
    };
    svec![
        "@SP",
        "AM=M-1", // SP--, looking at top of stack now
        "D=M",    // Right arg in D
        "A=A-1",  // Looking at second arg of stack, will overwrite
        "D=M-D",
        at_s(&labels.on_true),
        jump,
        "D=0",
        at_s(&labels.end),
        "0;JMP",
        def(&labels.on_true),
        "D=-1",
        def(&labels.end),
        "@SP",
        "A=M-1",
        "M=D"
    ]
}

fn goto(label: &str) -> Vec<String> {
    svec![at_s(label), "0;JMP"]
}

fn if_goto(label: &str) -> Vec<String> {
    svec![
        "@SP",
        "AM=M-1",
        "D=M", // Stack popped into D
        at_s(label),
        "D;JNE" // False is 0
    ]
}

fn function(name: &str, locals: u16) -> Vec<String> {
    let mut lines = svec![def(name)];
    for _ in 0..locals {
        lines.extend(svec!["@SP", "M=M+1", "A=M-1", "M=0"]);
    }
    lines
}

fn call(name: &str, args: u16, return_label: &str) -> Vec<String> {
    let mut lines = svec![at_s(return_label), "D=A"];
    lines.extend(push_d());
    for register in FRAME_REGISTERS {
        lines.extend(svec![at_s(register), "D=M"]);
        lines.extend(push_d());
    }
    lines.extend(svec![
        "@SP",
        "D=M",
        at_c(u32::from(args) + u32::from(FRAME_SIZE)),
        "D=D-A",
        "@ARG",
        "M=D", // ARG = SP - args - 5
        "@SP",
        "D=M",
        "@LCL",
        "M=D", // LCL = SP
        at_s(name),
        "0;JMP",
        def(return_label)
    ]);
    lines
}

fn ret() -> Vec<String> {
    let mut lines = svec![
        "@LCL",
        "D=M",
        "@R13",
        "M=D", // R13 = frame
        at_c(u32::from(FRAME_SIZE)),
        "A=D-A",
        "D=M",
        "@R14",
        "M=D", // R14 = return address, before ARG 0 can overwrite it
        "@SP",
        "AM=M-1",
        "D=M",
        "@ARG",
        "A=M",
        "M=D", // *ARG = return value
        "@ARG",
        "D=M+1",
        "@SP",
        "M=D" // SP = ARG + 1
    ];
    for register in FRAME_REGISTERS.iter().rev() {
        lines.extend(svec!["@R13", "AM=M-1", "D=M", at_s(register), "M=D"]);
    }
    lines.extend(svec!["@R14", "A=M", "0;JMP"]);
    lines
}

/// Emit the instructions for one command, claiming its occurrence index.
pub fn translate(session: &mut Session, command: &Command) -> Result<Vec<String>, SemanticError> {
    let occurrence = session.next_occurrence();
    debug!("#{} {}", occurrence, command);

    let translated = match command {
        Command::Arithmetic(op) => match op.arity() {
            Arity::Unary => unary(*op),
            Arity::Binary => binary(*op),
            Arity::Comparison => compare(*op, &labels::comparison(occurrence)),
        },
        Command::Push(seg, index) => push(&segment::resolve(*seg, *index, session.file_name())),
        Command::Pop(seg, index) => pop(&segment::resolve(*seg, *index, session.file_name()))?,
        Command::Label(name) => {
            session.labels_mut().define(name)?;
            svec![def(name)]
        }
        Command::Goto(name) => goto(name),
        Command::IfGoto(name) => if_goto(name),
        Command::Function(name, locals) => {
            session.labels_mut().define(name)?;
            session.record_function(name);
            function(name, *locals)
        }
        Command::Call(name, args) => {
            session.record_call(name);
            call(name, *args, &labels::return_address(name, occurrence))
        }
        Command::Return => ret(),
    };

    Ok(translated)
}

/// Set SP to the stack base and call the entry point with no arguments.
pub fn bootstrap(session: &mut Session, stack_base: u16, entry_point: &str) -> Vec<String> {
    let occurrence = session.next_occurrence();
    debug!("#{} bootstrap SP={} entry={}", occurrence, stack_base, entry_point);
    session.record_call(entry_point);

    let mut lines = svec![at_c(u32::from(stack_base)), "D=A", "@SP", "M=D"];
    lines.extend(call(
        entry_point,
        0,
        &labels::return_address(entry_point, occurrence),
    ));
    lines
}
