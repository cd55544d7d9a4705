//! A small Hack machine: two-pass symbol resolution plus a CPU, enough to run
//! translated programs and inspect RAM afterwards.

#![allow(dead_code)]

use std::collections::HashMap;

use vmil_translator::{translate, Bootstrap, Options, Unit};

pub const SP: usize = 0;
pub const LCL: usize = 1;
pub const ARG: usize = 2;
pub const THIS: usize = 3;
pub const THAT: usize = 4;

const RAM_SIZE: usize = 32768;
const FIRST_VARIABLE: u16 = 16;
const MAX_STEPS: usize = 2_000_000;

#[derive(Debug, Clone)]
enum Instruction {
    At(u16),
    Compute {
        dest: String,
        comp: String,
        jump: Option<String>,
    },
}

pub struct Machine {
    rom: Vec<Instruction>,
    pub ram: Vec<u16>,
    symbols: HashMap<String, u16>,
    a: u16,
    d: u16,
    pc: usize,
    pub steps: usize,
}

fn predefined() -> HashMap<String, u16> {
    let mut symbols = HashMap::new();
    for (name, addr) in [("SP", 0), ("LCL", 1), ("ARG", 2), ("THIS", 3), ("THAT", 4)] {
        symbols.insert(name.to_string(), addr);
    }
    for r in 0..16 {
        symbols.insert(format!("R{}", r), r);
    }
    symbols.insert("SCREEN".to_string(), 16384);
    symbols.insert("KBD".to_string(), 24576);
    symbols
}

fn strip(line: &str) -> &str {
    line.split_once("//").map(|(s, _)| s).unwrap_or(line).trim()
}

fn assemble(asm: &str) -> (Vec<Instruction>, HashMap<String, u16>) {
    let mut symbols = predefined();
    let mut address = 0u16;
    for line in asm.lines().map(strip).filter(|l| !l.is_empty()) {
        if let Some(label) = line.strip_prefix('(').and_then(|l| l.strip_suffix(')')) {
            assert!(
                symbols.insert(label.to_string(), address).is_none(),
                "label {} defined twice",
                label
            );
        } else {
            address += 1;
        }
    }

    let mut next_variable = FIRST_VARIABLE;
    let mut rom = Vec::new();
    for line in asm.lines().map(strip).filter(|l| !l.is_empty()) {
        if line.starts_with('(') {
            continue;
        }
        if let Some(value) = line.strip_prefix('@') {
            let value = match value.parse::<u16>() {
                Ok(n) => n,
                Err(_) => *symbols.entry(value.to_string()).or_insert_with(|| {
                    next_variable += 1;
                    next_variable - 1
                }),
            };
            rom.push(Instruction::At(value));
        } else {
            let (dest, rest) = match line.split_once('=') {
                Some((dest, rest)) => (dest.to_string(), rest),
                None => (String::new(), line),
            };
            let (comp, jump) = match rest.split_once(';') {
                Some((comp, jump)) => (comp.to_string(), Some(jump.to_string())),
                None => (rest.to_string(), None),
            };
            rom.push(Instruction::Compute { dest, comp, jump });
        }
    }
    (rom, symbols)
}

fn alu(comp: &str, a: u16, d: u16, m: u16) -> u16 {
    match comp {
        "0" => 0,
        "1" => 1,
        "-1" => 0xFFFF,
        "D" => d,
        "A" => a,
        "M" => m,
        "!D" => !d,
        "!A" => !a,
        "!M" => !m,
        "-D" => d.wrapping_neg(),
        "-A" => a.wrapping_neg(),
        "-M" => m.wrapping_neg(),
        "D+1" => d.wrapping_add(1),
        "A+1" => a.wrapping_add(1),
        "M+1" => m.wrapping_add(1),
        "D-1" => d.wrapping_sub(1),
        "A-1" => a.wrapping_sub(1),
        "M-1" => m.wrapping_sub(1),
        "D+A" => d.wrapping_add(a),
        "D+M" => d.wrapping_add(m),
        "D-A" => d.wrapping_sub(a),
        "D-M" => d.wrapping_sub(m),
        "A-D" => a.wrapping_sub(d),
        "M-D" => m.wrapping_sub(d),
        "D&A" => d & a,
        "D&M" => d & m,
        "D|A" => d | a,
        "D|M" => d | m,
        other => panic!("not a Hack computation: {}", other),
    }
}

fn jumps(jump: &str, value: u16) -> bool {
    let v = value as i16;
    match jump {
        "JGT" => v > 0,
        "JEQ" => v == 0,
        "JGE" => v >= 0,
        "JLT" => v < 0,
        "JNE" => v != 0,
        "JLE" => v <= 0,
        "JMP" => true,
        other => panic!("not a Hack jump: {}", other),
    }
}

impl Machine {
    pub fn load(asm: &str) -> Self {
        let (rom, symbols) = assemble(asm);
        Machine {
            rom,
            ram: vec![0; RAM_SIZE],
            symbols,
            a: 0,
            d: 0,
            pc: 0,
            steps: 0,
        }
    }

    /// Registers as the course test scripts set them up.
    pub fn with_standard_frame(mut self) -> Self {
        self.ram[SP] = 256;
        self.ram[LCL] = 300;
        self.ram[ARG] = 400;
        self.ram[THIS] = 3000;
        self.ram[THAT] = 3010;
        self
    }

    pub fn symbol(&self, name: &str) -> Option<u16> {
        self.symbols.get(name).copied()
    }

    /// Value of a variable the assembler allocated, e.g. a static.
    pub fn variable(&self, name: &str) -> u16 {
        let addr = self.symbol(name).unwrap_or_else(|| panic!("no symbol {}", name));
        self.ram[addr as usize]
    }

    pub fn sp(&self) -> u16 {
        self.ram[SP]
    }

    pub fn top(&self) -> u16 {
        self.ram[self.sp() as usize - 1]
    }

    /// Returns false once the program falls off the end or parks in a
    /// `(L) @L 0;JMP` loop.
    fn step(&mut self) -> bool {
        let Some(instruction) = self.rom.get(self.pc).cloned() else {
            return false;
        };
        self.steps += 1;
        match instruction {
            Instruction::At(value) => {
                self.a = value;
                self.pc += 1;
            }
            Instruction::Compute { dest, comp, jump } => {
                let m = if comp.contains('M') { self.ram[self.a as usize] } else { 0 };
                let value = alu(&comp, self.a, self.d, m);
                let target = self.a as usize;
                if dest.contains('M') {
                    self.ram[target] = value;
                }
                if dest.contains('A') {
                    self.a = value;
                }
                if dest.contains('D') {
                    self.d = value;
                }
                match jump {
                    Some(jump) if jumps(&jump, value) => {
                        if jump == "JMP" && target + 1 == self.pc {
                            return false;
                        }
                        self.pc = target;
                    }
                    _ => self.pc += 1,
                }
            }
        }
        true
    }

    pub fn run(&mut self) -> &mut Self {
        while self.step() {
            assert!(self.steps < MAX_STEPS, "program did not halt");
        }
        self
    }
}

pub fn plain_options() -> Options {
    Options {
        bootstrap: Bootstrap::Never,
        ..Options::default()
    }
}

pub fn translate_units(units: &[(&str, &str)], options: &Options) -> String {
    let units: Vec<Unit> = units.iter().map(|(name, src)| Unit::new(*name, *src)).collect();
    translate(&units, options).expect("translation failed")
}

/// Translate one unit without bootstrap and run it in the standard frame.
pub fn run_vm(source: &str) -> Machine {
    let asm = translate_units(&[("Test", source)], &plain_options());
    let mut machine = Machine::load(&asm).with_standard_frame();
    machine.run();
    machine
}

/// Translate with bootstrap and run from an empty machine.
pub fn run_program(units: &[(&str, &str)]) -> Machine {
    let options = Options {
        bootstrap: Bootstrap::Always,
        ..Options::default()
    };
    let asm = translate_units(units, &options);
    let mut machine = Machine::load(&asm);
    machine.run();
    machine
}

/// Source that leaves `value` on the stack, negative values included.
pub fn push_value(value: i16) -> String {
    if value < 0 {
        format!("push constant {}\nneg\n", -(value as i32))
    } else {
        format!("push constant {}\n", value)
    }
}
