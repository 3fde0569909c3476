//! The standard environ: operators and identifiers every program sees.
//!
//! - **arithmetic** - `+ - * / % MOD **` and monadic `+ - ABS` over the
//!   numeric tower, including `LONG` and `LONG LONG` variants
//! - **comparison** - `= /= < <= > >=`
//! - **assignment operators** - `+:= -:= *:= /:=` on names
//! - **logic** - `AND OR NOT` on `BOOL` and `BITS`
//! - **strings** - concatenation and comparison
//! - **rows** - `LWB UPB` on any row, vector and matrix products
//! - **transput and maths** - `print`, `read`, `sqrt`, `pi` and friends
//!
//! Only modes matter to the checker, so operators are declared with their
//! procedure modes and nothing else.

use a68_core::{ModeId, TagId};
use tracing::debug;

use crate::modes::ModeRegistry;
use crate::standard::*;
use crate::symbols::{SymbolTable, TagKind};

const INTEGRAL: [ModeId; 3] = [INT, LONG_INT, LONG_LONG_INT];
const REALS: [ModeId; 3] = [REAL, LONG_REAL, LONG_LONG_REAL];
const COMPLEXES: [ModeId; 3] = [COMPLEX, LONG_COMPLEX, LONG_LONG_COMPLEX];

/// Installs the standard environ into the outermost range of `symbols`.
pub struct StandardEnviron<'a> {
    modes: &'a mut ModeRegistry,
    symbols: &'a mut SymbolTable,
    declared: usize,
}

impl<'a> StandardEnviron<'a> {
    pub fn new(modes: &'a mut ModeRegistry, symbols: &'a mut SymbolTable) -> Self {
        Self {
            modes,
            symbols,
            declared: 0,
        }
    }

    /// Declares everything and returns the number of tags added.
    pub fn install(mut self) -> usize {
        self.arithmetic();
        self.comparison();
        self.assignment_operators();
        self.logic();
        self.strings();
        self.rows();
        self.identifiers();
        debug!(tags = self.declared, "installed standard environ");
        self.declared
    }

    fn dyadic(&mut self, name: &str, left: ModeId, right: ModeId, result: ModeId, priority: u8) -> TagId {
        let mode = self.modes.proc_of([left, right], result);
        self.declared += 1;
        self.symbols
            .declare_standard(TagKind::Operator, name, mode, priority)
    }

    fn monadic(&mut self, name: &str, operand: ModeId, result: ModeId) -> TagId {
        let mode = self.modes.proc_of([operand], result);
        self.declared += 1;
        self.symbols
            .declare_standard(TagKind::Operator, name, mode, 10)
    }

    fn identifier(&mut self, name: &str, mode: ModeId) -> TagId {
        self.declared += 1;
        self.symbols
            .declare_standard(TagKind::Identifier, name, mode, 0)
    }

    fn arithmetic(&mut self) {
        let all = INTEGRAL.iter().chain(&REALS).chain(&COMPLEXES).copied();
        for m in all.collect::<Vec<_>>() {
            self.dyadic("+", m, m, m, 6);
            self.dyadic("-", m, m, m, 6);
            self.dyadic("*", m, m, m, 7);
            self.monadic("+", m, m);
            self.monadic("-", m, m);
        }
        for (i, r) in INTEGRAL.into_iter().zip(REALS) {
            self.dyadic("/", i, i, r, 7);
            self.dyadic("%", i, i, i, 7);
            self.dyadic("MOD", i, i, i, 7);
            self.dyadic("**", i, INT, i, 8);
            self.monadic("ABS", i, i);
            self.monadic("ODD", i, BOOL);
        }
        for (r, c) in REALS.into_iter().zip(COMPLEXES) {
            self.dyadic("/", r, r, r, 7);
            self.dyadic("**", r, INT, r, 8);
            self.monadic("ABS", r, r);
            self.monadic("ROUND", r, INT);
            self.monadic("ENTIER", r, INT);
            self.dyadic("/", c, c, c, 7);
            self.monadic("RE", c, r);
            self.monadic("IM", c, r);
            self.monadic("ABS", c, r);
            self.monadic("CONJ", c, c);
        }
    }

    fn comparison(&mut self) {
        for m in INTEGRAL.into_iter().chain(REALS) {
            for op in ["<", "<=", ">", ">="] {
                self.dyadic(op, m, m, BOOL, 5);
            }
        }
        for m in INTEGRAL.into_iter().chain(REALS).chain(COMPLEXES) {
            self.dyadic("=", m, m, BOOL, 4);
            self.dyadic("/=", m, m, BOOL, 4);
        }
        for m in [BOOL, CHAR, BITS, STRING] {
            self.dyadic("=", m, m, BOOL, 4);
            self.dyadic("/=", m, m, BOOL, 4);
        }
        for op in ["<", "<=", ">", ">="] {
            self.dyadic(op, CHAR, CHAR, BOOL, 5);
            self.dyadic(op, STRING, STRING, BOOL, 5);
        }
    }

    fn assignment_operators(&mut self) {
        let all = INTEGRAL.iter().chain(&REALS).chain(&COMPLEXES).copied();
        for m in all.collect::<Vec<_>>() {
            let name = self.modes.name_of(m);
            for op in ["+:=", "-:=", "*:="] {
                self.dyadic(op, name, m, name, 1);
            }
        }
        for (i, r) in INTEGRAL.into_iter().zip(REALS) {
            let name = self.modes.name_of(r);
            self.dyadic("/:=", name, r, name, 1);
            for op in ["+:=", "-:=", "*:="] {
                self.dyadic(op, name, i, name, 1);
            }
        }
        let string = self.modes.name_of(STRING);
        self.dyadic("+:=", string, STRING, string, 1);
        self.dyadic("+=:", STRING, string, string, 1);
    }

    fn logic(&mut self) {
        self.dyadic("AND", BOOL, BOOL, BOOL, 3);
        self.dyadic("OR", BOOL, BOOL, BOOL, 2);
        self.monadic("NOT", BOOL, BOOL);
        for b in [BITS, LONG_BITS, LONG_LONG_BITS] {
            self.dyadic("AND", b, b, b, 3);
            self.dyadic("OR", b, b, b, 2);
            self.dyadic("SHL", b, INT, b, 8);
            self.dyadic("SHR", b, INT, b, 8);
            self.monadic("NOT", b, b);
        }
        self.monadic("ABS", BOOL, INT);
        self.monadic("ABS", CHAR, INT);
        self.monadic("REPR", INT, CHAR);
    }

    fn strings(&mut self) {
        self.dyadic("+", STRING, STRING, STRING, 6);
        self.dyadic("+", CHAR, CHAR, STRING, 6);
        self.dyadic("*", INT, STRING, STRING, 7);
    }

    fn rows(&mut self) {
        self.monadic("LWB", ROWS, INT);
        self.monadic("UPB", ROWS, INT);
        self.dyadic("LWB", INT, ROWS, INT, 8);
        self.dyadic("UPB", INT, ROWS, INT, 8);
        self.dyadic("ELEMS", INT, ROWS, INT, 8);

        for (scalar, vector, matrix) in [
            (REAL, ROW_REAL, ROW_ROW_REAL),
            (COMPLEX, ROW_COMPLEX, ROW_ROW_COMPLEX),
        ] {
            self.dyadic("+", vector, vector, vector, 6);
            self.dyadic("-", vector, vector, vector, 6);
            self.dyadic("*", vector, vector, scalar, 7);
            self.dyadic("*", scalar, vector, vector, 7);
            self.dyadic("*", vector, scalar, vector, 7);
            self.dyadic("*", matrix, vector, vector, 7);
            self.dyadic("*", matrix, matrix, matrix, 7);
            self.dyadic("*", scalar, matrix, matrix, 7);
            self.monadic("-", vector, vector);
        }
    }

    fn identifiers(&mut self) {
        self.identifier("pi", REAL);
        self.identifier("max int", INT);
        self.identifier("max real", REAL);
        self.identifier("small real", REAL);

        let real_fn = self.modes.proc_of([REAL], REAL);
        for name in ["sqrt", "exp", "ln", "sin", "cos", "tan", "arctan"] {
            self.identifier(name, real_fn);
        }
        let random = self.modes.proc_of([], REAL);
        self.identifier("random", random);

        let print = self.modes.proc_of([ROW_SIMPLOUT], VOID);
        self.identifier("print", print);
        self.identifier("write", print);
        let read = self.modes.proc_of([ROW_SIMPLIN], VOID);
        self.identifier("read", read);
        let newline = self.modes.proc_of([], VOID);
        self.identifier("new line", newline);
    }
}
