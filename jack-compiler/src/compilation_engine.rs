//! Recursive-descent compiler for the Jack grammar: parsing and VM emission
//! are interleaved, with no intermediate AST. Each grammar production has a
//! single entry point; tokens are consumed through a small set of
//! `expect_*` primitives that advance on a match and fail otherwise.

use std::io::Write;

use crate::error::CompileError;
use crate::symbol_table::{Kind, SymbolTable};
use crate::token::{Keyword, SpannedToken, Token};
use crate::vm_writer::{Arith, Segment, VmWriter};

fn kind_to_segment(kind: Kind) -> Segment {
    match kind {
        Kind::Static => Segment::Static,
        Kind::Field => Segment::This,
        Kind::Arg => Segment::Argument,
        Kind::Var => Segment::Local,
    }
}

pub struct CompilationEngine<'a, W: Write> {
    tokens: &'a [SpannedToken],
    pos: usize,
    symbol_table: SymbolTable,
    vm: VmWriter<W>,
    class_name: String,
    label_counter: usize,
}

impl<'a, W: Write> CompilationEngine<'a, W> {
    #[must_use]
    pub fn new(tokens: &'a [SpannedToken], out: W) -> Self {
        Self {
            tokens,
            pos: 0,
            symbol_table: SymbolTable::new(),
            vm: VmWriter::new(out),
            class_name: String::new(),
            label_counter: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.vm.into_inner()
    }

    // --- token-stream primitives -----------------------------------------

    fn current(&self) -> Result<&'a SpannedToken, CompileError> {
        self.tokens.get(self.pos).ok_or_else(|| CompileError::Syntax {
            line: self.tokens.last().map_or(0, |t| t.line),
            message: "unexpected end of input".to_string(),
        })
    }

    fn line(&self) -> usize {
        self.tokens.get(self.pos).map_or_else(
            || self.tokens.last().map_or(0, |t| t.line),
            |t| t.line,
        )
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn syntax_error(&self, message: impl Into<String>) -> CompileError {
        CompileError::Syntax {
            line: self.line(),
            message: message.into(),
        }
    }

    fn semantic_error(&self, message: impl Into<String>) -> CompileError {
        CompileError::Semantic {
            line: self.line(),
            message: message.into(),
        }
    }

    fn peek_is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self.tokens.get(self.pos), Some(t) if t.token == Token::Keyword(keyword))
    }

    fn peek_is_symbol(&self, symbol: char) -> bool {
        matches!(self.tokens.get(self.pos), Some(t) if t.token == Token::Symbol(symbol))
    }

    fn expect_keyword_in(&mut self, allowed: &[Keyword]) -> Result<Keyword, CompileError> {
        let token = self.current()?;
        match token.token {
            Token::Keyword(k) if allowed.contains(&k) => {
                self.advance();
                Ok(k)
            }
            _ => Err(self.syntax_error(format!("expected one of {allowed:?}, found {}", token.token))),
        }
    }

    fn expect_symbol(&mut self, symbol: char) -> Result<(), CompileError> {
        let token = self.current()?;
        if token.token == Token::Symbol(symbol) {
            self.advance();
            Ok(())
        } else {
            Err(self.syntax_error(format!("expected symbol '{symbol}', found {}", token.token)))
        }
    }

    fn expect_identifier(&mut self) -> Result<String, CompileError> {
        let token = self.current()?;
        match &token.token {
            Token::Identifier(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            other => Err(self.syntax_error(format!("expected identifier, found {other}"))),
        }
    }

    fn next_label(&mut self) -> String {
        let n = self.label_counter;
        self.label_counter += 1;
        format!("L{n}")
    }

    fn define(&mut self, name: &str, type_name: &str, kind: Kind) -> Result<(), CompileError> {
        if self.symbol_table.define(name, type_name, kind) {
            Ok(())
        } else {
            Err(self.semantic_error(format!("'{name}' is already declared in this scope")))
        }
    }

    // --- grammar productions ----------------------------------------------

    /// `class className '{' classVarDec* subroutineDec* '}'`
    pub fn compile_class(&mut self) -> Result<(), CompileError> {
        self.expect_keyword_in(&[Keyword::Class])?;
        self.class_name = self.expect_identifier()?;
        self.expect_symbol('{')?;

        let mut seen_subroutine = false;
        loop {
            if self.peek_is_keyword(Keyword::Static) || self.peek_is_keyword(Keyword::Field) {
                if seen_subroutine {
                    return Err(self.semantic_error(
                        "class variables must be declared before any subroutine",
                    ));
                }
                self.compile_class_var_dec()?;
            } else if self.peek_is_keyword(Keyword::Constructor)
                || self.peek_is_keyword(Keyword::Function)
                || self.peek_is_keyword(Keyword::Method)
            {
                self.compile_subroutine_dec()?;
                seen_subroutine = true;
            } else {
                break;
            }
        }

        self.expect_symbol('}')?;
        Ok(())
    }

    /// `('static' | 'field') type varName (',' varName)* ';'`
    fn compile_class_var_dec(&mut self) -> Result<(), CompileError> {
        let kind = match self.expect_keyword_in(&[Keyword::Static, Keyword::Field])? {
            Keyword::Static => Kind::Static,
            _ => Kind::Field,
        };
        let type_name = self.compile_type()?;
        let name = self.expect_identifier()?;
        self.define(&name, &type_name, kind)?;

        while self.peek_is_symbol(',') {
            self.expect_symbol(',')?;
            let name = self.expect_identifier()?;
            self.define(&name, &type_name, kind)?;
        }
        self.expect_symbol(';')
    }

    /// `(constructor|function|method) (void|type) subroutineName '(' parameterList ')' subroutineBody`
    fn compile_subroutine_dec(&mut self) -> Result<(), CompileError> {
        self.symbol_table.start_subroutine();
        let subroutine_kind = self.expect_keyword_in(&[
            Keyword::Constructor,
            Keyword::Function,
            Keyword::Method,
        ])?;
        if subroutine_kind == Keyword::Method {
            let class_name = self.class_name.clone();
            self.define("this", &class_name, Kind::Arg)?;
        }

        if self.peek_is_keyword(Keyword::Void) {
            self.advance();
        } else {
            self.compile_type()?;
        }
        let name = self.expect_identifier()?;
        self.expect_symbol('(')?;
        self.compile_parameter_list()?;
        self.expect_symbol(')')?;
        self.compile_subroutine_body(subroutine_kind, &name)
    }

    /// `((type varName) (',' type varName)*)?`
    fn compile_parameter_list(&mut self) -> Result<(), CompileError> {
        if self.peek_is_symbol(')') {
            return Ok(());
        }
        let type_name = self.compile_type()?;
        let name = self.expect_identifier()?;
        self.define(&name, &type_name, Kind::Arg)?;

        while self.peek_is_symbol(',') {
            self.expect_symbol(',')?;
            let type_name = self.compile_type()?;
            let name = self.expect_identifier()?;
            self.define(&name, &type_name, Kind::Arg)?;
        }
        Ok(())
    }

    /// `'{' varDec* statements '}'`, with the `function` header emitted
    /// once the VAR count is known but before any statement code.
    fn compile_subroutine_body(
        &mut self,
        subroutine_kind: Keyword,
        name: &str,
    ) -> Result<(), CompileError> {
        self.expect_symbol('{')?;
        while self.peek_is_keyword(Keyword::Var) {
            self.compile_var_dec()?;
        }

        let n_locals = self.symbol_table.var_count(Kind::Var);
        self.label_counter = 0;
        self.vm
            .write_function(&format!("{}.{name}", self.class_name), n_locals)?;

        match subroutine_kind {
            Keyword::Constructor => {
                let n_fields = self.symbol_table.var_count(Kind::Field);
                self.vm.write_push(Segment::Const, n_fields)?;
                self.vm.write_call("Memory.alloc", 1)?;
                self.vm.write_pop(Segment::Pointer, 0)?;
            }
            Keyword::Method => {
                self.vm.write_push(Segment::Argument, 0)?;
                self.vm.write_pop(Segment::Pointer, 0)?;
            }
            _ => {}
        }

        self.compile_statements()?;
        self.expect_symbol('}')
    }

    /// `'var' type varName (',' varName)* ';'`
    fn compile_var_dec(&mut self) -> Result<(), CompileError> {
        self.expect_keyword_in(&[Keyword::Var])?;
        let type_name = self.compile_type()?;
        let name = self.expect_identifier()?;
        self.define(&name, &type_name, Kind::Var)?;

        while self.peek_is_symbol(',') {
            self.expect_symbol(',')?;
            let name = self.expect_identifier()?;
            self.define(&name, &type_name, Kind::Var)?;
        }
        self.expect_symbol(';')
    }

    /// `statement*`
    fn compile_statements(&mut self) -> Result<(), CompileError> {
        loop {
            if self.peek_is_keyword(Keyword::Let) {
                self.compile_let()?;
            } else if self.peek_is_keyword(Keyword::If) {
                self.compile_if()?;
            } else if self.peek_is_keyword(Keyword::While) {
                self.compile_while()?;
            } else if self.peek_is_keyword(Keyword::Do) {
                self.compile_do()?;
            } else if self.peek_is_keyword(Keyword::Return) {
                self.compile_return()?;
            } else {
                break;
            }
        }
        Ok(())
    }

    /// `'let' varName ('[' expression ']')? '=' expression ';'`
    fn compile_let(&mut self) -> Result<(), CompileError> {
        self.expect_keyword_in(&[Keyword::Let])?;
        let name = self.expect_identifier()?;
        let kind = self
            .symbol_table
            .kind_of(&name)
            .ok_or_else(|| self.semantic_error(format!("'{name}' is not declared")))?;
        let index = self.symbol_table.index_of(&name).expect("kind_of succeeded");
        let seg = kind_to_segment(kind);

        if self.peek_is_symbol('[') {
            self.expect_symbol('[')?;
            self.vm.write_push(seg, index)?;
            self.compile_expression()?;
            self.expect_symbol(']')?;
            self.vm.write_arithmetic(Arith::Add)?;

            self.expect_symbol('=')?;
            self.compile_expression()?;

            self.vm.write_pop(Segment::Temp, 0)?;
            self.vm.write_pop(Segment::Pointer, 1)?;
            self.vm.write_push(Segment::Temp, 0)?;
            self.vm.write_pop(Segment::That, 0)?;
        } else {
            self.expect_symbol('=')?;
            self.compile_expression()?;
            self.vm.write_pop(seg, index)?;
        }
        self.expect_symbol(';')
    }

    /// `'if' '(' expression ')' '{' statements '}' ('else' '{' statements '}')?`
    fn compile_if(&mut self) -> Result<(), CompileError> {
        self.expect_keyword_in(&[Keyword::If])?;
        self.expect_symbol('(')?;
        self.compile_expression()?;
        self.expect_symbol(')')?;

        let else_label = self.next_label();
        let end_label = self.next_label();
        self.vm.write_arithmetic(Arith::Not)?;
        self.vm.write_if(&else_label)?;

        self.expect_symbol('{')?;
        self.compile_statements()?;
        self.expect_symbol('}')?;
        self.vm.write_goto(&end_label)?;

        self.vm.write_label(&else_label)?;
        if self.peek_is_keyword(Keyword::Else) {
            self.advance();
            self.expect_symbol('{')?;
            self.compile_statements()?;
            self.expect_symbol('}')?;
        }
        self.vm.write_label(&end_label)
    }

    /// `'while' '(' expression ')' '{' statements '}'`
    fn compile_while(&mut self) -> Result<(), CompileError> {
        let top_label = self.next_label();
        let end_label = self.next_label();

        self.vm.write_label(&top_label)?;
        self.expect_keyword_in(&[Keyword::While])?;
        self.expect_symbol('(')?;
        self.compile_expression()?;
        self.expect_symbol(')')?;
        self.vm.write_arithmetic(Arith::Not)?;
        self.vm.write_if(&end_label)?;

        self.expect_symbol('{')?;
        self.compile_statements()?;
        self.expect_symbol('}')?;
        self.vm.write_goto(&top_label)?;
        self.vm.write_label(&end_label)
    }

    /// `'do' subroutineCall ';'`
    fn compile_do(&mut self) -> Result<(), CompileError> {
        self.expect_keyword_in(&[Keyword::Do])?;
        let name = self.expect_identifier()?;
        self.compile_subroutine_call_from(&name)?;
        self.vm.write_pop(Segment::Temp, 0)?;
        self.expect_symbol(';')
    }

    /// `'return' expression? ';'`
    fn compile_return(&mut self) -> Result<(), CompileError> {
        self.expect_keyword_in(&[Keyword::Return])?;
        if self.peek_is_symbol(';') {
            self.vm.write_push(Segment::Const, 0)?;
        } else {
            self.compile_expression()?;
        }
        self.expect_symbol(';')?;
        self.vm.write_return()
    }

    /// `term (op term)*`, strictly left-to-right with no precedence.
    fn compile_expression(&mut self) -> Result<(), CompileError> {
        self.compile_term()?;
        while let Some(op) = self.current_operator_symbol() {
            self.advance();
            self.compile_term()?;
            match op {
                '+' => self.vm.write_arithmetic(Arith::Add)?,
                '-' => self.vm.write_arithmetic(Arith::Sub)?,
                '&' => self.vm.write_arithmetic(Arith::And)?,
                '|' => self.vm.write_arithmetic(Arith::Or)?,
                '<' => self.vm.write_arithmetic(Arith::Lt)?,
                '>' => self.vm.write_arithmetic(Arith::Gt)?,
                '=' => self.vm.write_arithmetic(Arith::Eq)?,
                '*' => self.vm.write_call("Math.multiply", 2)?,
                '/' => self.vm.write_call("Math.divide", 2)?,
                _ => unreachable!("current_operator_symbol only returns operator symbols"),
            }
        }
        Ok(())
    }

    fn current_operator_symbol(&self) -> Option<char> {
        match self.tokens.get(self.pos)?.token {
            Token::Symbol(c @ ('+' | '-' | '*' | '/' | '&' | '|' | '<' | '>' | '=')) => Some(c),
            _ => None,
        }
    }

    /// `integerConstant | stringConstant | keywordConstant | varName |
    /// varName '[' expression ']' | subroutineCall | '(' expression ')' |
    /// unaryOp term`
    fn compile_term(&mut self) -> Result<(), CompileError> {
        let token = self.current()?.token.clone();
        match token {
            Token::IntConst(n) => {
                self.advance();
                self.vm.write_push(Segment::Const, n)?;
            }
            Token::StringConst(s) => {
                self.advance();
                self.vm
                    .write_push(Segment::Const, u16::try_from(s.chars().count()).unwrap_or(0))?;
                self.vm.write_call("String.new", 1)?;
                for c in s.chars() {
                    self.vm.write_push(Segment::Const, c as u16)?;
                    self.vm.write_call("String.appendChar", 2)?;
                }
            }
            Token::Keyword(Keyword::True) => {
                self.advance();
                self.vm.write_push(Segment::Const, 0)?;
                self.vm.write_arithmetic(Arith::Not)?;
            }
            Token::Keyword(Keyword::False | Keyword::Null) => {
                self.advance();
                self.vm.write_push(Segment::Const, 0)?;
            }
            Token::Keyword(Keyword::This) => {
                self.advance();
                self.vm.write_push(Segment::Pointer, 0)?;
            }
            Token::Symbol('(') => {
                self.advance();
                self.compile_expression()?;
                self.expect_symbol(')')?;
            }
            Token::Symbol('-') => {
                self.advance();
                self.compile_term()?;
                self.vm.write_arithmetic(Arith::Neg)?;
            }
            Token::Symbol('~') => {
                self.advance();
                self.compile_term()?;
                self.vm.write_arithmetic(Arith::Not)?;
            }
            Token::Identifier(name) => {
                self.advance();
                if self.peek_is_symbol('[') {
                    let kind = self
                        .symbol_table
                        .kind_of(&name)
                        .ok_or_else(|| self.semantic_error(format!("'{name}' is not declared")))?;
                    let index = self.symbol_table.index_of(&name).expect("kind_of succeeded");
                    let seg = kind_to_segment(kind);

                    self.expect_symbol('[')?;
                    self.vm.write_push(seg, index)?;
                    self.compile_expression()?;
                    self.expect_symbol(']')?;
                    self.vm.write_arithmetic(Arith::Add)?;
                    self.vm.write_pop(Segment::Pointer, 1)?;
                    self.vm.write_push(Segment::That, 0)?;
                } else if self.peek_is_symbol('(') || self.peek_is_symbol('.') {
                    self.compile_subroutine_call_from(&name)?;
                } else {
                    let kind = self
                        .symbol_table
                        .kind_of(&name)
                        .ok_or_else(|| self.semantic_error(format!("'{name}' is not declared")))?;
                    let index = self.symbol_table.index_of(&name).expect("kind_of succeeded");
                    self.vm.write_push(kind_to_segment(kind), index)?;
                }
            }
            other => return Err(self.syntax_error(format!("unexpected {other} in expression"))),
        }
        Ok(())
    }

    /// `(expression (',' expression)*)?`, returning the expression count.
    fn compile_expression_list(&mut self) -> Result<u16, CompileError> {
        if self.peek_is_symbol(')') {
            return Ok(0);
        }
        self.compile_expression()?;
        let mut count = 1u16;
        while self.peek_is_symbol(',') {
            self.expect_symbol(',')?;
            self.compile_expression()?;
            count += 1;
        }
        Ok(count)
    }

    /// `int | char | boolean | className`
    fn compile_type(&mut self) -> Result<String, CompileError> {
        let token = self.current()?;
        match &token.token {
            Token::Keyword(k @ (Keyword::Int | Keyword::Char | Keyword::Boolean)) => {
                let k = *k;
                self.advance();
                Ok(k.as_str().to_string())
            }
            Token::Identifier(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            other => Err(self.syntax_error(format!("expected a type, found {}", other.token))),
        }
    }

    /// Dispatches the three subroutine-call forms, assuming `name` is an
    /// already-consumed leading identifier and the next token is `(` or `.`:
    ///
    /// 1. `name(args)` — a method on the current class.
    /// 2. `name.method(args)` where `name` is a declared variable — a
    ///    method call on that object.
    /// 3. `name.method(args)` where `name` is not declared — a
    ///    function/constructor call on class `name`.
    fn compile_subroutine_call_from(&mut self, name: &str) -> Result<(), CompileError> {
        if self.peek_is_symbol('(') {
            self.expect_symbol('(')?;
            self.vm.write_push(Segment::Pointer, 0)?;
            let n_args = self.compile_expression_list()?;
            self.expect_symbol(')')?;
            self.vm
                .write_call(&format!("{}.{name}", self.class_name), n_args + 1)?;
            return Ok(());
        }

        self.expect_symbol('.')?;
        let method_name = self.expect_identifier()?;
        self.expect_symbol('(')?;

        if let Some(kind) = self.symbol_table.kind_of(name) {
            let seg = kind_to_segment(kind);
            let index = self.symbol_table.index_of(name).expect("kind_of succeeded");
            let type_name = self
                .symbol_table
                .type_of(name)
                .expect("kind_of succeeded")
                .to_string();
            self.vm.write_push(seg, index)?;
            let n_args = self.compile_expression_list()?;
            self.expect_symbol(')')?;
            self.vm
                .write_call(&format!("{type_name}.{method_name}"), n_args + 1)?;
        } else {
            let n_args = self.compile_expression_list()?;
            self.expect_symbol(')')?;
            self.vm.write_call(&format!("{name}.{method_name}"), n_args)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    fn compile(source: &str) -> String {
        let tokens = tokenize(source).unwrap();
        let mut engine = CompilationEngine::new(&tokens, Vec::new());
        engine.compile_class().unwrap();
        String::from_utf8(engine.into_inner()).unwrap()
    }

    #[test]
    fn empty_void_function_pushes_zero_and_returns() {
        let vm = compile("class Main { function void main() { return; } }");
        assert_eq!(vm, "function Main.main 0\npush constant 0\nreturn\n");
    }

    #[test]
    fn let_with_fields_lowers_to_left_to_right_arithmetic() {
        let vm = compile(
            "class Main { \
               field int b, c; \
               field int a; \
               function void main() { let a = b + c; return; } \
             }",
        );
        // a, b, c are all FIELDs: a=0... wait declaration order is b,c then a.
        assert!(vm.contains("push this 0")); // b
        assert!(vm.contains("push this 1")); // c
        assert!(vm.contains("add"));
        assert!(vm.contains("pop this 2")); // a
    }

    #[test]
    fn if_else_emits_a_label_pair() {
        let vm = compile(
            "class Main { \
               function void main() { \
                 if (true) { let Main.x = 1; } else { } \
                 return; \
               } \
             }",
        );
        assert_eq!(vm.matches("label L").count(), 2);
        assert!(vm.contains("if-goto L0"));
        assert!(vm.contains("goto L1"));
    }

    #[test]
    fn while_loop_jumps_back_to_its_own_top_label() {
        let vm = compile(
            "class Main { \
               function void main() { \
                 while (true) { } \
                 return; \
               } \
             }",
        );
        assert!(vm.contains("label L0"));
        assert!(vm.contains("goto L0"));
        assert!(vm.contains("label L1"));
    }

    #[test]
    fn do_statement_discards_the_return_value() {
        let vm = compile(
            "class Main { \
               function void main() { do Output.println(); return; } \
             }",
        );
        assert!(vm.contains("call Output.println 0"));
        assert!(vm.contains("pop temp 0"));
    }

    #[test]
    fn bare_call_targets_the_current_class_and_pushes_this() {
        let vm = compile(
            "class Main { \
               method void helper() { return; } \
               method void main() { do helper(); return; } \
             }",
        );
        assert!(vm.contains("push pointer 0\ncall Main.helper 1"));
    }

    #[test]
    fn qualified_call_on_known_variable_is_a_method_call() {
        let vm = compile(
            "class Main { \
               function void main() { \
                 var Foo f; \
                 do f.bar(); \
                 return; \
               } \
             }",
        );
        assert!(vm.contains("push local 0\ncall Foo.bar 1"));
    }

    #[test]
    fn qualified_call_on_unknown_identifier_is_a_function_call() {
        let vm = compile(
            "class Main { \
               function void main() { \
                 do Output.println(); \
                 return; \
               } \
             }",
        );
        assert!(vm.contains("call Output.println 0"));
        assert!(!vm.contains("push pointer 0\ncall Output"));
    }

    #[test]
    fn constructor_allocates_and_binds_pointer_zero() {
        let vm = compile(
            "class Point { \
               field int x; \
               constructor Point new() { return this; } \
             }",
        );
        assert!(vm.starts_with("function Point.new 0\n"));
        assert!(vm.contains("push constant 1\ncall Memory.alloc 1\npop pointer 0"));
    }

    #[test]
    fn method_binds_pointer_zero_from_argument_zero() {
        let vm = compile(
            "class Point { \
               method void dispose() { return; } \
             }",
        );
        assert!(vm.contains("push argument 0\npop pointer 0"));
    }

    #[test]
    fn true_false_null_and_this_lower_to_the_correct_constants() {
        let vm = compile(
            "class Main { \
               method boolean main() { \
                 if (true) { } \
                 return this; \
               } \
             }",
        );
        assert!(vm.contains("push constant 0\nnot"));
        assert!(vm.contains("push pointer 0"));
    }

    #[test]
    fn unary_minus_and_not_lower_to_arithmetic_not_function_calls() {
        let vm = compile(
            "class Main { \
               function void main() { \
                 var int x; \
                 var boolean y; \
                 let x = -x; \
                 let y = ~y; \
                 return; \
               } \
             }",
        );
        assert!(vm.contains("push local 0\nneg"));
        assert!(vm.contains("push local 1\nnot"));
    }

    #[test]
    fn string_constants_build_via_string_new_and_append_char() {
        let vm = compile(
            "class Main { \
               function void main() { \
                 do Output.printString(\"hi\"); \
                 return; \
               } \
             }",
        );
        assert!(vm.contains("push constant 2\ncall String.new 1"));
        assert!(vm.contains(&format!("push constant {}\ncall String.appendChar 2", 'h' as u32)));
        assert!(vm.contains(&format!("push constant {}\ncall String.appendChar 2", 'i' as u32)));
    }

    #[test]
    fn array_assignment_evaluates_rhs_after_finalizing_the_address() {
        let vm = compile(
            "class Main { \
               function void main() { \
                 var Array a; \
                 let a[0] = 1; \
                 return; \
               } \
             }",
        );
        assert!(vm.contains("pop temp 0\npop pointer 1\npush temp 0\npop that 0"));
    }

    #[test]
    fn class_vars_after_subroutines_are_rejected() {
        let tokens =
            tokenize("class Main { function void f() { return; } field int x; }").unwrap();
        let mut engine = CompilationEngine::new(&tokens, Vec::new());
        let err = engine.compile_class().unwrap_err();
        assert!(matches!(err, CompileError::Semantic { .. }));
    }

    #[test]
    fn referencing_an_undeclared_variable_is_a_semantic_error() {
        let tokens =
            tokenize("class Main { function void f() { let x = 1; return; } }").unwrap();
        let mut engine = CompilationEngine::new(&tokens, Vec::new());
        let err = engine.compile_class().unwrap_err();
        assert!(matches!(err, CompileError::Semantic { .. }));
    }
}
