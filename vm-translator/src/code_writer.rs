use std::fs::File;
use std::io::{BufWriter, Write};

use crate::error::VmError;

// 定义一个宏来简化汇编代码的写入
macro_rules! write_asm {
    ($writer:expr, $($line:literal)*) => {
        $writer.write_all(concat!($($line, "\n"),*).as_bytes())
    };
}

#[derive(Clone, Copy)]
enum SegmentSymbol {
    Local,
    Argument,
    This,
    That,
    Temp,
    Pointer,
    Static,
    Constant,
}

impl SegmentSymbol {
    fn from_str(segment: &str) -> Option<Self> {
        match segment {
            "local" => Some(SegmentSymbol::Local),
            "argument" => Some(SegmentSymbol::Argument),
            "this" => Some(SegmentSymbol::This),
            "that" => Some(SegmentSymbol::That),
            "temp" => Some(SegmentSymbol::Temp),
            "pointer" => Some(SegmentSymbol::Pointer),
            "static" => Some(SegmentSymbol::Static),
            "constant" => Some(SegmentSymbol::Constant),
            _ => None,
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            SegmentSymbol::Local => "LCL",
            SegmentSymbol::Argument => "ARG",
            SegmentSymbol::This => "THIS",
            SegmentSymbol::That => "THAT",
            SegmentSymbol::Temp => "R5",
            SegmentSymbol::Pointer => "THIS", // Special case handled separately
            SegmentSymbol::Static => "STATIC", // Special case handled separately
            SegmentSymbol::Constant => "CONSTANT", // Special case handled separately
        }
    }
}

pub struct CodeWriter {
    output_file: BufWriter<File>,
    label_counter: usize,
    filename: String,
    /// Name of the function currently being emitted, used to scope
    /// `label`/`goto`/`if-goto` targets and to name `call` return labels.
    /// Empty outside any function (top-level code before the first `function`).
    current_function: String,
}

impl CodeWriter {
    /// 创建一个新的CodeWriter实例，用于将汇编代码写入指定的输出文件，默认启动使用Buf占据8192字节。
    pub fn new(output_filename: &str) -> Result<Self, std::io::Error> {
        let file = File::create(output_filename)?;
        let buffered = BufWriter::with_capacity(8192, file);
        Ok(CodeWriter {
            output_file: buffered,
            label_counter: 0,
            filename: String::new(),
            current_function: String::new(),
        })
    }

    #[inline]
    pub fn set_filename(&mut self, filename: &str) {
        // Extract filename without path and extension
        let name = std::path::Path::new(filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Unknown");
        self.filename.clear();
        self.filename.push_str(name);
    }

    pub fn write_arithmetic(&mut self, command: &str) -> Result<(), VmError> {
        writeln!(self.output_file, "// vm command:{}", command)?;

        match command {
            "add" => self.write_binary_op("D+M"),
            "sub" => self.write_binary_op("D-M"),
            "and" => self.write_binary_op("D&M"),
            "or" => self.write_binary_op("D|M"),
            "neg" => self.write_unary_op(true),
            "not" => self.write_unary_op(false),
            "eq" => self.write_comparison("JEQ"),
            "gt" => self.write_comparison("JGT"),
            "lt" => self.write_comparison("JLT"),
            _ => return Err(VmError::UnknownArithmeticCommand(command.to_string())),
        }
        .map_err(Into::into)
    }

    #[inline]
    fn write_binary_op(&mut self, operation: &str) -> Result<(), std::io::Error> {
        // Optimized: write all at once to reduce syscalls
        write!(
            self.output_file,
            "// get the top element of stack\n\
             @SP\n\
             M=M-1\n\
             A=M\n\
             D=M\n\
             // store the result temporarily\n\
             @R14\n\
             M=D\n\
             // get the top element of stack\n\
             @SP\n\
             M=M-1\n\
             A=M\n\
             D=M\n\
             // store the result temporarily\n\
             @R13\n\
             M=D\n\
             @R13\n\
             D=M\n\
             @R14\n\
             D={}\n",
            operation
        )?;

        self.write_push_d()?;
        self.output_file.write_all(b"\n")?;
        Ok(())
    }

    #[inline]
    fn write_unary_op(&mut self, is_neg: bool) -> Result<(), std::io::Error> {
        write_asm!(self.output_file,
            "// get the top element of stack"
            "@SP"
            "M=M-1"
            "A=M"
            "D=M"
        )?;

        if is_neg {
            write_asm!(self.output_file,
                "@0"
                "D=A-D"
            )?;
        } else {
            write_asm!(self.output_file, "D=!D")?;
        }

        self.write_push_d()?;
        self.output_file.write_all(b"\n")?;
        Ok(())
    }

    #[inline]
    fn write_comparison(&mut self, jump: &str) -> Result<(), std::io::Error> {
        let label_prefix = match jump {
            "JEQ" => "EQ",
            "JGT" => "GT",
            "JLT" => "LT",
            _ => jump,
        };
        let label_num = self.label_counter;
        self.label_counter += 1;

        write!(
            self.output_file,
            "// get the top element of stack\n\
             @SP\n\
             M=M-1\n\
             A=M\n\
             D=M\n\
             // store the result temporarily\n\
             @R14\n\
             M=D\n\
             // get the top element of stack\n\
             @SP\n\
             M=M-1\n\
             A=M\n\
             D=M\n\
             // store the result temporarily\n\
             @R13\n\
             M=D\n\
             @R13\n\
             D=M\n\
             @R14\n\
             D=D-M\n\
             @{}{}\n\
             D;{}\n\
             // push the value into stack\n\
             @SP\n\
             A=M\n\
             M=0\n\
             @SP\n\
             M=M+1\n\
             @END{}{}\n\
             0;JMP\n\
             ({}{})\n\
             // push the value into stack\n\
             @SP\n\
             A=M\n\
             M=-1\n\
             @SP\n\
             M=M+1\n\
             (END{}{})\n\n",
            label_prefix,
            label_num,
            jump,
            label_prefix,
            label_num,
            label_prefix,
            label_num,
            label_prefix,
            label_num
        )
    }

    pub fn write_push_pop(
        &mut self,
        command: &str,
        segment: &str,
        index: i32,
    ) -> Result<(), VmError> {
        writeln!(
            self.output_file,
            "// vm command:{} {} {}",
            command, segment, index
        )?;

        if command == "push" {
            self.write_push(segment, index)?;
        } else if command == "pop" {
            self.write_pop(segment, index)?;
        }

        self.output_file.write_all(b"\n")?;
        Ok(())
    }

    #[inline]
    fn write_push(&mut self, segment: &str, index: i32) -> Result<(), VmError> {
        match SegmentSymbol::from_str(segment) {
            Some(SegmentSymbol::Constant) => {
                write!(self.output_file, "@{}\nD=A\n", index)?;
                self.write_push_d().map_err(Into::into)
            }
            Some(seg)
                if matches!(
                    seg,
                    SegmentSymbol::Local
                        | SegmentSymbol::Argument
                        | SegmentSymbol::This
                        | SegmentSymbol::That
                ) =>
            {
                let segment_symbol = seg.symbol();
                write!(
                    self.output_file,
                    "@{}\nD=M\n@{}\nA=D+A\nD=M\n",
                    segment_symbol, index
                )?;
                self.write_push_d().map_err(Into::into)
            }
            Some(SegmentSymbol::Temp) => {
                write!(self.output_file, "@R5\nD=A\n@{}\nA=D+A\nD=M\n", index)?;
                self.write_push_d().map_err(Into::into)
            }
            Some(SegmentSymbol::Pointer) => {
                write!(self.output_file, "@THIS\nD=A\n@{}\nA=D+A\nD=M\n", index)?;
                self.write_push_d().map_err(Into::into)
            }
            Some(SegmentSymbol::Static) => {
                write!(self.output_file, "@{}.{}\nD=M\n", self.filename, index)?;
                self.write_push_d().map_err(Into::into)
            }
            None => Err(VmError::UnknownSegment(segment.to_string())),
        }
    }

    #[inline]
    fn write_pop(&mut self, segment: &str, index: i32) -> Result<(), VmError> {
        match SegmentSymbol::from_str(segment) {
            Some(seg)
                if matches!(
                    seg,
                    SegmentSymbol::Local
                        | SegmentSymbol::Argument
                        | SegmentSymbol::This
                        | SegmentSymbol::That
                ) =>
            {
                let segment_symbol = seg.symbol();
                write!(
                    self.output_file,
                    "@{}\n\
                     D=M\n\
                     @{}\n\
                     D=D+A\n\
                     // store the result temporarily\n\
                     @R13\n\
                     M=D\n",
                    segment_symbol, index
                )?;

                self.write_pop_to_d()?;

                write_asm!(self.output_file,
                    "// store the top value"
                    "@R13"
                    "A=M"
                    "M=D"
                )?;
                Ok(())
            }
            Some(SegmentSymbol::Temp) => {
                write!(
                    self.output_file,
                    "@5\n\
                     D=A\n\
                     @{}\n\
                     D=D+A\n\
                     // store the result temporarily\n\
                     @R13\n\
                     M=D\n",
                    index
                )?;

                self.write_pop_to_d()?;

                write_asm!(self.output_file,
                    "// store the top value"
                    "@R13"
                    "A=M"
                    "M=D"
                )?;
                Ok(())
            }
            Some(SegmentSymbol::Pointer) => {
                write!(
                    self.output_file,
                    "@THIS\n\
                     D=A\n\
                     @{}\n\
                     D=D+A\n\
                     // store the result temporarily\n\
                     @R13\n\
                     M=D\n",
                    index
                )?;

                self.write_pop_to_d()?;

                write_asm!(self.output_file,
                    "// store the top value"
                    "@R13"
                    "A=M"
                    "M=D"
                )?;
                Ok(())
            }
            Some(SegmentSymbol::Static) => {
                self.write_pop_to_d()?;
                write!(self.output_file, "@{}.{}\nM=D\n", self.filename, index)?;
                Ok(())
            }
            Some(SegmentSymbol::Constant) => {
                Err(VmError::UnknownSegment("constant (not poppable)".to_string()))
            }
            None => Err(VmError::UnknownSegment(segment.to_string())),
        }
    }

    #[inline]
    fn write_push_d(&mut self) -> Result<(), std::io::Error> {
        write_asm!(self.output_file,
            "// push the value into stack"
            "@SP"
            "A=M"
            "M=D"
            "@SP"
            "M=M+1"
        )
    }

    #[inline]
    fn write_pop_to_d(&mut self) -> Result<(), std::io::Error> {
        write_asm!(self.output_file,
            "// get the top element of stack"
            "@SP"
            "M=M-1"
            "A=M"
            "D=M"
        )
    }

    /// Resolves a bare `label`/`goto`/`if-goto` target to the function-scoped
    /// name `functionName$label`, matching the teacher's `functionName` source
    /// tracking for static variables.
    fn scoped_label(&self, label: &str) -> String {
        if self.current_function.is_empty() {
            label.to_string()
        } else {
            format!("{}${}", self.current_function, label)
        }
    }

    pub fn write_label(&mut self, label: &str) -> Result<(), VmError> {
        let scoped = self.scoped_label(label);
        writeln!(self.output_file, "({})", scoped)?;
        Ok(())
    }

    pub fn write_goto(&mut self, label: &str) -> Result<(), VmError> {
        let scoped = self.scoped_label(label);
        writeln!(self.output_file, "@{}\n0;JMP", scoped)?;
        Ok(())
    }

    pub fn write_if(&mut self, label: &str) -> Result<(), VmError> {
        self.write_pop_to_d()?;
        let scoped = self.scoped_label(label);
        writeln!(self.output_file, "@{}\nD;JNE", scoped)?;
        Ok(())
    }

    pub fn write_function(&mut self, name: &str, n_locals: i32) -> Result<(), VmError> {
        self.current_function = name.to_string();
        writeln!(self.output_file, "// vm command:function {} {}", name, n_locals)?;
        writeln!(self.output_file, "({})", name)?;
        for _ in 0..n_locals {
            write_asm!(self.output_file,
                "@SP"
                "A=M"
                "M=0"
                "@SP"
                "M=M+1"
            )?;
        }
        self.output_file.write_all(b"\n")?;
        Ok(())
    }

    /// Pushes the current value of a pointer register (`LCL`/`ARG`/`THIS`/`THAT`)
    /// as part of the caller-saved frame built by [`Self::write_call`].
    fn push_pointer_value(&mut self, pointer: &str) -> Result<(), std::io::Error> {
        write!(self.output_file, "@{}\nD=M\n", pointer)?;
        self.write_push_d()
    }

    /// Implements the call protocol: pushes the return address and the
    /// caller's four saved segment pointers, repositions `ARG`/`LCL` for the
    /// callee, and jumps to the function. See spec for the memory diagram.
    pub fn write_call(&mut self, name: &str, n_args: i32) -> Result<(), VmError> {
        let return_label = format!("{}$ret.{}", self.current_function, self.label_counter);
        self.label_counter += 1;

        writeln!(self.output_file, "// vm command:call {} {}", name, n_args)?;

        write!(self.output_file, "@{}\nD=A\n", return_label)?;
        self.write_push_d()?;

        self.push_pointer_value("LCL")?;
        self.push_pointer_value("ARG")?;
        self.push_pointer_value("THIS")?;
        self.push_pointer_value("THAT")?;

        // ARG = SP - n_args - 5
        write!(
            self.output_file,
            "@{}\nD=A\n@SP\nD=M-D\n@ARG\nM=D\n",
            n_args + 5
        )?;

        // LCL = SP
        write_asm!(self.output_file,
            "@SP"
            "D=M"
            "@LCL"
            "M=D"
        )?;

        writeln!(self.output_file, "@{}\n0;JMP", name)?;
        writeln!(self.output_file, "({})", return_label)?;
        self.output_file.write_all(b"\n")?;
        Ok(())
    }

    /// Tears down the callee's frame, restores the caller's segment pointers,
    /// repositions the return value at `*ARG`, and jumps back to the caller.
    /// Uses `R13` as `FRAME` and `R14` as `RET`, the same scratch registers
    /// the arithmetic ops above use transiently.
    pub fn write_return(&mut self) -> Result<(), VmError> {
        writeln!(self.output_file, "// vm command:return")?;

        write_asm!(self.output_file,
            "@LCL"
            "D=M"
            "@R13"
            "M=D"
            "@5"
            "A=D-A"
            "D=M"
            "@R14"
            "M=D"
        )?;

        // *ARG = return value (top of stack)
        self.write_pop_to_d()?;
        write_asm!(self.output_file,
            "@ARG"
            "A=M"
            "M=D"
            "@ARG"
            "D=M+1"
            "@SP"
            "M=D"
        )?;

        for (offset, target) in [(1, "THAT"), (2, "THIS"), (3, "ARG"), (4, "LCL")] {
            write!(
                self.output_file,
                "@R13\nD=M\n@{}\nA=D-A\nD=M\n@{}\nM=D\n",
                offset, target
            )?;
        }

        writeln!(self.output_file, "@R14\nA=M\n0;JMP")?;
        self.output_file.write_all(b"\n")?;
        Ok(())
    }

    /// Emits the fixed prelude prepended once when translating a directory:
    /// initializes `SP` to 256 and calls `Sys.init`.
    pub fn write_bootstrap(&mut self) -> Result<(), VmError> {
        write_asm!(self.output_file,
            "// bootstrap"
            "@256"
            "D=A"
            "@SP"
            "M=D"
        )?;
        self.write_call("Sys.init", 0)
    }

    #[inline]
    pub fn close(&mut self) -> Result<(), std::io::Error> {
        self.output_file.flush()
    }
}
