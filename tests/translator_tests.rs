extern crate remips_lib;
use remips_lib::*;

macro_rules! test_translate {
    { $($src:expr => $expected:expr),+ $(,)? } => {
        $({
            let program = Parser::parse_program(Lexer::new($src));
            let mut translator = Translator::new();
            translator.translate_program(&program);
            assert_eq!(translator.get_output(), $expected);
        });+
    };
}

#[test]
fn movl_tests() {
    test_translate! {
        "movl %eax, %ebx" => "add $s0, $zero, $t0\n\n",
        "movl $5, %eax" => "li $t0, 5\n\n",
        "movl %eax, 8(%ebp)" => "sw $t0, 8($fp)\n\n",
        "movl 8(%ebp), %eax" => "lw $t0, 8($fp)\n\n",
        "movl $3, 4(%esp)" => "li $s7, 3\nsw $s7, 4($sp)\n\n",
        // empty offset means offset 0 and is carried through as-is
        "movl (%ebp), %eax" => "lw $t0, ($fp)\n\n",
    }
}

#[test]
fn arith_tests() {
    test_translate! {
        "addl %ecx, %eax" => "add $t0, $t0, $t1\n\n",
        "orl %esi, %edx" => "or $t2, $t2, $s1\n\n",
        "xorl $1, %ebx" => "xori $s0, $s0, 1\n\n",
        "andl $6, %edi" => "andi $s2, $s2, 6\n\n",
        "andl 4(%esp), %edx" => "lw $t5, 4($sp)\nand $t2, $t2, $t5\n\n",
        "orl $7, 12(%ebp)" => "or $t5, $zero, 7\nsw $t5, 12($fp)\n\n",
    }
}

#[test]
fn subl_sign_handling() {
    // the immediate's displayed sign is inverted textually, so a
    // negative literal comes out positive and vice versa
    test_translate! {
        "subl %eax, %ebx" => "sub $s0, $s0, $t0\n\n",
        "subl $5, %eax" => "addi $t0, $t0, -5\n\n",
        "subl $-5, %eax" => "addi $t0, $t0, 5\n\n",
    }
}

#[test]
fn imull_tests() {
    test_translate! {
        "imull %ecx, %eax" => "mult $t1, $t0\nmflo $t0\n\n",
        "imull $3, %eax" => "mult $s6, $zero, 3\nmult $s6, $t0\nmflo $t0\n\n",
    }
}

#[test]
fn shift_tests() {
    test_translate! {
        "sall %ecx, %eax" => "sllv $t0, $t0, $t1\n\n",
        "shll $2, %ebx" => "sll $s0, $s0, 2\n\n",
        "sarl $3, %eax" => "sra $t0, $t0, 3\n\n",
        "shrl $1, %edx" => "srl $t2, $t2, 1\n\n",
        // sra has no register-count form here
        "sarl %ecx, %eax" => "wrong instruction\n\n",
    }
}

#[test]
fn unary_tests() {
    test_translate! {
        "incl %eax" => "addi $t0, $t0, 1\n\n",
        "decl %esi" => "addi $s1, $s1, -1\n\n",
        "negl %eax" => "sub $t0, $zero, $t0\n\n",
        "notl %ebx" => "not $s0, $s0\n\n",
    }
}

#[test]
fn stack_tests() {
    test_translate! {
        "pushl $42" => "addi $sp, $sp, -4\nli $s7, 42\nsw $s7, 0($sp)\n\n",
        "popl %eax" => "lw $t0, 0($sp)\naddi $sp, $sp, 4\n\n",
        // balanced push/pop, equal and opposite $sp deltas
        "pushl %eax\npopl %eax" =>
            "addi $sp, $sp, -4\nsw $t0, 0($sp)\nlw $t0, 0($sp)\naddi $sp, $sp, 4\n\n",
    }
}

#[test]
fn call_fusion_tests() {
    test_translate! {
        // pushes stay in original order, then jal, then one deallocation
        "pushl %eax\npushl $2\npushl %esi\ncall foo" => "\
            addi $sp, $sp, -4\nsw $t0, 0($sp)\n\
            addi $sp, $sp, -4\nli $s7, 2\nsw $s7, 0($sp)\n\
            addi $sp, $sp, -4\nsw $s1, 0($sp)\n\
            jal foo\naddi $sp, $sp, 12\n\n",
        // a run not followed by call is just ordinary pushes
        "pushl %eax\npushl %ecx\nmovl %eax, %ebx" => "\
            addi $sp, $sp, -4\nsw $t0, 0($sp)\n\
            addi $sp, $sp, -4\nsw $t1, 0($sp)\n\
            add $s0, $zero, $t0\n\n",
        // %ebp inside a run is a plain argument, not a frame setup
        "pushl %eax\npushl %ebp\ncall foo" => "\
            addi $sp, $sp, -4\nsw $t0, 0($sp)\n\
            addi $sp, $sp, -4\nsw $fp, 0($sp)\n\
            jal foo\naddi $sp, $sp, 8\n\n",
        // a malformed push inside a fused run stays visible
        "pushl 8(%ebp)\ncall foo" =>
            "wrong instruction\njal foo\naddi $sp, $sp, 4\n\n",
        "call helper" => "jal helper\n\n",
    }
}

#[test]
fn compare_branch_tests() {
    test_translate! {
        // cmpl's destination operand is emitted first
        "cmpl %eax, %ebx\njl target" => "blt $s0, $t0, target\n\n",
        "cmpl $5, %eax\nje done" => "beq $t0, 5, done\n\n",
        "cmpl %edx, %ecx\njne out" => "bne $t1, $t2, out\n\n",
        "cmpl $0, %esi\njle last" => "ble $s1, 0, last\n\n",
        "cmpl %ebx, %eax\njg more" => "bgt $t0, $s0, more\n\n",
        "cmpl $1, %edi\njge loop" => "bge $s2, 1, loop\n\n",
        "jmp loop" => "b loop\n\n",
    }
}

#[test]
fn procedure_round_trip() {
    test_translate! {
        "foo:\n  pushl %ebp\n  movl %esp, %ebp\n  movl %eax, %ebx\n  leave\n  ret" => "\
            .globl foo\n.ent foo\nfoo:\n\
            addi $sp, $sp, -8\nsw $ra, 4($sp)\nsw $fp, 0($sp)\naddi $fp, $sp, 0\n\
            add $s0, $zero, $t0\n\
            lw $fp, 0($sp)\nlw $ra, 4($sp)\naddi $sp, $sp, 8\njr $ra\n\
            .end foo\n\n",
    }
}

#[test]
fn procedure_with_internal_label() {
    // the internal label gets no .globl/.ent and the .end fires in the
    // block whose epilogue reset the state, against the entry name
    test_translate! {
        "main:\n  pushl %ebp\n  movl %esp, %ebp\nloop:\n  incl %eax\n  cmpl $10, %eax\n  jl loop\n  leave\n  ret" => "\
            .globl main\n.ent main\nmain:\n\
            addi $sp, $sp, -8\nsw $ra, 4($sp)\nsw $fp, 0($sp)\naddi $fp, $sp, 0\n\n\
            loop:\n\
            addi $t0, $t0, 1\n\
            blt $t0, 10, loop\n\
            lw $fp, 0($sp)\nlw $ra, 4($sp)\naddi $sp, $sp, 8\njr $ra\n\
            .end main\n\n",
    }
}

#[test]
fn consecutive_procedures() {
    test_translate! {
        "first:\n  pushl %ebp\n  movl %esp, %ebp\n  leave\n  ret\nsecond:\n  pushl %ebp\n  movl %esp, %ebp\n  leave\n  ret" => "\
            .globl first\n.ent first\nfirst:\n\
            addi $sp, $sp, -8\nsw $ra, 4($sp)\nsw $fp, 0($sp)\naddi $fp, $sp, 0\n\
            lw $fp, 0($sp)\nlw $ra, 4($sp)\naddi $sp, $sp, 8\njr $ra\n\
            .end first\n\n\
            .globl second\n.ent second\nsecond:\n\
            addi $sp, $sp, -8\nsw $ra, 4($sp)\nsw $fp, 0($sp)\naddi $fp, $sp, 0\n\
            lw $fp, 0($sp)\nlw $ra, 4($sp)\naddi $sp, $sp, 8\njr $ra\n\
            .end second\n\n",
    }
}

#[test]
fn epilogue_ignores_second_instruction() {
    // whatever follows leave is consumed without being looked at
    test_translate! {
        "leave\nret" => "lw $fp, 0($sp)\nlw $ra, 4($sp)\naddi $sp, $sp, 8\njr $ra\n\n",
        "leave\nmovl %eax, %ebx" => "lw $fp, 0($sp)\nlw $ra, 4($sp)\naddi $sp, $sp, 8\njr $ra\n\n",
    }
}

#[test]
fn malformed_instruction_tests() {
    test_translate! {
        "movl %eax" => "wrong instruction\n\n",
        "movl @foo, %eax" => "wrong instruction\n\n",
        "addl %eax, $5" => "wrong instruction\n\n",
        "popl $5" => "wrong instruction\n\n",
        "imull $2, 4(%esp)" => "wrong instruction\n\n",
        // translation keeps going after a sentinel
        "movl %eax\nmovl %eax, %ecx" => "wrong instruction\nadd $t1, $zero, $t0\n\n",
    }
}

#[test]
fn truncated_fusion_tests() {
    // running out of instructions mid-fusion reports instead of crashing
    test_translate! {
        "cmpl %eax, %ebx" => "wrong instruction\n\n",
        "foo:\n  pushl %ebp" => ".globl foo\n.ent foo\nfoo:\nwrong instruction\n\n",
        "leave" => "wrong instruction\n\n",
    }
}

#[test]
fn unknown_mnemonics_are_skipped() {
    test_translate! {
        "nop\nmovl %eax, %ecx" => "add $t1, $zero, $t0\n\n",
        "ret" => "\n",
    }
}

#[test]
fn operand_classification() {
    assert_eq!(
        Operand::classify("%eax"),
        Some(Operand::Register("%eax".to_string()))
    );
    assert_eq!(
        Operand::classify("$5"),
        Some(Operand::Immediate("5".to_string()))
    );
    assert_eq!(
        Operand::classify("8(%ebp)"),
        Some(Operand::Memory(MemoryReference {
            offset: "8".to_string(),
            base: "%ebp".to_string()
        }))
    );
    assert_eq!(
        Operand::classify("(%esp)"),
        Some(Operand::Memory(MemoryReference {
            offset: "".to_string(),
            base: "%esp".to_string()
        }))
    );

    assert_eq!(Operand::classify(""), None);
    assert_eq!(Operand::classify("foo"), None);
    assert_eq!(Operand::classify("-4(%ebp)"), None);
    assert_eq!(Operand::classify("8"), None);

    let operand = Operand::classify("$42").unwrap();
    assert_eq!(operand.as_immediate().map(|value| value.as_str()), Some("42"));
    assert!(Operand::classify("%esp").unwrap().as_register().is_some());
}
