use expect_test::{expect, Expect};

use crate::Assembler;

fn check(src: &str, expect: Expect) {
    let mut asm = Assembler::new();
    asm.pass_one(src);
    let mut out = String::from("records:\n");
    for record in &asm.records {
        out.push_str(&format!("{record}\n"));
    }
    out.push_str("symbols:\n");
    asm.symbols
        .for_each(|name, addr| out.push_str(&format!("{name} x{addr:04X}\n")));
    out.push_str("errors:\n");
    for diagnostic in &asm.diagnostics {
        out.push_str(&format!("{diagnostic}\n"));
    }
    expect.assert_eq(&out);
}

#[test]
fn loop_scenario() {
    check(
        "    .ORIG x3000\nLOOP ADD R1,R1,#1\n    BR LOOP\n    .END\n",
        expect![[r#"
            records:
            1: x3000 x0000 .ORIG Base imm:12288
            2: x3000 x0000 ADD Alt r1:1 r2:1 imm:1
            3: x3001 x0000 BR Base cc:111 ref:"LOOP"
            4: x3002 x0000 .END Base
            symbols:
            LOOP x3000
            errors:
        "#]],
    );
}

#[test]
fn block_and_fill() {
    let src = ".ORIG x3000\nBUF .BLKW 3\nNEXT .FILL xFFFF\n.END\n";
    check(
        src,
        expect![[r#"
            records:
            1: x3000 x0000 .ORIG Base imm:12288
            2: x3000 x0000 .BLKW Base imm:3
            3: x3003 x0000 .FILL Base imm:65535
            4: x3004 x0000 .END Base
            symbols:
            BUF x3000
            NEXT x3003
            errors:
        "#]],
    );
    let mut asm = Assembler::new();
    asm.pass_one(src);
    assert_eq!(asm.cursor(), 0x3004);
}

#[test]
fn string_words() {
    check(
        ".ORIG x3000\nMSG .STRINGZ \"Hi\"\nAFTER HALT\n.END",
        expect![[r#"
            records:
            1: x3000 x0000 .ORIG Base imm:12288
            2: x3000 x0000 .STRINGZ Base ref:"Hi"
            3: x3003 x0000 HALT Base
            4: x3004 x0000 .END Base
            symbols:
            MSG x3000
            AFTER x3003
            errors:
        "#]],
    );
}

#[test]
fn forms() {
    check(
        ".ORIG x3000\nBRn A\nbrzp A\nA JSR A\nJSRR R3\nRET\n.END",
        expect![[r#"
            records:
            1: x3000 x0000 .ORIG Base imm:12288
            2: x3000 x0000 BR Base cc:100 ref:"A"
            3: x3001 x0000 BR Base cc:011 ref:"A"
            4: x3002 x0000 JSR/JSRR Alt ref:"A"
            5: x3003 x0000 JSR/JSRR Base r2:3
            6: x3004 x0000 JMP/RET Alt
            7: x3005 x0000 .END Base
            symbols:
            A x3002
            errors:
        "#]],
    );
}

#[test]
fn line_errors() {
    let src = "\
.ORIG x3000
ADD R1,R1,#99
LOOP AND R0 R1, R2 ; no comma
LOOP NOT R0,R1
1BAD LD R2,DATA
FOO R1
LDR R1,R2
ADD R1,R2,R3,R4
TRAP x100
ADD R1,R2,R9
JMP #3
BRzn LOOP
LD R0,#5
.STRINGZ hi
.END
";
    check(
        src,
        expect![[r#"
            records:
            1: x3000 x0000 .ORIG Base imm:12288
            2: x3000 x0000 ADD Base r1:1 r2:1
            3: x3001 x0000 AND Base r1:0
            4: x3002 x0000 NOT Base r1:0 r2:1
            5: x3003 x0000 LD Base r1:2 ref:"DATA"
            7: x3004 x0000 LDR Base r1:1 r2:2
            8: x3005 x0000 ADD Base r1:1 r2:2 r3:3
            9: x3006 x0000 TRAP Base
            10: x3007 x0000 ADD Base r1:1 r2:2
            11: x3008 x0000 JMP/RET Base
            13: x3009 x0000 LD Base r1:0
            14: x300A x0000 .STRINGZ Base
            15: x300B x0000 .END Base
            symbols:
            LOOP x3001
            FOO x3004
            errors:
            ERROR   2: immediate '#99' out of range
            ERROR   3: expected comma, got 'R1'
            ERROR   4: label 'LOOP' previously defined
            ERROR   5: label '1BAD' contains illegal characters
            ERROR   6: expected LC3 op, got 'R1'
            ERROR   7: too few operand(s)
            ERROR   8: extra operand(s) 'R4'
            ERROR   9: immediate 'x100' out of range
            ERROR  10: expected register or immediate, got 'R9'
            ERROR  11: expected register (R0-R7), got '#3'
            ERROR  12: bad condition codes in 'BRzn'
            ERROR  13: label '#5' contains illegal characters
            ERROR  14: expected quoted string, got 'hi'
        "#]],
    );
}

#[test]
fn program_frame() {
    check(
        "ADD R1,R1,R1\n.ORIG x3000\n.END\nHALT\nHALT\n",
        expect![[r#"
            records:
            1: x0000 x0000 ADD Base r1:1 r2:1 r3:1
            2: x3000 x0000 .ORIG Base imm:12288
            3: x3000 x0000 .END Base
            symbols:
            errors:
            ERROR   1: instruction(s) appear before .ORIG
            ERROR   4: instruction(s) appear after .END
        "#]],
    );
    check(
        ".ORIG x3000\nHALT\n",
        expect![[r#"
            records:
            1: x3000 x0000 .ORIG Base imm:12288
            2: x3000 x0000 HALT Base
            symbols:
            errors:
            ERROR   2: .END not found
        "#]],
    );
    check(
        "; nothing here\n",
        expect![[r#"
            records:
            symbols:
            errors:
            ERROR   1: .ORIG not found
        "#]],
    );
}

#[test]
fn duplicate_label_reported_once() {
    let mut asm = Assembler::new();
    asm.pass_one(".ORIG x3000\nX HALT\nX HALT\n.END\n");
    assert_eq!(asm.error_count(), 1);
    assert_eq!(asm.symbols.find_by_name("X"), Some(0x3000));
}

#[test]
fn negative_origin() {
    let mut asm = Assembler::new();
    asm.pass_one(".ORIG #-1\n.BLKW #-2\n.END\n");
    assert_eq!(asm.error_count(), 2);
}

#[test]
fn nothing_after_end() {
    check(
        ".ORIG x3000\nHALT\n.END\nLATE\nLATER HALT\n",
        expect![[r#"
            records:
            1: x3000 x0000 .ORIG Base imm:12288
            2: x3000 x0000 HALT Base
            3: x3001 x0000 .END Base
            symbols:
            errors:
            ERROR   4: instruction(s) appear after .END
        "#]],
    );
}

#[test]
fn second_origin() {
    check(
        ".ORIG x3000\nHALT\n.ORIG x4000\nHALT\n.END\n",
        expect![[r#"
            records:
            1: x3000 x0000 .ORIG Base imm:12288
            2: x3000 x0000 HALT Base
            3: x4000 x0000 .ORIG Base imm:16384
            4: x4000 x0000 HALT Base
            5: x4001 x0000 .END Base
            symbols:
            errors:
            ERROR   3: .ORIG already given
        "#]],
    );
}

#[test]
fn bare_hex_operands() {
    check(
        ".ORIG x3000\nTRAP 2F\nMASK .FILL FF\n.END\n",
        expect![[r#"
            records:
            1: x3000 x0000 .ORIG Base imm:12288
            2: x3000 x0000 TRAP Base imm:47
            3: x3001 x0000 .FILL Base imm:255
            4: x3002 x0000 .END Base
            symbols:
            MASK x3001
            errors:
        "#]],
    );
}

#[test]
fn wide_string_character() {
    check(
        ".ORIG x3000\nS .STRINGZ \"ok😀\"\nT HALT\n.END\n",
        expect![[r#"
            records:
            1: x3000 x0000 .ORIG Base imm:12288
            2: x3000 x0000 .STRINGZ Base
            3: x3001 x0000 HALT Base
            4: x3002 x0000 .END Base
            symbols:
            S x3000
            T x3001
            errors:
            ERROR   2: character '😀' does not fit in a word
        "#]],
    );
}

#[test]
fn bad_branch_condition() {
    check(
        ".ORIG x3000\nBRpn LOOP\nLOOP BRnn LOOP\n.END\n",
        expect![[r#"
            records:
            1: x3000 x0000 .ORIG Base imm:12288
            4: x3000 x0000 .END Base
            symbols:
            LOOP x3000
            errors:
            ERROR   2: bad condition codes in 'BRpn'
            ERROR   3: bad condition codes in 'BRnn'
        "#]],
    );
}
