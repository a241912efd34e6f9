use expect_test::expect;

use crate::{assemble, Address};

const COUNTDOWN: &str = "\
; counts R0 down from ten
        .ORIG x3000
        AND R0,R0,#0
        ADD R0,R0,#10
LOOP    ADD R0,R0,#-1
        BRp LOOP
        HALT
        .END
";

#[test]
fn clean_program() {
    let assembly = assemble(COUNTDOWN).unwrap();
    assert_eq!(assembly.words, [0x3000, 0x5020, 0x102A, 0x103F, 0x03FE, 0xF025]);
    assert_eq!(assembly.symbols.find_by_name("LOOP"), Some(0x3002));
    assert_eq!(assembly.symbols.find_by_addr(0x3002), Some("LOOP"));
}

#[test]
fn addresses_survive_pass_two() {
    let assembly = assemble(COUNTDOWN).unwrap();
    let addresses: Vec<Address> = assembly.records.iter().map(|r| r.address).collect();
    assert_eq!(addresses, [0x3000, 0x3000, 0x3001, 0x3002, 0x3003, 0x3004, 0x3005]);
}

#[test]
fn first_pass_errors_stop_assembly() {
    // the undefined label would only be found by pass two
    let errors = assemble(".ORIG x3000\nBR NOWHERE\nFOO BAR\n.END\n").unwrap_err();
    expect![[r#"
        [
            Diagnostic {
                line: 3,
                kind: MissingOpcode(
                    "BAR",
                ),
            },
        ]
    "#]]
    .assert_debug_eq(&errors);
}

#[test]
fn second_pass_errors() {
    let errors = assemble(".ORIG x3000\nBR NOWHERE\nHALT\n.END\n").unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].to_string(), "ERROR   2: label 'NOWHERE' never defined");
}
