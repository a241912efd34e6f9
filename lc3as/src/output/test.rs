use expect_test::expect;

use super::{write_object, write_symbols, ObjectFormat};
use crate::symbol::SymbolTable;

#[test]
fn binary_is_big_endian() {
    let mut out = Vec::new();
    write_object(&mut out, &[0x3000, 0x1261, 0x0FFE], ObjectFormat::Binary).unwrap();
    assert_eq!(out, [0x30, 0x00, 0x12, 0x61, 0x0F, 0xFE]);
}

#[test]
fn hex() {
    let mut out = Vec::new();
    write_object(&mut out, &[0x3000, 0xf025, 0], ObjectFormat::Hex).unwrap();
    expect![[r#"
        3000
        F025
        0000
    "#]]
    .assert_eq(&String::from_utf8(out).unwrap());
}

#[test]
fn symbols() {
    let mut table = SymbolTable::default();
    table.insert("LOOP", 0x3000);
    table.insert("MESSAGE", 0x3010);
    let mut out = Vec::new();
    write_symbols(&mut out, &table).unwrap();
    let text = String::from_utf8(out).unwrap().replace('\t', "    ");
    expect![[r#"
        // Symbol table
        // Scope level 0:
        //    Symbol Name       Page Address
        //    ----------------  ------------
        //    LOOP              3000
        //    MESSAGE           3010
    "#]]
    .assert_eq(&text);
}

#[test]
fn extensions() {
    assert_eq!(ObjectFormat::default().extension(), "obj");
    assert_eq!(ObjectFormat::Hex.extension(), "hex");
}
