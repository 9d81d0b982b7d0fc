use super::{Reg, Spot, REGISTERS};
use crate::error::LowerError;

#[test]
fn register_renders_same_name_at_every_width() {
    let spot = Spot::Reg(Reg::SA);

    assert_eq!("sA", spot.render(1).unwrap());
    assert_eq!("sA", spot.render(4).unwrap());
    assert_eq!("sA", spot.render(8).unwrap());
}

#[test]
fn register_table_has_distinct_names() {
    let mut names: Vec<_> = REGISTERS.iter().map(|r| r.name()).collect();
    names.sort();
    names.dedup();

    assert_eq!(16, names.len());
}

#[test]
fn literal_renders_as_decimal_text() {
    assert_eq!("14", Spot::Literal(14).render(4).unwrap());
    assert_eq!("-3", Spot::Literal(-3).render(8).unwrap());
}

#[test]
fn unsupported_width_is_an_error() {
    let err = Spot::Reg(Reg::S0).render(3).unwrap_err();
    assert!(matches!(err, LowerError::UnsupportedWidth { width: 3, .. }));
}

#[test]
fn symbolic_memory_renders_bracketed() {
    assert_eq!("[count]", Spot::sym("count").render(4).unwrap());
}

#[test]
fn memory_offset_renders_signed() {
    let base = Spot::Reg(Reg::S7);

    assert_eq!("[s7+8]", Spot::mem(base.clone(), 8).render(4).unwrap());
    assert_eq!("[s7-16]", Spot::mem(base, -16).render(4).unwrap());
}

#[test]
fn frame_offset_negates_register_relative_offsets() {
    let frame = Spot::mem(Spot::Reg(Reg::S7), 24);

    assert_eq!(-24, frame.frame_offset());
    assert_eq!(0, Spot::sym("global").frame_offset());
    assert_eq!(0, Spot::Reg(Reg::S1).frame_offset());
    assert_eq!(0, Spot::Literal(5).frame_offset());
}

#[test]
fn constant_shifts_compose_additively() {
    let spot = Spot::sym("arr");

    let once = spot.shift(12, None).unwrap();
    let twice = once.shift(-4, None).unwrap();

    assert_eq!(spot.shift(8, None).unwrap(), twice);
    assert_eq!("[arr+8]", twice.render(4).unwrap());
}

#[test]
fn index_shift_renders_scaled() {
    let spot = Spot::sym("arr");
    let indexed = spot.shift(4, Some(Spot::Reg(Reg::S5))).unwrap();

    assert_eq!("[arr+4*s5]", indexed.render(4).unwrap());
}

#[test]
fn constant_shift_after_index_keeps_the_index() {
    let spot = Spot::sym("arr");
    let indexed = spot.shift(8, Some(Spot::Reg(Reg::S5))).unwrap();
    let shifted = indexed.shift(2, None).unwrap();

    assert_eq!("[arr+2+8*s5]", shifted.render(4).unwrap());
}

#[test]
fn double_indexing_fails() {
    let spot = Spot::sym("arr");
    let indexed = spot.shift(4, Some(Spot::Reg(Reg::S5))).unwrap();

    let err = indexed.shift(4, Some(Spot::Reg(Reg::S6))).unwrap_err();
    assert_eq!(LowerError::DoubleIndex, err);
}

#[test]
fn index_scale_must_be_a_power_of_two_chunk() {
    let spot = Spot::sym("arr");

    let err = spot.shift(3, Some(Spot::Reg(Reg::S5))).unwrap_err();
    assert_eq!(LowerError::BadScale(3), err);
}

#[test]
fn non_memory_spots_only_shift_by_nothing() {
    let reg = Spot::Reg(Reg::S1);

    assert_eq!(reg, reg.shift(0, None).unwrap());
    assert_eq!(LowerError::CannotShift, reg.shift(4, None).unwrap_err());

    let lit = Spot::Literal(9);
    let err = lit.shift(0, Some(Spot::Reg(Reg::S2))).unwrap_err();
    assert_eq!(LowerError::CannotShift, err);
}

#[test]
fn immediate_predicates() {
    assert!(Spot::Literal(5).is_imm());
    assert!(!Spot::Reg(Reg::S0).is_imm());

    assert!(Spot::Literal(255).is_imm8());
    assert!(!Spot::Literal(256).is_imm8());
    assert!(!Spot::Literal(-1).is_imm8());

    assert!(Spot::Literal(1 << 40).is_imm64());
    assert!(Spot::Literal(i32::MIN as i64 - 1).is_imm64());
    assert!(!Spot::Literal(i32::MAX as i64).is_imm64());
}

#[test]
fn spots_compare_by_kind_and_detail() {
    assert_eq!(Spot::Reg(Reg::S3), Spot::Reg(Reg::S3));
    assert_ne!(Spot::Reg(Reg::S3), Spot::Reg(Reg::S4));
    assert_ne!(Spot::sym("a"), Spot::sym("b"));
    assert_ne!(Spot::Literal(0), Spot::sym("0"));

    let shifted = Spot::sym("a").shift(4, None).unwrap();
    assert_eq!(shifted, Spot::sym("a").shift(4, None).unwrap());
    assert_ne!(shifted, Spot::sym("a"));
}
