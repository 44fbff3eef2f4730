//! End-to-end behavior of the host-facing surface.

use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use zz::{comb, factorial, fibonacci, format_int, gcd, gcdext, host_hash, host_hash_i64, isqrt};
use zz::{Error, Int, Rat};

#[quickcheck]
fn operators_agree_with_checked_forms(a: i64, b: i64) -> bool {
    let (ia, ib) = (Int::from(a), Int::from(b));
    &ia + &ib == ia.checked_add(&ib).unwrap()
        && &ia - &ib == ia.checked_sub(&ib).unwrap()
        && &ia * &ib == ia.checked_mul(&ib).unwrap()
        && (b == 0 || &ia / &ib == ia.checked_div_floor(&ib).unwrap())
        && (b == 0 || &ia % &ib == ia.checked_rem_floor(&ib).unwrap())
}

#[quickcheck]
fn hash_agrees_with_the_machine_hash(n: i64) -> bool {
    host_hash(&Int::from(n)) == host_hash_i64(n)
}

#[quickcheck]
fn format_spec_matches_std_where_they_overlap(n: i64, width: u8) -> bool {
    let width = usize::from(width % 24);
    let x = Int::from(n);
    // std's integer formatting implements the same width/fill/zero-pad
    // rules for the specs both languages share.
    format_int(&x, &format!("{width}")).unwrap() == format!("{n:width$}")
        && format_int(&x, &format!("<{width}")).unwrap() == format!("{n:<width$}")
        && format_int(&x, &format!("0{width}")).unwrap() == format!("{n:0width$}")
}

#[quickcheck]
fn float_conversion_matches_the_machine_cast(n: i64) -> bool {
    Int::from(n).to_f64().unwrap() == n as f64
}

#[quickcheck]
fn true_division_is_correctly_rounded_on_exact_inputs(a: i32, b: i32) -> TestResult {
    if b == 0 {
        return TestResult::discard();
    }
    // i32 operands convert to f64 exactly, so the machine division is the
    // correctly rounded reference.
    let got = Int::from(a).div_to_f64(&Int::from(b)).unwrap();
    TestResult::from_bool(got == f64::from(a) / f64::from(b))
}

#[quickcheck]
fn rational_arithmetic_matches_cross_multiplication(an: i32, ad: i32, bn: i32, bd: i32) -> TestResult {
    if ad == 0 || bd == 0 {
        return TestResult::discard();
    }
    let a = Rat::new(Int::from(an), Int::from(ad)).unwrap();
    let b = Rat::new(Int::from(bn), Int::from(bd)).unwrap();
    let sum = a.checked_add(&b).unwrap();
    // an/ad + bn/bd == (an·bd + bn·ad) / (ad·bd)
    let lhs = sum.numerator() * Int::from(i64::from(ad) * i64::from(bd));
    let rhs = sum.denominator()
        * Int::from(i64::from(an) * i64::from(bd) + i64::from(bn) * i64::from(ad));
    TestResult::from_bool(lhs == rhs)
}

#[quickcheck]
fn string_round_trip_through_the_facade(n: i64) -> bool {
    let x = Int::from(n);
    x.to_string().parse::<Int>().unwrap() == x
        && Int::from_str_base(&x.to_string_base(16, true).unwrap(), 0).unwrap() == x
}

#[rstest::rstest]
#[case(1234567, ",", "1,234,567")]
#[case(-1234567, ",d", "-1,234,567")]
#[case(1234, "08,d", "0,001,234")]
#[case(255, "#010x", "0x000000ff")]
#[case(255, "#_b", "0b1111_1111")]
#[case(-42, "=+10d", "-       42")]
#[case(42, "+", "+42")]
#[case(42, " d", " 42")]
#[case(65, "c", "A")]
#[case(48, "#x", "0x30")]
#[case(7, "^5", "  7  ")]
fn format_scenarios_match_the_host_formatter(
    #[case] value: i64,
    #[case] spec: &str,
    #[case] want: &str,
) {
    assert_eq!(format_int(&Int::from(value), spec).unwrap(), want);
}

#[test]
fn grouping_rejects_foreign_bases() {
    assert!(format_int(&Int::from(1), ",x").is_err());
}

#[test]
fn module_functions_cover_the_scenarios() {
    assert_eq!(
        factorial(&Int::from(13)).unwrap(),
        Int::from(6_227_020_800i64)
    );
    assert_eq!(factorial(&Int::from(-1)), Err(Error::Value(
        "factorial() argument must be a nonnegative machine integer"
    )));
    let (g, x, y) = gcdext(&Int::from(12), &Int::from(18)).unwrap();
    assert_eq!((g, x, y), (Int::from(6), Int::from(-1), Int::from(1)));
    assert_eq!(gcd(&Int::ZERO, &Int::ZERO).unwrap(), Int::ZERO);
    assert_eq!(isqrt(&Int::from(10)).unwrap(), Int::from(3));
    assert_eq!(fibonacci(&Int::from(10)).unwrap(), Int::from(55));
    assert_eq!(comb(&Int::from(100), &Int::from(2)).unwrap(), Int::from(4950));
}

#[test]
fn byte_round_trips_through_the_facade() {
    use zz::ByteOrder;
    let x = Int::from(-129);
    let buf = x.to_bytes(2, ByteOrder::Big, true).unwrap();
    assert_eq!(buf, [0xff, 0x7f]);
    assert_eq!(Int::from_bytes(&buf, ByteOrder::Big, true).unwrap(), x);
    assert_eq!(
        Int::from(128).to_bytes(1, ByteOrder::Big, true),
        Err(Error::Overflow)
    );
}

#[test]
fn lifecycle_round_trip() {
    zz::setup(None).unwrap();
    assert_eq!(factorial(&Int::from(20)).unwrap().to_string(), "2432902008176640000");
    zz::finish();
    assert_eq!(factorial(&Int::from(20)).unwrap().to_string(), "2432902008176640000");
}

#[test]
fn hash_reduces_modulo_the_mersenne_prime() {
    use zz::HASH_MODULUS;
    let m = Int::from(HASH_MODULUS);
    assert_eq!(host_hash(&m), 0);
    assert_eq!(host_hash(&(&m * 12345 + 17)), 17);
    assert_eq!(host_hash(&Int::from(-1)), -2);
}
