#![no_main]

use libfuzzer_sys::fuzz_target;

use arbcore_float::{Float, Round};

fn limbs(bytes: &[u8]) -> Vec<u64> {
    bytes
        .chunks(8)
        .map(|c| {
            let mut buf = [0u8; 8];
            buf[..c.len()].copy_from_slice(c);
            u64::from_le_bytes(buf)
        })
        .collect()
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }
    // Header: precision, rounding mode, split point between the operands.
    let prec = u64::from(u16::from_le_bytes([data[0], data[1]]) % 2048) + 1;
    let rnd = Round::ALL[usize::from(data[2]) % Round::ALL.len()];
    let body = &data[4..];
    let split = usize::from(data[3]).min(body.len());
    let x = Float::from_parts(data[2] & 0x80 != 0, limbs(&body[..split]), -i64::from(data[3]));
    let y = Float::from_parts(false, limbs(&body[split..]), i64::from(data[1]));

    let rounded = x.mul(&y, prec, rnd).expect("valid precision");
    let exact = x.mul_exact(&y).expect("exact product");
    assert_eq!(rounded, exact.set_round(prec, rnd).expect("valid precision"));
    assert!(rounded.value.bits() <= prec);
    assert_eq!(rounded.exact, rounded.value == exact);
});
