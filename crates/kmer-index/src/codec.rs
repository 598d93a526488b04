//! DNA Codec (C1) - Pack/Unpack/Compare
//!
//! Packs A/C/G/T text into 2-bit-per-base byte strings and back. Encoding is
//! `A=0, C=1, G=2, T=3`, four bases per byte, big-end-first within the byte:
//! for a 4-mer `b0 b1 b2 b3` the byte is `64*c(b0) + 16*c(b1) + 4*c(b2) + c(b3)`
//! (§4.1). `K mod 4 != 0` pads the trailing bases of the last byte with `A`
//! (code 0); `unpack` drops that padding by stopping at `k` bases.
//!
//! The unpack lookup table is a 256-entry table mapping a packed byte to its
//! four decoded bases, built once and cached behind a `OnceLock` (the safe
//! equivalent of the original's process-wide mutable table, per the Design
//! Notes' "Global mutable state" guidance: treat it as an immutable static
//! after first use).

use crate::error::{IndexError, Result};
use std::cmp::Ordering;
use std::sync::OnceLock;

const BASES: [u8; 4] = [b'A', b'C', b'G', b'T'];

static UNPACK_LUT: OnceLock<[[u8; 4]; 256]> = OnceLock::new();

fn unpack_lut() -> &'static [[u8; 4]; 256] {
    UNPACK_LUT.get_or_init(build_unpack_lut)
}

fn build_unpack_lut() -> [[u8; 4]; 256] {
    let mut table = [[0u8; 4]; 256];
    for code in 0..256usize {
        table[code] = [
            BASES[(code >> 6) & 3],
            BASES[(code >> 4) & 3],
            BASES[(code >> 2) & 3],
            BASES[code & 3],
        ];
    }
    table
}

fn encode_base(b: u8, position: usize) -> Result<u8> {
    match b {
        b'A' => Ok(0),
        b'C' => Ok(1),
        b'G' => Ok(2),
        b'T' => Ok(3),
        other => Err(IndexError::InvalidBase {
            base: other,
            position,
        }),
    }
}

fn pack_quad(quad: [u8; 4], base_offset: usize) -> Result<u8> {
    let mut byte = 0u8;
    for (i, &b) in quad.iter().enumerate() {
        let code = encode_base(b, base_offset + i)?;
        byte |= code << (6 - 2 * i);
    }
    Ok(byte)
}

/// Pack a `k`-base string into its `P = ceil(k/4)`-byte 2-bit representation.
///
/// `text.len()` must equal `k` exactly, and `P` (the const generic) must
/// equal `ceil(k/4)` — both are checked defensively even though the
/// producer is supposed to guarantee clean, correctly-sized input (§4.1
/// "Failure").
pub fn pack<const P: usize>(text: &[u8], k: usize) -> Result<[u8; P]> {
    if text.len() != k {
        return Err(IndexError::InvalidKmerLength {
            expected: k,
            actual: text.len(),
        });
    }
    if (k + 3) / 4 != P {
        return Err(IndexError::InvalidKmerLength {
            expected: P * 4,
            actual: k,
        });
    }

    let mut out = [0u8; P];
    for i in 0..P {
        let base = i * 4;
        let take = (k - base).min(4);
        let mut quad = [b'A'; 4];
        quad[..take].copy_from_slice(&text[base..base + take]);
        out[i] = pack_quad(quad, base)?;
    }
    Ok(out)
}

/// Unpack a `P`-byte packed key back into its `k`-base text, with a trailing
/// null byte for C-string interop (§4.1). Unlike `pack`, this never fails:
/// every packed byte decodes to four valid bases via the lookup table.
pub fn unpack<const P: usize>(packed: &[u8; P], k: usize) -> Vec<u8> {
    let lut = unpack_lut();
    let mut out = Vec::with_capacity(k + 1);
    for (i, &byte) in packed.iter().enumerate() {
        let quad = lut[byte as usize];
        let take = (k - i * 4).min(4);
        out.extend_from_slice(&quad[..take]);
    }
    out.push(0);
    out
}

/// Lexicographic comparison of two packed keys (§4.1). Equality is the only
/// case the index protocol actually relies on; ordering is incidental.
pub fn compare<const P: usize>(a: &[u8; P], b: &[u8; P]) -> Ordering {
    a.as_slice().cmp(b.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_single_fourmer() {
        // Scenario 1: "ACGT" -> 0b00_01_10_11 = 0x1B
        let packed = pack::<1>(b"ACGT", 4).unwrap();
        assert_eq!(packed, [0x1B]);
        assert_eq!(&unpack::<1>(&packed, 4)[..4], b"ACGT");
    }

    #[test]
    fn test_pack_with_padding() {
        // Scenario 2: K=5, "ACGTA" -> [0x1B, 0x00]
        let packed = pack::<2>(b"ACGTA", 5).unwrap();
        assert_eq!(packed, [0x1B, 0x00]);
        assert_eq!(&unpack::<2>(&packed, 5)[..5], b"ACGTA");
    }

    #[test]
    fn test_pack_rejects_wrong_length() {
        let err = pack::<1>(b"ACG", 4).unwrap_err();
        assert!(matches!(err, IndexError::InvalidKmerLength { .. }));
    }

    #[test]
    fn test_pack_rejects_invalid_base() {
        let err = pack::<1>(b"ACGN", 4).unwrap_err();
        match err {
            IndexError::InvalidBase { base, position } => {
                assert_eq!(base, b'N');
                assert_eq!(position, 3);
            },
            _ => panic!("expected InvalidBase"),
        }
    }

    #[test]
    fn test_compare_equal() {
        let a = pack::<1>(b"ACGT", 4).unwrap();
        let b = pack::<1>(b"ACGT", 4).unwrap();
        assert_eq!(compare(&a, &b), Ordering::Equal);
    }

    #[test]
    fn test_compare_not_equal() {
        let a = pack::<1>(b"ACGT", 4).unwrap();
        let b = pack::<1>(b"TTTT", 4).unwrap();
        assert_ne!(compare(&a, &b), Ordering::Equal);
    }

    // P1: codec round-trip for every 4-mer over {A,C,G,T}.
    #[quickcheck_macros::quickcheck]
    fn prop_roundtrip_4mer(a: u8, c: u8, g: u8, t: u8) -> bool {
        let bases = [b'A', b'C', b'G', b'T'];
        let s = [
            bases[(a % 4) as usize],
            bases[(c % 4) as usize],
            bases[(g % 4) as usize],
            bases[(t % 4) as usize],
        ];
        let packed = pack::<1>(&s, 4).unwrap();
        unpack::<1>(&packed, 4)[..4] == s
    }

    // P2: packed equality iff source equality, for fixed-length strings.
    #[quickcheck_macros::quickcheck]
    fn prop_equality(a: (u8, u8, u8, u8), b: (u8, u8, u8, u8)) -> bool {
        let bases = [b'A', b'C', b'G', b'T'];
        let to_str = |q: (u8, u8, u8, u8)| {
            [
                bases[(q.0 % 4) as usize],
                bases[(q.1 % 4) as usize],
                bases[(q.2 % 4) as usize],
                bases[(q.3 % 4) as usize],
            ]
        };
        let sa = to_str(a);
        let sb = to_str(b);
        let pa = pack::<1>(&sa, 4).unwrap();
        let pb = pack::<1>(&sb, 4).unwrap();
        (compare(&pa, &pb) == Ordering::Equal) == (sa == sb)
    }
}
