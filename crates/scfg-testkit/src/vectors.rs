//! Golden digest vectors.
//!
//! Published test vectors for each algorithm. A mismatch means the
//! dispatcher routes to the wrong primitive or mangles its input.

use scfg_hash::{hash_to_hex, HashId};

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Algorithm under test.
    pub id: HashId,
    /// Input bytes.
    pub input: &'static [u8],
    /// Expected digest (lowercase hex).
    pub expected: &'static str,
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "blake3 empty",
            id: HashId::Blake3,
            input: b"",
            expected: "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262",
        },
        GoldenVector {
            name: "blake3 abc",
            id: HashId::Blake3,
            input: b"abc",
            expected: "6437b3ac38465133ffb63b75273a8db548c558465d79db03fd359c6cd5bd9d85",
        },
        GoldenVector {
            name: "sha3-512 empty",
            id: HashId::Sha512,
            input: b"",
            expected: "a69f73cca23a9ac5c8b567dc185a756e97c982164fe25859e0d1dcc1475c80a6\
                       15b2123af1f5f94c11e3e9402c3ac558f500199d95b6d3e301758586281dcd26",
        },
        GoldenVector {
            name: "sha3-512 abc",
            id: HashId::Sha512,
            input: b"abc",
            expected: "b751850b1a57168a5693cd924b6b096e08f621827444f70d884f5d0240d2712e\
                       10e116e9192af3c91a7ec57647e3934057340b4cf408d5a56592f8274eec53f0",
        },
        GoldenVector {
            name: "whirlpool empty",
            id: HashId::Whirlpool,
            input: b"",
            expected: "19fa61d75522a4669b44e39c1d2e1726c530232130d407f89afee0964997f7a7\
                       3e83be698b288febcf88e3e03c4f0757ea8964e59b63d93708b138cc42a66eb3",
        },
        GoldenVector {
            name: "whirlpool abc",
            id: HashId::Whirlpool,
            input: b"abc",
            expected: "4e2448a4c6f486bb16b6562c73b4020bf3043e3a731bce721ae1b303d97e6d4c\
                       7181eebdb6c57e277d0e34957114cbd6c797fc9d95d8b582d225292076d4eef5",
        },
    ]
}

/// Check every vector, returning `(name, matches, actual_hex)` per vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let actual = hash_to_hex(v.input, v.id).unwrap_or_else(|e| e.to_string());
            (v.name.to_string(), actual == v.expected, actual)
        })
        .collect()
}
