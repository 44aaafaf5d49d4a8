use crate::{Error, Result};

/// An immutable nucleotide pairing.
///
/// A 256-entry lookup table built at compile time. Bytes without a
/// partner map to zero and are rejected.
#[derive(Debug)]
pub struct NucleotidePairing {
    table: [u8; 256],
}
impl NucleotidePairing {
    /// Build a pairing from `(base, partner)` tuples.
    pub const fn new(pairs: &[(u8, u8)]) -> Self {
        let mut table = [0u8; 256];
        let mut i = 0;
        while i < pairs.len() {
            table[pairs[i].0 as usize] = pairs[i].1;
            i += 1;
        }
        Self { table }
    }

    pub fn complement(&self, base: u8) -> Result<u8> {
        match self.table[base as usize] {
            0 => Err(Error::UnsupportedSymbol(base as char)),
            partner => Ok(partner),
        }
    }

    /// Reverse `seq` and substitute each base by its partner.
    ///
    /// Fails on the first byte without a partner instead of passing it
    /// through unchanged.
    pub fn reverse_complement(&self, seq: &[u8]) -> Result<Vec<u8>> {
        seq.iter().rev().map(|&base| self.complement(base)).collect()
    }
}

/// The `A<->T`, `G<->C`, `N<->N` pairing.
pub static DNA: NucleotidePairing = NucleotidePairing::new(&[
    (b'A', b'T'),
    (b'T', b'A'),
    (b'G', b'C'),
    (b'C', b'G'),
    (b'N', b'N'),
]);

/// Reverse complement under the [`DNA`] pairing.
pub fn reverse_complement(seq: &[u8]) -> Result<Vec<u8>> {
    DNA.reverse_complement(seq)
}
