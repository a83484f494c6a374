//! Reed–Solomon error correction over GF(2^8) with the QR generator
//! polynomial `x^8 + x^4 + x^3 + x^2 + 1`.

/// Coefficients of the generator polynomial of the given degree, highest
/// power first, leading `1` omitted.
pub(crate) fn divisor(degree: usize) -> Vec<u8> {
    let mut result = vec![0u8; degree];
    if let Some(last) = result.last_mut() {
        *last = 1;
    }

    // Multiply together (x - r^0)(x - r^1)...(x - r^{degree-1}).
    let mut root = 1u8;
    for _ in 0..degree {
        for j in 0..degree {
            result[j] = multiply(result[j], root);
            if j + 1 < degree {
                result[j] ^= result[j + 1];
            }
        }
        root = multiply(root, 0x02);
    }
    result
}

/// Error correction codewords of `data` for the given generator.
pub(crate) fn remainder(data: &[u8], divisor: &[u8]) -> Vec<u8> {
    let mut result = vec![0u8; divisor.len()];
    for &b in data {
        let factor = b ^ result.remove(0);
        result.push(0);
        for (x, &y) in result.iter_mut().zip(divisor) {
            *x ^= multiply(y, factor);
        }
    }
    result
}

/// Russian peasant multiplication modulo 0x11D.
fn multiply(x: u8, y: u8) -> u8 {
    let mut z = 0u8;
    for i in (0..8).rev() {
        z = (z << 1) ^ ((z >> 7) * 0x1D);
        z ^= ((y >> i) & 1) * x;
    }
    z
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_multiplication() {
        assert_eq!(multiply(0, 0xFF), 0);
        assert_eq!(multiply(1, 0x53), 0x53);
        assert_eq!(multiply(0x02, 0x80), 0x1D);
        assert_eq!(multiply(0x53, 0xCA), multiply(0xCA, 0x53));
    }

    #[test]
    fn known_codeword_block() {
        // Version 1-M block of the "01234567" numeric sample.
        let data = [
            32, 91, 11, 120, 209, 114, 220, 77, 67, 64, 236, 17, 236, 17, 236, 17,
        ];
        assert_eq!(
            remainder(&data, &divisor(10)),
            [196, 35, 39, 119, 235, 215, 231, 226, 93, 23]
        );
    }

    #[test]
    fn divisor_degree() {
        assert_eq!(divisor(7).len(), 7);
        assert!(divisor(0).is_empty());
    }
}
