use rand::Rng;

// Lowercase base32, the shape session/entity ids have always had in this
// portal. 16 chars = 80 bits of entropy.
const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz234567";
const ID_LEN: usize = 16;

/// Generate an opaque entity id.
pub fn generate() -> String {
    let mut rng = rand::rng();
    (0..ID_LEN)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_well_formed() {
        let id = generate();
        assert_eq!(id.len(), 16);
        assert!(id.bytes().all(|b| ALPHABET.contains(&b)));
        assert_ne!(generate(), generate());
    }
}
