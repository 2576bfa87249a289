use rand::rngs::OsRng;
use rand::seq::SliceRandom;
use rand::{CryptoRng, Rng};

pub const PASSWORD_LENGTH: usize = 16;
pub const SYMBOLS: &[u8] = b"!@#$%&*_+-=|";

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const ALPHANUMERIC: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const CLASS_BLOCKS: usize = 3;

/// Generates a temporary login password from the operating system CSPRNG.
pub fn generate_password() -> String {
    generate_password_with(&mut OsRng)
}

/// One alphanumeric seed character followed by three
/// symbol/lowercase/uppercase/digit blocks, shuffled.
pub fn generate_password_with<R: Rng + CryptoRng + ?Sized>(rng: &mut R) -> String {
    let mut chars = Vec::with_capacity(PASSWORD_LENGTH);
    chars.push(pick(ALPHANUMERIC, rng));
    for _ in 0..CLASS_BLOCKS {
        chars.push(pick(SYMBOLS, rng));
        chars.push(pick(LOWERCASE, rng));
        chars.push(pick(UPPERCASE, rng));
        chars.push(pick(DIGITS, rng));
    }
    chars.shuffle(rng);
    chars.into_iter().map(char::from).collect()
}

fn pick<R: Rng + ?Sized>(alphabet: &[u8], rng: &mut R) -> u8 {
    alphabet[rng.gen_range(0..alphabet.len())]
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn symbol_count(password: &str) -> usize {
        password.bytes().filter(|byte| SYMBOLS.contains(byte)).count()
    }

    fn assert_policy(password: &str) {
        assert_eq!(password.len(), PASSWORD_LENGTH, "{password}");
        assert!(password.bytes().any(|b| b.is_ascii_lowercase()), "{password}");
        assert!(password.bytes().any(|b| b.is_ascii_uppercase()), "{password}");
        assert!(password.bytes().any(|b| b.is_ascii_digit()), "{password}");
        assert_eq!(symbol_count(password), 3, "{password}");
        assert!(!password.contains('"'), "{password}");
        assert!(!password.contains('\\'), "{password}");
    }

    #[test]
    fn generated_passwords_satisfy_composition_policy() {
        for _ in 0..500 {
            assert_policy(&generate_password());
        }
    }

    #[test]
    fn seeded_generation_satisfies_policy_and_is_reproducible() {
        let first = generate_password_with(&mut StdRng::seed_from_u64(7));
        let second = generate_password_with(&mut StdRng::seed_from_u64(7));

        assert_policy(&first);
        assert_eq!(first, second);
    }

    #[test]
    fn successive_passwords_differ() {
        assert_ne!(generate_password(), generate_password());
    }

    #[test]
    fn symbols_are_shuffled_across_every_position() {
        let mut rng = StdRng::seed_from_u64(42);
        let symbol_positions: std::collections::BTreeSet<usize> = (0..200)
            .flat_map(|_| {
                generate_password_with(&mut rng)
                    .bytes()
                    .enumerate()
                    .filter(|(_, byte)| SYMBOLS.contains(byte))
                    .map(|(index, _)| index)
                    .collect::<Vec<_>>()
            })
            .collect();

        assert_eq!(symbol_positions.len(), PASSWORD_LENGTH);
    }
}
